//! NestJS resolver stub builder

use super::graphql::REQUEST_ARGUMENT;
use super::typescript::TYPINGS_FILE_PREFIX;
use crate::plugin::{OutputFile, SourceBuilder, Syntax};
use crate::templates::{load_templates, render};
use heck::ToUpperCamelCase;
use proto_converter_common::{
    create_method_name, full_type_name, MethodClassifier, ProtoInfo, Result,
};
use serde::Serialize;
use std::collections::BTreeSet;
use tera::{Context, Tera};

/// Builds `resolver.ts`, a resolver class whose handlers match the fields
/// of the generated schema one to one
pub struct NestjsResolverBuilder {
    tera: Tera,
}

impl NestjsResolverBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tera: load_templates()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct ServiceView<'a> {
    full_name: &'a str,
    comment: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct HandlerView {
    name: String,
    decorator: &'static str,
    has_args: bool,
    request: String,
    response: String,
    comment: Option<String>,
}

impl SourceBuilder for NestjsResolverBuilder {
    fn name(&self) -> &'static str {
        "resolver"
    }

    fn output(&self) -> OutputFile {
        OutputFile {
            prefix: "resolver",
            suffix: "ts",
            syntax: Syntax::Typescript,
        }
    }

    fn create_source(&self, info: &ProtoInfo) -> Result<String> {
        let mut imports = BTreeSet::new();
        let mut handlers = Vec::with_capacity(info.service.methods.len());

        for method in &info.service.methods {
            let request = info.root.lookup_message(&method.request_type)?;
            let response = info.root.lookup(&method.response_type)?;

            let handler = HandlerView {
                name: create_method_name(method, &info.root),
                decorator: MethodClassifier::classify(&method.name).type_name(),
                has_args: request.has_fields(),
                request: full_type_name(&request.full_name),
                response: full_type_name(response.full_name()),
                comment: method.comment.clone(),
            };
            if handler.has_args {
                imports.insert(handler.request.clone());
            }
            imports.insert(handler.response.clone());
            handlers.push(handler);
        }

        let mut context = Context::new();
        context.insert(
            "service",
            &ServiceView {
                full_name: &info.service.full_name,
                comment: info.service.comment.as_deref(),
            },
        );
        context.insert("class_name", &resolver_class_name(&info.service.name));
        context.insert("imports", &imports);
        context.insert("typings_module", TYPINGS_FILE_PREFIX);
        context.insert("argument", REQUEST_ARGUMENT);
        context.insert("methods", &handlers);
        render(&self.tera, "resolver.ts", &context)
    }
}

fn resolver_class_name(service_name: &str) -> String {
    format!("{}Resolver", service_name.to_upper_camel_case())
}
