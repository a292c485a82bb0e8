//! TypeScript typings builder

use crate::plugin::{OutputFile, SourceBuilder, Syntax};
use crate::templates::{load_templates, render};
use heck::ToLowerCamelCase;
use proto_converter_common::{
    create_typing_method_name, full_type_name, FieldDef, FieldKind, Method, ProtoInfo, Result,
    ScalarType, TypeDef,
};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tera::{Context, Tera};

/// File prefix of the typings module, imported by the resolver stub
pub const TYPINGS_FILE_PREFIX: &str = "typings";

/// Builds `typings.ts`: one declaration per type reachable from the
/// service, plus an interface describing the service itself
pub struct TypeScriptBuilder {
    tera: Tera,
}

impl TypeScriptBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tera: load_templates()?,
        })
    }
}

impl SourceBuilder for TypeScriptBuilder {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn output(&self) -> OutputFile {
        OutputFile {
            prefix: TYPINGS_FILE_PREFIX,
            suffix: "ts",
            syntax: Syntax::Typescript,
        }
    }

    fn create_source(&self, info: &ProtoInfo) -> Result<String> {
        let mut context = Context::new();
        context.insert("service", &service_view(info));
        context.insert("declarations", &declaration_views(info)?);
        render(&self.tera, "typescript.ts", &context)
    }
}

#[derive(Debug, Serialize)]
struct ServiceView {
    name: String,
    full_name: String,
    comment: Option<String>,
    methods: Vec<MethodView>,
}

#[derive(Debug, Serialize)]
struct MethodView {
    name: String,
    request: String,
    returns: String,
    comment: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeclarationView {
    kind: &'static str,
    name: String,
    comment: Option<String>,
    fields: Vec<FieldView>,
    values: Vec<EnumValueView>,
}

#[derive(Debug, Serialize)]
struct FieldView {
    name: String,
    optional: bool,
    ts_type: String,
    comment: Option<String>,
}

#[derive(Debug, Serialize)]
struct EnumValueView {
    name: String,
    number: i32,
    comment: Option<String>,
}

/// Every type reachable from the service's requests and responses, in
/// breadth-first discovery order, each listed once
pub fn collect_declarations(info: &ProtoInfo) -> Result<Vec<&TypeDef>> {
    let mut queue: VecDeque<&str> = VecDeque::new();
    for method in &info.service.methods {
        queue.push_back(&method.request_type);
        queue.push_back(&method.response_type);
    }

    let mut seen = HashSet::new();
    let mut declarations = Vec::new();
    while let Some(name) = queue.pop_front() {
        let type_def = info.root.lookup(name)?;
        if !seen.insert(type_def.full_name()) {
            continue;
        }
        if let TypeDef::Message(message) = type_def {
            queue.extend(message.fields.values().filter_map(FieldDef::referenced_type));
        }
        declarations.push(type_def);
    }

    Ok(declarations)
}

fn declaration_views(info: &ProtoInfo) -> Result<Vec<DeclarationView>> {
    let declarations = collect_declarations(info)?;
    tracing::debug!("{} declaration(s) reachable", declarations.len());

    Ok(declarations
        .into_iter()
        .map(|type_def| match type_def {
            TypeDef::Message(message) => DeclarationView {
                kind: "interface",
                name: full_type_name(&message.full_name),
                comment: message.comment.clone(),
                fields: message
                    .fields
                    .values()
                    .map(|field| FieldView {
                        name: field.name.to_lower_camel_case(),
                        optional: field.is_optional(),
                        ts_type: field_type(field),
                        comment: field.comment.clone(),
                    })
                    .collect(),
                values: Vec::new(),
            },
            TypeDef::Enum(enumeration) => DeclarationView {
                kind: "enum",
                name: full_type_name(&enumeration.full_name),
                comment: enumeration.comment.clone(),
                fields: Vec::new(),
                values: enumeration
                    .values
                    .iter()
                    .map(|value| EnumValueView {
                        name: value.name.clone(),
                        number: value.number,
                        comment: value.comment.clone(),
                    })
                    .collect(),
            },
        })
        .collect())
}

fn service_view(info: &ProtoInfo) -> ServiceView {
    ServiceView {
        name: info.service.name.clone(),
        full_name: info.service.full_name.clone(),
        comment: info.service.comment.clone(),
        methods: info.service.methods.iter().map(method_view).collect(),
    }
}

fn method_view(method: &Method) -> MethodView {
    let request = full_type_name(&method.request_type);
    let response = full_type_name(&method.response_type);
    MethodView {
        name: create_typing_method_name(method),
        request: if method.client_streaming {
            format!("AsyncIterable<{}>", request)
        } else {
            request
        },
        returns: if method.server_streaming {
            format!("AsyncIterable<{}>", response)
        } else {
            format!("Promise<{}>", response)
        },
        comment: method.comment.clone(),
    }
}

fn field_type(field: &FieldDef) -> String {
    let base = kind_type(&field.kind);
    if field.is_repeated() {
        format!("{}[]", base)
    } else {
        base
    }
}

fn kind_type(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Scalar(scalar) => scalar_type(*scalar).to_string(),
        FieldKind::Message(name) | FieldKind::Enum(name) => full_type_name(name),
        // JSON object keys are strings whatever the proto key type
        FieldKind::Map { value, .. } => format!("{{ [key: string]: {} }}", kind_type(value)),
    }
}

/// 64-bit integers are carried as strings to avoid precision loss
fn scalar_type(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::Bool => "boolean",
        ScalarType::String => "string",
        ScalarType::Bytes => "Uint8Array",
        s if s.is_64_bit_integer() => "string",
        _ => "number",
    }
}
