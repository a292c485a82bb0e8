//! Client operation documents for the generated schema

use super::graphql::REQUEST_ARGUMENT;
use crate::plugin::{OutputFile, SourceBuilder, Syntax};
use crate::templates::{load_templates, render};
use heck::ToLowerCamelCase;
use proto_converter_common::{
    create_method_name, full_type_name, FieldKind, MessageType, Method, MethodClassifier,
    NamespaceRoot, ProtoInfo, Result, TypeDef,
};
use serde::Serialize;
use tera::{Context, Tera};

/// Selection lines start inside `op { field {`
const SELECTION_INDENT: usize = 3;

/// Builds `gql.ts`, one `gql` document per method
pub struct GqlDocumentBuilder {
    tera: Tera,
}

impl GqlDocumentBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tera: load_templates()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct ServiceView<'a> {
    full_name: &'a str,
}

#[derive(Debug, Serialize)]
struct DocumentView {
    name: String,
    operation: &'static str,
    field: String,
    variables: String,
    arguments: String,
    selection: String,
    comment: Option<String>,
}

impl SourceBuilder for GqlDocumentBuilder {
    fn name(&self) -> &'static str {
        "gql"
    }

    fn output(&self) -> OutputFile {
        OutputFile {
            prefix: "gql",
            suffix: "ts",
            syntax: Syntax::Typescript,
        }
    }

    fn create_source(&self, info: &ProtoInfo) -> Result<String> {
        let documents = info
            .service
            .methods
            .iter()
            .map(|method| document_view(method, &info.root))
            .collect::<Result<Vec<_>>>()?;

        let mut context = Context::new();
        context.insert(
            "service",
            &ServiceView {
                full_name: &info.service.full_name,
            },
        );
        context.insert("documents", &documents);
        render(&self.tera, "gql.ts", &context)
    }
}

fn document_view(method: &Method, root: &NamespaceRoot) -> Result<DocumentView> {
    let request = root.lookup_message(&method.request_type)?;
    let field = create_method_name(method, root);

    let (variables, arguments) = if request.has_fields() {
        (
            format!(
                "(${}: {}!)",
                REQUEST_ARGUMENT,
                full_type_name(&request.full_name)
            ),
            format!("({}: ${})", REQUEST_ARGUMENT, REQUEST_ARGUMENT),
        )
    } else {
        (String::new(), String::new())
    };

    let lines = match root.lookup(&method.response_type)? {
        TypeDef::Message(response) => {
            let mut path = vec![response.full_name.as_str()];
            selection_set(response, root, &mut path, SELECTION_INDENT)?
        }
        TypeDef::Enum(_) => Vec::new(),
    };
    let selection = if lines.is_empty() {
        format!("{}__typename", indent(SELECTION_INDENT))
    } else {
        lines.join("\n")
    };

    Ok(DocumentView {
        name: field.clone(),
        operation: MethodClassifier::classify(&method.name).as_str(),
        field,
        variables,
        arguments,
        selection,
        comment: method.comment.clone(),
    })
}

/// Select every field of `message`, descending into nested messages
///
/// A message already on `path` is skipped so recursive types terminate.
/// Map fields are selected as leaves.
fn selection_set<'a>(
    message: &'a MessageType,
    root: &'a NamespaceRoot,
    path: &mut Vec<&'a str>,
    depth: usize,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    for field in message.fields.values() {
        let name = field.name.to_lower_camel_case();
        let nested = match &field.kind {
            FieldKind::Message(type_name) => root.lookup_message(type_name)?,
            _ => {
                lines.push(format!("{}{}", indent(depth), name));
                continue;
            }
        };
        if path.contains(&nested.full_name.as_str()) {
            continue;
        }

        path.push(&nested.full_name);
        let children = selection_set(nested, root, path, depth + 1)?;
        path.pop();

        if children.is_empty() {
            lines.push(format!("{}{} {{ __typename }}", indent(depth), name));
        } else {
            lines.push(format!("{}{} {{", indent(depth), name));
            lines.extend(children);
            lines.push(format!("{}}}", indent(depth)));
        }
    }

    Ok(lines)
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::widget_info;

    #[test]
    fn test_query_document() {
        let info = widget_info();
        let doc = document_view(&info.service.methods[0], &info.root).unwrap();

        assert_eq!(doc.operation, "query");
        assert_eq!(doc.name, "widgetService_getWidget");
        assert_eq!(doc.variables, "($request: shop_GetWidgetRequest!)");
        assert_eq!(doc.arguments, "(request: $request)");
        assert_eq!(
            doc.selection,
            [
                "      widgetId",
                "      priceCents",
                "      status",
                "      tags",
                "      parts {",
                "        label",
                "      }",
                "      attributes",
                "      nickname",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_document_without_request_fields() {
        let info = widget_info();
        let doc = document_view(&info.service.methods[1], &info.root).unwrap();
        assert_eq!(doc.operation, "query");
        assert!(doc.variables.is_empty());
        assert!(doc.arguments.is_empty());
        assert!(doc.selection.starts_with("      widgets {\n        widgetId"));
    }

    #[test]
    fn test_empty_response_selects_typename() {
        let info = widget_info();
        let doc = document_view(&info.service.methods[3], &info.root).unwrap();
        assert_eq!(doc.operation, "mutation");
        assert_eq!(doc.selection, "      __typename");
    }

    #[test]
    fn test_gql_source() {
        let source = GqlDocumentBuilder::new()
            .unwrap()
            .create_source(&widget_info())
            .unwrap();

        assert!(source.contains("import gql from 'graphql-tag';"));
        assert!(source.contains("// Fetch a widget. By id.\nexport const widgetService_getWidget = gql`"));
        assert!(source.contains(
            "  query widgetService_getWidget($request: shop_GetWidgetRequest!) {\n    widgetService_getWidget(request: $request) {"
        ));
        assert!(source.contains(
            "  mutation widgetService_createWidget($request: shop_CreateWidgetRequest!) {"
        ));
        assert_eq!(source.matches("= gql`").count(), 4);
    }
}
