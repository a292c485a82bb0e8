//! GraphQL SDL builder
//!
//! Methods become fields on the root `Query` and `Mutation` types. Each
//! field takes the request message as a single argument and returns the
//! response message, both referenced by their combined type names.

use crate::plugin::{OutputFile, SourceBuilder, Syntax};
use indexmap::IndexMap;
use proto_converter_common::{
    assemble_comment, create_method_name, full_type_name, CommentInput, Method, MethodClassifier,
    NamespaceRoot, Operation, ProtoInfo, Result,
};
use std::fmt;

/// Name of the argument carrying the request message
pub const REQUEST_ARGUMENT: &str = "request";

/// Builds `schema.graphql`
pub struct GraphqlSchemaBuilder;

impl SourceBuilder for GraphqlSchemaBuilder {
    fn name(&self) -> &'static str {
        "graphql"
    }

    fn output(&self) -> OutputFile {
        OutputFile {
            prefix: "schema",
            suffix: "graphql",
            syntax: Syntax::Graphql,
        }
    }

    fn create_source(&self, info: &ProtoInfo) -> Result<String> {
        create_schema(info)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FieldConfig {
    type_name: String,
    description: Option<String>,
    /// Argument name to input type; `None` when the request has no fields
    args: Option<IndexMap<String, String>>,
}

#[derive(Debug)]
struct ObjectType {
    name: &'static str,
    fields: IndexMap<String, FieldConfig>,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "type {} {{", self.name)?;
        for (name, field) in &self.fields {
            if let Some(description) = &field.description {
                write!(f, "{}", print_description(description, "  "))?;
            }
            write!(f, "  {}", name)?;
            if let Some(args) = &field.args {
                let args: Vec<String> = args
                    .iter()
                    .map(|(arg, type_name)| format!("{}: {}", arg, type_name))
                    .collect();
                write!(f, "({})", args.join(", "))?;
            }
            writeln!(f, ": {}", field.type_name)?;
        }
        write!(f, "}}")
    }
}

/// Descriptions longer than this are printed in the multi-line form
const DESCRIPTION_LINE_LIMIT: usize = 70;

/// Block string description, switching to the multi-line form for long
/// text or text that would otherwise end in a quote or backslash
fn print_description(description: &str, indent: &str) -> String {
    let single_line = !description.contains('\n');
    let multi_line = !single_line
        || description.ends_with('"')
        || description.ends_with('\\')
        || description.chars().count() > DESCRIPTION_LINE_LIMIT;
    let escaped = description
        .replace("\"\"\"", "\\\"\"\"")
        .replace('\n', &format!("\n{indent}"));

    if !multi_line {
        format!("{indent}\"\"\"{escaped}\"\"\"\n")
    } else if single_line && description.starts_with([' ', '\t']) {
        // a leading line break would change the indentation of the text
        format!("{indent}\"\"\"{escaped}\n{indent}\"\"\"\n")
    } else {
        format!("{indent}\"\"\"\n{indent}{escaped}\n{indent}\"\"\"\n")
    }
}

fn assemble_field(method: &Method, root: &NamespaceRoot) -> Result<(String, FieldConfig)> {
    let request = root.lookup_message(&method.request_type)?;
    let response = root.lookup(&method.response_type)?;

    let args = request.has_fields().then(|| {
        let mut args = IndexMap::new();
        args.insert(
            REQUEST_ARGUMENT.to_string(),
            full_type_name(&request.full_name),
        );
        args
    });
    let description = assemble_comment(CommentInput::new(method.comment.as_deref()).label(""));

    Ok((
        create_method_name(method, root),
        FieldConfig {
            type_name: full_type_name(response.full_name()),
            description: (!description.is_empty()).then_some(description),
            args,
        },
    ))
}

/// Merge fields into one root type; later fields replace earlier ones with
/// the same name but keep the first position
fn merge_fields(operation: Operation, fields: Vec<(String, FieldConfig)>) -> Option<ObjectType> {
    if fields.is_empty() {
        return None;
    }

    let mut merged = IndexMap::new();
    for (name, field) in fields {
        if merged.insert(name.clone(), field).is_some() {
            tracing::warn!(
                "{} field `{}` is defined more than once, keeping the last definition",
                operation.type_name(),
                name
            );
        }
    }

    Some(ObjectType {
        name: operation.type_name(),
        fields: merged,
    })
}

/// Print the SDL for the service in `info`
///
/// Root types without fields are omitted, so a service with only mutations
/// produces no `Query` block.
pub fn create_schema(info: &ProtoInfo) -> Result<String> {
    let mut queries = Vec::new();
    let mut mutations = Vec::new();

    for method in &info.service.methods {
        let field = assemble_field(method, &info.root)?;
        match MethodClassifier::classify(&method.name) {
            Operation::Query => queries.push(field),
            Operation::Mutation => mutations.push(field),
        }
    }

    let blocks: Vec<String> = [
        merge_fields(Operation::Query, queries),
        merge_fields(Operation::Mutation, mutations),
    ]
    .into_iter()
    .flatten()
    .map(|object| object.to_string())
    .collect();

    Ok(blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::widget_info;
    use proto_converter_common::{
        ConverterConfig, ConverterError, FieldDef, MessageType, ScalarType, ServiceDescriptor,
        TypeDef,
    };

    #[test]
    fn test_widget_schema() {
        let schema = create_schema(&widget_info()).unwrap();
        assert_eq!(
            schema,
            "type Query {\n  \"\"\"Fetch a widget. By id.\"\"\"\n  widgetService_getWidget(request: shop_GetWidgetRequest): shop_Widget\n  widgetService_listWidgets: shop_ListWidgetsResponse\n}\n\ntype Mutation {\n  widgetService_createWidget(request: shop_CreateWidgetRequest): shop_Widget\n  widgetService_deleteWidget(request: shop_DeleteWidgetRequest): shop_Empty\n}"
        );
    }

    #[test]
    fn test_schema_is_deterministic() {
        let info = widget_info();
        assert_eq!(create_schema(&info).unwrap(), create_schema(&info).unwrap());
    }

    fn single_method_info(method: &str) -> ProtoInfo {
        let service = ServiceDescriptor::new("demo.Greeter").with_method(
            method,
            "demo.Request",
            "demo.Reply",
        );
        let root = NamespaceRoot::new()
            .with_type(TypeDef::Message(
                MessageType::new("demo.Request")
                    .with_field(FieldDef::scalar("name", 1, ScalarType::String)),
            ))
            .with_type(TypeDef::Message(MessageType::new("demo.Reply")))
            .with_service(service.clone());
        ProtoInfo::new(service, root, ConverterConfig::default())
    }

    #[test]
    fn test_mutation_only_service_has_no_query_block() {
        let schema = create_schema(&single_method_info("SayHello")).unwrap();
        assert!(!schema.contains("type Query"));
        assert!(schema.starts_with("type Mutation {"));
        assert!(schema.contains("greeter_sayHello(request: demo_Request): demo_Reply"));
    }

    #[test]
    fn test_query_prefix_is_case_insensitive() {
        let schema = create_schema(&single_method_info("GETReply")).unwrap();
        assert!(schema.starts_with("type Query {"));
        assert!(!schema.contains("type Mutation"));
    }

    #[test]
    fn test_empty_service_prints_nothing() {
        let service = ServiceDescriptor::new("demo.Idle");
        let root = NamespaceRoot::new().with_service(service.clone());
        let info = ProtoInfo::new(service, root, ConverterConfig::default());
        assert_eq!(create_schema(&info).unwrap(), "");
    }

    #[test]
    fn test_missing_request_type_fails() {
        let service =
            ServiceDescriptor::new("demo.Greeter").with_method("GetX", "demo.Nope", "demo.Nope");
        let root = NamespaceRoot::new().with_service(service.clone());
        let info = ProtoInfo::new(service, root, ConverterConfig::default());

        let err = create_schema(&info).unwrap_err();
        assert!(matches!(err, ConverterError::NotFound(name) if name == "demo.Nope"));
    }

    #[test]
    fn test_colliding_names_keep_last_definition() {
        let fields = vec![
            (
                "svc_getA".to_string(),
                FieldConfig {
                    type_name: "First".to_string(),
                    description: None,
                    args: None,
                },
            ),
            (
                "svc_getB".to_string(),
                FieldConfig {
                    type_name: "B".to_string(),
                    description: None,
                    args: None,
                },
            ),
            (
                "svc_getA".to_string(),
                FieldConfig {
                    type_name: "Second".to_string(),
                    description: None,
                    args: None,
                },
            ),
        ];

        let object = merge_fields(Operation::Query, fields).unwrap();
        assert_eq!(
            object.to_string(),
            "type Query {\n  svc_getA: Second\n  svc_getB: B\n}"
        );
    }

    #[test]
    fn test_description_ending_in_quote_uses_block_form() {
        assert_eq!(
            print_description("say \"hi\"", "  "),
            "  \"\"\"\n  say \"hi\"\n  \"\"\"\n"
        );
        assert_eq!(print_description("plain", ""), "\"\"\"plain\"\"\"\n");
    }

    #[test]
    fn test_long_description_uses_block_form() {
        let at_limit = "x".repeat(DESCRIPTION_LINE_LIMIT);
        assert_eq!(
            print_description(&at_limit, ""),
            format!("\"\"\"{}\"\"\"\n", at_limit)
        );

        let long = "y".repeat(DESCRIPTION_LINE_LIMIT + 1);
        assert_eq!(
            print_description(&long, "  "),
            format!("  \"\"\"\n  {}\n  \"\"\"\n", long)
        );
    }
}
