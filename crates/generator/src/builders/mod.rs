//! Artifact builders
//!
//! Each builder reads the same `ProtoInfo` and produces one source file.

mod gql;
mod graphql;
mod resolver;
mod typescript;

pub use gql::GqlDocumentBuilder;
pub use graphql::{create_schema, GraphqlSchemaBuilder, REQUEST_ARGUMENT};
pub use resolver::NestjsResolverBuilder;
pub use typescript::{collect_declarations, TypeScriptBuilder, TYPINGS_FILE_PREFIX};

#[cfg(test)]
pub(crate) mod fixtures {
    use proto_converter_common::{
        ConverterConfig, EnumType, FieldDef, MessageType, NamespaceRoot, ProtoInfo, ScalarType,
        ServiceDescriptor, TypeDef,
    };

    /// `shop.WidgetService` with two queries and two mutations
    pub fn widget_info() -> ProtoInfo {
        let mut service = ServiceDescriptor::new("shop.WidgetService")
            .with_comment("Widget catalogue.")
            .with_method("GetWidget", ".shop.GetWidgetRequest", ".shop.Widget")
            .with_method("ListWidgets", ".shop.Empty", ".shop.ListWidgetsResponse")
            .with_method("CreateWidget", ".shop.CreateWidgetRequest", ".shop.Widget")
            .with_method("DeleteWidget", ".shop.DeleteWidgetRequest", ".shop.Empty");
        service.methods[0] = service.methods[0].clone().with_comment("Fetch a widget.\nBy id.");

        let root = NamespaceRoot::new()
            .with_type(TypeDef::Message(MessageType::new("shop.Empty")))
            .with_type(TypeDef::Message(
                MessageType::new("shop.GetWidgetRequest")
                    .with_field(FieldDef::scalar("widget_id", 1, ScalarType::String)),
            ))
            .with_type(TypeDef::Message(
                MessageType::new("shop.DeleteWidgetRequest")
                    .with_field(FieldDef::scalar("widget_id", 1, ScalarType::String)),
            ))
            .with_type(TypeDef::Message(
                MessageType::new("shop.CreateWidgetRequest")
                    .with_field(FieldDef::message("widget", 1, "shop.Widget")),
            ))
            .with_type(TypeDef::Message(
                MessageType::new("shop.ListWidgetsResponse")
                    .with_field(FieldDef::message("widgets", 1, "shop.Widget").repeated()),
            ))
            .with_type(TypeDef::Message(
                MessageType::new("shop.Widget")
                    .with_comment("A thing for sale.")
                    .with_field(
                        FieldDef::scalar("widget_id", 1, ScalarType::String)
                            .with_comment("Stable identifier."),
                    )
                    .with_field(FieldDef::scalar("price_cents", 2, ScalarType::Int64))
                    .with_field(FieldDef::enumeration("status", 3, "shop.Status"))
                    .with_field(FieldDef::scalar("tags", 4, ScalarType::String).repeated())
                    .with_field(FieldDef::message("parts", 5, "shop.Part").repeated())
                    .with_field(FieldDef::new(
                        "attributes",
                        6,
                        proto_converter_common::FieldKind::Map {
                            key: ScalarType::String,
                            value: Box::new(proto_converter_common::FieldKind::Scalar(
                                ScalarType::Double,
                            )),
                        },
                    ))
                    .with_field(
                        FieldDef::scalar("nickname", 7, ScalarType::String).with_presence(),
                    ),
            ))
            .with_type(TypeDef::Message(
                MessageType::new("shop.Part")
                    .with_field(FieldDef::scalar("label", 1, ScalarType::String))
                    .with_field(FieldDef::message("child", 2, "shop.Part")),
            ))
            .with_type(TypeDef::Enum(
                EnumType::new("shop.Status")
                    .with_value("STATUS_UNKNOWN", 0)
                    .with_value("STATUS_ACTIVE", 1),
            ))
            .with_type(TypeDef::Message(
                MessageType::new("shop.Unused")
                    .with_field(FieldDef::scalar("ignored", 1, ScalarType::Bool)),
            ))
            .with_service(service.clone());

        ProtoInfo::new(service, root, ConverterConfig::default())
    }
}
