//! Converts protobuf descriptors to the converter AST

use super::comments::CommentIndex;
use prost_reflect::{
    Cardinality, DescriptorPool, EnumDescriptor, FieldDescriptor, Kind, MessageDescriptor,
    ServiceDescriptor as ReflectService,
};
use proto_converter_common::{
    EnumType, EnumValue, FieldDef, FieldKind, Label, MessageType, Method, NamespaceRoot,
    ScalarType, ServiceDescriptor, ServiceRef, TypeDef,
};

/// Index every message, enum and service of the pool
pub fn build_namespace_root(pool: &DescriptorPool) -> NamespaceRoot {
    let comments = CommentIndex::new(pool);
    let mut root = NamespaceRoot::new();

    for message in pool.all_messages() {
        // Map entries are folded into `FieldKind::Map`
        if message.is_map_entry() {
            continue;
        }
        root.insert_type(TypeDef::Message(convert_message(&message, &comments)));
    }

    for enum_desc in pool.all_enums() {
        root.insert_type(TypeDef::Enum(convert_enum(&enum_desc, &comments)));
    }

    for service in pool.services() {
        root.insert_service(convert_service(&service, &comments));
    }

    root
}

fn convert_service(service: &ReflectService, comments: &CommentIndex) -> ServiceDescriptor {
    let file_name = service.parent_file().name().to_string();
    let reference = ServiceRef::new(service.full_name());

    let methods = service
        .methods()
        .map(|method| Method {
            name: method.name().to_string(),
            parent: reference.clone(),
            request_type: method.input().full_name().to_string(),
            response_type: method.output().full_name().to_string(),
            comment: comments.get(&file_name, method.path()),
            client_streaming: method.is_client_streaming(),
            server_streaming: method.is_server_streaming(),
        })
        .collect();

    ServiceDescriptor {
        name: service.name().to_string(),
        full_name: service.full_name().to_string(),
        comment: comments.get(&file_name, service.path()),
        methods,
    }
}

fn convert_message(message: &MessageDescriptor, comments: &CommentIndex) -> MessageType {
    let file_name = message.parent_file().name().to_string();
    let mut converted = MessageType::new(message.full_name());
    converted.comment = comments.get(&file_name, message.path());

    for field in message.fields() {
        let field_def = convert_field(&field, comments.get(&file_name, field.path()));
        converted.fields.insert(field_def.name.clone(), field_def);
    }

    converted
}

fn convert_field(field: &FieldDescriptor, comment: Option<String>) -> FieldDef {
    let kind = if field.is_map() {
        map_kind(&field.kind())
    } else {
        convert_kind(&field.kind())
    };

    FieldDef {
        name: field.name().to_string(),
        number: field.number(),
        kind,
        label: match field.cardinality() {
            Cardinality::Optional => Label::Optional,
            Cardinality::Required => Label::Required,
            Cardinality::Repeated => Label::Repeated,
        },
        presence: field.supports_presence(),
        comment,
    }
}

fn convert_enum(enum_desc: &EnumDescriptor, comments: &CommentIndex) -> EnumType {
    let file_name = enum_desc.parent_file().name().to_string();
    let mut converted = EnumType::new(enum_desc.full_name());
    converted.comment = comments.get(&file_name, enum_desc.path());
    converted.values = enum_desc
        .values()
        .map(|value| EnumValue {
            name: value.name().to_string(),
            number: value.number(),
            comment: comments.get(&file_name, value.path()),
        })
        .collect();
    converted
}

/// Convert the synthetic map entry message of a map field
fn map_kind(kind: &Kind) -> FieldKind {
    match kind {
        Kind::Message(entry) => {
            let key = scalar_type(&entry.map_entry_key_field().kind()).unwrap_or(ScalarType::String);
            let value = convert_kind(&entry.map_entry_value_field().kind());
            FieldKind::Map {
                key,
                value: Box::new(value),
            }
        }
        other => convert_kind(other),
    }
}

/// Convert protobuf Kind to FieldKind
fn convert_kind(kind: &Kind) -> FieldKind {
    match kind {
        Kind::Message(message) => FieldKind::Message(message.full_name().to_string()),
        Kind::Enum(enum_desc) => FieldKind::Enum(enum_desc.full_name().to_string()),
        scalar => FieldKind::Scalar(scalar_type(scalar).unwrap_or(ScalarType::Bytes)),
    }
}

fn scalar_type(kind: &Kind) -> Option<ScalarType> {
    Some(match kind {
        Kind::Double => ScalarType::Double,
        Kind::Float => ScalarType::Float,
        Kind::Int32 => ScalarType::Int32,
        Kind::Int64 => ScalarType::Int64,
        Kind::Uint32 => ScalarType::Uint32,
        Kind::Uint64 => ScalarType::Uint64,
        Kind::Sint32 => ScalarType::Sint32,
        Kind::Sint64 => ScalarType::Sint64,
        Kind::Fixed32 => ScalarType::Fixed32,
        Kind::Fixed64 => ScalarType::Fixed64,
        Kind::Sfixed32 => ScalarType::Sfixed32,
        Kind::Sfixed64 => ScalarType::Sfixed64,
        Kind::Bool => ScalarType::Bool,
        Kind::String => ScalarType::String,
        Kind::Bytes => ScalarType::Bytes,
        Kind::Message(_) | Kind::Enum(_) => return None,
    })
}
