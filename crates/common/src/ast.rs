//! Service AST consumed by every builder
//!
//! The tree is owned top-down: [`NamespaceRoot`] owns every type and service,
//! services own their methods. A method refers back to its service only
//! through a [`ServiceRef`] identifier that is resolved against the root.

use crate::config::ConverterConfig;
use crate::{ConverterError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything one conversion run needs, immutable for the whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtoInfo {
    /// The service being converted
    pub service: ServiceDescriptor,
    /// Index of every type and service the service is resolved against
    pub root: NamespaceRoot,
    /// Builders to run, in order
    pub config: ConverterConfig,
}

impl ProtoInfo {
    pub fn new(service: ServiceDescriptor, root: NamespaceRoot, config: ConverterConfig) -> Self {
        Self {
            service,
            root,
            config,
        }
    }
}

/// Non-owning reference to the service that declares a method
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceRef(String);

impl ServiceRef {
    pub fn new(full_name: impl AsRef<str>) -> Self {
        Self(normalize_name(full_name.as_ref()).to_string())
    }

    /// Fully-qualified service name (e.g. "demo.Greeter")
    pub fn full_name(&self) -> &str {
        &self.0
    }
}

/// A gRPC service and its methods in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub full_name: String,
    pub comment: Option<String>,
    pub methods: Vec<Method>,
}

impl ServiceDescriptor {
    pub fn new(full_name: impl AsRef<str>) -> Self {
        let full_name = normalize_name(full_name.as_ref()).to_string();
        Self {
            name: short_name(&full_name).to_string(),
            full_name,
            comment: None,
            methods: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Append a unary method owned by this service
    pub fn with_method(
        mut self,
        name: impl Into<String>,
        request_type: impl AsRef<str>,
        response_type: impl AsRef<str>,
    ) -> Self {
        let method = Method {
            name: name.into(),
            parent: self.reference(),
            request_type: normalize_name(request_type.as_ref()).to_string(),
            response_type: normalize_name(response_type.as_ref()).to_string(),
            comment: None,
            client_streaming: false,
            server_streaming: false,
        };
        self.methods.push(method);
        self
    }

    pub fn reference(&self) -> ServiceRef {
        ServiceRef::new(&self.full_name)
    }
}

/// An RPC method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub parent: ServiceRef,
    pub request_type: String,
    pub response_type: String,
    pub comment: Option<String>,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

impl Method {
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Message or enum definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDef {
    Message(MessageType),
    Enum(EnumType),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Message(m) => &m.name,
            TypeDef::Enum(e) => &e.name,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            TypeDef::Message(m) => &m.full_name,
            TypeDef::Enum(e) => &e.full_name,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            TypeDef::Message(m) => m.comment.as_deref(),
            TypeDef::Enum(e) => e.comment.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageType {
    pub name: String,
    pub full_name: String,
    pub comment: Option<String>,
    /// Fields keyed by proto field name, in declaration order
    pub fields: IndexMap<String, FieldDef>,
}

impl MessageType {
    pub fn new(full_name: impl AsRef<str>) -> Self {
        let full_name = normalize_name(full_name.as_ref()).to_string();
        Self {
            name: short_name(&full_name).to_string(),
            full_name,
            comment: None,
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub full_name: String,
    pub comment: Option<String>,
    pub values: Vec<EnumValue>,
}

impl EnumType {
    pub fn new(full_name: impl AsRef<str>) -> Self {
        let full_name = normalize_name(full_name.as_ref()).to_string();
        Self {
            name: short_name(&full_name).to_string(),
            full_name,
            comment: None,
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            number,
            comment: None,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub comment: Option<String>,
}

/// A message field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub number: u32,
    pub kind: FieldKind,
    pub label: Label,
    /// Presence is tracked on the wire: proto3 `optional`, proto2
    /// `optional`, oneof members and message fields
    pub presence: bool,
    pub comment: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, number: u32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            number,
            presence: matches!(kind, FieldKind::Message(_)),
            kind,
            label: Label::Optional,
            comment: None,
        }
    }

    pub fn scalar(name: impl Into<String>, number: u32, scalar: ScalarType) -> Self {
        Self::new(name, number, FieldKind::Scalar(scalar))
    }

    pub fn message(name: impl Into<String>, number: u32, type_name: impl AsRef<str>) -> Self {
        Self::new(
            name,
            number,
            FieldKind::Message(normalize_name(type_name.as_ref()).to_string()),
        )
    }

    pub fn enumeration(name: impl Into<String>, number: u32, type_name: impl AsRef<str>) -> Self {
        Self::new(
            name,
            number,
            FieldKind::Enum(normalize_name(type_name.as_ref()).to_string()),
        )
    }

    pub fn repeated(mut self) -> Self {
        self.label = Label::Repeated;
        self
    }

    pub fn required(mut self) -> Self {
        self.label = Label::Required;
        self
    }

    pub fn with_presence(mut self) -> Self {
        self.presence = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated && !matches!(self.kind, FieldKind::Map { .. })
    }

    /// Whether the field may be absent on the wire
    ///
    /// Repeated, map and required fields are always present.
    pub fn is_optional(&self) -> bool {
        match (&self.label, &self.kind) {
            (Label::Repeated, _) | (_, FieldKind::Map { .. }) | (Label::Required, _) => false,
            (Label::Optional, _) => self.presence,
        }
    }

    /// Qualified name of the message or enum this field refers to, if any
    pub fn referenced_type(&self) -> Option<&str> {
        self.kind.referenced_type()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Scalar(ScalarType),
    Message(String),
    Enum(String),
    Map {
        key: ScalarType,
        value: Box<FieldKind>,
    },
}

impl FieldKind {
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            FieldKind::Scalar(_) => None,
            FieldKind::Message(name) | FieldKind::Enum(name) => Some(name),
            FieldKind::Map { value, .. } => value.referenced_type(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    pub fn is_64_bit_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::Int64
                | ScalarType::Uint64
                | ScalarType::Sint64
                | ScalarType::Fixed64
                | ScalarType::Sfixed64
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

/// Index of all types and services, keyed by fully-qualified name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceRoot {
    types: BTreeMap<String, TypeDef>,
    services: BTreeMap<String, ServiceDescriptor>,
}

impl NamespaceRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_type(&mut self, type_def: TypeDef) {
        self.types.insert(type_def.full_name().to_string(), type_def);
    }

    pub fn insert_service(&mut self, service: ServiceDescriptor) {
        self.services.insert(service.full_name.clone(), service);
    }

    pub fn with_type(mut self, type_def: TypeDef) -> Self {
        self.insert_type(type_def);
        self
    }

    pub fn with_service(mut self, service: ServiceDescriptor) -> Self {
        self.insert_service(service);
        self
    }

    /// Resolve a qualified type name (a leading `.` is accepted)
    pub fn lookup(&self, qualified_name: &str) -> Result<&TypeDef> {
        self.types
            .get(normalize_name(qualified_name))
            .ok_or_else(|| ConverterError::NotFound(qualified_name.to_string()))
    }

    /// Resolve a qualified name that must refer to a message
    pub fn lookup_message(&self, qualified_name: &str) -> Result<&MessageType> {
        match self.lookup(qualified_name)? {
            TypeDef::Message(message) => Ok(message),
            TypeDef::Enum(_) => Err(ConverterError::Generation(format!(
                "{} is an enum, expected a message",
                qualified_name
            ))),
        }
    }

    pub fn service(&self, reference: &ServiceRef) -> Option<&ServiceDescriptor> {
        self.services.get(reference.full_name())
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.values()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }
}

/// Strip the leading `.` protoc puts on fully-qualified references
pub fn normalize_name(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}

fn short_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}
