//! Common types and utilities for Proto Converter
//!
//! This crate contains the service AST shared by the loader and every
//! builder, the error type, and the small pure helpers all generators rely
//! on: identifier naming, comment assembly and query/mutation
//! classification.

pub mod ast;
pub mod classify;
pub mod comment;
pub mod config;
pub mod naming;

pub use ast::{
    EnumType, EnumValue, FieldDef, FieldKind, Label, MessageType, Method, NamespaceRoot,
    ProtoInfo, ScalarType, ServiceDescriptor, ServiceRef, TypeDef,
};
pub use classify::{MethodClassifier, Operation};
pub use comment::{assemble_comment, CommentInput};
pub use config::{ConverterConfig, FormatOptions, PluginKind, ProjectConfig};
pub use naming::{
    assemble_name, create_file_name, create_method_name, create_typing_method_name,
    full_type_name, NamePart,
};

use thiserror::Error;

/// Errors that can occur while converting a proto service
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Type not found: {0}")]
    NotFound(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid converter state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for converter operations
pub type Result<T> = std::result::Result<T, ConverterError>;
