//! Protobuf service loader
//!
//! Builds a `DescriptorPool` from either proto sources or a compiled
//! descriptor set, then converts it into the converter AST:
//!
//! - every message and enum in the pool becomes a `TypeDef` in the root
//! - every service becomes a `ServiceDescriptor` whose methods keep their
//!   declaration order
//! - leading comments from `SourceCodeInfo` are attached where present

mod comments;
mod converter;
mod parser;

pub use parser::ProtoLoader;
