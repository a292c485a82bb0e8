//! Proto loading for Proto Converter
//!
//! This crate turns Protocol Buffer definitions into the `ProtoInfo` AST the
//! generators consume. Two inputs are supported:
//!
//! - `.proto` sources, compiled in-process with `protox` (comments are kept)
//! - compiled `FileDescriptorSet` files (`.pb`, `.bin`, `.desc`), as produced
//!   by `protoc --descriptor_set_out --include_source_info`
//!
//! ## Example
//! ```rust,ignore
//! use proto_converter_parser::ProtoLoader;
//! use proto_converter_common::ConverterConfig;
//!
//! let loader = ProtoLoader::from_path("protos/user.proto", &[])?;
//! let info = loader.load("UserService", ConverterConfig::default())?;
//! ```

mod protobuf;

pub use protobuf::ProtoLoader;
