//! Proto source / FileDescriptorSet loader

use proto_converter_common::{ConverterConfig, ConverterError, ProtoInfo, Result};
use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::FileDescriptorSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions treated as compiled descriptor sets rather than proto sources
const DESCRIPTOR_SET_EXTENSIONS: [&str; 3] = ["pb", "bin", "desc"];

/// Loads proto definitions into a descriptor pool and builds `ProtoInfo`
/// for one service at a time.
pub struct ProtoLoader {
    /// Descriptor pool for reflection
    pool: DescriptorPool,
}

impl ProtoLoader {
    /// Load either a `.proto` source or a compiled descriptor set, chosen by
    /// file extension
    pub fn from_path<P: AsRef<Path>>(path: P, include_paths: &[PathBuf]) -> Result<Self> {
        let path = path.as_ref();
        let is_descriptor_set = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DESCRIPTOR_SET_EXTENSIONS.contains(&ext));

        if is_descriptor_set {
            Self::from_file(path)
        } else {
            Self::from_proto_file(path, include_paths)
        }
    }

    /// Compile a `.proto` file (and its imports) with source info retained
    ///
    /// The file's own directory is always searched first, followed by
    /// `include_paths`.
    pub fn from_proto_file<P: AsRef<Path>>(path: P, include_paths: &[PathBuf]) -> Result<Self> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut includes = vec![parent];
        includes.extend(include_paths.iter().cloned());

        let mut compiler = protox::Compiler::new(&includes).map_err(|e| {
            ConverterError::Parse(format!("Invalid include paths {:?}: {}", includes, e))
        })?;
        compiler.include_source_info(true).include_imports(true);
        compiler.open_file(path).map_err(|e| {
            ConverterError::Parse(format!("Failed to compile {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            "compiled {} with {} include path(s)",
            path.display(),
            includes.len()
        );
        Self::from_descriptor_set(compiler.file_descriptor_set())
    }

    /// Load FileDescriptorSet from binary file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            ConverterError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes)
    }

    /// Parse FileDescriptorSet from bytes
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        let file_descriptor_set = FileDescriptorSet::decode(bytes).map_err(|e| {
            ConverterError::Parse(format!("Failed to decode FileDescriptorSet: {}", e))
        })?;

        Self::from_descriptor_set(file_descriptor_set)
    }

    fn from_descriptor_set(file_descriptor_set: FileDescriptorSet) -> Result<Self> {
        let pool = DescriptorPool::from_file_descriptor_set(file_descriptor_set).map_err(|e| {
            ConverterError::Parse(format!("Failed to create DescriptorPool: {}", e))
        })?;

        Ok(Self { pool })
    }

    /// Fully-qualified names of every service in the pool
    pub fn service_names(&self) -> Vec<String> {
        self.pool
            .services()
            .map(|service| service.full_name().to_string())
            .collect()
    }

    /// Build the AST for `service_name`, matched against either the short or
    /// the fully-qualified service name
    pub fn load(&self, service_name: &str, config: ConverterConfig) -> Result<ProtoInfo> {
        let wanted = service_name.strip_prefix('.').unwrap_or(service_name);
        let root = super::converter::build_namespace_root(&self.pool);

        let service = root
            .services()
            .find(|service| service.full_name == wanted)
            .or_else(|| root.services().find(|service| service.name == wanted))
            .cloned()
            .ok_or_else(|| {
                let available = self.service_names();
                ConverterError::Parse(format!(
                    "Service `{}` not found (available: {})",
                    service_name,
                    if available.is_empty() {
                        "none".to_string()
                    } else {
                        available.join(", ")
                    }
                ))
            })?;

        tracing::debug!(
            "loaded service {} with {} method(s)",
            service.full_name,
            service.methods.len()
        );
        Ok(ProtoInfo::new(service, root, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_descriptor_set() {
        let file_descriptor_set = FileDescriptorSet { file: vec![] };
        let bytes = file_descriptor_set.encode_to_vec();

        let loader = ProtoLoader::from_file_descriptor_set(&bytes).unwrap();
        assert!(loader.service_names().is_empty());
    }

    #[test]
    fn test_missing_service_is_parse_error() {
        let bytes = FileDescriptorSet { file: vec![] }.encode_to_vec();
        let loader = ProtoLoader::from_file_descriptor_set(&bytes).unwrap();

        let err = loader
            .load("Greeter", ConverterConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConverterError::Parse(msg) if msg.contains("Greeter")));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(ProtoLoader::from_file_descriptor_set(&[0xff, 0xff, 0xff]).is_err());
    }
}
