//! Destinations for generated artifacts

use crate::format::Formatter;
use crate::plugin::Syntax;
use proto_converter_common::{ConverterError, Result};
use std::fs;
use std::path::PathBuf;

/// One generated file, before formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Name of the builder that produced it
    pub plugin: &'static str,
    pub file_name: String,
    pub syntax: Syntax,
    pub source: String,
}

/// Receives artifacts as the dispatcher produces them
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactSink {
    fn emit(&mut self, artifact: Artifact) -> Result<()>;
}

/// Collects artifacts in memory
impl ArtifactSink for Vec<Artifact> {
    fn emit(&mut self, artifact: Artifact) -> Result<()> {
        self.push(artifact);
        Ok(())
    }
}

/// Formats artifacts and writes them under an output directory,
/// replacing existing files
pub struct FileWriter<F: Formatter> {
    output_dir: PathBuf,
    formatter: F,
    written: Vec<PathBuf>,
}

impl<F: Formatter> FileWriter<F> {
    pub fn new(output_dir: impl Into<PathBuf>, formatter: F) -> Self {
        Self {
            output_dir: output_dir.into(),
            formatter,
            written: Vec::new(),
        }
    }

    /// Paths written so far, in emission order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl<F: Formatter> ArtifactSink for FileWriter<F> {
    fn emit(&mut self, artifact: Artifact) -> Result<()> {
        let source = match self.formatter.format(&artifact.source, artifact.syntax) {
            Ok(formatted) => formatted,
            Err(e) => {
                tracing::warn!(
                    "{} could not be formatted, writing it unformatted: {}",
                    artifact.file_name,
                    e
                );
                artifact.source
            }
        };

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            ConverterError::Generation(format!(
                "Failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let path = self.output_dir.join(&artifact.file_name);
        fs::write(&path, source).map_err(|e| {
            ConverterError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::info!("{} has been created by {}", path.display(), artifact.plugin);
        self.written.push(path);
        Ok(())
    }
}
