//! Project configuration loaded from YAML
//!
//! A project may carry a `proto-converter.yaml` next to its sources:
//!
//! ```yaml
//! proto_path: protos/user.proto
//! service_name: UserService
//! output_dir: generated
//! include_paths: [protos, third_party]
//! plugins: [graphql, typescript, resolver]
//! format:
//!   indent_width: 2
//!   use_tabs: false
//! ```
//!
//! Every value is optional; the CLI fills the gaps from flags and prompts.

use crate::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File looked up in the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "proto-converter.yaml";

/// Prettier-style formatter settings, honoured when no `format` section exists
pub const PRETTIER_CONFIG_FILE_NAME: &str = ".prettierrc";

/// Builders that can be registered with the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    /// GraphQL schema (SDL)
    Graphql,
    /// TypeScript interface and enum declarations
    Typescript,
    /// NestJS resolver class
    Resolver,
    /// `gql` tagged client documents
    Gql,
}

impl PluginKind {
    /// Builders run when the configuration names none
    pub const DEFAULTS: [PluginKind; 3] = [
        PluginKind::Graphql,
        PluginKind::Typescript,
        PluginKind::Resolver,
    ];

    pub const ALL: [PluginKind; 4] = [
        PluginKind::Graphql,
        PluginKind::Typescript,
        PluginKind::Resolver,
        PluginKind::Gql,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Graphql => "graphql",
            PluginKind::Typescript => "typescript",
            PluginKind::Resolver => "resolver",
            PluginKind::Gql => "gql",
        }
    }
}

impl std::fmt::Display for PluginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginKind {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "graphql" | "schema" => Ok(PluginKind::Graphql),
            "typescript" | "typings" | "ts" => Ok(PluginKind::Typescript),
            "resolver" | "nestjs" => Ok(PluginKind::Resolver),
            "gql" => Ok(PluginKind::Gql),
            other => Err(ConverterError::Config(format!(
                "unknown plugin `{}` (expected one of: graphql, typescript, resolver, gql)",
                other
            ))),
        }
    }
}

/// Ordered builder list for one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    pub plugins: Vec<PluginKind>,
}

impl ConverterConfig {
    pub fn new(plugins: Vec<PluginKind>) -> Self {
        Self { plugins }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            plugins: PluginKind::DEFAULTS.to_vec(),
        }
    }
}

/// Formatter settings, built once at startup and passed to the formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    #[serde(alias = "tabWidth")]
    pub indent_width: usize,
    #[serde(alias = "useTabs")]
    pub use_tabs: bool,
    pub trailing_newline: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            use_tabs: false,
            trailing_newline: true,
        }
    }
}

impl FormatOptions {
    /// Read `tabWidth`/`useTabs` from a prettier JSON config
    pub fn from_prettierrc(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConverterError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Contents of `proto-converter.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, alias = "protoPath")]
    pub proto_path: Option<PathBuf>,
    #[serde(default, alias = "serviceName")]
    pub service_name: Option<String>,
    #[serde(default)]
    pub plugins: Option<Vec<PluginKind>>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    #[serde(default)]
    pub format: Option<FormatOptions>,
}

impl ProjectConfig {
    /// Load a config file
    ///
    /// A document that is not a mapping, or whose values have the wrong
    /// shape, is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| ConverterError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        Self::from_value(value)
    }

    fn from_value(value: serde_yaml::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_mapping() {
            return Err(ConverterError::Config(
                "config needs to be a mapping".to_string(),
            ));
        }
        Ok(serde_yaml::from_value(value)?)
    }

    /// Load the config if the file exists
    ///
    /// An unreadable file or invalid YAML is reported as a warning and
    /// treated as absent; a readable document with the wrong shape is an
    /// error.
    pub fn discover(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("failed to read config file {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        let value: serde_yaml::Value = match serde_yaml::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("failed to parse config file {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        Self::from_value(value)
            .map(Some)
            .map_err(|e| ConverterError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Plugin list from the file, or the default set
    pub fn converter_config(&self) -> ConverterConfig {
        match &self.plugins {
            Some(plugins) if !plugins.is_empty() => ConverterConfig::new(plugins.clone()),
            _ => ConverterConfig::default(),
        }
    }
}
