//! Builder plugin contract and the compile-time registry

use crate::builders::{
    GqlDocumentBuilder, GraphqlSchemaBuilder, NestjsResolverBuilder, TypeScriptBuilder,
};
use proto_converter_common::{create_file_name, PluginKind, ProtoInfo, Result};

/// Language of a generated artifact, used to pick formatting rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Graphql,
    Typescript,
}

/// Where a builder's output lands, as `<prefix>.<suffix>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFile {
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub syntax: Syntax,
}

impl OutputFile {
    pub fn file_name(&self) -> String {
        create_file_name(Some(self.prefix), Some(self.suffix))
    }
}

/// A generator that turns the service AST into one artifact
///
/// Builders only read the AST and keep no reference to it after
/// `create_source` returns.
pub trait SourceBuilder {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn output(&self) -> OutputFile;

    fn create_source(&self, info: &ProtoInfo) -> Result<String>;
}

/// Instantiate the builder registered for `kind`
pub fn builder_for(kind: PluginKind) -> Result<Box<dyn SourceBuilder>> {
    Ok(match kind {
        PluginKind::Graphql => Box::new(GraphqlSchemaBuilder),
        PluginKind::Typescript => Box::new(TypeScriptBuilder::new()?),
        PluginKind::Resolver => Box::new(NestjsResolverBuilder::new()?),
        PluginKind::Gql => Box::new(GqlDocumentBuilder::new()?),
    })
}

/// Instantiate builders for `kinds`, keeping their order
pub fn builders_for(kinds: &[PluginKind]) -> Result<Vec<Box<dyn SourceBuilder>>> {
    kinds.iter().map(|kind| builder_for(*kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_plugin() {
        let builders = builders_for(&PluginKind::ALL).unwrap();
        let names: Vec<&str> = builders.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["graphql", "typescript", "resolver", "gql"]);
    }

    #[test]
    fn test_output_file_names_are_distinct() {
        let builders = builders_for(&PluginKind::ALL).unwrap();
        let mut files: Vec<String> = builders.iter().map(|b| b.output().file_name()).collect();
        files.sort();
        files.dedup();
        assert_eq!(files.len(), PluginKind::ALL.len());
    }
}
