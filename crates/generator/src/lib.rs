//! Artifact generation for Proto Converter
//!
//! This crate turns a loaded service AST into GraphQL SDL, TypeScript
//! typings, a NestJS resolver stub and client documents. Builders are run
//! by [`ProtoConverter`], which hands each artifact to an [`ArtifactSink`].

pub mod builders;
mod format;
mod plugin;
mod sink;
mod templates;

pub use format::{Formatter, IndentFormatter};
pub use plugin::{builder_for, builders_for, OutputFile, SourceBuilder, Syntax};
pub use sink::{Artifact, ArtifactSink, FileWriter};

use proto_converter_common::{ConverterError, ProtoInfo, Result};

/// Lifecycle of a [`ProtoConverter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterState {
    /// No builders attached yet
    Unconfigured,
    /// Builders attached, ready to dispatch
    Configured,
    /// Dispatch has run; the converter cannot be reused
    Dispatched,
}

/// Runs an ordered list of builders against one service
///
/// Builders run one at a time in the order they were attached. Each
/// artifact is emitted as soon as its builder finishes, so a failing
/// builder leaves earlier artifacts emitted and later ones not started.
pub struct ProtoConverter<'a> {
    info: &'a ProtoInfo,
    plugins: Vec<Box<dyn SourceBuilder>>,
    state: ConverterState,
}

impl<'a> ProtoConverter<'a> {
    pub fn new(info: &'a ProtoInfo) -> Self {
        Self {
            info,
            plugins: Vec::new(),
            state: ConverterState::Unconfigured,
        }
    }

    pub fn state(&self) -> ConverterState {
        self.state
    }

    /// Attach builders; may only be called once
    pub fn use_plugins(&mut self, plugins: Vec<Box<dyn SourceBuilder>>) -> Result<&mut Self> {
        if self.state != ConverterState::Unconfigured {
            return Err(ConverterError::InvalidState(format!(
                "plugins already attached (state: {:?})",
                self.state
            )));
        }

        tracing::debug!(
            "attached plugins: {}",
            plugins
                .iter()
                .map(|plugin| plugin.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.plugins = plugins;
        self.state = ConverterState::Configured;
        Ok(self)
    }

    /// Attach the builders selected in the service's converter config
    pub fn use_configured_plugins(&mut self) -> Result<&mut Self> {
        let plugins = builders_for(&self.info.config.plugins)?;
        self.use_plugins(plugins)
    }

    /// Run every attached builder and emit its artifact, returning the
    /// number of artifacts emitted
    pub fn dispatch(&mut self, sink: &mut dyn ArtifactSink) -> Result<usize> {
        match self.state {
            ConverterState::Configured => {}
            ConverterState::Unconfigured => {
                return Err(ConverterError::InvalidState(
                    "dispatch called before plugins were attached".to_string(),
                ))
            }
            ConverterState::Dispatched => {
                return Err(ConverterError::InvalidState(
                    "converter has already dispatched".to_string(),
                ))
            }
        }
        self.state = ConverterState::Dispatched;

        let plugins = std::mem::take(&mut self.plugins);
        for plugin in &plugins {
            tracing::debug!("running {} builder", plugin.name());
            let source = plugin.create_source(self.info)?;
            let output = plugin.output();
            sink.emit(Artifact {
                plugin: plugin.name(),
                file_name: output.file_name(),
                syntax: output.syntax,
                source,
            })?;
        }

        Ok(plugins.len())
    }
}

/// Run the configured builders for `info` into `sink`
pub fn convert(info: &ProtoInfo, sink: &mut dyn ArtifactSink) -> Result<usize> {
    ProtoConverter::new(info)
        .use_configured_plugins()?
        .dispatch(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::widget_info;
    use crate::sink::MockArtifactSink;
    use mockall::Sequence;
    use proto_converter_common::{ConverterConfig, PluginKind};

    struct StaticBuilder {
        name: &'static str,
        fail: bool,
    }

    impl SourceBuilder for StaticBuilder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn output(&self) -> OutputFile {
            OutputFile {
                prefix: self.name,
                suffix: "txt",
                syntax: Syntax::Typescript,
            }
        }

        fn create_source(&self, info: &ProtoInfo) -> Result<String> {
            if self.fail {
                return Err(ConverterError::Generation(format!("{} failed", self.name)));
            }
            Ok(format!("{} for {}", self.name, info.service.name))
        }
    }

    fn builder(name: &'static str, fail: bool) -> Box<dyn SourceBuilder> {
        Box::new(StaticBuilder { name, fail })
    }

    #[test]
    fn test_plugins_run_in_order() {
        let info = widget_info();
        let mut sink = MockArtifactSink::new();
        let mut seq = Sequence::new();
        for name in ["first", "second", "third"] {
            sink.expect_emit()
                .withf(move |artifact| {
                    artifact.plugin == name
                        && artifact.file_name == format!("{}.txt", name)
                        && artifact.source == format!("{} for WidgetService", name)
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let mut converter = ProtoConverter::new(&info);
        let count = converter
            .use_plugins(vec![
                builder("first", false),
                builder("second", false),
                builder("third", false),
            ])
            .unwrap()
            .dispatch(&mut sink)
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(converter.state(), ConverterState::Dispatched);
    }

    #[test]
    fn test_failure_stops_later_plugins() {
        let info = widget_info();
        let mut sink = MockArtifactSink::new();
        sink.expect_emit()
            .withf(|artifact| artifact.plugin == "first")
            .times(1)
            .returning(|_| Ok(()));

        let mut converter = ProtoConverter::new(&info);
        converter
            .use_plugins(vec![
                builder("first", false),
                builder("broken", true),
                builder("never", false),
            ])
            .unwrap();

        let err = converter.dispatch(&mut sink).unwrap_err();
        assert!(err.to_string().contains("broken failed"));
        assert_eq!(converter.state(), ConverterState::Dispatched);
    }

    #[test]
    fn test_sink_errors_propagate() {
        let info = widget_info();
        let mut sink = MockArtifactSink::new();
        sink.expect_emit()
            .times(1)
            .returning(|_| Err(ConverterError::Generation("disk full".to_string())));

        let mut converter = ProtoConverter::new(&info);
        converter
            .use_plugins(vec![builder("first", false), builder("second", false)])
            .unwrap();
        assert!(converter.dispatch(&mut sink).is_err());
    }

    #[test]
    fn test_dispatch_requires_plugins() {
        let info = widget_info();
        let mut sink: Vec<Artifact> = Vec::new();
        let mut converter = ProtoConverter::new(&info);

        assert_eq!(converter.state(), ConverterState::Unconfigured);
        assert!(matches!(
            converter.dispatch(&mut sink),
            Err(ConverterError::InvalidState(_))
        ));
    }

    #[test]
    fn test_converter_is_single_use() {
        let info = widget_info();
        let mut sink: Vec<Artifact> = Vec::new();
        let mut converter = ProtoConverter::new(&info);
        converter.use_plugins(vec![builder("only", false)]).unwrap();
        assert_eq!(converter.state(), ConverterState::Configured);

        assert!(matches!(
            converter.use_plugins(vec![builder("again", false)]),
            Err(ConverterError::InvalidState(_))
        ));

        assert_eq!(converter.dispatch(&mut sink).unwrap(), 1);
        assert!(matches!(
            converter.dispatch(&mut sink),
            Err(ConverterError::InvalidState(_))
        ));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_empty_plugin_list_emits_nothing() {
        let info = widget_info();
        let mut sink: Vec<Artifact> = Vec::new();
        let count = ProtoConverter::new(&info)
            .use_plugins(Vec::new())
            .unwrap()
            .dispatch(&mut sink)
            .unwrap();
        assert_eq!(count, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_convert_uses_configured_plugins() {
        let mut info = widget_info();
        info.config = ConverterConfig::new(vec![PluginKind::Gql, PluginKind::Graphql]);

        let mut sink: Vec<Artifact> = Vec::new();
        assert_eq!(convert(&info, &mut sink).unwrap(), 2);

        let files: Vec<&str> = sink.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(files, vec!["gql.ts", "schema.graphql"]);
        assert_eq!(sink[1].syntax, Syntax::Graphql);
    }
}
