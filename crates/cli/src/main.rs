//! Proto Converter CLI
//!
//! Command-line interface for turning a gRPC service definition into a
//! GraphQL schema, TypeScript typings and a NestJS resolver stub.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use proto_converter_common::config::{CONFIG_FILE_NAME, PRETTIER_CONFIG_FILE_NAME};
use proto_converter_common::{
    create_method_name, full_type_name, ConverterConfig, ConverterError, FormatOptions,
    MethodClassifier, PluginKind, ProjectConfig, ProtoInfo,
};
use proto_converter_generator::{FileWriter, IndentFormatter, ProtoConverter};
use proto_converter_parser::ProtoLoader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Output directory used when neither the flag nor the config sets one
const DEFAULT_OUTPUT_DIR: &str = "generated";

#[derive(Parser)]
#[command(name = "proto-converter")]
#[command(version, about = "Generate GraphQL and TypeScript artifacts from a gRPC service", long_about = None)]
struct Cli {
    /// Runs `generate` when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project config file (defaults to ./proto-converter.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate artifacts for one service
    #[command(after_help = "EXAMPLES:\n  \
        # Default builders (graphql, typescript, resolver)\n  \
        proto-converter generate --proto protos/user.proto --service UserService\n\n  \
        # Pick builders and output directory\n  \
        proto-converter generate \\\n    \
        --proto service.pb \\\n    \
        --service demo.Greeter \\\n    \
        --plugins graphql,gql \\\n    \
        --output ./src/generated")]
    Generate(GenerateArgs),

    /// Show how each method of a service will be converted
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the loaded service as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Default)]
struct SourceArgs {
    /// Path to a .proto file or a compiled FileDescriptorSet (.pb)
    #[arg(short, long)]
    proto: Option<PathBuf>,

    /// Service name, short or fully-qualified
    #[arg(short, long)]
    service: Option<String>,

    /// Additional import search path (repeatable)
    #[arg(short = 'I', long = "include")]
    include: Vec<PathBuf>,
}

#[derive(Args, Default)]
struct GenerateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Comma-separated builders to run (graphql, typescript, resolver, gql)
    #[arg(long, value_delimiter = ',')]
    plugins: Option<Vec<PluginKind>>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Where the service comes from, after merging flags, config and prompts
#[derive(Debug, PartialEq)]
struct SourceSettings {
    proto_path: PathBuf,
    service_name: String,
    include_paths: Vec<PathBuf>,
}

#[derive(Debug, PartialEq)]
struct GenerateSettings {
    source: SourceSettings,
    converter: ConverterConfig,
    output_dir: PathBuf,
    format: FormatOptions,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "✗".red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    let project = load_project_config(cli.config.as_deref())?;

    match cli.command.unwrap_or_else(|| Commands::Generate(GenerateArgs::default())) {
        Commands::Generate(args) => {
            let settings = resolve_generate(args, project.as_ref(), &mut prompt)?;
            generate_command(&settings, cli.verbose)
        }
        Commands::Inspect { source, json } => {
            let source = resolve_source(source, project.as_ref(), &mut prompt)?;
            inspect_command(&source, json)
        }
    }
}

/// An explicit `--config` must load; the implicit one may be absent
fn load_project_config(explicit: Option<&Path>) -> Result<Option<ProjectConfig>> {
    match explicit {
        Some(path) => ProjectConfig::load(path)
            .map(Some)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => ProjectConfig::discover(Path::new(CONFIG_FILE_NAME))
            .context("Invalid project config"),
    }
}

fn prompt(label: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .context("Prompt couldn't be rendered in the current environment")
}

/// Flags win over the config file; anything still missing is prompted for
fn resolve_source(
    args: SourceArgs,
    project: Option<&ProjectConfig>,
    ask: &mut dyn FnMut(&str) -> Result<String>,
) -> Result<SourceSettings> {
    let proto_path = match args
        .proto
        .or_else(|| project.and_then(|p| p.proto_path.clone()))
    {
        Some(path) => path,
        None => PathBuf::from(ask("protoPath")?.trim()),
    };
    let service_name = match args
        .service
        .or_else(|| project.and_then(|p| p.service_name.clone()))
    {
        Some(name) => name,
        None => ask("serviceName")?.trim().to_string(),
    };

    if !proto_path.exists() {
        return Err(ConverterError::Config(format!(
            "proto file {} does not exist",
            proto_path.display()
        ))
        .into());
    }
    if service_name.is_empty() {
        return Err(ConverterError::Config("service name is empty".to_string()).into());
    }

    let mut include_paths = args.include;
    if let Some(project) = project {
        include_paths.extend(project.include_paths.iter().cloned());
    }

    Ok(SourceSettings {
        proto_path,
        service_name,
        include_paths,
    })
}

fn resolve_generate(
    args: GenerateArgs,
    project: Option<&ProjectConfig>,
    ask: &mut dyn FnMut(&str) -> Result<String>,
) -> Result<GenerateSettings> {
    let source = resolve_source(args.source, project, ask)?;

    let converter = match args.plugins {
        Some(plugins) if !plugins.is_empty() => ConverterConfig::new(plugins),
        _ => project
            .map(ProjectConfig::converter_config)
            .unwrap_or_default(),
    };
    let output_dir = args
        .output
        .or_else(|| project.and_then(|p| p.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let format = match project.and_then(|p| p.format.clone()) {
        Some(format) => format,
        None => prettier_options(Path::new(PRETTIER_CONFIG_FILE_NAME)),
    };

    Ok(GenerateSettings {
        source,
        converter,
        output_dir,
        format,
    })
}

/// Formatting options from a prettier config, or the defaults
fn prettier_options(path: &Path) -> FormatOptions {
    if !path.exists() {
        return FormatOptions::default();
    }
    FormatOptions::from_prettierrc(path).unwrap_or_else(|e| {
        tracing::warn!("ignoring {}: {}", path.display(), e);
        FormatOptions::default()
    })
}

fn load_service(source: &SourceSettings, converter: ConverterConfig) -> Result<ProtoInfo> {
    println!(
        "{} Loading {}",
        "→".cyan(),
        source.proto_path.display()
    );
    let loader = ProtoLoader::from_path(&source.proto_path, &source.include_paths)
        .context("Failed to load proto definitions")?;
    loader
        .load(&source.service_name, converter)
        .context("Failed to build service AST")
}

fn generate_command(settings: &GenerateSettings, verbose: bool) -> Result<()> {
    if verbose {
        println!("  Service: {}", settings.source.service_name);
        println!(
            "  Plugins: {}",
            settings
                .converter
                .plugins
                .iter()
                .map(PluginKind::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("  Output: {}", settings.output_dir.display());
    }

    let info = load_service(&settings.source, settings.converter.clone())?;
    println!(
        "{} Loaded {} with {} method(s)",
        "✓".green(),
        info.service.full_name.yellow(),
        info.service.methods.len()
    );
    if info.service.methods.is_empty() {
        println!("{} Service has no methods", "⚠".yellow());
    }

    println!("{} Generating files...", "→".cyan());
    let mut writer = FileWriter::new(
        &settings.output_dir,
        IndentFormatter::new(settings.format.clone()),
    );
    ProtoConverter::new(&info)
        .use_configured_plugins()
        .context("Failed to set up builders")?
        .dispatch(&mut writer)
        .context("Failed to generate artifacts")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for path in writer.written() {
        println!("  📄 {}", path.display());
    }

    Ok(())
}

fn inspect_command(source: &SourceSettings, json: bool) -> Result<()> {
    let info = load_service(source, ConverterConfig::default())?;

    if json {
        let rendered = serde_json::to_string_pretty(&info.service)
            .context("Failed to serialize service")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("\n{}", "Service:".bold());
    println!("  Name: {}", info.service.full_name.yellow());
    if let Some(comment) = &info.service.comment {
        println!("  Comment: {}", comment);
    }
    println!("  Methods: {}", info.service.methods.len());

    if !info.service.methods.is_empty() {
        println!("\n{}", "Methods:".bold());
    }
    for method in &info.service.methods {
        let operation = MethodClassifier::classify(&method.name);
        println!(
            "  • {} ({}) → {}: {} -> {}",
            method.name.cyan(),
            operation,
            create_method_name(method, &info.root),
            full_type_name(&method.request_type),
            full_type_name(&method.response_type)
        );
        if method.client_streaming || method.server_streaming {
            println!("    {} streaming method", "⚠".yellow());
        }
    }

    Ok(())
}
