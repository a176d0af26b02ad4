use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use oap_core::config::{self, CONFIG_FILE_NAME, OapConfig, OutputFormat, ResolveOptions};
use oap_core::content::{self, ContentPackage};
use oap_core::notify::CollectingNotifier;
use oap_core::openapi::spec::OpenApiSpec;

#[derive(Parser)]
#[command(name = "oap", about = "Content graph to OpenAPI 3.0 processor", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an OpenAPI document from a content export
    Generate {
        /// Path to the preprocessed export (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write the document (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long)]
        format: Option<DocumentFormat>,

        /// Fail on ambiguous singletons and shared schema names
        #[arg(long)]
        strict: bool,

        /// Write notification events as JSON to this file
        #[arg(long)]
        notifications: Option<PathBuf>,
    },

    /// Inspect the content graph of an export
    Inspect {
        /// Path to the preprocessed export
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: DocumentFormat,
    },

    /// Initialize a new oap configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentFormat {
    Yaml,
    Json,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => DocumentFormat::Json,
            OutputFormat::Yaml => DocumentFormat::Yaml,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            format,
            strict,
            notifications,
        } => cmd_generate(input, output, format, strict, notifications),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oap", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OapConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_package(path: &Path) -> Result<ContentPackage> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let package = match ext {
        "yaml" | "yml" => content::from_yaml(&content)?,
        _ => content::from_json(&content)?,
    };
    Ok(package)
}

fn render(spec: &OpenApiSpec, format: DocumentFormat) -> Result<String> {
    Ok(match format {
        DocumentFormat::Json => spec.to_json()?,
        DocumentFormat::Yaml => spec.to_yaml()?,
    })
}

fn cmd_generate(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<DocumentFormat>,
    strict: bool,
    notifications: Option<PathBuf>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.or_else(|| (!cfg.output.is_empty()).then(|| PathBuf::from(&cfg.output)));
    let format = format.unwrap_or_else(|| cfg.format.into());
    let options = if strict {
        ResolveOptions::strict()
    } else {
        cfg.resolve_options()
    };

    let package = load_package(&input)?;
    if package.is_delete() {
        eprintln!(
            "Specification {} was deleted, nothing to generate.",
            package.specification_codename
        );
        return Ok(());
    }

    let mut notifier = CollectingNotifier::new();
    let spec = oap_core::generate(&package, options, &mut notifier).with_context(|| {
        format!(
            "failed to process API specification {}",
            package.specification_codename
        )
    })?;
    let document = render(&spec, format)?;

    match &output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Generated {} paths and {} schemas in {}",
                spec.paths.len(),
                spec.components.schemas.len(),
                path.display()
            );
        }
        None => println!("{}", document.trim_end()),
    }

    if let Some(path) = notifications {
        let events = serde_json::to_string_pretty(&notifier.events)?;
        fs::write(&path, events).with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {} notifications to {}", notifier.events.len(), path.display());
    } else if !notifier.events.is_empty() {
        eprintln!("  {} notifications were raised", notifier.events.len());
    }
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: DocumentFormat) -> Result<()> {
    let package = load_package(&input)?;
    let summary = build_inspect_summary(&package);

    match format {
        DocumentFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        DocumentFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(package: &ContentPackage) -> serde_json::Value {
    let mut content_types: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, item) in package.graph.iter() {
        *content_types.entry(item.content_type()).or_default() += 1;
    }

    let root = package
        .graph
        .specification(&package.specification_codename)
        .ok()
        .map(|spec| {
            serde_json::json!({
                "title": spec.title,
                "version": spec.version,
                "categories": spec.categories.len(),
            })
        });

    serde_json::json!({
        "specification": package.specification_codename,
        "operation": package.operation,
        "root": root,
        "items": package.graph.len(),
        "content_types": content_types,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
