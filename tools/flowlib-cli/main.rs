use clap::{Parser, ValueEnum};
use flowlib::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatCli {
    Json,
    Yaml,
    Bincode,
}

impl From<FormatCli> for ExportFormat {
    fn from(format: FormatCli) -> Self {
        match format {
            FormatCli::Json => ExportFormat::Json,
            FormatCli::Yaml => ExportFormat::Yaml,
            FormatCli::Bincode => ExportFormat::Bincode,
        }
    }
}

/// Composes, resolves and validates a flow definition
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow YAML file
    flow_yaml: Option<PathBuf>,

    /// Path to a flowlib YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory that component paths are relative to
    #[arg(long)]
    component_dir: Option<PathBuf>,

    /// Write the resolved flow to this path
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Format of the exported flow
    #[arg(short, long, value_enum)]
    format: Option<FormatCli>,

    /// Stop after composition and validation, without resolving variables
    #[arg(long)]
    validate_only: bool,
}

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("{}", e);
    }
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FlowLibConfig::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string())),
        None => FlowLibConfig::default(),
    };
    if let Some(dir) = cli.component_dir {
        config.component_dir = dir;
    }
    if let Some(path) = cli.flow_yaml {
        config.flow_yaml = Some(path);
    }
    if let Some(path) = cli.export {
        config.export = Some(path);
    }
    if let Some(format) = cli.format {
        config.export_format = format.into();
    }

    run(config, cli.validate_only);
}

fn run(config: FlowLibConfig, validate_only: bool) {
    let total_start = Instant::now();

    // --- 1. Flow Loading ---
    let flow_path = config
        .flow_yaml
        .clone()
        .unwrap_or_else(|| exit_with_error("A flow YAML path is required."));
    let load_start = Instant::now();
    let yaml = fs::read_to_string(&flow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read flow file '{}': {}",
            flow_path.display(),
            e
        ))
    });
    let flow = FlowDefinition::from_yaml(&yaml).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let load_duration = load_start.elapsed();

    // --- 2. Composition ---
    let compose_start = Instant::now();
    let mut flow = Composer::builder(flow)
        .with_component_dir(&config.component_dir)
        .build()
        .and_then(Composer::compose)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let compose_duration = compose_start.elapsed();

    // --- 3. Resolution ---
    let resolve_start = Instant::now();
    if !validate_only {
        flow.resolve(&ProcessEnv)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    }
    let resolve_duration = resolve_start.elapsed();

    // --- 4. Validation ---
    let validate_start = Instant::now();
    flow.validate()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let validate_duration = validate_start.elapsed();

    let artifact = FlowArtifact::from_flow(&flow);
    if let Some(export) = &config.export {
        export_artifact(&artifact, export, config.export_format)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        println!("Wrote {:?} export to '{}'", config.export_format, export.display());
    }

    // --- 5. Summary ---
    println!("\n--- Flow Summary ---");
    println!("Flow:                 {}", flow.name);
    println!("State:                {}", flow.state());
    println!("Root Elements:        {}", flow.elements().len());
    println!("Total Elements:       {}", flow.arena().len());
    println!("Components Loaded:    {}", flow.components().len());
    println!("Controllers:          {}", flow.controllers.len());
    println!("Reporting Tasks:      {}", flow.reporting_tasks.len());

    println!("\n--- Performance Summary ---");
    println!("Flow Loading:         {:?}", load_duration);
    println!("Composition:          {:?}", compose_duration);
    println!("Resolution:           {:?}", resolve_duration);
    println!("Validation:           {:?}", validate_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_start.elapsed());
    println!();
}

fn export_artifact(artifact: &FlowArtifact, path: &Path, format: ExportFormat) -> Result<(), FlowError> {
    let text = match format {
        ExportFormat::Bincode => return artifact.save(path),
        ExportFormat::Json => artifact.to_json()?,
        ExportFormat::Yaml => artifact.to_yaml()?,
    };
    fs::write(path, text).map_err(|e| {
        FlowError::Artifact(format!(
            "Could not write to file '{}': {}",
            path.display(),
            e
        ))
    })
}

fn init_tracing() -> Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| format!("Failed to create env filter: {e}"))?;
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| format!("Failed to initialize tracing: {e}"))
}

/// A helper function to print an error message and exit the process.
fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
