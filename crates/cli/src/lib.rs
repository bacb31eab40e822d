use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cxxdoc_symbols::{DocumentParser, ProjectConfig, SnapshotFrontend, SymbolListing};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cxxdoc")]
#[command(about = "Symbol tables for C and C++ sources", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse translation units and print their symbols
    List(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    /// AST snapshot files, parsed after the project inputs
    inputs: Vec<PathBuf>,

    /// Project file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Record declarations from included headers too
    #[arg(long)]
    all_files: bool,

    /// Only list symbols declared in a main file
    #[arg(long)]
    exposed_only: bool,

    /// Also print declarations that have no stable identity
    #[arg(long)]
    unresolved: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let Commands::List(args) = &cli.command;
    if args.format == OutputFormat::Json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::List(args) => run_list(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let project = match &args.config {
        Some(path) => Some(
            ProjectConfig::load(path)
                .with_context(|| format!("Failed to load project {}", path.display()))?,
        ),
        None => None,
    };

    let mut parse_config = project
        .as_ref()
        .map(|project| project.parse.clone())
        .unwrap_or_default();
    if args.all_files {
        parse_config.main_file_only = false;
    }

    let mut units: Vec<(PathBuf, Vec<String>)> = Vec::new();
    if let Some(project) = &project {
        log::info!(
            "Project {} {} ({} inputs)",
            project.name,
            project.version_string(),
            project.inputs.len()
        );
        for input in &project.inputs {
            units.push((project.resolve_path(&input.path), project.input_args(input)));
        }
    }
    units.extend(args.inputs.iter().map(|path| (path.clone(), Vec::new())));
    if units.is_empty() {
        bail!("No inputs: pass snapshot files or --config");
    }

    let mut parser = DocumentParser::new(parse_config);
    let mut frontend = SnapshotFrontend;
    let mut failed = 0usize;
    for (path, unit_args) in &units {
        match parser.parse_file(&mut frontend, path, unit_args) {
            Ok(report) => log::debug!(
                "{}: visited {}, skipped {}",
                path.display(),
                report.visited,
                report.skipped
            ),
            Err(e) => {
                failed += 1;
                // Aborted units are already reported by the parser
                if !e.is_fatal() {
                    log::error!("Failed to load {}: {}", path.display(), e);
                }
            }
        }
    }

    let mut listing = SymbolListing::from_registry(parser.registry());
    if args.exposed_only {
        listing = listing.exposed_only();
    }
    if !args.unresolved {
        listing = listing.without_unresolved();
    }

    match args.format {
        OutputFormat::Text => print!("{}", listing.to_text()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&listing).context("Failed to serialize listing")?
        ),
    }

    if failed > 0 {
        bail!("{failed} of {} unit(s) failed", units.len());
    }
    Ok(())
}
