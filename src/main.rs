use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use universalist::{cli, config, filters, reporter, scanner, Config, Registry};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Scan(args) => scan_command(args)?,
        cli::Commands::Init(args) => init_command(args)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn scan_command(args: cli::ScanArgs) -> Result<()> {
    init_logging(args.verbose);

    if args.no_color || args.output.is_some() {
        colored::control::set_override(false);
    }

    // Load configuration
    let config =
        config::load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let registry = Registry::from_config(&config).context("Failed to load configuration")?;
    let exclusions =
        filters::ExclusionSet::new(config.excluded.as_slice()).context("Failed to scan directory")?;

    let path = scan_path(args.path.as_ref(), &config);
    info!(path = %path.display(), "scanning");
    debug!(keywords = ?registry.annotations(), excluded = ?config.excluded, "using config");

    // Scan directory for annotations
    let mut results = scanner::scan_directory(&path, &registry, &exclusions)
        .context("Failed to scan directory")?;

    info!(matches = results.total_count(), "scan finished");

    // Apply filters
    if let Some(ref keyword) = args.keyword {
        debug!(keyword = %keyword, "filtering by keyword");
        results = filters::filter_by_keyword(results, keyword);
    }

    if let Some(min_priority) = args.min_priority {
        debug!(min_priority, "filtering by priority");
        results = filters::filter_by_priority(results, &registry, min_priority);
    }

    // Output report
    reporter::generate_report(
        &results,
        &registry,
        &path,
        args.format,
        args.align,
        args.output.as_deref(),
    )
    .context("Failed to generate report")?;

    Ok(())
}

fn init_command(args: cli::InitArgs) -> Result<()> {
    init_logging(false);

    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    config::save_config(&Config::default(), &args.output)
        .context("Failed to write configuration")?;
    println!("Configuration written to {}", args.output.display());

    Ok(())
}

/// Command-line path first, then the config's path, then the current directory
fn scan_path(cli_path: Option<&PathBuf>, config: &Config) -> PathBuf {
    cli_path
        .or(config.path.as_ref())
        .filter(|p| !p.as_os_str().is_empty())
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."))
}
