use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "universalist")]
#[command(version, about = "List the annotations in a source tree", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug)]
pub enum Commands {
    /// Scan a directory for annotations
    Scan(ScanArgs),

    /// Write the default configuration to a file
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Directory to scan (defaults to the config's path, then the current directory)
    pub path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (if not specified, writes to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a config file replacing the default keywords and exclusions
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lay matches out in aligned columns
    #[arg(long)]
    pub align: bool,

    /// Filter: only show one keyword (TODO, FIXME, etc.)
    #[arg(short = 't', long = "type")]
    pub keyword: Option<String>,

    /// Filter: only show keywords with at least this priority
    #[arg(long)]
    pub min_priority: Option<i64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Where to write the config (.toml for TOML, anything else for JSON)
    #[arg(default_value = ".universalist.json")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colorized keyword sections
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}
