//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Run REST API operations from declarative operation tables
#[derive(Parser, Debug)]
#[command(name = "optable")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API definition: built-in name or YAML file path
    #[arg(short, long, global = true)]
    pub api: Option<String>,

    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the resources and operations of an API
    List,

    /// Show the descriptor of one operation
    Describe {
        /// Resource name
        resource: String,
        /// Operation name
        operation: String,
    },

    /// Validate an API definition
    Validate,

    /// List built-in API definitions
    Builtins,

    /// Run an operation once per input item
    Run {
        /// Resource name
        resource: String,

        /// Operation name
        operation: String,

        /// Inline input: one JSON object or an array of objects
        #[arg(long, conflicts_with = "input")]
        input_json: Option<String>,

        /// Input file: JSON array or JSON lines
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Follow pagination to the end (items may override)
        #[arg(long)]
        return_all: bool,

        /// Records per bounded request, 1-500 (items may override)
        #[arg(long)]
        limit: Option<u32>,

        /// Records to skip before the first page when following pagination
        /// (items may override)
        #[arg(long)]
        offset: Option<u64>,

        /// Emit the raw response as one record (items may override)
        #[arg(long)]
        full_response: bool,

        /// Record failed items and keep going
        #[arg(long)]
        continue_on_error: bool,

        /// Override the definition's base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}
