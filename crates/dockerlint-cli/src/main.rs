//! dockerlint CLI tool.
//!
//! Usage:
//! ```bash
//! dockerlint check [OPTIONS] [PATH]
//! dockerlint pins [OPTIONS] <FILE>
//! dockerlint list-rules
//! dockerlint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Dockerfile best-practice linter and package pin validator
#[derive(Parser)]
#[command(name = "dockerlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DOCKERLINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a Dockerfile or every Dockerfile under a directory
    Check {
        /// Dockerfile or directory to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Rule catalog file (JSON or TOML) replacing the built-in rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Lowest severity that fails the run (low, medium, high, critical)
        #[arg(long)]
        fail_on: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Generalize package pins the catalog cannot confirm
    Pins {
        /// Dockerfile to validate
        file: PathBuf,

        /// Package catalog file (YAML or JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Write the rewritten Dockerfile here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available rules
    ListRules {
        /// Rule catalog file (JSON or TOML) replacing the built-in rules
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text grouped by severity.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-issue compact format.
    Compact,
    /// Graphical diagnostics with source snippets.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            fail_on,
            exclude,
        } => commands::check::run(&commands::check::CheckArgs {
            path,
            format,
            rules,
            fail_on,
            exclude,
            config: cli.config,
        }),
        Commands::Pins {
            file,
            catalog,
            output,
        } => commands::pins::run(&file, catalog, output.as_deref(), cli.config.as_deref()),
        Commands::ListRules { rules } => {
            commands::list_rules::run(rules.as_deref(), cli.config.as_deref())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
