//! Check command implementation.

use anyhow::{anyhow, Context, Result};
use dockerlint_core::{Analyzer, LintError, Severity};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config_resolver;
use crate::OutputFormat;

/// Arguments of the check command.
pub struct CheckArgs {
    /// Dockerfile or directory to analyze.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Rule catalog override.
    pub rules: Option<PathBuf>,
    /// Failing severity override.
    pub fail_on: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Explicit config file.
    pub config: Option<PathBuf>,
}

/// Runs the check command.
///
/// Exits with status 1 when an issue reaches the failing severity and with
/// status 2 when the path does not exist.
pub fn run(args: &CheckArgs) -> Result<()> {
    let project_dir = if args.path.is_file() {
        args.path.parent().unwrap_or(Path::new("."))
    } else {
        args.path.as_path()
    };
    let loaded = config_resolver::load(project_dir, args.config.as_deref())?;

    let threshold = match args.fail_on.as_deref() {
        Some(value) => Severity::parse(value)
            .ok_or_else(|| anyhow!("Unknown severity `{value}` for --fail-on"))?,
        None => loaded
            .config
            .fail_on_severity()?
            .unwrap_or(Severity::Critical),
    };

    let catalog = super::rule_catalog(args.rules.as_deref(), &loaded);

    let analyzer = Analyzer::builder()
        .root(&args.path)
        .catalog(Arc::new(catalog))
        .excludes(args.exclude.iter().cloned())
        .config(loaded.config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {:?} with {} rules",
        args.path,
        analyzer.rule_count()
    );

    let result = match analyzer.analyze() {
        Ok(result) => result,
        Err(LintError::NotFound { path }) => {
            eprintln!("error: {} not found", path.display());
            std::process::exit(2);
        }
        Err(e) => return Err(e).context("Analysis failed"),
    };

    super::output::print(&result, args.format)?;

    if result.has_violations_at(threshold) {
        std::process::exit(1);
    }

    Ok(())
}
