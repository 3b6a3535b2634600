//! Pins command implementation.

use anyhow::{Context, Result};
use dockerlint_pins::{PackageCatalog, PinValidator};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config_resolver;

/// Runs the pins command.
///
/// The rewritten Dockerfile goes to `output` or stdout; the change summary
/// goes to stderr.
pub fn run(
    file: &Path,
    catalog: Option<PathBuf>,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let project_dir = file.parent().unwrap_or(Path::new("."));
    let loaded = config_resolver::load(project_dir, config)?;
    let catalog = match catalog.or_else(|| loaded.catalog_path()) {
        Some(path) => PackageCatalog::load(&path),
        None => {
            tracing::warn!("No package catalog configured; every pin will be removed");
            PackageCatalog::empty()
        }
    };

    let result = PinValidator::new(Arc::new(catalog))
        .context("Failed to build pin validator")?
        .validate(&content);

    match output {
        Some(path) => std::fs::write(path, &result.rewritten_text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(result.rewritten_text.as_bytes())?;
            stdout.flush()?;
        }
    }

    eprintln!("Distro: {}", result.distro);
    for change in &result.changes {
        eprintln!(
            "  line {}: {}={} -> {} ({})",
            change.line, change.package, change.version, change.package, change.kind
        );
    }
    if result.modified {
        eprintln!("Modified {} pin(s)", result.changes.len());
    } else {
        eprintln!("No pins modified");
    }

    Ok(())
}
