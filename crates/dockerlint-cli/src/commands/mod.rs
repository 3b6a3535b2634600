//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_rules;
pub mod output;
pub mod pins;

use dockerlint_core::RuleCatalog;
use std::path::Path;

use crate::config_resolver::LoadedConfig;

/// Picks the rule catalog: `--rules` flag, then `linter.rules`, then the built-in rules.
///
/// An unreadable catalog file degrades to an empty catalog with a warning.
fn rule_catalog(flag: Option<&Path>, loaded: &LoadedConfig) -> RuleCatalog {
    let path = flag.map(Path::to_path_buf).or_else(|| loaded.rules_path());
    match path {
        Some(path) => {
            tracing::debug!("Loading rule catalog from {}", path.display());
            RuleCatalog::load(&path)
        }
        None => dockerlint_rules::builtin_catalog(),
    }
}
