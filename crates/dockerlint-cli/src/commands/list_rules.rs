//! List rules command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config_resolver;

/// Runs the list-rules command.
pub fn run(rules: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let loaded = config_resolver::load(Path::new("."), config)?;
    let catalog = super::rule_catalog(rules, &loaded);

    println!("Available rules:\n");
    println!(
        "{:<8} {:<10} {:<18} {:<28} Title",
        "Code", "Severity", "Role", "Name"
    );
    println!("{}", "-".repeat(100));

    for rule in catalog.rules() {
        let enabled = loaded.config.is_rule_enabled(rule.id().as_str())
            && rule.name().map_or(true, |n| loaded.config.is_rule_enabled(n));
        println!(
            "{:<8} {:<10} {:<18} {:<28} {}{}",
            rule.id().as_str(),
            rule.severity().as_str(),
            rule.role().map_or("-", |r| r.key()),
            rule.name().unwrap_or("-"),
            rule.title(),
            if enabled { "" } else { " (disabled)" },
        );
    }

    if !catalog.diagnostics().is_empty() {
        println!("\nSkipped or adjusted definitions:");
        for diagnostic in catalog.diagnostics() {
            println!("  {diagnostic}");
        }
    }

    println!("\nDisable a rule in dockerlint.toml by id or name, e.g.:");
    println!("  [rules.DL017]");
    println!("  enabled = false");

    Ok(())
}
