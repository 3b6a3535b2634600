//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# dockerlint configuration

# Lowest severity that makes `dockerlint check` exit with status 1
# (low, medium, high, critical)
fail_on = "critical"

[linter]
# Rule catalog (JSON array or TOML [[rule]] tables); built-in rules when unset
# rules = "dockerlint-rules.json"

# Glob patterns to exclude from directory analysis
exclude = [
    "**/target/**",
    "**/node_modules/**",
    "**/vendor/**",
]

[pins]
# Package catalog (YAML or JSON) for `dockerlint pins`
# catalog = "package_catalog.yaml"

# Rules can be disabled by id or by name
# [rules.single-process]
# enabled = false

# [rules.DL014]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("dockerlint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created dockerlint.toml");
    println!("\nNext steps:");
    println!("  1. Edit dockerlint.toml to configure rules");
    println!("  2. Run: dockerlint check");

    Ok(())
}
