//! The `init` command: write a starter configuration file.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# codegate configuration
#
# Per-rule overrides. Unset fields keep the built-in defaults.
rules:
  line-length:
    threshold: 120
  todo-comment:
    enabled: true
  # hardcoded-secret:
  #   severity: critical
  # eval-usage:
  #   enabled: false

# Shorthand for the complexity threshold rules.
complexity:
  max_cyclomatic: 10
  max_cognitive: 15
  max_nesting: 4

style:
  max_line_length: 120

# CI quality gate: fail when counts exceed these thresholds.
gate:
  critical_issue_threshold: 0
  total_issue_threshold: 200
"#;

pub fn init_config(force: bool) -> Result<()> {
    let path = Path::new(".codegate.yml");
    if path.exists() && !force {
        bail!(".codegate.yml already exists (use --force to overwrite)");
    }
    crate::io::write_file(path, CONFIG_TEMPLATE)?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::Config;

    #[test]
    fn template_parses_and_resolves() {
        let config: Config = serde_yaml::from_str(super::CONFIG_TEMPLATE).unwrap();
        let resolved = config.resolve().unwrap();
        assert!(resolved.warnings.is_empty());
        assert_eq!(resolved.gate.total_issue_threshold, 200);
    }
}
