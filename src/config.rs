//! Configuration discovery and effective settings resolution.
//!
//! repotidy reads `repotidy.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `output`: `human`
//! - `quiet`: false
//! - `verbose`: false
//!
//! Per-rule options live under `[rules.<name>]`. The core only interprets
//! `enabled`; every other key is kept as an opaque value the rule itself
//! reads (e.g. `license` for file.license-id).
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `repotidy.toml|yaml`.
pub struct TidyConfig {
    pub output: Option<String>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    #[serde(default)]
    pub rules: Option<HashMap<String, RuleOptions>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Recognized per-rule options plus opaque pass-through extras.
pub struct RuleOptions {
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// The rule-name → options mapping consulted by every rule in a run.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    rules: HashMap<String, RuleOptions>,
}

impl Settings {
    pub fn new(rules: HashMap<String, RuleOptions>) -> Self {
        Settings { rules }
    }

    /// Rules are enabled unless the configuration says otherwise.
    pub fn rule_enabled(&self, name: &str) -> bool {
        self.rules
            .get(name)
            .and_then(|o| o.enabled)
            .unwrap_or(true)
    }

    /// Opaque option lookup for rule-specific keys.
    pub fn option(&self, rule: &str, key: &str) -> Option<&serde_json::Value> {
        self.rules.get(rule).and_then(|o| o.extra.get(key))
    }

    pub fn option_str(&self, rule: &str, key: &str) -> Option<&str> {
        self.option(rule, key).and_then(|v| v.as_str())
    }

    #[cfg(test)]
    pub fn disabled_for_test(name: &str) -> Settings {
        let mut rules = HashMap::new();
        rules.insert(
            name.to_string(),
            RuleOptions {
                enabled: Some(false),
                extra: HashMap::new(),
            },
        );
        Settings { rules }
    }

    #[cfg(test)]
    pub fn with_option_for_test(rule: &str, key: &str, value: &str) -> Settings {
        let mut extra = HashMap::new();
        extra.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        let mut rules = HashMap::new();
        rules.insert(
            rule.to_string(),
            RuleOptions {
                enabled: None,
                extra,
            },
        );
        Settings { rules }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub quiet: bool,
    pub verbose: bool,
    pub settings: Settings,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `repotidy.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("repotidy.toml").exists()
            || cur.join("repotidy.yaml").exists()
            || cur.join("repotidy.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `TidyConfig` from `repotidy.toml` or `repotidy.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<TidyConfig> {
    let toml_path = root.join("repotidy.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: TidyConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["repotidy.yaml", "repotidy.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: TidyConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_quiet: Option<bool>,
    cli_verbose: Option<bool>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let quiet = cli_quiet.or(cfg.quiet).unwrap_or(false);
    let verbose = cli_verbose.or(cfg.verbose).unwrap_or(false);
    let settings = Settings::new(cfg.rules.unwrap_or_default());

    Effective {
        repo_root,
        output,
        quiet,
        verbose,
        settings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("repotidy.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
verbose = true

[rules."file.copyright"]
enabled = false

[rules."file.license-id"]
license = "Apache-2.0 WITH LLVM-exception"
    "#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.output, "json");
        assert!(eff.verbose);
        assert!(!eff.settings.rule_enabled("file.copyright"));
        assert!(eff.settings.rule_enabled("file.license-id"));
        assert_eq!(
            eff.settings.option_str("file.license-id", "license"),
            Some("Apache-2.0 WITH LLVM-exception")
        );
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("repotidy.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output: human
rules:
  directory.papers:
    enabled: false
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.output, "human");
        assert!(!eff.quiet);
        assert!(!eff.verbose);
        assert!(!eff.settings.rule_enabled("directory.papers"));
        // Unconfigured rules default to enabled.
        assert!(eff.settings.rule_enabled("directory.docs"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("repotidy.toml")).unwrap();
        writeln!(f, "{}", "output = \"json\"\nquiet = true").unwrap();

        let eff = resolve_effective(root.to_str(), Some("human"), Some(false), None);
        assert_eq!(eff.output, "human");
        assert!(!eff.quiet);
    }

    #[test]
    fn test_detect_walks_up_to_git_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        let nested = root.join("src/beman/foo");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(detect_repo_root(&nested), root);
    }

    #[test]
    fn test_missing_config_yields_defaults() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        let eff = resolve_effective(dir.path().to_str(), None, None, None);
        assert_eq!(eff.output, "human");
        assert!(eff.settings.rule_enabled("file.copyright"));
    }
}
