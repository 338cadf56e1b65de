//! Per-run repository identity.
//!
//! A `RepoContext` is created once per invocation and read-only afterwards.
//! The `short_name` is parsed from the `origin` remote URL in `.git/config`
//! so checks do not couple to the local checkout directory name; the
//! directory name is the fallback when no remote is configured.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
/// Immutable repository facts shared by every rule in a run.
pub struct RepoContext {
    pub root: PathBuf,
    /// Checkout directory name.
    pub name: String,
    /// Canonical project name, e.g. "exemplar" for bemanproject/exemplar.
    pub short_name: String,
}

impl RepoContext {
    /// Build a context for the repository rooted at `root`.
    pub fn discover(root: &Path) -> RepoContext {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        let short_name = remote_short_name(root).unwrap_or_else(|| name.clone());
        RepoContext {
            root: root.to_path_buf(),
            name,
            short_name,
        }
    }

    /// Repo-relative beman tree path for a prefix, e.g. `src/beman/exemplar`.
    pub fn beman_tree(&self, prefix: &str) -> PathBuf {
        Path::new(prefix).join("beman").join(&self.short_name)
    }
}

/// Parse the project short name out of the `origin` remote URL.
///
/// Handles both `https://host/org/repo.git` and `git@host:org/repo.git`
/// forms. A leading `beman.` or `beman-` on the repository name is dropped
/// so `bemanproject/beman.optional` and `bemanproject/optional` resolve to
/// the same short name.
fn remote_short_name(root: &Path) -> Option<String> {
    let config = fs::read_to_string(root.join(".git/config")).ok()?;
    let url_re = Regex::new(r"^\s*url\s*=\s*(\S+)").ok()?;

    let mut in_origin = false;
    let mut url: Option<String> = None;
    for line in config.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_origin = trimmed == r#"[remote "origin"]"#;
            continue;
        }
        if in_origin {
            if let Some(caps) = url_re.captures(line) {
                url = Some(caps[1].to_string());
                break;
            }
        }
    }

    let url = url?;
    let tail = url.trim_end_matches('/');
    let repo = tail.rsplit(['/', ':']).next()?;
    let repo = repo.trim_end_matches(".git");
    let repo = repo
        .strip_prefix("beman.")
        .or_else(|| repo.strip_prefix("beman-"))
        .unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }
    Some(repo.to_string())
}
