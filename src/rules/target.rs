//! Shared low-level helpers for single-target rules.
//!
//! A target is the one file or directory a rule evaluates. All I/O here
//! follows the log-not-throw contract: reads surface an explicit
//! `io::Result` (with `read_or_empty` as the policy shim for rules that
//! treat unreadable as nothing-to-check), and writes log the offending path
//! and report `false` instead of propagating.

use super::RuleLog;
use crate::rules::LogConfig;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A rule's single file target plus its diagnostic buffer.
pub struct FileTarget<'a> {
    root: &'a Path,
    rel: PathBuf,
    abs: PathBuf,
    pub log: RuleLog,
}

impl<'a> FileTarget<'a> {
    pub fn new(root: &'a Path, rel: impl Into<PathBuf>, log: LogConfig) -> Self {
        let rel = rel.into();
        let abs = root.join(&rel);
        FileTarget {
            root,
            rel,
            abs,
            log: RuleLog::new(log),
        }
    }

    pub fn root(&self) -> &Path {
        self.root
    }

    /// Repo-relative path, used in diagnostics.
    pub fn rel(&self) -> &Path {
        &self.rel
    }

    pub fn abs(&self) -> &Path {
        &self.abs
    }

    pub fn display(&self) -> String {
        self.rel.to_string_lossy().to_string()
    }

    pub fn exists(&self) -> bool {
        self.abs.is_file()
    }

    /// Full contents. Callers that need to distinguish an empty file from
    /// an unreadable one inspect the error; most rules use
    /// [`FileTarget::read_or_empty`].
    pub fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.abs)
    }

    /// Full contents, with any read error degraded to an empty string.
    /// Absence of content is a policy violation the rule already detects
    /// through `pre_check`/`check`, so the two cases converge here.
    pub fn read_or_empty(&self) -> String {
        self.read().unwrap_or_default()
    }

    /// Contents as lines, line endings stripped.
    pub fn read_lines(&self) -> Vec<String> {
        self.read_or_empty().lines().map(str::to_string).collect()
    }

    /// Contents as whitespace-trimmed lines.
    pub fn read_lines_stripped(&self) -> Vec<String> {
        self.read_or_empty()
            .lines()
            .map(|l| l.trim().to_string())
            .collect()
    }

    /// Write full contents. Logs and returns false on failure.
    pub fn write(&mut self, content: &str) -> bool {
        if let Some(parent) = self.abs.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                self.log
                    .log(format!("Error writing the file '{}': {}", self.display(), e));
                return false;
            }
        }
        match fs::write(&self.abs, content) {
            Ok(()) => true,
            Err(e) => {
                self.log
                    .log(format!("Error writing the file '{}': {}", self.display(), e));
                false
            }
        }
    }

    /// Write a line sequence, newline-joined.
    pub fn write_lines(&mut self, lines: &[String]) -> bool {
        self.write(&lines.join("\n"))
    }

    /// Replace the line at `index` (0-based), leaving every other line
    /// byte-identical. Out-of-range indices log and report failure.
    pub fn replace_line(&mut self, index: usize, new_line: &str) -> bool {
        let content = self.read_or_empty();
        let mut lines: Vec<&str> = content.split('\n').collect();
        if index >= lines.len() {
            self.log.log(format!(
                "Cannot replace line {} in '{}': file has {} lines.",
                index + 1,
                self.display(),
                lines.len()
            ));
            return false;
        }
        lines[index] = new_line;
        let joined = lines.join("\n");
        self.write(&joined)
    }

    pub fn is_empty(&self) -> bool {
        self.read_or_empty().is_empty()
    }

    /// Literal-substring containment. The needle is escaped before matching
    /// so arbitrary file content cannot inject pattern syntax.
    pub fn contains_literal(&self, needle: &str) -> bool {
        let content = self.read_or_empty();
        if content.is_empty() {
            return false;
        }
        match Regex::new(&regex::escape(needle)) {
            Ok(re) => re.is_match(&content),
            Err(_) => false,
        }
    }

    /// Standard file pre-check: exists and non-empty, with a specific
    /// reason logged when unmet.
    pub fn require_present(&mut self) -> bool {
        if !self.exists() {
            let msg = format!("The file '{}' does not exist.", self.display());
            self.log.log(msg);
            return false;
        }
        if self.is_empty() {
            let msg = format!("The file '{}' is empty.", self.display());
            self.log.log(msg);
            return false;
        }
        true
    }
}

/// A rule's single directory target plus its diagnostic buffer.
pub struct DirTarget<'a> {
    root: &'a Path,
    rel: PathBuf,
    abs: PathBuf,
    pub log: RuleLog,
}

impl<'a> DirTarget<'a> {
    pub fn new(root: &'a Path, rel: impl Into<PathBuf>, log: LogConfig) -> Self {
        let rel = rel.into();
        let abs = root.join(&rel);
        DirTarget {
            root,
            rel,
            abs,
            log: RuleLog::new(log),
        }
    }

    pub fn root(&self) -> &Path {
        self.root
    }

    pub fn rel(&self) -> &Path {
        &self.rel
    }

    pub fn abs(&self) -> &Path {
        &self.abs
    }

    pub fn display(&self) -> String {
        self.rel.to_string_lossy().to_string()
    }

    pub fn exists(&self) -> bool {
        self.abs.is_dir()
    }

    pub fn is_empty(&self) -> bool {
        match fs::read_dir(&self.abs) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }

    /// Count files under the target matching a glob pattern, e.g. `**/*.cpp`.
    pub fn count_matches(&self, pattern: &str) -> usize {
        let full = self.abs.join(pattern).to_string_lossy().to_string();
        match glob::glob(&full) {
            Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_file()).count(),
            Err(_) => 0,
        }
    }

    /// Standard directory pre-check: exists and non-empty.
    pub fn require_present(&mut self) -> bool {
        if !self.exists() {
            let msg = format!("The directory '{}' does not exist.", self.display());
            self.log.log(msg);
            return false;
        }
        if self.is_empty() {
            let msg = format!("The directory '{}' is empty.", self.display());
            self.log.log(msg);
            return false;
        }
        true
    }
}
