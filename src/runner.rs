//! Rule orchestration: instantiate, run, aggregate.
//!
//! Produces a `RunReport` with one entry per executed rule and a summary.
//! The overall result is the logical AND over all run (non-skipped) rules;
//! a failing rule never prevents the remaining rules from running.

use crate::config::Settings;
use crate::context::RepoContext;
use crate::rules::registry::Registry;
use crate::rules::{run_rule, LogConfig, Verdict};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report violations only.
    Check,
    /// Repair what can be repaired, then report.
    Fix,
}

#[derive(Debug, Serialize)]
/// One rule's outcome plus its ordered diagnostics.
pub struct RuleReport {
    pub rule: String,
    pub verdict: Verdict,
    pub lines: Vec<String>,
}

#[derive(Debug, Serialize)]
/// Aggregated counts used by printers and the exit code.
pub struct Summary {
    pub passed: usize,
    pub fixed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Serialize)]
/// Full run results container.
pub struct RunReport {
    pub rules: Vec<RuleReport>,
    pub summary: Summary,
}

impl RunReport {
    /// True when no run rule failed. Skipped rules are transparent.
    pub fn passed(&self) -> bool {
        self.summary.failed == 0
    }
}

/// Run the selected rules (or all registered rules) against one repository.
///
/// Returns an error for a selection naming an unknown rule — a usage error
/// surfaced before anything runs.
pub fn run(
    repo: &RepoContext,
    settings: &Settings,
    registry: &Registry,
    selection: Option<&[String]>,
    log: LogConfig,
    mode: Mode,
) -> Result<RunReport, String> {
    let mut selected: Vec<(&'static str, crate::rules::registry::RuleCtor)> = Vec::new();
    match selection {
        Some(names) => {
            for name in names {
                match registry.iter().find(|(n, _)| *n == name.as_str()) {
                    Some(entry) => selected.push(entry),
                    None => return Err(format!("unknown rule '{name}'")),
                }
            }
        }
        None => selected.extend(registry.iter()),
    }

    let apply_fixes = mode == Mode::Fix;
    let mut reports = Vec::with_capacity(selected.len());
    let mut summary = Summary {
        passed: 0,
        fixed: 0,
        failed: 0,
        skipped: 0,
    };

    for (name, ctor) in selected {
        let mut rule = ctor(repo, settings, log);
        let verdict = run_rule(rule.as_mut(), apply_fixes);
        match verdict {
            Verdict::Passed => summary.passed += 1,
            Verdict::Fixed => summary.fixed += 1,
            Verdict::Failed => summary.failed += 1,
            Verdict::Skipped => summary.skipped += 1,
        }
        reports.push(RuleReport {
            rule: name.to_string(),
            verdict,
            lines: rule.take_log(),
        });
    }

    Ok(RunReport {
        rules: reports,
        summary,
    })
}
