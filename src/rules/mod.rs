//! Rule lifecycle contract and driver.
//!
//! Every rule implements the same four-operation lifecycle, always invoked
//! in this order: `should_skip` → `pre_check` → `check` → `fix`. The state
//! machine per invocation is
//! `Start → (Skipped | PreCheckFailed | {Pass | Fail → (Fixed | FixFailed)})`;
//! skipped and pre-check-failed rules never reach `fix`, and a skipped rule
//! contributes neither a pass nor a fail to any aggregation.
//!
//! Rules never panic or propagate errors out of lifecycle methods; every
//! failure surfaces as diagnostic lines plus a boolean.

pub mod batch;
pub mod directory;
pub mod file;
pub mod registry;
pub mod target;
pub mod toplevel;

use serde::Serialize;
use std::fmt;

/// A unit of conformance logic.
///
/// `check` must be a read-only, idempotent predicate; `fix` is only invoked
/// after `check` returned false, and when it returns true a subsequent
/// `check` on the same target must pass.
pub trait Rule {
    /// Stable name used for logging and configuration lookup.
    fn name(&self) -> &'static str;

    /// True when the rule is inapplicable to this repository, e.g. disabled
    /// in configuration. Pure predicate, no side effects.
    fn should_skip(&self) -> bool;

    /// Verify the minimal precondition for the rule to run. Logs a specific
    /// reason and returns false when unmet; this counts as a failure,
    /// distinct from a skip.
    fn pre_check(&mut self) -> bool {
        true
    }

    /// The conformance test. On false, at least one actionable diagnostic
    /// has been logged.
    fn check(&mut self) -> bool;

    /// Repair the target so `check` passes. When the violation cannot be
    /// deterministically repaired, logs guidance and returns false.
    fn fix(&mut self) -> bool;

    /// Drain the diagnostics accumulated so far, in emission order.
    fn take_log(&mut self) -> Vec<String>;
}

/// Terminal state of one rule invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Fixed,
    Failed,
    Skipped,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Passed => "pass",
            Verdict::Fixed => "fixed",
            Verdict::Failed => "fail",
            Verdict::Skipped => "skip",
        };
        f.write_str(s)
    }
}

/// Immutable logging configuration, copied parent → child when a batch rule
/// constructs per-file children.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig {
    pub enabled: bool,
    pub verbose: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            enabled: true,
            verbose: false,
        }
    }
}

/// Ordered diagnostic buffer owned by a rule instance.
#[derive(Debug)]
pub struct RuleLog {
    cfg: LogConfig,
    lines: Vec<String>,
}

impl RuleLog {
    pub fn new(cfg: LogConfig) -> Self {
        RuleLog {
            cfg,
            lines: Vec::new(),
        }
    }

    pub fn config(&self) -> LogConfig {
        self.cfg
    }

    /// Record a diagnostic line.
    pub fn log(&mut self, msg: impl Into<String>) {
        if self.cfg.enabled {
            self.lines.push(msg.into());
        }
    }

    /// Record a line only at verbose level.
    pub fn debug(&mut self, msg: impl Into<String>) {
        if self.cfg.enabled && self.cfg.verbose {
            self.lines.push(msg.into());
        }
    }

    pub fn extend(&mut self, lines: Vec<String>) {
        if self.cfg.enabled {
            self.lines.extend(lines);
        }
    }

    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

/// Drive one rule through the lifecycle state machine.
///
/// In check mode (`apply_fixes == false`) a failing `check` is terminal; in
/// fix mode the rule gets one `fix` attempt and the verdict reflects whether
/// it succeeded.
pub fn run_rule(rule: &mut dyn Rule, apply_fixes: bool) -> Verdict {
    if rule.should_skip() {
        return Verdict::Skipped;
    }
    if !rule.pre_check() {
        return Verdict::Failed;
    }
    if rule.check() {
        return Verdict::Passed;
    }
    if !apply_fixes {
        return Verdict::Failed;
    }
    if rule.fix() {
        Verdict::Fixed
    } else {
        Verdict::Failed
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Scriptable rule used by lifecycle and batch tests.
    pub struct ScriptedRule {
        pub skip: bool,
        pub pre: bool,
        pub check_result: bool,
        pub fix_result: bool,
        pub log: RuleLog,
        pub checks_run: usize,
        pub fixes_run: usize,
    }

    impl ScriptedRule {
        pub fn new(skip: bool, pre: bool, check_result: bool, fix_result: bool) -> Self {
            ScriptedRule {
                skip,
                pre,
                check_result,
                fix_result,
                log: RuleLog::new(LogConfig::default()),
                checks_run: 0,
                fixes_run: 0,
            }
        }
    }

    impl Rule for ScriptedRule {
        fn name(&self) -> &'static str {
            "test.scripted"
        }

        fn should_skip(&self) -> bool {
            self.skip
        }

        fn pre_check(&mut self) -> bool {
            if !self.pre {
                self.log.log("precondition unmet");
            }
            self.pre
        }

        fn check(&mut self) -> bool {
            self.checks_run += 1;
            if !self.check_result {
                self.log.log("violation found");
            }
            self.check_result
        }

        fn fix(&mut self) -> bool {
            self.fixes_run += 1;
            if self.fix_result {
                // Converge: a successful fix makes the next check pass.
                self.check_result = true;
            }
            self.fix_result
        }

        fn take_log(&mut self) -> Vec<String> {
            self.log.take()
        }
    }
}
