//! Batch runner: applies one single-file rule across a resolved file-set.
//!
//! A `BatchRule` pairs a file-set resolver with a child-rule constructor.
//! Per file it mints a short-lived child (copying the parent's name-scoped
//! log configuration by value), runs the lifecycle, and aggregates a single
//! logical AND. Skipped children are omitted from aggregation entirely; a
//! failed pre-check is recorded as a failure and the batch continues — one
//! bad file never prevents processing of the rest.
//!
//! Per-file iterations are mutually independent, so they run on the rayon
//! pool; results are re-sorted by path afterwards so diagnostics keep a
//! deterministic reporting order.

use super::{LogConfig, Rule, RuleLog};
use crate::config::Settings;
use crate::context::RepoContext;
use rayon::prelude::*;
use std::path::PathBuf;

/// Produces the file-set a batch rule iterates. Recomputed per invocation.
pub type Resolver = fn(&RepoContext) -> Vec<PathBuf>;

/// Constructs the per-file child rule for one repo-relative path.
pub type ChildCtor =
    for<'c> fn(&'c RepoContext, &'c Settings, LogConfig, PathBuf) -> Box<dyn Rule + 'c>;

pub struct BatchRule<'a> {
    name: &'static str,
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: RuleLog,
    resolver: Resolver,
    child: ChildCtor,
}

impl<'a> BatchRule<'a> {
    pub fn new(
        name: &'static str,
        repo: &'a RepoContext,
        settings: &'a Settings,
        log: LogConfig,
        resolver: Resolver,
        child: ChildCtor,
    ) -> Self {
        BatchRule {
            name,
            repo,
            settings,
            log: RuleLog::new(log),
            resolver,
            child,
        }
    }

    /// One traversal over the file-set. `None` per-file result means the
    /// child skipped and is excluded from aggregation.
    fn run_over(&mut self, apply_fixes: bool) -> bool {
        let repo = self.repo;
        let settings = self.settings;
        let log_cfg = self.log.config();
        let make = self.child;

        let files = (self.resolver)(repo);
        let mut per_file: Vec<(PathBuf, Option<bool>, Vec<String>)> = files
            .into_par_iter()
            .map(|rel| {
                let mut child = make(repo, settings, log_cfg, rel.clone());
                if child.should_skip() {
                    return (rel, None, Vec::new());
                }
                if !child.pre_check() {
                    return (rel, Some(false), child.take_log());
                }
                if child.check() {
                    return (rel, Some(true), child.take_log());
                }
                if !apply_fixes {
                    return (rel, Some(false), child.take_log());
                }
                let fixed = child.fix();
                (rel, Some(fixed), child.take_log())
            })
            .collect();
        per_file.sort_by(|a, b| a.0.cmp(&b.0));

        let mut all_passed = true;
        let mut evaluated = 0usize;
        for (_, result, lines) in per_file {
            self.log.extend(lines);
            if let Some(passed) = result {
                evaluated += 1;
                all_passed &= passed;
            }
        }
        self.log
            .debug(format!("{}: {} file(s) evaluated", self.name, evaluated));
        all_passed
    }
}

impl Rule for BatchRule<'_> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(self.name)
    }

    fn check(&mut self) -> bool {
        self.run_over(false)
    }

    fn fix(&mut self) -> bool {
        self.run_over(true)
    }

    fn take_log(&mut self) -> Vec<String> {
        self.log.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::target::FileTarget;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const NAME: &str = "test.nonempty";

    /// Child rule for the tests: a file passes when it contains "ok".
    /// `fix` rewrites the file to "ok", except files containing "stuck",
    /// which are unfixable.
    struct NonEmptyOk<'a> {
        settings: &'a Settings,
        file: FileTarget<'a>,
    }

    impl Rule for NonEmptyOk<'_> {
        fn name(&self) -> &'static str {
            NAME
        }

        fn should_skip(&self) -> bool {
            // Per-file skip condition: dotfiles are out of scope for the
            // test rule, on top of the configuration gate.
            !self.settings.rule_enabled(NAME)
                || self.file.display().starts_with('.')
        }

        fn pre_check(&mut self) -> bool {
            self.file.require_present()
        }

        fn check(&mut self) -> bool {
            if self.file.contains_literal("ok") {
                true
            } else {
                let msg = format!("File '{}' lacks the marker.", self.file.display());
                self.file.log.log(msg);
                false
            }
        }

        fn fix(&mut self) -> bool {
            if self.file.contains_literal("stuck") {
                let msg = format!("Cannot repair '{}' automatically.", self.file.display());
                self.file.log.log(msg);
                return false;
            }
            self.file.write("ok")
        }

        fn take_log(&mut self) -> Vec<String> {
            self.file.log.take()
        }
    }

    fn child<'c>(
        repo: &'c RepoContext,
        settings: &'c Settings,
        log: LogConfig,
        rel: PathBuf,
    ) -> Box<dyn Rule + 'c> {
        Box::new(NonEmptyOk {
            settings,
            file: FileTarget::new(&repo.root, rel, log),
        })
    }

    fn txt_files(ctx: &RepoContext) -> Vec<PathBuf> {
        crate::fileset::matched_paths(&ctx.root, &["txt"], crate::fileset::EXCLUDED_DIRS)
    }

    fn batch<'a>(repo: &'a RepoContext, settings: &'a Settings) -> BatchRule<'a> {
        BatchRule::new(NAME, repo, settings, LogConfig::default(), txt_files, child)
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
    }

    #[test]
    fn test_empty_file_set_is_vacuously_true() {
        let dir = tempdir().unwrap();
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::default();
        let mut rule = batch(&repo, &settings);
        assert!(rule.check());
        assert!(rule.take_log().is_empty());
    }

    #[test]
    fn test_aggregation_is_logical_and() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "ok");
        write(dir.path(), "b.txt", "bad");
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::default();
        let mut rule = batch(&repo, &settings);
        assert!(!rule.check());
        let lines = rule.take_log();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("b.txt"));
    }

    #[test]
    fn test_partial_failure_isolation() {
        let dir = tempdir().unwrap();
        // a.txt fails pre_check (empty); b.txt is valid and must still be
        // evaluated and reported on independently.
        write(dir.path(), "a.txt", "");
        write(dir.path(), "b.txt", "ok");
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::default();
        let mut rule = batch(&repo, &settings);
        assert!(!rule.check());
        let lines = rule.take_log();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("a.txt"));
        assert!(lines[0].contains("is empty"));
    }

    #[test]
    fn test_skipped_children_are_transparent() {
        let dir = tempdir().unwrap();
        // The dotfile would fail the check, but the child skips it, so it
        // contributes neither a pass nor a fail.
        write(dir.path(), ".hidden.txt", "bad");
        write(dir.path(), "a.txt", "ok");
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::default();
        let mut rule = batch(&repo, &settings);
        assert!(rule.check());
        assert!(rule.take_log().is_empty());
    }

    #[test]
    fn test_fix_leaves_passing_files_untouched_and_repairs_rest() {
        let dir = tempdir().unwrap();
        write(dir.path(), "good.txt", "ok already");
        write(dir.path(), "bad.txt", "bad");
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::default();

        let mut rule = batch(&repo, &settings);
        assert!(rule.fix());
        // Already-passing content is byte-identical after the fix pass.
        assert_eq!(fs::read_to_string(dir.path().join("good.txt")).unwrap(), "ok already");
        assert_eq!(fs::read_to_string(dir.path().join("bad.txt")).unwrap(), "ok");

        // Fix-convergence: the whole batch now checks clean.
        let mut recheck = batch(&repo, &settings);
        assert!(recheck.check());
    }

    #[test]
    fn test_unfixable_file_fails_batch_but_not_siblings() {
        let dir = tempdir().unwrap();
        write(dir.path(), "bad.txt", "bad");
        write(dir.path(), "worse.txt", "stuck");
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::default();

        let mut rule = batch(&repo, &settings);
        assert!(!rule.fix());
        // The fixable sibling was still repaired.
        assert_eq!(fs::read_to_string(dir.path().join("bad.txt")).unwrap(), "ok");
        let lines = rule.take_log();
        assert!(lines.iter().any(|l| l.contains("worse.txt")));
    }

    #[test]
    fn test_diagnostics_keep_path_order() {
        let dir = tempdir().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            write(dir.path(), name, "bad");
        }
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::default();
        let mut rule = batch(&repo, &settings);
        assert!(!rule.check());
        let lines = rule.take_log();
        let order: Vec<&String> = lines.iter().collect();
        assert!(order[0].contains("a.txt"));
        assert!(order[1].contains("b.txt"));
        assert!(order[2].contains("c.txt"));
    }

    #[test]
    fn test_verbose_log_reports_evaluated_count() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "ok");
        write(dir.path(), "b.txt", "ok");
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::default();
        let verbose = LogConfig {
            enabled: true,
            verbose: true,
        };
        let mut rule = BatchRule::new(NAME, &repo, &settings, verbose, txt_files, child);
        assert!(rule.check());
        let lines = rule.take_log();
        assert!(lines.iter().any(|l| l.contains("2 file(s) evaluated")));
    }

    #[test]
    fn test_disabled_rule_skips_whole_batch() {
        let dir = tempdir().unwrap();
        write(dir.path(), "bad.txt", "bad");
        let repo = RepoContext::discover(dir.path());
        let settings = Settings::disabled_for_test(NAME);
        let rule = batch(&repo, &settings);
        assert!(rule.should_skip());
    }
}
