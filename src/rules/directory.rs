//! `[directory.*]` rules: repository layout against the beman tree
//! `<prefix>/beman/<short_name>`.
//!
//! Layout violations are rarely machine-repairable (the tool cannot know
//! where a misplaced file belongs), so every `fix` here logs actionable
//! guidance and reports failure.

use super::registry::Registry;
use super::target::DirTarget;
use super::{LogConfig, Rule};
use crate::config::Settings;
use crate::context::RepoContext;
use std::path::{Path, PathBuf};

pub const SOURCES: &str = "directory.sources";
pub const TESTS: &str = "directory.tests";
pub const EXAMPLES: &str = "directory.examples";
pub const DOCS: &str = "directory.docs";
pub const PAPERS: &str = "directory.papers";

pub fn register(registry: &mut Registry) {
    registry.register(SOURCES, new_sources);
    registry.register(TESTS, new_tests);
    registry.register(EXAMPLES, new_examples);
    registry.register(DOCS, new_docs);
    registry.register(PAPERS, new_papers);
}

fn new_sources<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    let rel = repo.beman_tree("src");
    Box::new(SourcesDir {
        repo,
        settings,
        dir: DirTarget::new(&repo.root, rel, log),
    })
}

fn new_tests<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    let rel = repo.beman_tree("tests");
    Box::new(TestsDir {
        repo,
        settings,
        dir: DirTarget::new(&repo.root, rel, log),
    })
}

fn new_examples<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    Box::new(ExamplesDir {
        settings,
        dir: DirTarget::new(&repo.root, "examples", log),
    })
}

fn new_docs<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    Box::new(DocsDir {
        settings,
        dir: DirTarget::new(&repo.root, "docs", log),
    })
}

fn new_papers<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    Box::new(PapersDir {
        settings,
        dir: DirTarget::new(&repo.root, "papers", log),
    })
}

/// Recursive scan for files matching one glob pattern, as sorted
/// repo-relative paths.
fn scan(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let full = root.join("**").join(pattern).to_string_lossy().to_string();
    let mut out: Vec<PathBuf> = Vec::new();
    if let Ok(paths) = glob::glob(&full) {
        for p in paths.filter_map(Result::ok) {
            if !p.is_file() {
                continue;
            }
            if let Ok(rel) = p.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
    }
    out.sort();
    out.dedup();
    out
}

/// Component-based exclusion, plus whole-prefix exclusion for nested trees
/// like `tests/beman/<short>`.
fn excluded(rel: &Path, names: &[&str], prefixes: &[&Path]) -> bool {
    if crate::fileset::is_excluded(rel, names) {
        return true;
    }
    prefixes.iter().any(|p| rel.starts_with(p))
}

/// Sources live in `src/beman/<short_name>`; legacy locations are
/// forbidden. Header-only repositories (no `src/` at all) are valid, so the
/// precondition is unconditional.
struct SourcesDir<'a> {
    repo: &'a RepoContext,
    settings: &'a Settings,
    dir: DirTarget<'a>,
}

impl Rule for SourcesDir<'_> {
    fn name(&self) -> &'static str {
        SOURCES
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(SOURCES)
    }

    fn check(&mut self) -> bool {
        for forbidden in ["source", "sources", "lib", "library"] {
            if self.repo.root.join(forbidden).is_dir() {
                let msg = format!(
                    "Please move source files from {}/ to src/beman/{}.",
                    forbidden, self.repo.short_name
                );
                self.dir.log.log(msg);
                return false;
            }
        }
        if self.repo.root.join("src").is_dir() && !self.dir.exists() {
            let msg = format!(
                "Please use the required source files location: src/beman/{}.",
                self.repo.short_name
            );
            self.dir.log.log(msg);
            return false;
        }
        true
    }

    fn fix(&mut self) -> bool {
        let msg = format!(
            "Please manually move sources to src/beman/{}.",
            self.repo.short_name
        );
        self.dir.log.log(msg);
        false
    }

    fn take_log(&mut self) -> Vec<String> {
        self.dir.log.take()
    }
}

/// All test files live under `tests/beman/<short_name>`, and that tree
/// holds at least one test plus a CMakeLists.txt.
struct TestsDir<'a> {
    repo: &'a RepoContext,
    settings: &'a Settings,
    dir: DirTarget<'a>,
}

impl Rule for TestsDir<'_> {
    fn name(&self) -> &'static str {
        TESTS
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(TESTS)
    }

    fn pre_check(&mut self) -> bool {
        self.dir.require_present()
    }

    fn check(&mut self) -> bool {
        let canonical = self.dir.rel().to_path_buf();
        let misplaced: Vec<PathBuf> = scan(&self.repo.root, "*.test.*")
            .into_iter()
            .filter(|rel| !excluded(rel, &[".git", ".github", "infra"], &[canonical.as_path()]))
            .collect();

        if !misplaced.is_empty() {
            for rel in &misplaced {
                let msg = format!("Misplaced test file found: {}", rel.to_string_lossy());
                self.dir.log.log(msg);
            }
            let msg = format!(
                "Please move all test files within the {} directory.",
                self.dir.display()
            );
            self.dir.log.log(msg);
            return false;
        }

        if self.dir.count_matches("**/*.test.*") == 0
            || self.dir.count_matches("**/CMakeLists.txt") == 0
        {
            let msg = format!(
                "Missing relevant test files or CMakeLists.txt in {}.",
                self.dir.display()
            );
            self.dir.log.log(msg);
            return false;
        }
        true
    }

    fn fix(&mut self) -> bool {
        let msg = format!(
            "Please manually move test files to the {} directory.",
            self.dir.display()
        );
        self.dir.log.log(msg);
        false
    }

    fn take_log(&mut self) -> Vec<String> {
        self.dir.log.take()
    }
}

/// `examples/` holds at least one example and a CMakeLists.txt.
struct ExamplesDir<'a> {
    settings: &'a Settings,
    dir: DirTarget<'a>,
}

impl Rule for ExamplesDir<'_> {
    fn name(&self) -> &'static str {
        EXAMPLES
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(EXAMPLES)
    }

    fn pre_check(&mut self) -> bool {
        self.dir.require_present()
    }

    fn check(&mut self) -> bool {
        if self.dir.count_matches("**/*.cpp") == 0 {
            self.dir
                .log
                .log("Missing one relevant example - cannot find examples/**/*.cpp.");
            return false;
        }
        if self.dir.count_matches("**/CMakeLists.txt") == 0 {
            self.dir
                .log
                .log("Missing CMakeLists.txt for examples - cannot find examples/**/CMakeLists.txt.");
            return false;
        }
        true
    }

    fn fix(&mut self) -> bool {
        self.dir
            .log
            .log("Please add a relevant example to the examples/ directory.");
        false
    }

    fn take_log(&mut self) -> Vec<String> {
        self.dir.log.take()
    }
}

/// Documentation lives under `docs/`; the root README.md is the one
/// exception. Repositories without documentation are valid.
struct DocsDir<'a> {
    settings: &'a Settings,
    dir: DirTarget<'a>,
}

impl Rule for DocsDir<'_> {
    fn name(&self) -> &'static str {
        DOCS
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(DOCS)
    }

    fn check(&mut self) -> bool {
        let mut names = vec!["src", "papers", "examples", ".github", "infra", ".git"];
        if self.dir.exists() {
            names.push("docs");
        }
        let misplaced: Vec<PathBuf> = scan(self.dir.root(), "*.md")
            .into_iter()
            .filter(|rel| rel != Path::new("README.md"))
            .filter(|rel| !excluded(rel, &names, &[]))
            .collect();

        if misplaced.is_empty() {
            return true;
        }
        for rel in &misplaced {
            let msg = format!("Misplaced MD file found: {}", rel.to_string_lossy());
            self.dir.log.log(msg);
        }
        self.dir.log.log(
            "Please move all documentation files within the docs/ directory, \
             except for the root README.md file.",
        );
        false
    }

    fn fix(&mut self) -> bool {
        self.dir.log.log(
            "Please manually move documentation files to the docs/ directory, \
             except for the root README.md file.",
        );
        false
    }

    fn take_log(&mut self) -> Vec<String> {
        self.dir.log.take()
    }
}

/// Paper-related files (LaTeX/bibliography sources and similar) live under
/// `papers/`. Markdown is owned by directory.docs, so it is not re-reported
/// here.
struct PapersDir<'a> {
    settings: &'a Settings,
    dir: DirTarget<'a>,
}

const PAPER_EXTENSIONS: &[&str] = &["tex", "bib", "bst", "sty", "cls", "rst", "adoc"];

impl Rule for PapersDir<'_> {
    fn name(&self) -> &'static str {
        PAPERS
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(PAPERS)
    }

    fn check(&mut self) -> bool {
        let mut names = vec!["src", "docs", "examples", ".github", "infra", ".git"];
        if self.dir.exists() {
            names.push("papers");
        }
        let mut misplaced: Vec<PathBuf> = Vec::new();
        for ext in PAPER_EXTENSIONS {
            let pattern = format!("*.{ext}");
            misplaced.extend(
                scan(self.dir.root(), &pattern)
                    .into_iter()
                    .filter(|rel| !excluded(rel, &names, &[])),
            );
        }
        misplaced.sort();
        misplaced.dedup();

        if misplaced.is_empty() {
            return true;
        }
        for rel in &misplaced {
            let msg = format!("Misplaced paper file found: {}", rel.to_string_lossy());
            self.dir.log.log(msg);
        }
        self.dir
            .log
            .log("Please move all paper related files within the papers/ directory.");
        false
    }

    fn fix(&mut self) -> bool {
        self.dir
            .log
            .log("Please move all paper related files to the papers/ directory.");
        false
    }

    fn take_log(&mut self) -> Vec<String> {
        self.dir.log.take()
    }
}
