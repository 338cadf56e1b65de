//! `[toplevel.*]` rules: required root artifacts.
//!
//! These rules probe the artifact in `check` (precondition is
//! unconditional) so a missing file is a check failure that `fix` can still
//! act on. Only toplevel.license is machine-repairable: its fix provisions
//! the canonical license text bundled with the binary. The tool will not
//! author build files or prose.

use super::registry::Registry;
use super::target::FileTarget;
use super::{LogConfig, Rule};
use crate::config::Settings;
use crate::context::RepoContext;

pub const CMAKE: &str = "toplevel.cmake";
pub const LICENSE: &str = "toplevel.license";
pub const README: &str = "toplevel.readme";

/// Apache-2.0 with LLVM-exception, as provisioned by toplevel.license.
const LICENSE_TEXT: &str = include_str!("files/LICENSE.txt");

pub fn register(registry: &mut Registry) {
    registry.register(CMAKE, new_cmake);
    registry.register(LICENSE, new_license);
    registry.register(README, new_readme);
}

fn new_cmake<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    Box::new(ToplevelFile {
        name: CMAKE,
        settings,
        file: FileTarget::new(&repo.root, "CMakeLists.txt", log),
        repair: Repair::Guidance(
            "Please add a root CMakeLists.txt describing how the project builds.",
        ),
    })
}

fn new_license<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    Box::new(ToplevelFile {
        name: LICENSE,
        settings,
        file: FileTarget::new(&repo.root, "LICENSE", log),
        repair: Repair::Provision(LICENSE_TEXT),
    })
}

fn new_readme<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    Box::new(ToplevelFile {
        name: README,
        settings,
        file: FileTarget::new(&repo.root, "README.md", log),
        repair: Repair::Guidance(
            "Please add a root README.md describing the project; it cannot be generated.",
        ),
    })
}

enum Repair {
    /// Write this canonical content.
    Provision(&'static str),
    /// Irreparable: log this guidance and fail.
    Guidance(&'static str),
}

/// One required root artifact: present and non-empty.
struct ToplevelFile<'a> {
    name: &'static str,
    settings: &'a Settings,
    file: FileTarget<'a>,
    repair: Repair,
}

impl Rule for ToplevelFile<'_> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(self.name)
    }

    fn check(&mut self) -> bool {
        self.file.require_present()
    }

    fn fix(&mut self) -> bool {
        match self.repair {
            Repair::Provision(content) => self.file.write(content),
            Repair::Guidance(msg) => {
                self.file.log.log(msg);
                false
            }
        }
    }

    fn take_log(&mut self) -> Vec<String> {
        self.file.log.take()
    }
}
