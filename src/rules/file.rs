//! `[file.*]` rules: header hygiene over every source file.
//!
//! Both rules fan out over the C/C++ file-set through `BatchRule`.
//! A file header is a single-line SPDX marker optionally followed by
//! comment lines in the marker's own comment style (`//` or `#`); blank
//! lines are allowed inside the header and the first non-comment line ends
//! it.

use super::batch::BatchRule;
use super::registry::Registry;
use super::target::FileTarget;
use super::{LogConfig, Rule};
use crate::config::Settings;
use crate::context::RepoContext;
use crate::fileset;
use std::path::PathBuf;

pub const COPYRIGHT: &str = "file.copyright";
pub const LICENSE_ID: &str = "file.license-id";

const SPDX_MARKER: &str = "SPDX-License-Identifier:";

pub fn register(registry: &mut Registry) {
    registry.register(COPYRIGHT, new_copyright);
    registry.register(LICENSE_ID, new_license_id);
}

fn new_copyright<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    Box::new(BatchRule::new(
        COPYRIGHT,
        repo,
        settings,
        log,
        fileset::repo_source_files,
        copyright_child,
    ))
}

fn copyright_child<'c>(
    repo: &'c RepoContext,
    settings: &'c Settings,
    log: LogConfig,
    rel: PathBuf,
) -> Box<dyn Rule + 'c> {
    Box::new(CopyrightFile {
        settings,
        file: FileTarget::new(&repo.root, rel, log),
    })
}

fn new_license_id<'a>(
    repo: &'a RepoContext,
    settings: &'a Settings,
    log: LogConfig,
) -> Box<dyn Rule + 'a> {
    Box::new(BatchRule::new(
        LICENSE_ID,
        repo,
        settings,
        log,
        fileset::repo_source_files,
        license_id_child,
    ))
}

fn license_id_child<'c>(
    repo: &'c RepoContext,
    settings: &'c Settings,
    log: LogConfig,
    rel: PathBuf,
) -> Box<dyn Rule + 'c> {
    Box::new(LicenseIdFile {
        settings,
        file: FileTarget::new(&repo.root, rel, log),
    })
}

/// Locate the SPDX marker line and its comment prefix.
///
/// `None` when the file has no marker or the marker uses an unsupported
/// comment style (block comments); both cases are out of scope for the
/// header rules and pass.
fn spdx_info(lines: &[&str]) -> Option<(usize, &'static str)> {
    let index = lines.iter().position(|l| l.contains(SPDX_MARKER))?;
    let trimmed = lines[index].trim();
    if trimmed.starts_with("//") {
        Some((index, "//"))
    } else if trimmed.starts_with('#') {
        Some((index, "#"))
    } else {
        None
    }
}

/// Source files should not carry a copyright notice after the SPDX marker.
struct CopyrightFile<'a> {
    settings: &'a Settings,
    file: FileTarget<'a>,
}

impl Rule for CopyrightFile<'_> {
    fn name(&self) -> &'static str {
        COPYRIGHT
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(COPYRIGHT)
    }

    fn pre_check(&mut self) -> bool {
        self.file.require_present()
    }

    fn check(&mut self) -> bool {
        let content = self.file.read_or_empty();
        let lines: Vec<&str> = content.split('\n').collect();
        let Some((spdx_index, prefix)) = spdx_info(&lines) else {
            return true;
        };

        for (i, raw) in lines.iter().enumerate().skip(spdx_index + 1) {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if !line.starts_with(prefix) {
                break;
            }
            let lower = line.to_lowercase();
            if lower.contains("copyright") || lower.contains("(c)") {
                let msg = format!(
                    "Copyright notice found in {} at line {}. It should be removed.",
                    self.file.display(),
                    i + 1
                );
                self.file.log.log(msg);
                return false;
            }
        }
        true
    }

    fn fix(&mut self) -> bool {
        let content = self.file.read_or_empty();
        let lines: Vec<&str> = content.split('\n').collect();
        let Some((spdx_index, prefix)) = spdx_info(&lines) else {
            return true;
        };

        let mut kept: Vec<&str> = lines[..=spdx_index].to_vec();
        let mut i = spdx_index + 1;
        while i < lines.len() {
            let raw = lines[i];
            let line = raw.trim();
            if line.is_empty() {
                kept.push(raw);
                i += 1;
                continue;
            }
            if !line.starts_with(prefix) {
                // End of header: everything from here on is untouched.
                kept.extend_from_slice(&lines[i..]);
                break;
            }
            let lower = line.to_lowercase();
            if lower.contains("copyright") || lower.contains("(c)") {
                let msg = format!(
                    "Removing copyright line in {}: {}",
                    self.file.display(),
                    line
                );
                self.file.log.log(msg);
                i += 1;
                continue;
            }
            kept.push(raw);
            i += 1;
        }

        let repaired = kept.join("\n");
        self.file.write(&repaired)
    }

    fn take_log(&mut self) -> Vec<String> {
        self.file.log.take()
    }
}

/// Every source file must carry an SPDX marker.
struct LicenseIdFile<'a> {
    settings: &'a Settings,
    file: FileTarget<'a>,
}

impl Rule for LicenseIdFile<'_> {
    fn name(&self) -> &'static str {
        LICENSE_ID
    }

    fn should_skip(&self) -> bool {
        !self.settings.rule_enabled(LICENSE_ID)
    }

    fn pre_check(&mut self) -> bool {
        self.file.require_present()
    }

    fn check(&mut self) -> bool {
        if self.file.contains_literal(SPDX_MARKER) {
            return true;
        }
        let msg = format!(
            "Missing SPDX license identifier in {}.",
            self.file.display()
        );
        self.file.log.log(msg);
        false
    }

    fn fix(&mut self) -> bool {
        let Some(license) = self.settings.option_str(LICENSE_ID, "license").map(str::to_string)
        else {
            let msg = format!(
                "Cannot insert an SPDX marker into {}: no 'license' option configured for {}. \
                 Set [rules.\"{}\"] license = \"<SPDX id>\" or add the marker manually.",
                self.file.display(),
                LICENSE_ID,
                LICENSE_ID
            );
            self.file.log.log(msg);
            return false;
        };
        let content = self.file.read_or_empty();
        let repaired = format!("// {} {}\n{}", SPDX_MARKER, license, content);
        self.file.write(&repaired)
    }

    fn take_log(&mut self) -> Vec<String> {
        self.file.log.take()
    }
}
