//! File-set resolution.
//!
//! A file-set is the sorted, duplicate-free list of repo-relative paths a
//! batch rule iterates. Filtering is by extension allow-list plus a
//! directory-name deny-list; exclusion matches whole path components, not
//! substrings, so a directory named `rebuild` is not caught by `build`.
//! File-sets are recomputed on every resolution — no caching — so results
//! stay reproducible across runs.

use crate::context::RepoContext;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// C/C++ source and header extensions considered "source files".
pub const SOURCE_EXTENSIONS: &[&str] = &["hpp", "h", "hxx", "hh", "cpp", "cxx", "cc", "c"];

/// Version-control, build-output, IDE, and virtual-environment directories
/// excluded from every walk.
pub const EXCLUDED_DIRS: &[&str] = &[".git", "build", ".idea", ".vscode", "__pycache__", "venv", "env"];

/// Collect repo-relative files under `root` matching one of `extensions`,
/// skipping any path with a component in `excluded`.
pub fn matched_paths(root: &Path, extensions: &[&str], excluded: &[&str]) -> Vec<PathBuf> {
    let mut found: BTreeSet<PathBuf> = BTreeSet::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        let name = e.file_name().to_string_lossy();
        !(e.file_type().is_dir() && excluded.contains(&name.as_ref()))
    });
    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(root) {
            Ok(r) => r.to_path_buf(),
            Err(_) => continue,
        };
        if is_excluded(&rel, excluded) {
            continue;
        }
        let matches = rel
            .extension()
            .map(|e| extensions.contains(&e.to_string_lossy().as_ref()))
            .unwrap_or(false);
        if matches {
            found.insert(rel);
        }
    }
    found.into_iter().collect()
}

/// True when any component of `rel` matches a deny-listed name.
pub fn is_excluded(rel: &Path, excluded: &[&str]) -> bool {
    rel.components()
        .any(|c| excluded.contains(&c.as_os_str().to_string_lossy().as_ref()))
}

/// All C/C++ source files in the repository, default exclusions applied.
pub fn source_files(root: &Path) -> Vec<PathBuf> {
    matched_paths(root, SOURCE_EXTENSIONS, EXCLUDED_DIRS)
}

/// Resolver form of [`source_files`] used by batch rules.
pub fn repo_source_files(ctx: &RepoContext) -> Vec<PathBuf> {
    source_files(&ctx.root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "x").unwrap();
    }

    #[test]
    fn test_matches_extensions_and_sorts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/b.cpp");
        touch(root, "src/a.hpp");
        touch(root, "README.md");
        touch(root, "tests/t.test.cpp");

        let files = source_files(root);
        assert_eq!(
            files,
            vec![
                PathBuf::from("src/a.hpp"),
                PathBuf::from("src/b.cpp"),
                PathBuf::from("tests/t.test.cpp"),
            ]
        );
    }

    #[test]
    fn test_excludes_by_path_component_not_substring() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "build/out.cpp");
        touch(root, "rebuild/keep.cpp");
        touch(root, "src/.git/hidden.cpp");

        let files = source_files(root);
        assert_eq!(files, vec![PathBuf::from("rebuild/keep.cpp")]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for name in ["z.cpp", "a.cpp", "m.hpp", "sub/k.cc"] {
            touch(root, name);
        }
        let first = source_files(root);
        let second = source_files(root);
        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(first, sorted);
    }

    #[test]
    fn test_empty_tree_yields_empty_set() {
        let dir = tempdir().unwrap();
        assert!(source_files(dir.path()).is_empty());
    }
}
