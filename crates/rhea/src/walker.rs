//! Source file discovery.
//!
//! Walks the project root recursively and yields every file with a configured
//! extension that is not ignored. Ignore rules come from gitignore-style
//! files at the root (`.gitignore` and `.mcpignore` by default), matched with
//! the `ignore` crate, so directory patterns, globs and `!` negations behave
//! as they do in git. An ignored directory is never descended into.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

use crate::config::IndexConfig;

/// Gitignore-style matcher rooted at the project directory.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    root: PathBuf,
    matcher: Gitignore,
}

impl IgnoreFilter {
    /// Load the named ignore files from `root`.
    ///
    /// Missing files are skipped. A file that fails to load is logged and
    /// skipped; it never prevents the walk.
    #[must_use]
    pub fn from_root(root: &Path, ignore_files: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for name in ignore_files {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }
            if let Some(err) = builder.add(&path) {
                warn!(path = %path.display(), error = %err, "Failed to load ignore file");
            } else {
                debug!(path = %path.display(), "Loaded ignore file");
            }
        }

        let matcher = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to build ignore matcher, ignoring nothing");
            Gitignore::empty()
        });

        Self {
            root: root.to_path_buf(),
            matcher,
        }
    }

    /// Whether `path` (or any directory above it, up to the root) is ignored.
    ///
    /// Paths outside the root are never ignored. Whether `path` is a
    /// directory is read from the filesystem.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.is_ignored_as(path, path.is_dir())
    }

    fn is_ignored_as(&self, path: &Path, is_dir: bool) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(relative, is_dir)
            .is_ignore()
    }
}

/// Find every indexable source file under `root`, sorted by path.
///
/// Directories that can't be read are logged and skipped.
#[must_use]
pub fn discover_files(root: &Path, config: &IndexConfig) -> Vec<PathBuf> {
    let filter = IgnoreFilter::from_root(root, &config.ignore_files);
    let mut files = Vec::new();
    walk_dir(root, config, &filter, &mut files);
    files.sort();
    files
}

fn walk_dir(dir: &Path, config: &IndexConfig, filter: &IgnoreFilter, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!(
                directory = %dir.display(),
                error = %e,
                "Cannot read directory, skipping"
            );
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    directory = %dir.display(),
                    error = %e,
                    "Failed to read directory entry, skipping"
                );
                continue;
            }
        };

        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            let excluded = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| config.is_excluded_dir(name));
            if excluded || filter.is_ignored_as(&path, true) {
                continue;
            }
            walk_dir(&path, config, filter, files);
        } else if (file_type.is_file() || (file_type.is_symlink() && path.is_file()))
            && config.is_source_file(&path)
            && !filter.is_ignored_as(&path, false)
        {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Project with a `.gitignore` exercising directory patterns, globs,
    /// comments and negation, plus a `.mcpignore`.
    fn ignore_project() -> TempDir {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path();
        std::fs::write(
            root.join(".gitignore"),
            "\nignored_dir/\n*.log\n\n# A comment\n!important.log\nbuild\n",
        )
        .expect("failed to write .gitignore");
        std::fs::write(root.join(".mcpignore"), "*.pyc\n.venv/").expect("failed to write .mcpignore");

        for dir in ["ignored_dir", "build", "dir1", ".venv"] {
            std::fs::create_dir(root.join(dir)).expect("failed to create dir");
        }
        for file in [
            "file1.py",
            "important.log",
            "another.log",
            "ignored_dir/file2.py",
            "build/output.txt",
            "dir1/file3.py",
            ".venv/pyvenv.cfg",
            ".venv/site.py",
            "cached.pyc",
        ] {
            std::fs::write(root.join(file), "").expect("failed to write file");
        }
        dir
    }

    fn default_filter(root: &Path) -> IgnoreFilter {
        IgnoreFilter::from_root(root, &IndexConfig::default().ignore_files)
    }

    #[test]
    fn directory_patterns_ignore_contents() {
        let project = ignore_project();
        let root = project.path();
        let filter = default_filter(root);

        assert!(filter.is_ignored(&root.join("ignored_dir")));
        assert!(filter.is_ignored(&root.join("ignored_dir/file2.py")));
        assert!(!filter.is_ignored(&root.join("file1.py")));
        assert!(!filter.is_ignored(&root.join("dir1/file3.py")));
    }

    #[test]
    fn negation_reincludes_file() {
        let project = ignore_project();
        let root = project.path();
        let filter = default_filter(root);

        assert!(!filter.is_ignored(&root.join("important.log")));
        assert!(filter.is_ignored(&root.join("another.log")));
    }

    #[test]
    fn mcpignore_patterns_apply() {
        let project = ignore_project();
        let root = project.path();
        let filter = default_filter(root);

        assert!(filter.is_ignored(&root.join(".venv")));
        assert!(filter.is_ignored(&root.join("cached.pyc")));
    }

    #[test]
    fn pattern_without_slash_matches_directory() {
        let project = ignore_project();
        let root = project.path();
        let filter = default_filter(root);

        assert!(filter.is_ignored(&root.join("build")));
        assert!(filter.is_ignored(&root.join("build/output.txt")));
    }

    #[test]
    fn root_and_outside_paths_are_not_ignored() {
        let project = ignore_project();
        let root = project.path();
        let filter = default_filter(root);

        assert!(!filter.is_ignored(root));
        assert!(!filter.is_ignored(Path::new("/definitely/elsewhere/another.log")));
    }

    #[test]
    fn discover_files_skips_ignored_and_non_python() {
        let project = ignore_project();
        let root = project.path();

        let files = discover_files(root, &IndexConfig::default());
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).expect("files are under root"))
            .collect();

        assert_eq!(
            relative,
            vec![Path::new("dir1/file3.py"), Path::new("file1.py")]
        );
    }

    #[test]
    fn discover_files_honours_excluded_dirs() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path();
        std::fs::create_dir_all(root.join("pkg/__pycache__")).expect("failed to create dirs");
        std::fs::write(root.join("pkg/mod.py"), "").expect("failed to write");
        std::fs::write(root.join("pkg/__pycache__/mod.py"), "").expect("failed to write");

        let files = discover_files(root, &IndexConfig::default());

        assert_eq!(files, vec![root.join("pkg/mod.py")]);
    }

    #[test]
    fn filter_without_ignore_files_ignores_nothing() {
        let project = ignore_project();
        let root = project.path();
        let filter = IgnoreFilter::from_root(root, &[]);

        assert!(!filter.is_ignored(&root.join("another.log")));
    }
}
