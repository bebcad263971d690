//! Integration tests for ignore files and directory walking.

use std::fs;
use std::path::Path;

use rhea::{IgnoreFilter, IndexConfig, discover_files};
use rstest::rstest;
use tempfile::TempDir;

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("should create temp dir");
    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("should create parent dirs");
        }
        fs::write(&full_path, content).expect("should write file");
    }
    dir
}

fn relative(root: &Path, files: &[std::path::PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .expect("discovered files are under the root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn gitignore_and_mcpignore_are_both_honored() {
    let dir = tree(&[
        (".gitignore", "build/\n*.gen.py\n"),
        (".mcpignore", "secrets.py\n"),
        ("app.py", ""),
        ("schema.gen.py", ""),
        ("secrets.py", ""),
        ("build/out.py", ""),
        ("pkg/mod.py", ""),
        ("pkg/deep/model.gen.py", ""),
    ]);
    let root = dir.path().canonicalize().expect("should canonicalize");

    let files = discover_files(&root, &IndexConfig::default());

    assert_eq!(relative(&root, &files), vec!["app.py", "pkg/mod.py"]);
}

#[test]
fn negated_patterns_re_include_files() {
    let dir = tree(&[
        (".gitignore", "*.gen.py\n!keep.gen.py\n"),
        ("drop.gen.py", ""),
        ("keep.gen.py", ""),
    ]);
    let root = dir.path().canonicalize().expect("should canonicalize");

    let files = discover_files(&root, &IndexConfig::default());

    assert_eq!(relative(&root, &files), vec!["keep.gen.py"]);
}

#[test]
fn configured_ignore_files_replace_the_defaults() {
    let dir = tree(&[
        (".gitignore", "app.py\n"),
        (".rheaignore", "other.py\n"),
        ("app.py", ""),
        ("other.py", ""),
    ]);
    let root = dir.path().canonicalize().expect("should canonicalize");
    let config = IndexConfig {
        ignore_files: vec![".rheaignore".to_string()],
        ..IndexConfig::default()
    };

    let files = discover_files(&root, &config);

    assert_eq!(relative(&root, &files), vec!["app.py"]);
}

#[test]
fn missing_ignore_files_ignore_nothing() {
    let dir = tree(&[("a.py", ""), ("b/c.py", "")]);
    let root = dir.path().canonicalize().expect("should canonicalize");

    let files = discover_files(&root, &IndexConfig::default());

    assert_eq!(relative(&root, &files), vec!["a.py", "b/c.py"]);
}

#[rstest]
#[case("logs/today.py", true)]
#[case("logs", true)]
#[case("src/logs/inner.py", true)]
#[case("src/main.py", false)]
#[case("notes.tmp", true)]
#[case("", false)]
fn ignore_filter_matches_paths_and_parents(#[case] path: &str, #[case] ignored: bool) {
    let dir = tree(&[
        (".gitignore", "logs/\n*.tmp\n"),
        ("logs/today.py", ""),
        ("src/logs/inner.py", ""),
        ("src/main.py", ""),
        ("notes.tmp", ""),
    ]);
    let root = dir.path().canonicalize().expect("should canonicalize");
    let filter = IgnoreFilter::from_root(&root, &[".gitignore".to_string()]);

    assert_eq!(filter.is_ignored(&root.join(path)), ignored, "{path}");
}

#[test]
fn paths_outside_the_root_are_never_ignored() {
    let dir = tree(&[(".gitignore", "*\n")]);
    let root = dir.path().canonicalize().expect("should canonicalize");
    let filter = IgnoreFilter::from_root(&root, &[".gitignore".to_string()]);

    assert!(!filter.is_ignored(Path::new("/definitely/elsewhere.py")));
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_followed() {
    let dir = tree(&[("real/mod.py", "")]);
    let root = dir.path().canonicalize().expect("should canonicalize");
    std::os::unix::fs::symlink(root.join("real"), root.join("link"))
        .expect("should create symlink");

    let files = discover_files(&root, &IndexConfig::default());

    assert_eq!(relative(&root, &files), vec!["real/mod.py"]);
}
