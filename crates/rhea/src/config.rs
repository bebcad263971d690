//! Index configuration.
//!
//! Configuration is optional. `ProjectIndex::open` looks for
//! `<root>/.rhea.yaml`; a missing file means defaults, and every field may
//! be omitted:
//!
//! ```yaml
//! extensions: [py, pyi]
//! ignore-files: [.gitignore, .mcpignore]
//! exclude-dirs: [.git, __pycache__, .venv]
//! parallel: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the configuration file at the project root
pub const CONFIG_FILE_NAME: &str = ".rhea.yaml";

/// Settings that control which files are indexed and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct IndexConfig {
    /// File extensions (without the dot) that are parsed as Python
    pub extensions: Vec<String>,

    /// Gitignore-style files read from the project root, in order
    pub ignore_files: Vec<String>,

    /// Directory names never descended into, wherever they appear
    pub exclude_dirs: Vec<String>,

    /// Parse files on the rayon thread pool
    pub parallel: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            ignore_files: vec![".gitignore".to_string(), ".mcpignore".to_string()],
            exclude_dirs: vec![".git".to_string(), "__pycache__".to_string()],
            parallel: true,
        }
    }
}

impl IndexConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file can't be read and `Error::Config` if
    /// it isn't valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load `<root>/.rhea.yaml`, or defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Same as [`IndexConfig::load`] for a file that exists.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on malformed YAML, unknown keys, or an empty
    /// extension list.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes as null rather than an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("{CONFIG_FILE_NAME}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Whether `path` has one of the configured extensions.
    #[must_use]
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }

    /// Whether a directory with this name is skipped by the walker.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|dir| dir == name)
    }

    fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(Error::Config(
                "extensions must list at least one file extension".to_string(),
            ));
        }
        if let Some(bad) = self.extensions.iter().find(|e| e.starts_with('.')) {
            return Err(Error::Config(format!(
                "extension '{bad}' should be written without the leading dot"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn defaults_index_python_sources() {
        let config = IndexConfig::default();

        assert!(config.is_source_file(Path::new("pkg/mod.py")));
        assert!(!config.is_source_file(Path::new("README.md")));
        assert!(!config.is_source_file(Path::new("Makefile")));
        assert!(config.is_excluded_dir("__pycache__"));
        assert!(config.parallel);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config =
            IndexConfig::from_yaml("extensions: [py, pyi]\n").expect("config should parse");

        assert_eq!(config.extensions, vec!["py", "pyi"]);
        assert_eq!(config.ignore_files, IndexConfig::default().ignore_files);
        assert!(config.is_source_file(Path::new("stubs/os.pyi")));
    }

    #[test]
    fn empty_file_is_default() {
        let config = IndexConfig::from_yaml("  \n").expect("empty config should parse");
        assert_eq!(config, IndexConfig::default());
    }

    #[rstest]
    #[case::unknown_key("colour: blue\n")]
    #[case::empty_extensions("extensions: []\n")]
    #[case::dotted_extension("extensions: [.py]\n")]
    #[case::wrong_type("parallel: maybe\n")]
    fn rejects_invalid_config(#[case] yaml: &str) {
        let result = IndexConfig::from_yaml(yaml);
        assert!(
            matches!(result, Err(Error::Config(_))),
            "expected config error for {yaml:?}, got {result:?}"
        );
    }

    #[test]
    fn load_or_default_reads_root_file() {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "exclude-dirs: [.venv]\nparallel: false\n",
        )
        .expect("failed to write config");

        let config = IndexConfig::load_or_default(dir.path()).expect("config should load");

        assert_eq!(config.exclude_dirs, vec![".venv"]);
        assert!(!config.parallel);
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let config = IndexConfig::load_or_default(dir.path()).expect("defaults should load");
        assert_eq!(config, IndexConfig::default());
    }
}
