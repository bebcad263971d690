//! Shared utilities for Rhea benchmarks.

// Benchmark utilities - pedantic lints not critical here
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use rhea::ProjectIndex;
use tempfile::TempDir;

/// A project with its index already built.
pub struct IndexedWorkspace {
    /// Temp directory - must be kept alive for the duration of the benchmark.
    pub dir: TempDir,
    /// Built index over the project.
    pub index: ProjectIndex,
}

/// Create a temporary project with the given files.
/// Returns the temp directory (must be kept alive) and the project path.
pub fn create_workspace(files: &[(String, String)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }

    let path = dir.path().to_path_buf();
    (dir, path)
}

/// Create a project and build its index.
pub fn create_indexed_workspace(files: &[(String, String)]) -> IndexedWorkspace {
    let (dir, path) = create_workspace(files);
    let index = ProjectIndex::new(&path).expect("failed to create index");
    index.build();
    IndexedWorkspace { dir, index }
}

/// Generate a realistic Python module with classes, methods and functions.
pub fn generate_python_module(module_name: &str, num_functions: usize, num_classes: usize) -> String {
    let mut code = String::new();

    code.push_str("import os\nimport json\nfrom collections import defaultdict\n\n");

    for i in 0..num_classes {
        code.push_str(&format!(
            "class {module_name}_Model{i}:\n    \
                 table = \"{module_name}_{i}\"\n\n    \
                 def __init__(self, ident, name):\n        \
                     self.ident = ident\n        \
                     self.name = name\n        \
                     self.data = defaultdict(int)\n\n    \
                 def process(self):\n        \
                     total = sum(self.data.values())\n        \
                     return total + len(self.name)\n\n\n"
        ));
    }

    for i in 0..num_functions {
        code.push_str(&format!(
            "def {module_name}_func{i}(value):\n    \
                 result = value * 2\n    \
                 return result + {i}\n\n\n"
        ));
    }

    code.push_str(&format!("def {module_name}_main():\n    total = 0\n"));
    for i in 0..num_functions.min(5) {
        code.push_str(&format!("    total += {module_name}_func{i}(total)\n"));
    }
    for i in 0..num_classes.min(3) {
        code.push_str(&format!(
            "    m{i} = {module_name}_Model{i}({i}, \"test\")\n    total += m{i}.process()\n"
        ));
    }
    code.push_str("    return total\n");

    code
}

/// Generate a package whose modules each import the previous one.
pub fn generate_package(num_modules: usize) -> Vec<(String, String)> {
    let mut files = vec![("app/__init__.py".to_string(), String::new())];

    for i in 0..num_modules {
        let module_name = format!("module{i}");
        let mut content = String::new();

        if i > 0 {
            content.push_str(&format!("from app.module{} import module{}_main\n", i - 1, i - 1));
        }

        content.push_str(&generate_python_module(&module_name, 5, 3));

        if i > 0 {
            content.push_str(&format!(
                "\n\ndef cross_module_call{i}():\n    return module{}_main()\n",
                i - 1
            ));
        }

        files.push((format!("app/module{i}.py"), content));
    }

    files
}
