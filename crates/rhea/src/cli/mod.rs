//! CLI command implementations.

mod display;

pub mod definition;
pub mod imports;
pub mod index;
pub mod references;
pub mod symbols;

use std::path::Path;

use rhea::{ProjectIndex, Result};

/// Open the project at `workspace` and build its index.
fn build_index(workspace: &Path) -> Result<ProjectIndex> {
    let index = ProjectIndex::open(workspace)?;
    let stats = index.build();
    tracing::debug!(
        files_indexed = stats.files_indexed,
        parse_errors = stats.parse_errors,
        "Index ready"
    );
    Ok(index)
}

/// URI of a file given on the command line.
///
/// Relative paths are taken relative to the project root.
fn file_uri(index: &ProjectIndex, file: &Path) -> Result<String> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        index.root().join(file)
    };
    let path = path.canonicalize().map_err(|e| {
        rhea::Error::Io(std::io::Error::new(
            e.kind(),
            format!("file not found: {}", file.display()),
        ))
    })?;
    Ok(rhea::path_to_uri(&path))
}
