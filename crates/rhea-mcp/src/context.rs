//! Project context for the MCP server.
//!
//! The server indexes one project for its whole lifetime. `Context` owns the
//! shared [`ProjectIndex`], starts its first build in the background, and
//! runs index work on blocking threads so the async runtime stays free.
//!
//! # Readiness
//!
//! Every query goes through [`Context::with_ready_index`], which waits on the
//! index's ready gate inside the blocking task. The gate opens once, after the
//! first build has been published, and never closes again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rhea::ProjectIndex;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Shared server state: the project index and its root.
#[derive(Debug, Clone)]
pub struct Context {
    index: Arc<ProjectIndex>,
}

impl Context {
    /// Open the project at `root` without building it.
    ///
    /// # Errors
    ///
    /// Returns an error if the root doesn't exist or its `.rhea.yaml` is
    /// malformed.
    pub fn open(root: &Path) -> Result<Self> {
        let index = ProjectIndex::open(root)?;
        debug!(root = %index.root().display(), "Opened project");
        Ok(Self {
            index: Arc::new(index),
        })
    }

    /// Open the project at `root` and start its first build in the background.
    ///
    /// # Errors
    ///
    /// Same as [`Context::open`].
    pub fn start(root: &Path) -> Result<Self> {
        let context = Self::open(root)?;
        info!(root = %context.root().display(), "Starting background index build");
        // Detached: completion is observed through the ready gate.
        let _build = context.index.spawn_build();
        Ok(context)
    }

    /// The shared index. Reading from it before the first build completes
    /// sees an empty index.
    #[must_use]
    pub fn index(&self) -> &Arc<ProjectIndex> {
        &self.index
    }

    /// Canonical project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.index.root()
    }

    /// Wait for the first build, then run `f` against the index on a
    /// blocking thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Task`] if `f` panics.
    pub async fn with_ready_index<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ProjectIndex) -> T + Send + 'static,
        T: Send + 'static,
    {
        let index = Arc::clone(&self.index);
        let value = tokio::task::spawn_blocking(move || {
            index.wait_ready();
            f(&index)
        })
        .await?;
        Ok(value)
    }

    /// Normalize a tool argument naming a module to its index URI.
    ///
    /// `file://` URIs are taken as given. Anything without a scheme is a path,
    /// relative to the project root unless absolute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownUri`] for URIs with another scheme or a
    /// malformed `file://` URI.
    pub fn resolve_uri(&self, target: &str) -> Result<String> {
        if target.contains("://") || target.starts_with("file:") {
            rhea::uri_to_path(target).map_err(|_| Error::UnknownUri(target.to_string()))?;
            return Ok(target.to_string());
        }

        let path = PathBuf::from(target);
        let path = if path.is_absolute() {
            path
        } else {
            self.root().join(path)
        };
        let path = path.canonicalize().unwrap_or(path);
        Ok(rhea::path_to_uri(&path))
    }
}
