//! MCP tool implementations.
//!
//! This module contains the implementations for all MCP tools exposed by the
//! server. Everything except [`Tools::index_status`] waits for the first index
//! build before touching the index.

use std::sync::Arc;

use rhea::query::{self, ImportGraph, Location, Reference};
use rhea::{IndexStats, Position, ProjectIndex, Symbol};
use tracing::debug;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::models::{FindDefinitionParams, IndexStatusResponse, InvalidateResponse};

/// Tool implementations for the rhea MCP server.
pub struct Tools {
    context: Arc<Context>,
}

impl Tools {
    /// Create a new Tools instance with the given context.
    #[must_use]
    pub fn new(context: Arc<Context>) -> Self {
        Self { context }
    }

    /// Report the index phase and statistics.
    ///
    /// Never waits on the build.
    #[must_use]
    pub fn index_status(&self) -> IndexStatusResponse {
        let index = self.context.index();
        let reader = index.read();
        IndexStatusResponse {
            root: index.root().display().to_string(),
            phase: index.phase().to_string(),
            ready: index.is_ready(),
            files_indexed: reader.stats().files_indexed,
            parse_errors: reader.stats().parse_errors,
            uri_count: reader.len(),
        }
    }

    /// Rebuild the whole index.
    ///
    /// # Errors
    ///
    /// Returns an error if the build task fails.
    pub async fn index_build(&self) -> Result<IndexStats> {
        self.context.with_ready_index(ProjectIndex::build).await
    }

    /// Re-read and re-parse one module.
    ///
    /// # Errors
    ///
    /// Returns an error for a URI with a non-`file` scheme or if the task fails.
    pub async fn index_invalidate(&self, uri: &str) -> Result<InvalidateResponse> {
        let uri = self.context.resolve_uri(uri)?;
        let target = uri.clone();
        let indexed = self
            .context
            .with_ready_index(move |index| index.rebuild(&target))
            .await?;
        debug!(uri, indexed, "Rebuilt module");

        let message = if indexed {
            format!("URI '{uri}' invalidated and rebuilt.")
        } else {
            format!("URI '{uri}' invalidated; it is not indexed (missing, ignored or unparsable).")
        };
        Ok(InvalidateResponse {
            uri,
            indexed,
            message,
        })
    }

    /// Outline of a module.
    ///
    /// # Errors
    ///
    /// Returns an error for a URI with a non-`file` scheme or if the task fails.
    pub async fn document_symbols(&self, uri: &str) -> Result<Vec<Symbol>> {
        let uri = self.context.resolve_uri(uri)?;
        self.context
            .with_ready_index(move |index| query::document_symbols(index, &uri))
            .await
    }

    /// Definitions by name, or of the name at a position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless exactly one of `symbol` or
    /// the full `uri`/`line`/`column` triple is given.
    pub async fn find_definition(&self, params: FindDefinitionParams) -> Result<Vec<Location>> {
        match params {
            FindDefinitionParams {
                symbol: Some(symbol),
                uri: None,
                line: None,
                column: None,
            } => {
                self.context
                    .with_ready_index(move |index| query::find_definition(index, &symbol))
                    .await
            }
            FindDefinitionParams {
                symbol: None,
                uri: Some(uri),
                line: Some(line),
                column: Some(column),
            } => {
                let uri = self.context.resolve_uri(&uri)?;
                let position = Position::new(line, column);
                self.context
                    .with_ready_index(move |index| query::definition_at(index, &uri, position))
                    .await
            }
            _ => Err(Error::InvalidArgument(
                "pass either `symbol`, or `uri` with `line` and `column`".to_string(),
            )),
        }
    }

    /// Every identifier named `symbol` in the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails.
    pub async fn find_references(&self, symbol: String) -> Result<Vec<Reference>> {
        self.context
            .with_ready_index(move |index| query::find_references(index, &symbol))
            .await
    }

    /// Imports of a module and the modules importing it.
    ///
    /// # Errors
    ///
    /// Returns an error for a URI with a non-`file` scheme or if the task fails.
    pub async fn import_graph(&self, uri: &str) -> Result<ImportGraph> {
        let uri = self.context.resolve_uri(uri)?;
        self.context
            .with_ready_index(move |index| query::import_graph(index, &uri))
            .await
    }
}
