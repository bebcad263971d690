//! MCP request parameters and response models.
//!
//! Positions in requests and responses are 0-indexed; columns are byte
//! offsets within the line. Symbols, locations, references and import graphs
//! are returned in the shape of the corresponding `rhea` types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for tools that take a single module.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UriParams {
    /// Module to query.
    #[schemars(
        description = "File URI (file:///...) or path relative to the project root of a Python module"
    )]
    pub uri: String,
}

/// Parameters for the `find_definition` tool.
///
/// Either `symbol`, or all of `uri`, `line` and `column`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct FindDefinitionParams {
    /// Bare or dotted name to look up.
    #[schemars(description = "Name to look up, bare (run) or qualified (Task.run)")]
    #[serde(default)]
    pub symbol: Option<String>,

    /// Module containing the position.
    #[schemars(description = "File URI or root-relative path of the module containing the position")]
    #[serde(default)]
    pub uri: Option<String>,

    /// 0-indexed line of the position.
    #[schemars(description = "0-indexed line number")]
    #[serde(default)]
    pub line: Option<u32>,

    /// 0-indexed column of the position.
    #[schemars(description = "0-indexed column (byte offset within the line)")]
    #[serde(default)]
    pub column: Option<u32>,
}

/// Parameters for the `find_references` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SymbolParams {
    /// Identifier to search for.
    #[schemars(description = "Identifier text to search for across the project")]
    pub symbol: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Response from the `index_status` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IndexStatusResponse {
    /// Project root being indexed.
    pub root: String,

    /// Lifecycle phase: `empty`, `building` or `ready`.
    pub phase: String,

    /// Whether the first build has completed.
    pub ready: bool,

    /// Files indexed by the most recent build.
    pub files_indexed: usize,

    /// Files that failed to read or parse in the most recent build.
    pub parse_errors: usize,

    /// Modules currently in the index.
    pub uri_count: usize,
}

/// Response from the `index_invalidate` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvalidateResponse {
    /// URI that was rebuilt.
    pub uri: String,

    /// Whether the module is in the index after the rebuild.
    pub indexed: bool,

    /// Status message.
    pub message: String,
}
