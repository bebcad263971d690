//! Domain types for Rhea code intelligence.
//!
//! These types represent the core domain model:
//! - **Extracted facts**: `Symbol`, `ImportEdge` (one per declaration / imported name)
//! - **Derived entries**: `Definition` (a symbol paired with its declaring URI)
//! - **Results**: `IndexStats`, `IndexPhase` (build outcome and index lifecycle)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Symbol scope | Dotted `container` string | Matches how the name map is keyed |
//! | qualified_name | Computed on read | No redundancy; concatenation is cheap |
//! | Import target | Leading dots kept verbatim | Relative depth survives without a resolver |

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::position::Range;

/// Kind of declaration a `Symbol` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// `class Name:`
    Class,
    /// A module-level `def`
    Function,
    /// A `def` nested in a class or another function
    Method,
    /// A plain `name = value` assignment
    Variable,
}

impl SymbolKind {
    /// Get the string representation used in output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Variable => "variable",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named declaration found in a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Declared name, e.g. `my_method`
    pub name: String,
    /// What kind of declaration this is
    pub kind: SymbolKind,
    /// Range of the name token only, not the whole declaration
    pub range: Range,
    /// Dotted path of enclosing classes/functions, e.g. `Outer.Inner`
    pub container: Option<String>,
}

impl Symbol {
    /// Name including its container, e.g. `MyClass.my_method`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.container {
            Some(container) => format!("{container}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A symbol together with the URI of the module that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// URI of the declaring module
    pub uri: String,
    /// The declared symbol
    pub symbol: Symbol,
}

/// One import relationship: a single name brought in by an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge {
    /// URI of the module containing the import statement
    pub source_module_uri: String,
    /// Fully dotted imported name, e.g. `pkg.sub.name` or `.sibling`
    pub imported_name: String,
    /// Module the name is taken from, with leading dots preserved
    pub target_module: String,
    /// Range of the whole import statement
    pub range: Range,
    /// Local alias from `as x`
    pub alias: Option<String>,
    /// `from M import *`
    pub is_wildcard: bool,
    /// The written module starts with at least one dot
    pub is_relative: bool,
}

/// Statistics from the most recent full build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of files parsed and inserted into the index
    pub files_indexed: usize,
    /// Number of files that could not be read or parsed
    pub parse_errors: usize,
    /// One entry per failed file, sorted by path
    pub errors: Vec<IndexError>,
}

/// Lifecycle of the index as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPhase {
    /// No build has started yet
    Empty,
    /// A build is in progress
    Building,
    /// At least one build has completed and no build is running
    Ready,
}

impl IndexPhase {
    /// Get the string representation used in output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Building => "building",
            Self::Ready => "ready",
        }
    }
}

impl std::fmt::Display for IndexPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
