//! # Rhea: In-memory Python Code Intelligence
//!
//! Rhea scans a Python project, parses every source file with tree-sitter
//! into a position-annotated syntax tree, extracts declared symbols and
//! import relationships, and keeps them in an in-memory index that can be
//! queried and updated file by file. It is designed to sit behind a
//! tool-calling server or a CLI.
//!
//! ## Design Philosophy
//!
//! - **One project, in process** - Nothing is persisted; a build is a full rescan
//! - **Textual, not semantic** - Names resolve through a name map, not scopes or types
//! - **Best effort** - A broken file is counted and skipped, never fatal
//! - **Consistent reads** - Readers see whole builds, never half-updated maps
//!
//! ## Quick Start
//!
//! ```no_run
//! use rhea::{ProjectIndex, query};
//! use std::path::Path;
//!
//! let index = ProjectIndex::open(Path::new("/path/to/project"))?;
//!
//! // Index the project
//! let stats = index.build();
//! println!("Indexed {} files, {} failed", stats.files_indexed, stats.parse_errors);
//!
//! // Look up where a name is defined
//! for location in query::find_definition(&index, "MyClass.run") {
//!     println!("{} {:?}", location.uri, location.range.start);
//! }
//! # Ok::<(), rhea::Error>(())
//! ```
//!
//! ## Keeping the index fresh
//!
//! After changing a file on disk, call [`ProjectIndex::rebuild`] with its
//! URI. The file cache also notices changed modification times on its own,
//! so the next full [`ProjectIndex::build`] re-reads only what changed.

mod cache;
mod config;
mod error;
mod gate;
mod imports;
mod index;
mod parser;
mod position;
pub mod query;
mod symbols;
mod syntax;
mod types;
mod uri;
mod walker;

pub use cache::{FileCache, FileRecord, RecordState};
pub use config::{CONFIG_FILE_NAME, IndexConfig};
pub use error::{Error, IndexError, IndexErrorKind, Result, SyntaxError};
pub use gate::ReadyGate;
pub use imports::import_edges;
pub use index::{IndexReader, ProjectIndex};
pub use parser::{ParsedModule, PythonParser, parse_module};
pub use position::{Position, Range};
pub use symbols::document_symbols;
pub use syntax::{NodeId, SyntaxNode, SyntaxTree};
pub use types::{Definition, ImportEdge, IndexPhase, IndexStats, Symbol, SymbolKind};
pub use uri::{path_to_uri, uri_to_path};
pub use walker::{IgnoreFilter, discover_files};
