//! MCP server for the rhea Python code index.
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! a [`rhea::ProjectIndex`] to AI assistants over stdio.
//!
//! # Architecture
//!
//! The server uses the `rmcp` crate for MCP protocol handling. One project
//! is indexed per process: the index is created at startup, its first build
//! runs on a background thread, and requests are served immediately. Tools
//! that read the index wait for that first build on a blocking thread, so the
//! async runtime keeps serving `index_status` in the meantime.
//!
//! # Tools
//!
//! ## Index Management
//! - `index_status` - Phase and statistics, without waiting for the build
//! - `index_build` - Re-index the whole project
//! - `index_invalidate` - Re-read and re-parse one file
//!
//! ## Queries
//! - `document_symbols` - Outline of a module
//! - `find_definition` - Definitions by name or by position
//! - `find_references` - Every identifier with a given name
//! - `import_graph` - Imports and dependents of a module

pub mod context;
pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::RheaMcpServer;
