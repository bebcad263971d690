//! Python parsing into annotated modules.
//!
//! Wraps the tree-sitter Python grammar. A successful parse produces a
//! `ParsedModule`: the source text, a line index, and a `SyntaxTree` in which
//! every named node already carries its range and parent. A parse that
//! contains any `ERROR` or `MISSING` node fails as a whole with one
//! `SyntaxError` for the first such node; no partial module is produced.
//!
//! ## Design
//!
//! Tree-sitter parsers are stateful, so `PythonParser` owns one and is reused
//! across files on a single thread. `parse_module` is the one-shot form.

use std::ops::Range as ByteRange;
use std::sync::Arc;

use crate::error::{Error, Result, SyntaxError};
use crate::position::Position;
use crate::syntax::{Defect, Malformed, NodeId, SyntaxTree};

/// A reusable Python parser.
pub struct PythonParser {
    parser: tree_sitter::Parser,
}

impl PythonParser {
    /// Create a parser for the bundled Python grammar.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parser` if the grammar is incompatible with the linked
    /// tree-sitter runtime.
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| Error::Parser(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse `text` and annotate the result.
    ///
    /// # Errors
    ///
    /// Returns `Error::Syntax` if the text is not valid Python, or
    /// `Error::Parser` if tree-sitter produced no tree at all.
    pub fn parse(&mut self, text: impl Into<Arc<str>>, uri: &str) -> Result<ParsedModule> {
        let text: Arc<str> = text.into();
        let lines = split_lines(&text);

        let tree = self
            .parser
            .parse(text.as_bytes(), None)
            .ok_or_else(|| Error::Parser(format!("no syntax tree produced for {uri}")))?;

        match SyntaxTree::annotate(&tree) {
            Ok(tree) => Ok(ParsedModule {
                uri: uri.to_string(),
                text,
                lines,
                tree,
            }),
            Err(malformed) => Err(Error::Syntax(syntax_error(
                &malformed, &text, &lines, uri,
            ))),
        }
    }
}

/// Parse `text` with a fresh parser.
///
/// # Errors
///
/// Same as [`PythonParser::parse`], plus grammar setup failures.
pub fn parse_module(text: impl Into<Arc<str>>, uri: &str) -> Result<ParsedModule> {
    PythonParser::new()?.parse(text, uri)
}

fn syntax_error(
    malformed: &Malformed,
    text: &str,
    lines: &[ByteRange<usize>],
    uri: &str,
) -> SyntaxError {
    let line = malformed.position.line;
    let source_line = lines
        .get(line as usize)
        .and_then(|span| text.get(span.clone()))
        .unwrap_or_default();
    let message = match malformed.defect {
        Defect::Unexpected => "invalid syntax".to_string(),
        Defect::Missing(kind) => format!("invalid syntax: missing '{kind}'"),
        Defect::LegacyStatement(keyword) => {
            format!("Missing parentheses in call to '{keyword}'. Did you mean {keyword}(...)?")
        }
    };

    SyntaxError {
        message,
        uri: uri.to_string(),
        line: line + 1,
        offset: malformed.position.column + 1,
        text: source_line.to_string(),
    }
}

/// Byte spans of each line, terminators excluded.
///
/// `\n`, `\r\n` and a lone `\r` all end a line; a trailing terminator does
/// not start an extra empty line.
fn split_lines(text: &str) -> Vec<ByteRange<usize>> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(start..i);
                start = i + 1;
            }
            b'\r' => {
                lines.push(start..i);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(start..bytes.len());
    }
    lines
}

/// A successfully parsed Python module.
///
/// Immutable after construction and shared as `Arc<ParsedModule>` by the
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModule {
    uri: String,
    text: Arc<str>,
    lines: Vec<ByteRange<usize>>,
    tree: SyntaxTree,
}

impl ParsedModule {
    /// URI the module was parsed under.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The annotated syntax tree.
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Number of source lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of a 0-indexed line, without its terminator.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).and_then(|span| self.text.get(span.clone()))
    }

    /// All source lines, without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|span| self.text.get(span.clone()).unwrap_or_default())
    }

    /// Source text covered by a node.
    #[must_use]
    pub fn node_text(&self, id: NodeId) -> &str {
        self.tree
            .get(id)
            .and_then(|node| self.text.get(node.byte_range.clone()))
            .unwrap_or_default()
    }

    /// Innermost node at a position.
    #[must_use]
    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        self.tree.node_at(position)
    }

    /// Innermost node at a position, if it is an identifier.
    #[must_use]
    pub fn identifier_at(&self, position: Position) -> Option<NodeId> {
        self.node_at(position)
            .filter(|id| self.tree.node(*id).kind == "identifier")
    }
}
