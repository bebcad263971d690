//! Position-annotated syntax trees.
//!
//! A `SyntaxTree` is an arena copy of the named nodes of a tree-sitter parse.
//! Nodes are stored in pre-order, so `NodeId(0)` is always the `module` root
//! and a parent always has a smaller id than its children. Parent links are
//! plain indices; the tree owns no tree-sitter state once built.

use std::ops::Range as ByteRange;

use crate::position::{Position, Range};

/// Tree-sitter node kind constants for the Python grammar.
///
/// These match the node types defined in tree-sitter-python. Using constants
/// prevents typos and makes supported node types explicit.
pub(crate) mod node_kinds {
    // Declarations
    pub const CLASS_DEFINITION: &str = "class_definition";
    pub const FUNCTION_DEFINITION: &str = "function_definition";
    pub const ASSIGNMENT: &str = "assignment";

    // Imports
    pub const IMPORT_STATEMENT: &str = "import_statement";
    pub const IMPORT_FROM_STATEMENT: &str = "import_from_statement";
    pub const FUTURE_IMPORT_STATEMENT: &str = "future_import_statement";
    pub const DOTTED_NAME: &str = "dotted_name";
    pub const ALIASED_IMPORT: &str = "aliased_import";
    pub const RELATIVE_IMPORT: &str = "relative_import";
    pub const IMPORT_PREFIX: &str = "import_prefix";
    pub const WILDCARD_IMPORT: &str = "wildcard_import";

    // Python 2 statements the grammar still accepts
    pub const PRINT_STATEMENT: &str = "print_statement";
    pub const EXEC_STATEMENT: &str = "exec_statement";

    // Expressions
    pub const IDENTIFIER: &str = "identifier";
    pub const ATTRIBUTE: &str = "attribute";
}

/// Index of a node inside its `SyntaxTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Extract the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One named node of the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Grammar kind, e.g. `class_definition` or `identifier`
    pub kind: &'static str,
    /// Field this node occupies in its parent, e.g. `name` or `left`
    pub field: Option<&'static str>,
    /// 0-indexed line/column range
    pub range: Range,
    /// Byte offsets into the module text
    pub byte_range: ByteRange<usize>,
    /// Enclosing named node, `None` only for the root
    pub parent: Option<NodeId>,
    /// Named children in source order
    pub children: Vec<NodeId>,
}

/// What made the first malformed node malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Defect {
    /// Tokens the grammar could not place
    Unexpected,
    /// A token tree-sitter inserted, by kind
    Missing(&'static str),
    /// A Python 2 keyword statement called without parentheses
    LegacyStatement(&'static str),
}

/// Location and cause of the first malformed node found while annotating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Malformed {
    pub position: Position,
    pub defect: Defect,
}

impl Malformed {
    fn from_node(node: tree_sitter::Node<'_>) -> Option<Self> {
        let (point, defect) = if node.is_missing() {
            (node.start_position(), Defect::Missing(node.kind()))
        } else if node.is_error() {
            (error_point(node), Defect::Unexpected)
        } else {
            let keyword = match node.kind() {
                node_kinds::PRINT_STATEMENT => "print",
                node_kinds::EXEC_STATEMENT => "exec",
                _ => return None,
            };
            (node.start_position(), Defect::LegacyStatement(keyword))
        };
        Some(Self {
            position: Position::from(point),
            defect,
        })
    }
}

/// Where parsing broke inside an `ERROR` node: the end of its last token on
/// the line the node starts on.
///
/// An `ERROR` node often swallows the rest of the statement, so its start is
/// the beginning of the broken line and its end may be several lines later.
fn error_point(node: tree_sitter::Node<'_>) -> tree_sitter::Point {
    let row = node.start_position().row;
    let mut point = None;
    let mut cursor = node.walk();

    loop {
        let current = cursor.node();
        let on_row = current.start_position().row == row && current.end_position().row == row;
        if current.child_count() == 0 && on_row && current.end_byte() > current.start_byte() {
            point = Some(current.end_position());
        }
        if current.start_position().row <= row && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() || cursor.node() == node {
                return point.unwrap_or_else(|| node.start_position());
            }
        }
    }
}

/// Arena of named syntax nodes in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Copy every named node of `tree` into an arena in one pre-order walk.
    ///
    /// Stops at the first `ERROR` or `MISSING` node, or at a Python 2
    /// `print`/`exec` statement; no partial arena is returned in that case.
    pub(crate) fn annotate(tree: &tree_sitter::Tree) -> Result<Self, Malformed> {
        let mut nodes: Vec<SyntaxNode> = Vec::new();
        // One slot per cursor depth: the arena id of that ancestor, if named.
        let mut path: Vec<Option<NodeId>> = Vec::new();
        let mut cursor = tree.walk();

        loop {
            let node = cursor.node();
            if let Some(malformed) = Malformed::from_node(node) {
                return Err(malformed);
            }

            let entry = if node.is_named() {
                let id = NodeId(nodes.len());
                let parent = path.iter().rev().find_map(|slot| *slot);
                nodes.push(SyntaxNode {
                    kind: node.kind(),
                    field: cursor.field_name(),
                    range: Range::new(
                        Position::from(node.start_position()),
                        Position::from(node.end_position()),
                    ),
                    byte_range: node.byte_range(),
                    parent,
                    children: Vec::new(),
                });
                if let Some(parent) = parent {
                    nodes[parent.0].children.push(id);
                }
                Some(id)
            } else {
                None
            };

            if cursor.goto_first_child() {
                path.push(entry);
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(Self { nodes });
                }
                path.pop();
            }
        }
    }

    /// The root node, `module` for any successful parse.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of named nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    /// Look up a node by id, returning `None` for foreign ids.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0)
    }

    /// All nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Named children of `id` in source order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// First child of `id` stored under `field`.
    #[must_use]
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children_by_field(id, field).next()
    }

    /// Every child of `id` stored under `field`.
    pub fn children_by_field<'a>(
        &'a self,
        id: NodeId,
        field: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .filter(move |child| self.node(*child).field == Some(field))
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, |current| self.node(*current).parent)
    }

    /// Innermost node whose range contains `position`.
    ///
    /// Among containing nodes the one spanning the fewest lines wins, then the
    /// one with the smallest column span. Ties keep the first node in
    /// pre-order, so a parent beats a child with an identical range.
    #[must_use]
    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32, i64)> = None;
        for (id, node) in self.iter() {
            if !node.range.contains(position) {
                continue;
            }
            let lines = node.range.line_span();
            let columns = node.range.column_span();
            let better = match best {
                None => true,
                Some((_, best_lines, best_columns)) => {
                    lines < best_lines || (lines == best_lines && columns < best_columns)
                }
            };
            if better {
                best = Some((id, lines, columns));
            }
        }
        best.map(|(id, _, _)| id)
    }
}
