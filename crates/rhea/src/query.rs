//! Read-only queries over the project index.
//!
//! Each query takes one read lock for its whole run, so its answer reflects a
//! single consistent index state. Unknown URIs and names give empty results,
//! never errors.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::index::{IndexReader, ProjectIndex};
use crate::parser::ParsedModule;
use crate::position::{Position, Range};
use crate::syntax::NodeId;
use crate::syntax::node_kinds::{ATTRIBUTE, IDENTIFIER};
use crate::types::{Definition, Symbol};
use crate::uri::uri_to_path;

/// A range in a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Module URI
    pub uri: String,
    /// Range within the module
    pub range: Range,
}

impl From<&Definition> for Location {
    fn from(definition: &Definition) -> Self {
        Self {
            uri: definition.uri.clone(),
            range: definition.symbol.range,
        }
    }
}

/// An occurrence of a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Module URI
    pub uri: String,
    /// Range of the identifier
    pub range: Range,
    /// Source text at the range
    pub text: String,
}

/// Imports of one module and the modules that import it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportGraph {
    /// Target modules of the module's own imports, sorted
    pub imports: Vec<String>,
    /// URIs of other modules importing this one, sorted and de-duplicated
    pub dependents: Vec<String>,
}

/// Outline of a module: its symbols in source order.
#[must_use]
pub fn document_symbols(index: &ProjectIndex, uri: &str) -> Vec<Symbol> {
    index.symbols(uri)
}

/// Definitions registered under a bare name (`run`) or qualified name
/// (`Task.run`).
#[must_use]
pub fn find_definition(index: &ProjectIndex, name: &str) -> Vec<Location> {
    index
        .read()
        .definitions(name)
        .iter()
        .map(Location::from)
        .collect()
}

/// Resolve the name under `position` in `uri` to its definitions.
///
/// The name is the identifier at the position; on an attribute access the
/// attribute name is used. For `Owner.name` the qualified key is tried
/// before the bare name. Resolution is textual: no scopes or types.
#[must_use]
pub fn definition_at(index: &ProjectIndex, uri: &str, position: Position) -> Vec<Location> {
    let reader = index.read();
    let Some(module) = reader.module(uri) else {
        return Vec::new();
    };
    let Some(name_node) = name_at(module, position) else {
        return Vec::new();
    };
    let name = module.node_text(name_node);

    if let Some(owner) = attribute_owner(module, name_node) {
        let qualified = format!("{owner}.{name}");
        let found = locations(&reader, &qualified);
        if !found.is_empty() {
            return found;
        }
    }
    locations(&reader, name)
}

/// Every identifier whose text is `name`, across all indexed modules.
///
/// Covers uses, definitions, attribute names, parameters and names inside
/// import statements. Sorted by URI, then position.
#[must_use]
pub fn find_references(index: &ProjectIndex, name: &str) -> Vec<Reference> {
    let reader = index.read();
    let mut references = Vec::new();
    for uri in reader.uris() {
        let Some(module) = reader.module(uri) else {
            continue;
        };
        for (id, node) in module.tree().iter() {
            if node.kind == IDENTIFIER && module.node_text(id) == name {
                references.push(Reference {
                    uri: uri.to_string(),
                    range: node.range,
                    text: module.node_text(id).to_string(),
                });
            }
        }
    }
    references.sort_by(|a, b| {
        a.uri
            .cmp(&b.uri)
            .then_with(|| a.range.start.cmp(&b.range.start))
    });
    references
}

/// Imports of `uri` and the modules that depend on it.
///
/// A module depends on `uri` when one of its imported names contains the
/// dotted module name of `uri`. This is a textual match; relative imports
/// are not resolved.
#[must_use]
pub fn import_graph(index: &ProjectIndex, uri: &str) -> ImportGraph {
    let reader = index.read();

    let mut imports: Vec<String> = reader
        .imports(uri)
        .iter()
        .map(|edge| edge.target_module.clone())
        .collect();
    imports.sort();

    let mut dependents = BTreeSet::new();
    if let Some(module_name) = module_name_for_uri(index.root(), uri).filter(|n| !n.is_empty()) {
        for other in reader.uris() {
            if other == uri {
                continue;
            }
            let depends = reader
                .imports(other)
                .iter()
                .any(|edge| edge.imported_name.contains(module_name.as_str()));
            if depends {
                dependents.insert(other.to_string());
            }
        }
    }

    ImportGraph {
        imports,
        dependents: dependents.into_iter().collect(),
    }
}

/// Dotted module name of a file URI relative to the project root.
///
/// `pkg/sub/mod.py` is `pkg.sub.mod` and `pkg/__init__.py` is `pkg`. A file
/// outside the root is named by its file stem. Returns `None` for URIs that
/// don't name a file.
#[must_use]
pub fn module_name_for_uri(root: &Path, uri: &str) -> Option<String> {
    let path = uri_to_path(uri).ok()?;
    let Ok(relative) = path.strip_prefix(root) else {
        return path.file_stem().map(|s| s.to_string_lossy().into_owned());
    };

    let mut parts: Vec<String> = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.last().is_some_and(|last| last == "__init__") {
        parts.pop();
    }
    Some(parts.join("."))
}

fn locations(reader: &IndexReader<'_>, name: &str) -> Vec<Location> {
    reader.definitions(name).iter().map(Location::from).collect()
}

/// Identifier at `position`, looking through an `attribute` node to its name.
fn name_at(module: &ParsedModule, position: Position) -> Option<NodeId> {
    let tree = module.tree();
    let id = module.node_at(position)?;
    match tree.node(id).kind {
        IDENTIFIER => Some(id),
        ATTRIBUTE => tree.child_by_field(id, "attribute"),
        _ => None,
    }
}

/// For the `b` in `a.b`, the text of `a` with whitespace removed.
fn attribute_owner(module: &ParsedModule, name_node: NodeId) -> Option<String> {
    let tree = module.tree();
    let node = tree.node(name_node);
    if node.field != Some("attribute") {
        return None;
    }
    let parent = node.parent?;
    if tree.node(parent).kind != ATTRIBUTE {
        return None;
    }
    let object = tree.child_by_field(parent, "object")?;
    Some(module.node_text(object).split_whitespace().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn module_names_from_paths() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path();
        let uri = |rel: &str| crate::uri::path_to_uri(&root.join(rel));

        assert_eq!(
            module_name_for_uri(root, &uri("pkg/sub/mod.py")).as_deref(),
            Some("pkg.sub.mod")
        );
        assert_eq!(
            module_name_for_uri(root, &uri("pkg/__init__.py")).as_deref(),
            Some("pkg")
        );
        assert_eq!(
            module_name_for_uri(root, &uri("top.py")).as_deref(),
            Some("top")
        );
        assert_eq!(
            module_name_for_uri(root, "file:///elsewhere/tool.py").as_deref(),
            Some("tool")
        );
        assert_eq!(module_name_for_uri(root, "untitled:1"), None);
    }

    #[test]
    fn attribute_owner_and_name() {
        let module = crate::parser::parse_module("value = Config.load(x)\n", "file:///q.py")
            .expect("source should parse");

        let name = name_at(&module, Position::new(0, 16)).expect("position is on `load`");
        assert_eq!(module.node_text(name), "load");
        assert_eq!(attribute_owner(&module, name).as_deref(), Some("Config"));

        let dot = name_at(&module, Position::new(0, 14)).expect("position is on the dot");
        assert_eq!(module.node_text(dot), "load");

        let plain = name_at(&module, Position::new(0, 20)).expect("position is on `x`");
        assert_eq!(attribute_owner(&module, plain), None);
    }
}
