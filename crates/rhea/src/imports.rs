//! Import extraction.
//!
//! Produces one `ImportEdge` per imported name. Relative imports keep their
//! leading dots in `target_module`, so `from ..pkg import x` has target
//! `..pkg` and imported name `..pkg.x`. Imports inside functions and
//! conditional blocks are found as well.

use crate::parser::ParsedModule;
use crate::syntax::NodeId;
use crate::syntax::node_kinds::{
    ALIASED_IMPORT, DOTTED_NAME, FUTURE_IMPORT_STATEMENT, IDENTIFIER, IMPORT_FROM_STATEMENT,
    IMPORT_PREFIX, IMPORT_STATEMENT, RELATIVE_IMPORT, WILDCARD_IMPORT,
};
use crate::types::ImportEdge;

/// Extract the import edges of a module, in source order.
#[must_use]
pub fn import_edges(module: &ParsedModule) -> Vec<ImportEdge> {
    let mut edges = Vec::new();
    for (id, node) in module.tree().iter() {
        match node.kind {
            IMPORT_STATEMENT => extract_import(module, id, &mut edges),
            IMPORT_FROM_STATEMENT => extract_from_import(module, id, &mut edges),
            FUTURE_IMPORT_STATEMENT => {
                let names = imported_names(module, id);
                push_from_edges(module, id, "__future__", names, &mut edges);
            }
            _ => {}
        }
    }
    edges
}

/// A name in an import list with its optional alias.
struct ImportedName {
    name: String,
    alias: Option<String>,
}

/// `import a.b.c [as x], d`
fn extract_import(module: &ParsedModule, id: NodeId, edges: &mut Vec<ImportEdge>) {
    for ImportedName { name, alias } in imported_names(module, id) {
        edges.push(ImportEdge {
            source_module_uri: module.uri().to_string(),
            imported_name: name.clone(),
            target_module: name,
            range: module.tree().node(id).range,
            alias,
            is_wildcard: false,
            is_relative: false,
        });
    }
}

/// `from M import n [as x]` and `from M import *`
fn extract_from_import(module: &ParsedModule, id: NodeId, edges: &mut Vec<ImportEdge>) {
    let tree = module.tree();
    let Some(module_node) = tree.child_by_field(id, "module_name") else {
        return;
    };
    let source = written_module(module, module_node);

    let wildcard = tree
        .children(id)
        .any(|child| tree.node(child).kind == WILDCARD_IMPORT);
    if wildcard {
        edges.push(ImportEdge {
            source_module_uri: module.uri().to_string(),
            imported_name: source.clone(),
            target_module: source.clone(),
            range: tree.node(id).range,
            alias: None,
            is_wildcard: true,
            is_relative: source.starts_with('.'),
        });
        return;
    }

    let names = imported_names(module, id);
    push_from_edges(module, id, &source, names, edges);
}

fn push_from_edges(
    module: &ParsedModule,
    id: NodeId,
    source: &str,
    names: Vec<ImportedName>,
    edges: &mut Vec<ImportEdge>,
) {
    let is_relative = source.starts_with('.');
    // `from . import x` has no module after the dots; the dots prefix the name.
    let dots_only = !source.is_empty() && source.chars().all(|c| c == '.');

    for ImportedName { name, alias } in names {
        let (imported_name, target_module) = if dots_only {
            let full = format!("{source}{name}");
            (full.clone(), full)
        } else {
            (format!("{source}.{name}"), source.to_string())
        };
        edges.push(ImportEdge {
            source_module_uri: module.uri().to_string(),
            imported_name,
            target_module,
            range: module.tree().node(id).range,
            alias,
            is_wildcard: false,
            is_relative,
        });
    }
}

/// Every `name` field of an import statement, unwrapping `aliased_import`.
fn imported_names(module: &ParsedModule, id: NodeId) -> Vec<ImportedName> {
    let tree = module.tree();
    tree.children_by_field(id, "name")
        .filter_map(|child| match tree.node(child).kind {
            DOTTED_NAME => Some(ImportedName {
                name: dotted_name(module, child),
                alias: None,
            }),
            ALIASED_IMPORT => {
                let name = tree.child_by_field(child, "name")?;
                let alias = tree.child_by_field(child, "alias");
                Some(ImportedName {
                    name: dotted_name(module, name),
                    alias: alias.map(|a| module.node_text(a).to_string()),
                })
            }
            _ => None,
        })
        .collect()
}

/// Module written after `from`, with relative dots kept verbatim.
fn written_module(module: &ParsedModule, id: NodeId) -> String {
    let tree = module.tree();
    match tree.node(id).kind {
        RELATIVE_IMPORT => {
            let mut written = String::new();
            for child in tree.children(id) {
                match tree.node(child).kind {
                    IMPORT_PREFIX => {
                        let dots = module.node_text(child).matches('.').count();
                        written.push_str(&".".repeat(dots));
                    }
                    DOTTED_NAME => written.push_str(&dotted_name(module, child)),
                    _ => {}
                }
            }
            written
        }
        _ => dotted_name(module, id),
    }
}

/// `a.b.c` from its identifier parts, ignoring any whitespace between them.
fn dotted_name(module: &ParsedModule, id: NodeId) -> String {
    let tree = module.tree();
    let parts: Vec<&str> = tree
        .children(id)
        .filter(|child| tree.node(*child).kind == IDENTIFIER)
        .map(|child| module.node_text(child))
        .collect();
    if parts.is_empty() {
        module.node_text(id).to_string()
    } else {
        parts.join(".")
    }
}
