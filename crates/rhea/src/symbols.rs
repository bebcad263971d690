//! Symbol extraction.
//!
//! Records classes, functions/methods and simple variable assignments, each
//! with the range of its name token and the dotted path of the declarations
//! enclosing it. Decorated and `async` definitions need no special casing:
//! tree-sitter nests them as ordinary `class_definition` /
//! `function_definition` nodes.

use crate::parser::ParsedModule;
use crate::syntax::node_kinds::{ASSIGNMENT, CLASS_DEFINITION, FUNCTION_DEFINITION, IDENTIFIER};
use crate::syntax::NodeId;
use crate::types::{Symbol, SymbolKind};

/// Extract the declared symbols of a module, in source order.
#[must_use]
pub fn document_symbols(module: &ParsedModule) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    let mut containers = Vec::new();
    extract_symbols_recursive(module, module.tree().root(), &mut containers, &mut symbols);
    symbols
}

fn extract_symbols_recursive(
    module: &ParsedModule,
    id: NodeId,
    containers: &mut Vec<String>,
    symbols: &mut Vec<Symbol>,
) {
    let tree = module.tree();
    let scope = match tree.node(id).kind {
        CLASS_DEFINITION => declare(module, id, SymbolKind::Class, containers, symbols),
        FUNCTION_DEFINITION => {
            let kind = if containers.is_empty() {
                SymbolKind::Function
            } else {
                SymbolKind::Method
            };
            declare(module, id, kind, containers, symbols)
        }
        ASSIGNMENT => {
            extract_variable(module, id, containers, symbols);
            None
        }
        _ => None,
    };

    if let Some(name) = &scope {
        containers.push(name.clone());
    }
    for child in tree.children(id) {
        extract_symbols_recursive(module, child, containers, symbols);
    }
    if scope.is_some() {
        containers.pop();
    }
}

/// Record a class or function and return the name it pushes as a container.
fn declare(
    module: &ParsedModule,
    id: NodeId,
    kind: SymbolKind,
    containers: &[String],
    symbols: &mut Vec<Symbol>,
) -> Option<String> {
    let name_node = module.tree().child_by_field(id, "name")?;
    let name = module.node_text(name_node).to_string();
    symbols.push(Symbol {
        name: name.clone(),
        kind,
        range: module.tree().node(name_node).range,
        container: container_path(containers),
    });
    Some(name)
}

/// `x = ...` with a bare name on the left and no annotation.
fn extract_variable(
    module: &ParsedModule,
    id: NodeId,
    containers: &[String],
    symbols: &mut Vec<Symbol>,
) {
    let tree = module.tree();
    if tree.child_by_field(id, "type").is_some() {
        return;
    }
    let Some(target) = tree.child_by_field(id, "left") else {
        return;
    };
    if tree.node(target).kind != IDENTIFIER {
        return;
    }
    symbols.push(Symbol {
        name: module.node_text(target).to_string(),
        kind: SymbolKind::Variable,
        range: tree.node(target).range,
        container: container_path(containers),
    });
}

fn container_path(containers: &[String]) -> Option<String> {
    (!containers.is_empty()).then(|| containers.join("."))
}
