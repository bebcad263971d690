//! `rhea imports` command implementation.

use std::path::Path;

use colored::Colorize;
use rhea::query;

use super::display::{display_uris, print_json, print_list, print_not_indexed};
use super::{build_index, file_uri};

/// Run the imports command.
pub fn run(workspace: &Path, file: &Path, json: bool) -> Result<(), rhea::Error> {
    let index = build_index(workspace)?;
    let uri = file_uri(&index, file)?;

    let graph = query::import_graph(&index, &uri);
    if json {
        return print_json(&graph);
    }

    if index.module(&uri).is_none() {
        print_not_indexed(file);
        return Ok(());
    }

    let module = query::module_name_for_uri(index.root(), &uri).unwrap_or_default();
    println!("{} {}", "Module".cyan().bold(), module.white().bold());
    println!();

    println!("  {} ({}):", "Imports".green(), graph.imports.len());
    print_list(&graph.imports, "(no imports)");
    println!();

    println!("  {} ({}):", "Imported by".green(), graph.dependents.len());
    print_list(&display_uris(&index, &graph.dependents), "(no dependents)");

    Ok(())
}
