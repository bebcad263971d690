//! `rhea symbols` command implementation.

use std::path::Path;

use colored::Colorize;
use rhea::query;

use super::display::{print_json, print_not_indexed};
use super::{build_index, file_uri};

/// Run the symbols command.
pub fn run(workspace: &Path, file: &Path, json: bool) -> Result<(), rhea::Error> {
    let index = build_index(workspace)?;
    let uri = file_uri(&index, file)?;

    let symbols = query::document_symbols(&index, &uri);
    if json {
        return print_json(&symbols);
    }

    if symbols.is_empty() {
        if index.module(&uri).is_none() {
            print_not_indexed(file);
        } else {
            println!("No symbols in {}", file.display());
        }
        return Ok(());
    }

    println!(
        "{} symbols in {}:",
        symbols.len().to_string().green().bold(),
        file.display().to_string().cyan()
    );
    println!();

    for sym in &symbols {
        let depth = sym.container.as_deref().map_or(0, |c| c.split('.').count());
        println!(
            "  {}{} {} {}",
            "  ".repeat(depth),
            sym.name.white().bold(),
            format!("({})", sym.kind).dimmed(),
            format!("- line {}", sym.range.start.line + 1).dimmed()
        );
    }

    Ok(())
}
