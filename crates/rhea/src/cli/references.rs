//! `rhea references` command implementation.

use std::path::Path;

use colored::Colorize;
use rhea::query;

use super::build_index;
use super::display::{display_uri, location, print_json};

/// Run the references command.
pub fn run(workspace: &Path, name: &str, json: bool) -> Result<(), rhea::Error> {
    let index = build_index(workspace)?;
    let references = query::find_references(&index, name);

    if json {
        return print_json(&references);
    }

    if references.is_empty() {
        println!("No references to \"{name}\"");
        return Ok(());
    }

    println!(
        "Found {} references to \"{}\":",
        references.len().to_string().green().bold(),
        name.cyan()
    );
    println!();

    let mut current_uri: Option<&str> = None;
    for reference in &references {
        if current_uri != Some(reference.uri.as_str()) {
            current_uri = Some(reference.uri.as_str());
            println!("  {}:", display_uri(&index, &reference.uri).white().bold());
        }
        println!(
            "    {} {}",
            "•".dimmed(),
            location(&index, &reference.uri, &reference.range).dimmed()
        );
    }

    Ok(())
}
