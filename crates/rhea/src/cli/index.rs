//! `rhea index` command implementation.

use std::path::Path;
use std::time::Instant;

use colored::Colorize;
use rhea::ProjectIndex;

use super::display::print_json;

/// Number of failed files listed before truncating.
const MAX_ERRORS_SHOWN: usize = 5;

/// Run the index command.
pub fn run(workspace: &Path, json: bool) -> Result<(), rhea::Error> {
    let index = ProjectIndex::open(workspace)?;

    if !json {
        println!("{} {}...", "Indexing".cyan().bold(), index.root().display());
    }

    let start = Instant::now();
    let stats = index.build();
    let duration = start.elapsed();

    if json {
        return print_json(&stats);
    }

    println!();
    println!(
        "{} {} files",
        "Indexed".green().bold(),
        stats.files_indexed
    );
    println!("{}: {:.2?}", "Duration".dimmed(), duration);

    if !stats.errors.is_empty() {
        println!();
        println!("{} ({}):", "Errors".red().bold(), stats.parse_errors);
        for err in stats.errors.iter().take(MAX_ERRORS_SHOWN) {
            let path = err.path.strip_prefix(index.root()).unwrap_or(&err.path);
            println!(
                "  {} {}: {} {}",
                "•".red(),
                path.display(),
                err.message,
                format!("({})", err.kind).dimmed()
            );
        }
        if stats.errors.len() > MAX_ERRORS_SHOWN {
            println!("  ... and {} more", stats.errors.len() - MAX_ERRORS_SHOWN);
        }
    }

    Ok(())
}
