//! Common display utilities for CLI commands.

use std::path::Path;

use colored::Colorize;
use rhea::{Position, ProjectIndex, Range};
use serde::Serialize;

/// Items listed before truncating with "... and N more".
pub const MAX_DISPLAY_ITEMS: usize = 10;

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> rhea::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}

/// Path of a URI relative to the project root, for display.
///
/// Falls back to the URI itself when it doesn't name a file under the root.
pub fn display_uri(index: &ProjectIndex, uri: &str) -> String {
    rhea::uri_to_path(uri)
        .ok()
        .and_then(|path| {
            path.strip_prefix(index.root())
                .ok()
                .map(|rel| rel.display().to_string())
        })
        .unwrap_or_else(|| uri.to_string())
}

/// `path:line:col` with 1-indexed line and column, as editors expect.
pub fn location(index: &ProjectIndex, uri: &str, range: &Range) -> String {
    format!("{}:{}", display_uri(index, uri), position(range.start))
}

fn position(position: Position) -> String {
    format!("{}:{}", position.line + 1, position.column + 1)
}

/// Print a bulleted list of strings, truncated after `MAX_DISPLAY_ITEMS`.
pub fn print_list(items: &[String], empty_message: &str) {
    if items.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for item in items.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {}", "•".dimmed(), item);
    }

    if items.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            items.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Paths of a set of URIs relative to the root.
pub fn display_uris(index: &ProjectIndex, uris: &[String]) -> Vec<String> {
    uris.iter().map(|uri| display_uri(index, uri)).collect()
}

/// Hint shown when a file argument isn't part of the index.
pub fn print_not_indexed(file: &Path) {
    println!(
        "{} is not indexed (ignored, not a Python file, or has syntax errors)",
        file.display().to_string().yellow()
    );
    println!(
        "\n{}: Run '{}' to see files that failed to parse.",
        "hint".dimmed(),
        "rhea index".cyan()
    );
}
