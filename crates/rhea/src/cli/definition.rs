//! `rhea definition` command implementation.

use std::path::{Path, PathBuf};

use colored::Colorize;
use rhea::{Position, query};

use super::display::{location, print_json};
use super::{build_index, file_uri};

/// Run the definition command.
pub fn run(
    workspace: &Path,
    name: Option<&str>,
    at: Option<&str>,
    json: bool,
) -> Result<(), rhea::Error> {
    let index = build_index(workspace)?;

    let (label, locations) = match (name, at) {
        (_, Some(at)) => {
            let (file, position) = parse_position_arg(at)?;
            let uri = file_uri(&index, &file)?;
            (at.to_string(), query::definition_at(&index, &uri, position))
        }
        (Some(name), None) => (name.to_string(), query::find_definition(&index, name)),
        (None, None) => {
            return Err(rhea::Error::Config(
                "either a name or --at FILE:LINE:COL is required".to_string(),
            ));
        }
    };

    if json {
        return print_json(&locations);
    }

    if locations.is_empty() {
        println!("No definition found for \"{label}\"");
        return Ok(());
    }

    println!(
        "Found {} definitions for \"{}\":",
        locations.len().to_string().green().bold(),
        label.cyan()
    );
    println!();
    for loc in &locations {
        println!("  {} {}", "•".dimmed(), location(&index, &loc.uri, &loc.range));
    }

    Ok(())
}

/// Parse `FILE:LINE:COL` (1-indexed) into a path and a 0-indexed position.
fn parse_position_arg(arg: &str) -> Result<(PathBuf, Position), rhea::Error> {
    let invalid = || rhea::Error::Config(format!("expected FILE:LINE:COL, got '{arg}'"));

    let mut parts = arg.rsplitn(3, ':');
    let column = parts.next().and_then(|c| c.parse::<u32>().ok()).ok_or_else(invalid)?;
    let line = parts.next().and_then(|l| l.parse::<u32>().ok()).ok_or_else(invalid)?;
    let file = parts.next().filter(|f| !f.is_empty()).ok_or_else(invalid)?;

    if line == 0 || column == 0 {
        return Err(rhea::Error::Config(format!(
            "line and column are 1-indexed, got '{arg}'"
        )));
    }

    Ok((PathBuf::from(file), Position::new(line - 1, column - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_indexed_position() {
        let (file, position) = parse_position_arg("pkg/mod.py:3:7").expect("should parse");
        assert_eq!(file, PathBuf::from("pkg/mod.py"));
        assert_eq!(position, Position::new(2, 6));
    }

    #[test]
    fn rejects_malformed_positions() {
        for arg in ["mod.py", "mod.py:3", ":3:4", "mod.py:x:1", "mod.py:0:1"] {
            assert!(
                parse_position_arg(arg).is_err(),
                "{arg} should be rejected"
            );
        }
    }
}
