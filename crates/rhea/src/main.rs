//! Rhea CLI - Python code intelligence from the command line.
//!
//! Every command indexes the project in memory first, then answers from the
//! fresh index. Nothing is written to disk.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Rhea: In-memory Python code intelligence.
#[derive(Parser)]
#[command(name = "rhea")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the project and report statistics
    Index,

    /// Show the symbol outline of a file
    Symbols {
        /// Python file, relative to the project root or absolute
        file: PathBuf,
    },

    /// Find where a name is defined
    Definition {
        /// Bare or qualified name, such as run or Task.run
        #[arg(required_unless_present = "at", conflicts_with = "at")]
        name: Option<String>,

        /// Resolve the name at a position instead (FILE:LINE:COL, 1-indexed)
        #[arg(long, value_name = "FILE:LINE:COL")]
        at: Option<String>,
    },

    /// Find every occurrence of a name
    References {
        /// Identifier to search for
        name: String,
    },

    /// Show what a file imports and which files import it
    Imports {
        /// Python file, relative to the project root or absolute
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Determine project root
    let workspace = match cli.workspace {
        Some(w) => w,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!(
                    "{}: failed to get current directory: {e}",
                    "error".red().bold()
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let result = match cli.command {
        Commands::Index => cli::index::run(&workspace, cli.json),
        Commands::Symbols { file } => cli::symbols::run(&workspace, &file, cli.json),
        Commands::Definition { name, at } => {
            cli::definition::run(&workspace, name.as_deref(), at.as_deref(), cli.json)
        }
        Commands::References { name } => cli::references::run(&workspace, &name, cli.json),
        Commands::Imports { file } => cli::imports::run(&workspace, &file, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
