//! Rhea MCP server binary.
//!
//! This binary indexes one Python project and serves it over stdio.

use std::path::PathBuf;

use clap::Parser;
use rhea_mcp::RheaMcpServer;
use rhea_mcp::context::Context;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

/// MCP server for Python code intelligence.
#[derive(Parser)]
#[command(name = "rhea-mcp", version, about)]
struct Cli {
    /// Project root to index (defaults to the current directory)
    #[arg(long, short = 'r')]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    tracing::info!(root = %root.display(), "Starting rhea-mcp server");

    let context = Context::start(&root)?;
    let service = RheaMcpServer::new(context).serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
