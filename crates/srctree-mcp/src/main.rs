use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use srctree_mcp::{scan_directory, serve, SrcTreeServer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the JSON tree of this directory to stdout instead of serving
    /// MCP over stdio.
    directory: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the MCP protocol (or the JSON tree
    // in local mode).
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.directory {
        Some(directory) => {
            println!("{}", scan_directory(&directory));
            Ok(())
        }
        None => {
            tracing::info!("Starting srctree MCP server");
            serve(SrcTreeServer::new()).await
        }
    }
}
