//! Interactive Draw - MCP Server Entry Point
//!
//! Serves the drawing tools over stdio and launches the display window on demand.

use std::sync::Arc;

use clap::Parser;
use interactive_draw::{
    cli::ServerCli,
    config::Config,
    launcher::ProcessLauncher,
    logging,
    mcp::McpServer,
    service::DrawService,
    store::FileGridStore,
    tools::ToolRegistry,
};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() {
    // Exits with usage on --help or unexpected arguments.
    ServerCli::parse();

    if let Err(e) = run().await {
        if tracing::dispatcher::has_been_set() {
            tracing::error!("Error running MCP server: {:?}", e);
        } else {
            // Failed before logging was installed.
            eprintln!("Error running MCP server: {:?}", e);
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_file, logging::Console::Stderr)?;

    info!("Starting Interactive Drawing MCP server...");
    info!(
        grid_size = config.grid_size,
        "Grid state at {}",
        config.state_file.display()
    );

    let store = Arc::new(FileGridStore::new(
        config.state_file.clone(),
        config.grid_size,
    ));
    let launcher = ProcessLauncher::from_config(&config);
    let service = DrawService::new(store, Box::new(launcher));
    let mut server = McpServer::new(ToolRegistry::drawing(), service);

    info!("Running MCP server...");
    server
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    Ok(())
}
