use clap::Parser;
use log::{error, info};

use lmstudio_bridge::config::CliArgs;
use lmstudio_bridge::{InferenceBridge, McpServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   let args = CliArgs::parse();

    // stdout carries the protocol; diagnostics go to stderr
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or(&args.log_level)
    )
      .target(env_logger::Target::Stderr)
      .init();

    let config = args.bridge_config().map_err(|e| {
      error!("{}", e);
      e
    })?;
    info!("Starting LM Studio Bridge MCP Server against {}", config.api_base);

    let bridge = InferenceBridge::new(config)?;
    let server = McpServer::new(bridge, args.server_info());
    server.serve_stdio().await?;

    info!("LM Studio Bridge stopped");
    Ok(())
}
