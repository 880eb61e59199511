// src/main.rs — kotoba entry point

use std::sync::Arc;

use clap::Parser;

use kotoba::api::{self, ApiState};
use kotoba::cli::{Cli, Commands};
use kotoba::infra::config::Config;
use kotoba::infra::logger;
use kotoba::provider::google::GoogleProvider;
use kotoba::provider::ModelProvider;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn gateway_provider(config: &Config) -> anyhow::Result<Arc<dyn ModelProvider>> {
    Ok(Arc::new(GoogleProvider::new(config.api_key()?)))
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        // Session management needs no provider
        Some(Commands::Sessions { action }) => kotoba::cli::sessions::run_sessions(action, &config),

        Some(Commands::Serve { port }) => {
            let mut server_config = config.server.clone();
            if let Some(port) = port {
                server_config.port = port;
            }
            let state = ApiState {
                provider: gateway_provider(&config)?,
                model: config.gateway.model.clone(),
            };
            api::start_server(&server_config, state).await
        }

        Some(Commands::Chat { session }) => {
            let provider = gateway_provider(&config)?;
            kotoba::cli::chat::run_chat(provider, &config, session.as_deref()).await
        }

        None => {
            let provider = gateway_provider(&config)?;
            kotoba::cli::chat::run_chat(provider, &config, None).await
        }
    }
}
