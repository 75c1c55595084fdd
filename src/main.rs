mod cli;
mod client;
mod config;
mod dto;
mod proxy;
mod server;
mod summary;
mod transcript;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = AppConfig::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            server::run_server(config).await?;
        }
        Commands::Proxy {
            host,
            port,
            upstream,
        } => {
            proxy::run_proxy(&host, port, upstream).await?;
        }
        Commands::Transcribe {
            video_url,
            server_url,
        } => {
            client::run_transcribe(&server_url, &video_url).await?;
        }
        Commands::Summarize {
            url,
            text,
            language,
            max_length,
            server_url,
        } => {
            client::run_summarize(&server_url, url, text, &language, max_length).await?;
        }
    }

    Ok(())
}
