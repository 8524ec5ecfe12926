//! CLI for Courier
//!
//! Subcommands:
//! - `serve`: run the person edit HTTP server
//! - `send`: connect a sender and send text messages

use std::io::BufRead;
use std::sync::Arc;

use clap::Parser;
use courier::config::{SettingsResolver, load_config};
use courier::persistence::SledPersonStore;
use courier::person::PersonEditHandler;
use courier::sender::Sender;
use courier::utils::logging;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "courier")]
enum Command {
    /// Serve the person edit form over HTTP
    Serve,
    /// Send text messages to the broker of a profile
    Send {
        /// Sender profile to resolve (see `[profiles.<name>]` in config/default.toml)
        #[arg(long, default_value = "default")]
        profile: String,
        /// Messages to send; stdin lines are sent when none are given
        messages: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cmd = Command::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config.log.level);

    let result = match cmd {
        Command::Serve => run_server(config).await,
        Command::Send { profile, messages } => run_sender(config, &profile, messages).await,
    };

    if let Err(e) = result {
        error!("courier failed: {}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: courier::config::Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = SledPersonStore::open(&config.store.path)?;
    let handler = PersonEditHandler::new(Arc::new(store));

    tokio::select! {
        res = courier::web::serve(&config.server, handler) => {
            res?;
            error!("HTTP server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

async fn run_sender(
    config: courier::config::Settings,
    profile: &str,
    messages: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = SettingsResolver::new(config);
    let sender = Sender::connect(&resolver, profile).await?;

    let messages = if messages.is_empty() {
        std::io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?
    } else {
        messages
    };

    let total = messages.len();
    let mut sent = 0usize;
    for text in &messages {
        if sender.send(text).await.is_ok() {
            sent += 1;
        }
    }
    info!(sent, total, "done sending");

    sender.close().await;
    Ok(())
}
