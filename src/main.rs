mod channels;
mod client_listener;
mod client_sender;
mod commands;
mod context;
mod error;
mod framing;
mod handlers;
mod message_handler;
mod receiver;
mod replies;
mod result;
mod sessions;
mod settings;
mod tokenizer;

use anyhow::{bail, Context};
use tokio::{net::TcpListener, sync::mpsc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{context::ServerContext, settings::Settings};

const DEFAULT_CONFIG: &str = "Settings";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        bail!("Usage: {} <nodeID> [config]", args[0]);
    }

    let node_id: u64 = args[1]
        .parse()
        .with_context(|| format!("Invalid NodeID {}", args[1]))?;
    let config_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG);

    let settings = Settings::new(config_path)
        .with_context(|| format!("Unable to load settings from {}", config_path))?;
    let port = settings.irc_port(node_id)?;

    let listener = TcpListener::bind((settings.host.as_str(), port))
        .await
        .with_context(|| format!("Unable to bind {}:{}", settings.host, port))?;

    info!("I am node {} and I listen on port {} for new users", node_id, port);

    let (event_sender, mut event_receiver) = mpsc::channel(settings.reply_queue_len);
    let (shutdown_sender, shutdown_receiver) = mpsc::channel(1);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_sender.send(()).await;
            }
            Err(e) => error!(error = %e, "Unable to listen for shutdown signal"),
        }
    });

    tokio::spawn(client_listener::accept_connections(
        listener,
        event_sender,
        settings.reply_queue_len,
    ));

    let ctx = ServerContext::new(&settings);
    if let Err(e) = message_handler::run(ctx, &mut event_receiver, shutdown_receiver).await {
        error!(error = %e, "Server stopped");
        return Err(e.into());
    }

    info!("Server shut down");

    Ok(())
}
