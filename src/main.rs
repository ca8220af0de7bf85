//! notifybot - IRC presence notification bot
//!
//! Keeps a session with one IRC server, polls the presence of a set of
//! nicknames with ISON and emails a notification whenever one of them comes
//! online or goes offline.

mod config;
mod error;
mod handlers;
mod network;
mod notify;
mod proto;
mod state;
mod telemetry;

use crate::config::{Config, validate};
use crate::handlers::Dispatcher;
use crate::network::{Supervisor, TcpConnector};
use crate::state::PresenceTable;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    // Load configuration: a TOML file if given, the environment otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None => Config::from_env().map_err(|e| {
            error!(error = %e, "Failed to read config from environment");
            e
        })?,
    };

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    let address = config.server.address();
    let poll_interval = config.bot.poll_interval();
    let presence = PresenceTable::new(&config.bot.peers);

    info!(
        server = %address,
        nick = %config.bot.nick,
        peers = presence.len(),
        poll_interval = ?poll_interval,
        version = env!("CARGO_PKG_VERSION"),
        "Starting notifybot"
    );

    let (notifier, envelope) = notify::build(config.notify.as_ref());
    let dispatcher = Dispatcher::new(
        presence,
        notifier,
        envelope,
        config.bot.channels.clone(),
        poll_interval,
    );
    let mut supervisor = Supervisor::new(TcpConnector, address, config.bot.nick.clone(), dispatcher);

    tokio::select! {
        _ = supervisor.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutting down");
        }
    }

    Ok(())
}
