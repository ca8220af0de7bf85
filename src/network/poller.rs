//! Presence poller.
//!
//! Asks the server which peers are online with `ISON`, once per interval,
//! for as long as the owning session lives. Replies come back through the
//! session read loop.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{Instrument, debug};

use super::transport::LineSender;
use crate::proto::Command;
use crate::telemetry::spans;

/// Spawn the poller. The first query goes out immediately.
///
/// The task ends on its own once the session writer is gone; the session
/// also aborts it on teardown.
pub fn spawn_presence_poller(
    sender: LineSender,
    peers: Vec<String>,
    interval: Duration,
) -> JoinHandle<()> {
    let span = spans::poller(peers.len());
    tokio::spawn(
        async move {
            loop {
                if let Err(e) = sender.send_command(Command::ISON(peers.clone())).await {
                    debug!(error = %e, "Session closed, stopping poller");
                    break;
                }
                tokio::time::sleep(interval).await;
            }
        }
        .instrument(span),
    )
}
