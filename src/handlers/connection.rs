//! Connection-level handlers: PING, nickname collision, the ready notice and
//! server ERROR.

use std::time::Duration;

use tracing::{info, warn};

use super::Flow;
use crate::error::TransportError;
use crate::network::{Session, spawn_presence_poller};
use crate::proto::{Command, RawLine};

/// `PING <token>` -> `PONG <token>`, token echoed verbatim.
pub(super) async fn ping(line: &RawLine<'_>, session: &Session) -> Result<(), TransportError> {
    let token = line.fields_from(1).join(" ");
    session.sender().send_command(Command::PONG(token)).await
}

/// ERR_NICKNAMEINUSE: decorate the identity and announce it again.
pub(super) async fn nick_in_use(session: &mut Session) -> Result<(), TransportError> {
    let taken = session.identity().to_string();
    session.decorate_identity().await?;
    warn!(taken = %taken, retry = %session.identity(), "Nickname in use");
    Ok(())
}

/// `ERROR :<reason>` from the server ends the session.
pub(super) fn server_error(line: &RawLine<'_>) -> Flow {
    let reason = line.fields_from(1).join(" ");
    let reason = reason.strip_prefix(':').unwrap_or(&reason).to_string();
    warn!(reason = %reason, "Server closed the link");
    Flow::Disconnect(reason)
}

/// Whether `text` carries the connection-ready notice for `identity`.
pub(super) fn is_ready_notice(text: &str, identity: &str) -> bool {
    text.contains(&format!("NOTICE {} :on", identity))
}

/// First ready notice of a session: join channels and start polling.
/// Later notices are ignored.
pub(super) async fn on_ready(
    session: &mut Session,
    channels: &[String],
    peers: Vec<String>,
    interval: Duration,
) -> Result<(), TransportError> {
    if !session.mark_ready() {
        return Ok(());
    }

    // An empty first entry means "no channels".
    if channels.first().is_some_and(|c| !c.is_empty()) {
        for channel in channels.iter().filter(|c| !c.trim().is_empty()) {
            session
                .sender()
                .send_command(Command::JOIN(channel.trim().to_string()))
                .await?;
        }
    }

    info!(
        attempt = session.attempt(),
        nick = %session.identity(),
        channels = channels.iter().filter(|c| !c.is_empty()).count(),
        peers = peers.len(),
        interval = ?interval,
        "Session ready, starting presence poller"
    );
    let poller = spawn_presence_poller(session.sender().clone(), peers, interval);
    session.attach_poller(poller);
    Ok(())
}
