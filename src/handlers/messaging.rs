//! PRIVMSG handling. Only CTCP VERSION queries get a reply.

use tracing::debug;

use crate::error::{ProtocolError, TransportError};
use crate::network::Session;
use crate::proto::{Command, RawLine};

/// Version string sent in reply to CTCP VERSION.
pub(super) fn version_string() -> String {
    format!("NotifyBot v{}", env!("CARGO_PKG_VERSION"))
}

/// Answer `PRIVMSG <me> :\x01VERSION\x01` with a NOTICE to the sender.
pub(super) async fn version_query(
    line: &RawLine<'_>,
    session: &Session,
) -> Result<(), TransportError> {
    if !line.field(3).is_some_and(|payload| payload.contains("VERSION")) {
        return Ok(());
    }

    let Some(sender) = line.origin_nick() else {
        debug!(
            error = %ProtocolError::MissingPrefix { command: "PRIVMSG" },
            line = %line.text(),
            "Ignoring version query"
        );
        return Ok(());
    };

    debug!(from = %sender, "Answering version query");
    session
        .sender()
        .send_command(Command::NOTICE(sender.to_string(), version_string()))
        .await
}
