//! Protocol dispatcher.
//!
//! Every received line goes through [`Dispatcher::handle`], which classifies
//! it and runs the matching handler. Classification is by field position:
//!
//! | Shape                               | Handler                    |
//! |-------------------------------------|----------------------------|
//! | `PING <token>`                      | [`connection::ping`]       |
//! | `ERROR :<reason>`                   | [`connection::server_error`] |
//! | `<origin> 303 <me> :<nicks>`        | [`presence::ison_reply`]   |
//! | `<origin> 433 ...`                  | [`connection::nick_in_use`] |
//! | `<origin> PRIVMSG <me> :\x01VERSION\x01` | [`messaging::version_query`] |
//!
//! The ready notice (`NOTICE <me> :on...`) is matched on every line,
//! independently of the table above.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::TransportError;
use crate::network::Session;
use crate::notify::{Envelope, Notifier};
use crate::proto::{ERR_NICKNAMEINUSE, RPL_ISON, RawLine};
use crate::state::PresenceTable;

mod connection;
mod messaging;
mod presence;

/// What the read loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The server announced it is closing the link.
    Disconnect(String),
}

/// Routes received lines to handlers. Owns the presence table, which
/// outlives any single session.
pub struct Dispatcher {
    presence: PresenceTable,
    notifier: Arc<dyn Notifier>,
    envelope: Envelope,
    channels: Vec<String>,
    poll_interval: Duration,
}

impl Dispatcher {
    pub fn new(
        presence: PresenceTable,
        notifier: Arc<dyn Notifier>,
        envelope: Envelope,
        channels: Vec<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            presence,
            notifier,
            envelope,
            channels,
            poll_interval,
        }
    }

    #[cfg(test)]
    pub fn presence(&self) -> &PresenceTable {
        &self.presence
    }

    /// Handle one received line.
    ///
    /// Errors are transport failures while replying and end the session.
    pub async fn handle(&mut self, text: &str, session: &mut Session) -> Result<Flow, TransportError> {
        debug!(line = %text, "recv");
        let line = RawLine::new(text);

        let flow = match classify(&line) {
            LineKind::Ping => {
                connection::ping(&line, session).await?;
                Flow::Continue
            }
            LineKind::Error => connection::server_error(&line),
            LineKind::IsonReply => {
                presence::ison_reply(
                    &line,
                    &mut self.presence,
                    self.notifier.as_ref(),
                    &self.envelope,
                )
                .await;
                Flow::Continue
            }
            LineKind::NickInUse => {
                connection::nick_in_use(session).await?;
                Flow::Continue
            }
            LineKind::PrivMsg => {
                messaging::version_query(&line, session).await?;
                Flow::Continue
            }
            LineKind::Other => Flow::Continue,
        };

        if !session.is_ready() && connection::is_ready_notice(text, session.identity()) {
            connection::on_ready(
                session,
                &self.channels,
                self.presence.peer_names(),
                self.poll_interval,
            )
            .await?;
        }

        Ok(flow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Ping,
    Error,
    IsonReply,
    NickInUse,
    PrivMsg,
    Other,
}

/// Handler for a line, first match wins.
fn classify(line: &RawLine<'_>) -> LineKind {
    match (line.field(0), line.field(1)) {
        (Some("PING"), _) => LineKind::Ping,
        (Some("ERROR"), _) => LineKind::Error,
        (_, Some(RPL_ISON)) => LineKind::IsonReply,
        (_, Some(ERR_NICKNAMEINUSE)) => LineKind::NickInUse,
        (_, Some("PRIVMSG")) => LineKind::PrivMsg,
        _ => LineKind::Other,
    }
}
