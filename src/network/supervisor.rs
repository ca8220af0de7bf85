//! Reconnect supervisor.
//!
//! Drives the session lifecycle `Connecting -> Identifying -> Active ->
//! Failed -> Connecting` forever. Connection failures and ended sessions
//! both wait [`RECONNECT_BACKOFF`] before the next attempt.

use std::fmt;
use std::time::Duration;

use tracing::{Instrument, error, info, warn};

use super::session::Session;
use super::transport::{Connector, Transport};
use crate::error::TransportError;
use crate::handlers::{Dispatcher, Flow};
use crate::telemetry::spans;

/// Wait between connection attempts.
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Identifying,
    Active,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Identifying => "identifying",
            Self::Active => "active",
            Self::Failed => "failed",
        })
    }
}

/// Why a session stopped.
#[derive(Debug)]
pub enum SessionEnd {
    /// The server closed the stream.
    Closed,
    Transport(TransportError),
    /// The server sent `ERROR`.
    ServerError(String),
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("connection closed by server"),
            Self::Transport(e) => write!(f, "{}", e),
            Self::ServerError(reason) => write!(f, "server error: {}", reason),
        }
    }
}

pub struct Supervisor<C> {
    connector: C,
    address: String,
    base_identity: String,
    dispatcher: Dispatcher,
    backoff: Duration,
    state: SessionState,
    attempts: u64,
}

impl<C: Connector> Supervisor<C> {
    pub fn new(
        connector: C,
        address: impl Into<String>,
        base_identity: impl Into<String>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            connector,
            address: address.into(),
            base_identity: base_identity.into(),
            dispatcher,
            backoff: RECONNECT_BACKOFF,
            state: SessionState::Connecting,
            attempts: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run sessions forever.
    pub async fn run(&mut self) {
        loop {
            let transport = self.connect().await;
            let end = self.run_session(transport).await;
            match end {
                SessionEnd::Closed => warn!(reason = %end, "Session ended"),
                _ => error!(reason = %end, "Session ended"),
            }
            info!(backoff = ?self.backoff, "Waiting before reconnecting");
            tokio::time::sleep(self.backoff).await;
        }
    }

    /// Connect, retrying after the backoff until it succeeds.
    async fn connect(&mut self) -> Transport {
        self.transition(SessionState::Connecting);
        loop {
            self.attempts += 1;
            info!(address = %self.address, attempt = self.attempts, "Connecting to server");
            match self.connector.connect(&self.address).await {
                Ok(stream) => return Transport::new(stream),
                Err(e) => {
                    error!(
                        address = %self.address,
                        error = %e,
                        code = e.error_code(),
                        backoff = ?self.backoff,
                        "Failed to connect"
                    );
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }
    }

    /// Identify, then read until the session fails. Always leaves the
    /// supervisor in [`SessionState::Failed`] with the transport closed.
    pub async fn run_session(&mut self, transport: Transport) -> SessionEnd {
        let span = spans::session(self.attempts, &self.address);
        self.drive(transport).instrument(span).await
    }

    async fn drive(&mut self, mut transport: Transport) -> SessionEnd {
        self.transition(SessionState::Identifying);
        let mut session = Session::new(self.attempts, &self.base_identity, transport.sender());

        let end = match session.identify().await {
            Ok(()) => {
                self.transition(SessionState::Active);
                self.read_loop(&mut transport, &mut session).await
            }
            Err(e) => SessionEnd::Transport(e),
        };

        self.transition(SessionState::Failed);
        session.shutdown();
        transport.close().await;
        end
    }

    async fn read_loop(&mut self, transport: &mut Transport, session: &mut Session) -> SessionEnd {
        loop {
            let line = match transport.recv().await {
                Ok(Some(line)) => line,
                Ok(None) => return SessionEnd::Closed,
                Err(e) => return SessionEnd::Transport(e),
            };
            match self.dispatcher.handle(&line, session).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Disconnect(reason)) => return SessionEnd::ServerError(reason),
                Err(e) => return SessionEnd::Transport(e),
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        info!(from = %self.state, to = %next, "Session state changed");
        self.state = next;
    }
}
