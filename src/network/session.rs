//! Per-connection session state.

use tokio::task::JoinHandle;

use super::transport::LineSender;
use crate::error::TransportError;
use crate::proto::Command;

/// State owned by one connection: the nickname in use, the ready latch and
/// the presence poller bound to it.
///
/// A new session always starts from the configured base nickname.
pub struct Session {
    attempt: u64,
    identity: String,
    sender: LineSender,
    ready: bool,
    poller: Option<JoinHandle<()>>,
}

impl Session {
    pub fn new(attempt: u64, base_identity: &str, sender: LineSender) -> Self {
        Self {
            attempt,
            identity: base_identity.to_string(),
            sender,
            ready: false,
            poller: None,
        }
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Nickname currently announced to the server.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn sender(&self) -> &LineSender {
        &self.sender
    }

    /// Send the NICK/USER pair for the current identity.
    pub async fn identify(&self) -> Result<(), TransportError> {
        for command in Command::identify(&self.identity) {
            self.sender.send_command(command).await?;
        }
        Ok(())
    }

    /// Append `_` to the identity and announce it again.
    pub async fn decorate_identity(&mut self) -> Result<(), TransportError> {
        self.identity.push('_');
        self.identify().await
    }

    /// Latch the ready state. Returns `true` only the first time.
    pub fn mark_ready(&mut self) -> bool {
        !std::mem::replace(&mut self.ready, true)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Bind the presence poller to this session, replacing any earlier one.
    pub fn attach_poller(&mut self, handle: JoinHandle<()>) {
        if let Some(old) = self.poller.replace(handle) {
            old.abort();
        }
    }

    #[cfg(test)]
    pub fn has_poller(&self) -> bool {
        self.poller.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the poller. Called when the session ends.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
