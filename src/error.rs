//! Unified error handling for notifybot.
//!
//! Errors are grouped by how they are recovered: transport failures end the
//! current session and are retried by the supervisor, protocol errors only
//! skip the offending line.

use thiserror::Error;

// ============================================================================
// Transport Errors (session-fatal, retried by the supervisor)
// ============================================================================

/// Errors raised by the session transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line too long: {actual} bytes (limit {limit})")]
    LineTooLong { actual: usize, limit: usize },

    #[error("session writer closed")]
    Closed,
}

impl TransportError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect_failed",
            Self::Io(_) => "io_error",
            Self::LineTooLong { .. } => "line_too_long",
            Self::Closed => "writer_closed",
        }
    }
}

// ============================================================================
// Protocol Errors (line-local, logged and skipped)
// ============================================================================

/// A received line did not have the shape its command requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("{command}: expected at least {expected} fields, got {actual}")]
    MissingField {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{command}: missing origin prefix")]
    MissingPrefix { command: &'static str },
}
