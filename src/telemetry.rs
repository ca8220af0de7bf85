//! Tracing setup and span constructors.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span for one connection attempt and the session that follows it.
    pub fn session(attempt: u64, server: &str) -> Span {
        info_span!("session", attempt = attempt, server = %server)
    }

    /// Span for the presence poller bound to a session.
    pub fn poller(peers: usize) -> Span {
        info_span!("poller", peers = peers)
    }
}
