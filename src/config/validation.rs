//! Configuration validation.
//!
//! Validates configuration at startup so the bot refuses to run with settings
//! it could never connect or identify with.

use super::Config;
use std::net::Ipv6Addr;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.host is required")]
    MissingServerHost,
    #[error("server.host must be a hostname or IP address without a port, got '{0}'")]
    InvalidServerHost(String),
    #[error("server.port must be non-zero")]
    InvalidPort,
    #[error("bot.nick is required")]
    MissingNick,
    #[error("bot.nick must not contain spaces or start with ':', got '{0}'")]
    InvalidNick(String),
    #[error("bot.peers must list at least one nickname")]
    NoPeers,
    #[error("bot.peers entry must not contain spaces, got '{0}'")]
    InvalidPeer(String),
    #[error("notify.{0} is required when [notify] is configured")]
    MissingNotifyField(&'static str),
}

/// A hostname, IPv4 address or IPv6 address (optionally bracketed).
/// A `host:port` form is rejected since the port is configured separately.
fn is_valid_host(host: &str) -> bool {
    let inner = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if inner.contains(':') {
        return inner.parse::<Ipv6Addr>().is_ok();
    }
    inner == host
        && !host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '[' | ']' | '@'))
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let host = &config.server.host;
    if host.trim().is_empty() {
        errors.push(ValidationError::MissingServerHost);
    } else if !is_valid_host(host) {
        errors.push(ValidationError::InvalidServerHost(host.clone()));
    }
    if config.server.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    let nick = &config.bot.nick;
    if nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if nick.contains(' ') || nick.starts_with(':') {
        errors.push(ValidationError::InvalidNick(nick.clone()));
    }

    if config.bot.peers.iter().all(|p| p.trim().is_empty()) {
        errors.push(ValidationError::NoPeers);
    }
    for peer in &config.bot.peers {
        if peer.trim().contains(' ') {
            errors.push(ValidationError::InvalidPeer(peer.clone()));
        }
    }

    if let Some(ref notify) = config.notify {
        if notify.from.trim().is_empty() {
            errors.push(ValidationError::MissingNotifyField("from"));
        }
        if notify.to.trim().is_empty() {
            errors.push(ValidationError::MissingNotifyField("to"));
        }
        if notify.region.trim().is_empty() {
            errors.push(ValidationError::MissingNotifyField("region"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
