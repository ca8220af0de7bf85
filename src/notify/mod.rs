//! Notification delivery.
//!
//! The bot formats a [`Notification`] for every presence transition and hands
//! it to a [`Notifier`]. Delivery failures are reported to the caller, which
//! logs them; nothing is retried or queued.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::config::NotifyConfig;
use crate::state::Transition;

pub mod log;
pub mod ses;
mod sigv4;

pub use log::LogNotifier;
pub use ses::SesNotifier;

/// Subject line of every notification email.
pub const SUBJECT: &str = "IRC Notification Event";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Sender and recipient addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
}

impl From<&NotifyConfig> for Envelope {
    fn from(config: &NotifyConfig) -> Self {
        Self {
            from: config.from.clone(),
            to: config.to.clone(),
        }
    }
}

/// A fully formed message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: String,
}

impl Notification {
    /// Notification for a presence transition observed at `at` (local time).
    pub fn presence(transition: &Transition, envelope: &Envelope, at: NaiveDateTime) -> Self {
        Self {
            subject: SUBJECT.to_string(),
            body: format_body(&transition.describe(), at),
            from: envelope.from.clone(),
            to: envelope.to.clone(),
        }
    }
}

/// `[2024-05-01 18:04:05] alice is online`
pub fn format_body(message: &str, at: NaiveDateTime) -> String {
    format!("[{}] {}", at.format("%Y-%m-%d %H:%M:%S"), message)
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification. Called at most once per transition.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Build the notifier selected by configuration.
///
/// Without a `[notify]` section, or when SES credentials are unavailable,
/// notifications are only logged.
pub fn build(config: Option<&NotifyConfig>) -> (Arc<dyn Notifier>, Envelope) {
    let Some(config) = config else {
        info!("No [notify] section configured, notifications will only be logged");
        return (Arc::new(LogNotifier), Envelope::default());
    };

    let envelope = Envelope::from(config);
    match SesNotifier::from_env(&config.region, config.endpoint.as_deref()) {
        Ok(notifier) => {
            info!(region = %config.region, recipient = %config.to, "Email notifications enabled");
            (Arc::new(notifier), envelope)
        }
        Err(e) => {
            error!(error = %e, "Failed to set up SES client, notifications will only be logged");
            (Arc::new(LogNotifier), envelope)
        }
    }
}
