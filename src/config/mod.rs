//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, BotConfig, NotifyConfig)
//! - [`env`]: Loading the same settings from environment variables
//! - [`duration`]: Duration strings such as `5m` or `1h30m`
//! - [`validation`]: Startup validation of connectivity-critical fields

mod duration;
mod env;
mod types;
mod validation;

pub use types::{Config, NotifyConfig};
pub use validation::validate;
