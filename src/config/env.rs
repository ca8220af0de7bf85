//! Environment-variable configuration.
//!
//! Mirrors the TOML layout with flat variables so the bot can run from a
//! container without a config file:
//!
//! | Variable       | Field                 |
//! |----------------|-----------------------|
//! | `SERVER`       | `server.host`         |
//! | `PORT`         | `server.port`         |
//! | `BOT_NAME`     | `bot.nick`            |
//! | `CHANNELS`     | `bot.channels` (csv)  |
//! | `NICKNAMES`    | `bot.peers` (csv)     |
//! | `SLEEP_MIN`    | `bot.poll_interval`   |
//! | `FROM_EMAIL`   | `notify.from`         |
//! | `NOTIFY_EMAIL` | `notify.to`           |
//! | `AWS_REGION`   | `notify.region`       |
//! | `SES_ENDPOINT` | `notify.endpoint`     |

use super::types::{BotConfig, Config, ConfigError, NotifyConfig, ServerConfig, default_region};

impl Config {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default().trim().to_string();

        let port = match get("PORT") {
            raw if raw.is_empty() => 0,
            raw => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: raw })?,
        };

        let sleep = get("SLEEP_MIN");
        let bot = BotConfig {
            nick: get("BOT_NAME"),
            // Order matters: an empty first entry means "join nothing".
            channels: get("CHANNELS").split(',').map(|c| c.trim().to_string()).collect(),
            peers: split_list(&get("NICKNAMES")),
            poll_interval: (!sleep.is_empty()).then_some(sleep),
        };

        let from = get("FROM_EMAIL");
        let to = get("NOTIFY_EMAIL");
        let notify = if from.is_empty() && to.is_empty() {
            None
        } else {
            let region = get("AWS_REGION");
            let endpoint = get("SES_ENDPOINT");
            Some(NotifyConfig {
                from,
                to,
                region: if region.is_empty() { default_region() } else { region },
                endpoint: (!endpoint.is_empty()).then_some(endpoint),
            })
        };

        Ok(Config {
            server: ServerConfig {
                host: get("SERVER"),
                port,
            },
            bot,
            notify,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
