//! Outbound IRC commands.

use std::fmt::{self, Write};

/// Commands the bot sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `NICK <nick>`
    NICK(String),
    /// `USER <user> <mode> * :<realname>`
    USER(String, String, String),
    /// `PONG <token>`, echoing the PING token verbatim (colon included).
    PONG(String),
    /// `JOIN <channel>`
    JOIN(String),
    /// `ISON <nick> [<nick> ...]`
    ISON(Vec<String>),
    /// `NOTICE <target> :<text>`
    NOTICE(String, String),
}

impl Command {
    /// The identification pair announcing `nick` to the server.
    pub fn identify(nick: &str) -> [Command; 2] {
        [
            Command::NICK(nick.to_string()),
            Command::USER(nick.to_string(), "8".to_string(), nick.to_string()),
        ]
    }
}

fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    for arg in args {
        f.write_char(' ')?;
        f.write_str(arg)?;
    }
    Ok(())
}

/// Like [`write_cmd`], but the last argument is sent as a trailing parameter.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    match args.split_last() {
        Some((trailing, init)) => {
            write_cmd(f, cmd, init)?;
            f.write_str(" :")?;
            f.write_str(trailing)
        }
        None => f.write_str(cmd),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(n) => write_cmd(f, "NICK", &[n]),
            Command::USER(u, m, r) => write_cmd_freeform(f, "USER", &[u, m, "*", r]),
            Command::PONG(t) if t.is_empty() => write_cmd(f, "PONG", &[]),
            Command::PONG(t) => write_cmd(f, "PONG", &[t]),
            Command::JOIN(c) => write_cmd(f, "JOIN", &[c]),
            Command::ISON(nicks) => {
                f.write_str("ISON")?;
                for nick in nicks {
                    f.write_char(' ')?;
                    f.write_str(nick)?;
                }
                Ok(())
            }
            Command::NOTICE(t, m) => write_cmd_freeform(f, "NOTICE", &[t, m]),
        }
    }
}
