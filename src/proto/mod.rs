//! Minimal IRC wire vocabulary: the commands the bot sends and the
//! tokenized form of the lines it receives.

mod command;
mod line;

pub use command::Command;
pub use line::{ERR_NICKNAMEINUSE, RPL_ISON, RawLine};
