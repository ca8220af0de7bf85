//! State management module.
//!
//! Contains the presence table, the only state that outlives a session.

mod presence;

pub use presence::{PollResult, PresenceTable, Transition};
