//! Integration test common infrastructure.
//!
//! Provides a scripted fake IRC server and a wrapper that runs the
//! `notifybot` binary against it.

pub mod bot;
pub mod server;

#[allow(unused_imports)]
pub use bot::TestBot;
#[allow(unused_imports)]
pub use server::{FakeIrcServer, ServerSide};
