//! Network module.
//!
//! Contains the line codec, the session transport, per-session state, the
//! presence poller and the reconnect supervisor.

mod codec;
mod poller;
mod session;
mod supervisor;
pub mod transport;

pub use poller::spawn_presence_poller;
pub use session::Session;
pub use supervisor::Supervisor;
pub use transport::TcpConnector;
