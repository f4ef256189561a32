//! TCP relay server

pub mod connection;
pub mod listener;

pub use connection::{handle_connection, respond, ConnectionLimits};
pub use listener::{RelayServer, RelayServerConfig};
