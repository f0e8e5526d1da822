//! Network layer: the accepting gateway and per-connection sessions.

mod connection;
mod gateway;

pub use connection::Connection;
pub use gateway::Gateway;
