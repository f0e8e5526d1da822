//! # relay-proto
//!
//! Wire-protocol layer for the relayd group-chat daemon.
//!
//! The protocol is newline-delimited UTF-8 text over a byte stream, with no
//! handshake and no framing beyond the newline. Each inbound line is either a
//! slash command (`/join`, `/create`, `/members`, `/file`) or chat text that
//! the server relays to the sender's current group.
//!
//! This crate provides:
//!
//! - [`Command`]: a tagged parse of one client line
//! - [`LineCodec`]: a tokio-util [`Decoder`](tokio_util::codec::Decoder) /
//!   [`Encoder`](tokio_util::codec::Encoder) for newline-terminated lines
//! - [`ProtocolError`]: errors shared by the codec and its users
//!
//! ## Quick Start
//!
//! ```rust
//! use relay_proto::Command;
//!
//! assert_eq!(
//!     Command::parse("/join lobby"),
//!     Some(Command::Join("lobby".to_string()))
//! );
//! assert_eq!(
//!     Command::parse("hello, everyone"),
//!     Some(Command::Chat("hello, everyone".to_string()))
//! );
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod line;

pub use command::Command;
pub use error::ProtocolError;
pub use line::LineCodec;
