//! Integration test common infrastructure.
//!
//! Provides utilities for spawning test daemons and driving the line
//! protocol from real TCP clients.

#![allow(dead_code)]

pub mod client;
pub mod server;

pub use client::TestClient;
pub use server::TestServer;
