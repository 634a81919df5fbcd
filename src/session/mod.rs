//! Client sessions for the shell
//!
//! This module handles:
//! - Accepting TCP connections
//! - Reading newline-terminated lines from each client
//! - Feeding every line to the shared dispatcher, tagged with the peer address

mod connection;
mod listener;

pub use connection::Session;
pub use listener::serve;
