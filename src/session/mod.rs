//! Session handling for connected clients
//!
//! This module handles:
//! - Reading newline-delimited commands from one connection
//! - Strict request/response alternation per connection
//! - Releasing the connection on every exit path

mod connection;

pub use connection::ClientSession;
