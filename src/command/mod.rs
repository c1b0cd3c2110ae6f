//! Command routing for incoming request lines
//!
//! This module handles:
//! - Parsing request lines into commands
//! - Dispatching known commands to the action provider
//! - Turning every outcome into exactly one response

mod dispatcher;

pub use dispatcher::CommandDispatcher;
