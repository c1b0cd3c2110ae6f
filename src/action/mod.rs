//! Platform actions for the host
//!
//! This module handles:
//! - Mapping shutdown/sleep/lock to host programs per platform
//! - Running fallback chains until one mechanism succeeds
//! - Distinguishing missing mechanisms from failing ones

mod mechanism;
mod provider;
mod runner;
#[cfg(test)]
pub(crate) mod testing;

pub use provider::{ActionProvider, ActionResult};
