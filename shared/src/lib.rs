//! PC Remote Shared Protocol Types
//!
//! This crate provides the wire types and codec for communication between
//! the remote client and the host-side command server.

pub mod codec;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed identity the listener advertises so clients can find it
pub mod service {
    /// Serial Port Profile UUID, as expected by the paired client
    pub const SERVICE_UUID: &str = "00001101-0000-1000-8000-00805F9B34FB";

    /// Same UUID as a 128-bit value
    pub const SERVICE_UUID_U128: u128 = 0x0000_1101_0000_1000_8000_0080_5f9b_34fb;

    /// Human-readable service name
    pub const SERVICE_NAME: &str = "PC Remote Control Service";

    /// Default RFCOMM channel
    pub const DEFAULT_RFCOMM_CHANNEL: u8 = 1;

    /// Longest accepted request line in bytes (excluding the delimiter)
    pub const MAX_LINE_LEN: usize = 1024;
}

/// A decoded request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Shutdown,
    Sleep,
    Lock,
    /// Anything else, holding the trimmed text as received
    Unknown(String),
}

impl Command {
    /// Parse a request line. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        if text.eq_ignore_ascii_case("SHUTDOWN") {
            Command::Shutdown
        } else if text.eq_ignore_ascii_case("SLEEP") {
            Command::Sleep
        } else if text.eq_ignore_ascii_case("LOCK") {
            Command::Lock
        } else {
            Command::Unknown(text.to_string())
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Shutdown => write!(f, "SHUTDOWN"),
            Command::Sleep => write!(f, "SLEEP"),
            Command::Lock => write!(f, "LOCK"),
            Command::Unknown(text) => write!(f, "UNKNOWN({})", text),
        }
    }
}

/// Outcome reported to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Error,
}

/// One response line, sent for every request line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    pub message: String,
}

impl Response {
    /// Create a success response
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }

    /// Response for a request that matched no known command
    pub fn unknown(text: &str) -> Self {
        Self::error(format!("Unknown command: {}", text))
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        for raw in ["shutdown", "Shutdown", "SHUTDOWN ", "  sHuTdOwN\r\n"] {
            assert_eq!(Command::parse(raw), Command::Shutdown, "input {:?}", raw);
        }
        assert_eq!(Command::parse("sleep"), Command::Sleep);
        assert_eq!(Command::parse("Lock\n"), Command::Lock);
    }

    #[test]
    fn test_parse_unknown_keeps_trimmed_text() {
        assert_eq!(
            Command::parse("  reboot now \n"),
            Command::Unknown("reboot now".into())
        );
        assert_eq!(Command::parse("LOCKED"), Command::Unknown("LOCKED".into()));
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
    }

    #[test]
    fn test_unknown_response() {
        let resp = Response::unknown("reboot");
        assert_eq!(resp.status, Status::Error);
        assert_eq!(resp.message, "Unknown command: reboot");
        assert!(!resp.is_success());
    }

    #[test]
    fn test_uuid_constants_agree() {
        let hex: String = service::SERVICE_UUID
            .chars()
            .filter(|c| *c != '-')
            .collect();
        let parsed = u128::from_str_radix(&hex, 16).expect("valid hex");
        assert_eq!(parsed, service::SERVICE_UUID_U128);
    }
}
