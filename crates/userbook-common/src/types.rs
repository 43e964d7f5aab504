//! Outcome messages shown to the client after a write.
//!
//! Each service operation returns a [`StatusMessage`] describing what
//! happened. The HTTP layer decides how to carry it to the next page view.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a status message, named after the CSS alert classes the
/// views use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Success,
    Info,
    Danger,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

/// A single-use status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub message: String,
}

impl StatusMessage {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self {
            kind: MessageType::Success,
            message: message.into(),
        }
    }

    pub fn info<S: Into<String>>(message: S) -> Self {
        Self {
            kind: MessageType::Info,
            message: message.into(),
        }
    }

    pub fn danger<S: Into<String>>(message: S) -> Self {
        Self {
            kind: MessageType::Danger,
            message: message.into(),
        }
    }
}
