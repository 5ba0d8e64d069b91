//! Message — a queued SMS and the contents read from it.

use std::fmt;

use crate::handle::{MessageHandle, ModemHandle};

/// Reference to one queued message and the modem that owns it.
///
/// Built during a sweep and dropped once the message has been processed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub message: MessageHandle,
    pub modem: ModemHandle,
}

impl MessageRef {
    #[must_use]
    pub fn new(message: impl Into<MessageHandle>, modem: impl Into<ModemHandle>) -> Self {
        Self {
            message: message.into(),
            modem: modem.into(),
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on modem {}", self.message.short(), self.modem.short())
    }
}

/// Sender and body of a message, fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContents {
    /// Originating number as reported by the modem.
    pub sender: String,
    /// Message body.
    pub text: String,
}

impl MessageContents {
    #[must_use]
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}
