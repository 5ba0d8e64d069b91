//! ModemManager adapter error types.

use smsrelay_domain::error::SmsRelayError;

/// Errors specific to the ModemManager adapter.
#[derive(Debug, thiserror::Error)]
pub enum ModemError {
    /// Could not open the system bus.
    #[error("failed to connect to the system bus")]
    Connect(#[source] zbus::Error),

    /// Could not install the `Added` signal match rule.
    #[error("failed to subscribe to new-message notifications")]
    Subscribe(#[source] zbus::Error),

    /// `GetManagedObjects` on the modem service failed.
    #[error("failed to enumerate modem objects")]
    Enumerate(#[source] zbus::fdo::Error),

    /// A proxy for a modem or message object could not be built.
    #[error("failed to create proxy for {path}")]
    Proxy {
        /// Object path the proxy was meant for.
        path: String,
        #[source]
        source: zbus::Error,
    },

    /// Reading a message property failed.
    #[error("failed to read message property {property}")]
    ReadProperty {
        /// D-Bus property name (`Text` or `Number`).
        property: &'static str,
        #[source]
        source: zbus::Error,
    },

    /// A handle did not hold a valid object path.
    #[error("invalid object path {path:?}")]
    InvalidPath {
        path: String,
        #[source]
        source: zbus::zvariant::Error,
    },

    /// The modem refused or failed to delete a message.
    #[error("failed to delete message")]
    Delete(#[source] zbus::Error),
}

impl ModemError {
    /// Convert into a [`SmsRelayError::Source`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> SmsRelayError {
        SmsRelayError::Source(Box::new(self))
    }
}

impl From<ModemError> for SmsRelayError {
    fn from(err: ModemError) -> Self {
        err.into_domain()
    }
}
