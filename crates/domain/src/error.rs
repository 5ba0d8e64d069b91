//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SmsRelayError`] via `#[from]` or an `into_domain()` helper.

/// Base error type crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum SmsRelayError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The message source (modem service, bus, …) failed.
    #[error("message source error")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The new-message notification stream ended.
    #[error("message notification stream closed")]
    NotificationsClosed,
}

/// Invariant violations detected while building domain values.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A rule set would perform no automation at all.
    #[error("at least one rule must be configured")]
    NoRules,
}
