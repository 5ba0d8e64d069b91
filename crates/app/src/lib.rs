//! # smsrelay-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `MessageSource` — enumerate, read, and delete queued messages
//!   - `CommandRunner` — start a shell command without waiting for it
//! - Define the use-cases driving those ports:
//!   - `Dispatcher` — evaluate rules against one message and dispatch commands
//!   - `Watcher` — sweep all queued messages, then rescan on every notification
//! - Orchestrate domain objects without knowing *how* the bus or the shell work
//!
//! ## Dependency rule
//! Depends on `smsrelay-domain` only (plus `tokio-stream` for the
//! notification stream). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod dispatcher;
pub mod ports;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_support;
