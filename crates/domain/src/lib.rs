//! # smsrelay-domain
//!
//! Pure domain model for the smsrelay SMS automation daemon.
//!
//! ## Responsibilities
//! - Foundational types: typed object handles, error conventions
//! - Define **Rules** (substring pattern → shell command) and the ordered
//!   **`RuleSet`** they are evaluated from
//! - Define **Messages** (references to queued SMS objects and their contents)
//! - Contain the matching logic and its invariants
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod handle;

pub mod message;
pub mod rule;
