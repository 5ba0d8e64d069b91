//! Typed handle newtypes wrapping opaque object paths.
//!
//! The modem service names every object by a path such as
//! `/org/freedesktop/ModemManager1/SMS/3`. The domain never interprets
//! those paths beyond extracting the last segment for log lines.

use std::fmt;

macro_rules! define_handle {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Wrap an object path.
            #[must_use]
            pub fn new(path: impl Into<String>) -> Self {
                Self(path.into())
            }

            /// Access the full object path.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Last segment of the path, e.g. `3` for `/…/SMS/3`.
            #[must_use]
            pub fn short(&self) -> &str {
                let trimmed = self.0.trim_end_matches('/');
                match trimmed.rsplit_once('/') {
                    Some((_, tail)) => tail,
                    None if trimmed.is_empty() => "/",
                    None => trimmed,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(path: &str) -> Self {
                Self::new(path)
            }
        }

        impl From<String> for $name {
            fn from(path: String) -> Self {
                Self(path)
            }
        }
    };
}

define_handle!(
    /// Object path of a queued SMS message.
    MessageHandle
);

define_handle!(
    /// Object path of the modem owning a message.
    ModemHandle
);
