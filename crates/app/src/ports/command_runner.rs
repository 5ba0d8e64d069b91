//! Command runner port — fire-and-forget command execution.

use std::sync::Arc;

/// Starts shell commands on behalf of matched rules.
///
/// Dispatch is deliberately one-way: the caller gets no handle, no exit
/// status, and no completion signal. Implementations run the command
/// concurrently and report its outcome through logging only. There is no
/// bound on how many commands may be running at once.
pub trait CommandRunner {
    /// Start `command` and return immediately.
    fn dispatch(&self, command: &str);
}

impl<T: CommandRunner + ?Sized> CommandRunner for Arc<T> {
    fn dispatch(&self, command: &str) {
        (**self).dispatch(command);
    }
}
