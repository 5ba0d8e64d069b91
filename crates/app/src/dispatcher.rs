//! Dispatcher — evaluates rules against a message and starts their commands.
//!
//! For each message the dispatcher fetches the contents, runs the command of
//! every matching rule through the [`CommandRunner`] port, and then asks the
//! [`MessageSource`] to delete the message. Deletion is requested once all
//! commands have been *dispatched*; their completion is never awaited.

use std::sync::Arc;

use smsrelay_domain::error::SmsRelayError;
use smsrelay_domain::message::{MessageContents, MessageRef};
use smsrelay_domain::rule::RuleSet;

use crate::ports::{CommandRunner, MessageSource};

/// Rule engine bound to an immutable rule set and a command runner.
pub struct Dispatcher<R> {
    rules: Arc<RuleSet>,
    runner: R,
}

impl<R> Dispatcher<R>
where
    R: CommandRunner,
{
    /// Create a new dispatcher.
    pub fn new(rules: Arc<RuleSet>, runner: R) -> Self {
        Self { rules, runner }
    }

    /// Dispatch the command of every rule matching the message body.
    ///
    /// The sender is logged but plays no part in matching. Returns the
    /// number of commands dispatched.
    pub fn process_message_contents(&self, contents: &MessageContents) -> usize {
        tracing::debug!(sender = %contents.sender, "evaluating rules");

        let mut dispatched = 0;
        for rule in self.rules.matching(&contents.text) {
            tracing::info!(
                pattern = %rule.must_contain,
                command = %rule.run_command,
                "rule matches, running command"
            );
            self.runner.dispatch(&rule.run_command);
            dispatched += 1;
        }
        dispatched
    }

    /// Fetch, evaluate, and delete a single message.
    ///
    /// A failed deletion is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns the source error if the message contents cannot be read.
    /// Nothing is dispatched or deleted in that case.
    pub async fn process_message<S>(
        &self,
        source: &S,
        message: &MessageRef,
    ) -> Result<usize, SmsRelayError>
    where
        S: MessageSource,
    {
        tracing::info!(message = %message.message.short(), "processing message");

        let contents = source.read_contents(message).await?;
        let dispatched = self.process_message_contents(&contents);

        tracing::info!(message = %message.message.short(), "deleting message");
        if let Err(err) = source.delete_message(message).await {
            tracing::warn!(
                message = %message.message,
                modem = %message.modem,
                error = %err,
                "failed to delete message"
            );
        }

        Ok(dispatched)
    }
}
