//! Watcher — sweeps queued messages and rescans on every notification.
//!
//! A *sweep* enumerates every message queued on every modem and hands each
//! one to the [`Dispatcher`], strictly one after the other. The watcher runs
//! one sweep at startup and one more per notification received. The
//! notification payload is ignored: any notification means "something
//! changed, rescan everything", which makes missed or duplicated
//! notifications harmless.

use std::pin::pin;

use tokio_stream::{Stream, StreamExt as _};

use smsrelay_domain::error::SmsRelayError;

use crate::dispatcher::Dispatcher;
use crate::ports::{CommandRunner, MessageSource};

/// Drives the dispatcher from a message source.
pub struct Watcher<S, R> {
    source: S,
    dispatcher: Dispatcher<R>,
}

impl<S, R> Watcher<S, R>
where
    S: MessageSource,
    R: CommandRunner,
{
    /// Create a new watcher.
    pub fn new(source: S, dispatcher: Dispatcher<R>) -> Self {
        Self { source, dispatcher }
    }

    /// Process every currently queued message, in enumeration order.
    ///
    /// Returns the number of messages processed.
    ///
    /// # Errors
    ///
    /// Returns the source error if enumeration or any content read fails.
    /// The sweep stops at the first such error.
    pub async fn sweep(&self) -> Result<usize, SmsRelayError> {
        tracing::info!("enumerating messages");
        let messages = self.source.list_messages().await?;
        tracing::debug!(count = messages.len(), "messages queued");

        for message in &messages {
            self.dispatcher.process_message(&self.source, message).await?;
        }
        Ok(messages.len())
    }

    /// Run an initial sweep, then one sweep per notification.
    ///
    /// Only returns on failure. When the notification stream ends the
    /// watcher can no longer learn about new messages and returns
    /// [`SmsRelayError::NotificationsClosed`].
    ///
    /// # Errors
    ///
    /// Any sweep error, or [`SmsRelayError::NotificationsClosed`].
    pub async fn run<N>(&self, notifications: N) -> Result<(), SmsRelayError>
    where
        N: Stream<Item = ()>,
    {
        tracing::info!("initial processing of all messages");
        self.sweep().await?;

        tracing::info!("waiting for messages");
        let mut notifications = pin!(notifications);
        while notifications.next().await.is_some() {
            self.sweep().await?;
        }

        Err(SmsRelayError::NotificationsClosed)
    }
}
