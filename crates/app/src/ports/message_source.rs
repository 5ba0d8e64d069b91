//! Message source port — access to queued messages on the modem service.

use std::future::Future;
use std::sync::Arc;

use smsrelay_domain::error::SmsRelayError;
use smsrelay_domain::message::{MessageContents, MessageRef};

/// Read and delete access to every message queued on every known modem.
pub trait MessageSource {
    /// Enumerate all currently queued messages across all modems.
    ///
    /// Ordering is whatever the underlying service reports.
    fn list_messages(
        &self,
    ) -> impl Future<Output = Result<Vec<MessageRef>, SmsRelayError>> + Send;

    /// Fetch the sender and body of one message.
    fn read_contents(
        &self,
        message: &MessageRef,
    ) -> impl Future<Output = Result<MessageContents, SmsRelayError>> + Send;

    /// Ask the owning modem to delete the message.
    fn delete_message(
        &self,
        message: &MessageRef,
    ) -> impl Future<Output = Result<(), SmsRelayError>> + Send;
}

impl<T: MessageSource + Send + Sync> MessageSource for Arc<T> {
    fn list_messages(
        &self,
    ) -> impl Future<Output = Result<Vec<MessageRef>, SmsRelayError>> + Send {
        (**self).list_messages()
    }

    fn read_contents(
        &self,
        message: &MessageRef,
    ) -> impl Future<Output = Result<MessageContents, SmsRelayError>> + Send {
        (**self).read_contents(message)
    }

    fn delete_message(
        &self,
        message: &MessageRef,
    ) -> impl Future<Output = Result<(), SmsRelayError>> + Send {
        (**self).delete_message(message)
    }
}
