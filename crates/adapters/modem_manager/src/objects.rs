//! Flattening of the `GetManagedObjects` reply into message references.
//!
//! The reply maps object path → interface name → property name → value.
//! Every object exposing the Messaging interface is a modem; its
//! `Messages` property lists the object paths of its queued SMS.

use zbus::fdo::ManagedObjects;
use zbus::zvariant::{OwnedValue, Value};

use smsrelay_domain::message::MessageRef;

use crate::MESSAGING_INTERFACE;

/// Property of the Messaging interface listing queued message paths.
const MESSAGES_PROPERTY: &str = "Messages";

/// Collect `(message, modem)` pairs for every messaging-capable object.
///
/// Objects without the Messaging interface, or whose `Messages` property
/// is missing or not an array of object paths, contribute nothing.
pub(crate) fn queued_messages(objects: &ManagedObjects) -> Vec<MessageRef> {
    let mut found = Vec::new();
    for (modem_path, interfaces) in objects {
        let Some(properties) = interfaces
            .iter()
            .find(|(name, _)| name.as_str() == MESSAGING_INTERFACE)
            .map(|(_, properties)| properties)
        else {
            continue;
        };
        let Some(messages) = properties.get(MESSAGES_PROPERTY) else {
            tracing::debug!(
                modem = %modem_path.as_str(),
                "messaging object without Messages property"
            );
            continue;
        };
        for message_path in object_paths(messages) {
            found.push(MessageRef::new(message_path, modem_path.as_str()));
        }
    }
    found
}

fn object_paths(value: &OwnedValue) -> Vec<String> {
    match &**value {
        Value::Array(array) => array
            .iter()
            .filter_map(|item| match item {
                Value::ObjectPath(path) => Some(path.as_str().to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
