//! # smsrelay-adapter-modem-manager
//!
//! ModemManager adapter — exposes the SMS queue of every modem known to
//! ModemManager as a [`MessageSource`].
//!
//! ## How it works
//!
//! | Operation | D-Bus call |
//! |-----------|------------|
//! | enumerate | `org.freedesktop.DBus.ObjectManager.GetManagedObjects` on `/org/freedesktop/ModemManager1` |
//! | read | `Text` and `Number` properties of `org.freedesktop.ModemManager1.Sms` on the message object |
//! | delete | `org.freedesktop.ModemManager1.Modem.Messaging.Delete` on the owning modem |
//! | notify | match rule on signal `Added` of the Messaging interface, any modem |
//!
//! Property reads bypass the proxy cache so every sweep sees fresh values.
//! Notifications are drained by a dedicated task: zbus stops reading the
//! socket once a match-rule queue is full, which would otherwise block the
//! method replies a sweep waits on.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `smsrelay-app` and `smsrelay-domain`.

mod error;
mod objects;
mod proxies;

pub use error::ModemError;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt as _};
use zbus::fdo::ObjectManagerProxy;
use zbus::proxy::CacheProperties;
use zbus::zvariant::ObjectPath;
use zbus::{Connection, MatchRule, MessageStream};

use smsrelay_app::ports::MessageSource;
use smsrelay_domain::error::SmsRelayError;
use smsrelay_domain::message::{MessageContents, MessageRef};

use crate::proxies::{MessagingProxy, SmsProxy};

/// Well-known bus name of ModemManager.
pub const SERVICE: &str = "org.freedesktop.ModemManager1";
/// Object path of ModemManager's object manager.
pub const ROOT_PATH: &str = "/org/freedesktop/ModemManager1";
/// Interface implemented by messaging-capable modems.
pub const MESSAGING_INTERFACE: &str = "org.freedesktop.ModemManager1.Modem.Messaging";
/// Signal emitted by the Messaging interface when a message appears.
pub const ADDED_SIGNAL: &str = "Added";

/// [`MessageSource`] backed by ModemManager on the system bus.
#[derive(Clone)]
pub struct ModemManagerSource {
    connection: Connection,
}

impl ModemManagerSource {
    /// Connect to the system bus.
    ///
    /// # Errors
    ///
    /// Returns [`ModemError::Connect`] if the bus is unreachable.
    pub async fn connect() -> Result<Self, ModemError> {
        let connection = Connection::system().await.map_err(ModemError::Connect)?;
        tracing::debug!(
            unique_name = ?connection.unique_name().map(ToString::to_string),
            "connected to system bus"
        );
        Ok(Self::from_connection(connection))
    }

    /// Wrap an existing connection.
    #[must_use]
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// Subscribe to `Added` signals from every modem.
    ///
    /// A background task reads the signals as they arrive, so the bus
    /// connection never stalls behind an unread signal queue while a sweep
    /// is running. Signals received since the stream was last polled are
    /// merged into a single `()`, and the payload is discarded. Signals that
    /// arrive before the first poll are kept, so subscribing before the
    /// initial sweep loses nothing.
    ///
    /// The stream ends when the bus stops delivering signals.
    ///
    /// # Errors
    ///
    /// Returns [`ModemError::Subscribe`] if the match rule cannot be installed.
    pub async fn subscribe_added(
        &self,
    ) -> Result<impl Stream<Item = ()> + Send + 'static, ModemError> {
        let rule = MatchRule::builder()
            .msg_type(zbus::message::Type::Signal)
            .interface(MESSAGING_INTERFACE)
            .and_then(|b| b.member(ADDED_SIGNAL))
            .map_err(ModemError::Subscribe)?
            .build();

        let signals = MessageStream::for_match_rule(rule, &self.connection, None)
            .await
            .map_err(ModemError::Subscribe)?;

        let (pending, changes) = watch::channel(());
        tokio::spawn(drain_added(signals, pending));
        Ok(WatchStream::from_changes(changes))
    }

    async fn sms_proxy(&self, message: &MessageRef) -> Result<SmsProxy<'static>, ModemError> {
        let path = message.message.as_str();
        SmsProxy::builder(&self.connection)
            .path(path.to_owned())
            .map_err(|source| ModemError::Proxy {
                path: path.to_string(),
                source,
            })?
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .map_err(|source| ModemError::Proxy {
                path: path.to_string(),
                source,
            })
    }

    async fn messaging_proxy(
        &self,
        message: &MessageRef,
    ) -> Result<MessagingProxy<'static>, ModemError> {
        let path = message.modem.as_str();
        MessagingProxy::builder(&self.connection)
            .path(path.to_owned())
            .map_err(|source| ModemError::Proxy {
                path: path.to_string(),
                source,
            })?
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .map_err(|source| ModemError::Proxy {
                path: path.to_string(),
                source,
            })
    }

    async fn list(&self) -> Result<Vec<MessageRef>, ModemError> {
        let manager = ObjectManagerProxy::builder(&self.connection)
            .destination(SERVICE)
            .and_then(|b| b.path(ROOT_PATH))
            .map_err(|source| ModemError::Proxy {
                path: ROOT_PATH.to_string(),
                source,
            })?
            .build()
            .await
            .map_err(|source| ModemError::Proxy {
                path: ROOT_PATH.to_string(),
                source,
            })?;

        let objects = manager
            .get_managed_objects()
            .await
            .map_err(ModemError::Enumerate)?;

        let messages = objects::queued_messages(&objects);
        tracing::info!(
            objects = objects.len(),
            messages = messages.len(),
            "enumerated modem objects"
        );
        Ok(messages)
    }

    async fn read(&self, message: &MessageRef) -> Result<MessageContents, ModemError> {
        let sms = self.sms_proxy(message).await?;
        let text = sms.text().await.map_err(|source| ModemError::ReadProperty {
            property: "Text",
            source,
        })?;
        let sender = sms
            .number()
            .await
            .map_err(|source| ModemError::ReadProperty {
                property: "Number",
                source,
            })?;
        Ok(MessageContents::new(sender, text))
    }

    async fn delete(&self, message: &MessageRef) -> Result<(), ModemError> {
        let path = ObjectPath::try_from(message.message.as_str()).map_err(|source| {
            ModemError::InvalidPath {
                path: message.message.to_string(),
                source,
            }
        })?;
        let messaging = self.messaging_proxy(message).await?;
        messaging.delete(&path).await.map_err(ModemError::Delete)
    }
}

/// Forward every `Added` signal as a pending-rescan mark until the bus
/// stream ends or nobody listens anymore.
async fn drain_added(mut signals: MessageStream, pending: watch::Sender<()>) {
    while let Some(signal) = signals.next().await {
        match signal {
            Ok(signal) => {
                tracing::debug!(
                    modem = ?signal.header().path().map(ToString::to_string),
                    "new message notification"
                );
                if pending.send(()).is_err() {
                    tracing::debug!("notification subscriber gone");
                    return;
                }
            }
            Err(err) => tracing::warn!(error = %err, "dropping malformed notification"),
        }
    }
    tracing::warn!("bus stopped delivering notifications");
}

impl MessageSource for ModemManagerSource {
    async fn list_messages(&self) -> Result<Vec<MessageRef>, SmsRelayError> {
        Ok(self.list().await?)
    }

    async fn read_contents(&self, message: &MessageRef) -> Result<MessageContents, SmsRelayError> {
        Ok(self.read(message).await?)
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), SmsRelayError> {
        Ok(self.delete(message).await?)
    }
}
