//! Tests for the ModemManager adapter against an in-process stand-in.
//!
//! The stand-in serves the ObjectManager, Messaging, and Sms interfaces on
//! one end of a peer-to-peer zbus connection; the adapter talks to the other
//! end exactly as it would to the system bus.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use smsrelay_adapter_modem_manager::{ModemManagerSource, ROOT_PATH};
use smsrelay_app::ports::MessageSource;
use smsrelay_domain::error::SmsRelayError;
use smsrelay_domain::message::{MessageContents, MessageRef};
use tokio_stream::StreamExt as _;
use zbus::connection::Builder;
use zbus::fdo::ObjectManager;
use zbus::object_server::SignalEmitter;
use zbus::zvariant::{ObjectPath, OwnedObjectPath};
use zbus::{Connection, Guid, interface};

const MODEM_PATH: &str = "/org/freedesktop/ModemManager1/Modem/0";
const SMS_PATH: &str = "/org/freedesktop/ModemManager1/SMS/7";
const TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Stand-in interfaces
// ---------------------------------------------------------------------------

struct FakeSms {
    number: String,
    text: String,
}

#[interface(name = "org.freedesktop.ModemManager1.Sms")]
impl FakeSms {
    #[zbus(property)]
    fn text(&self) -> String {
        self.text.clone()
    }

    #[zbus(property)]
    fn number(&self) -> String {
        self.number.clone()
    }
}

struct FakeMessaging {
    messages: Vec<OwnedObjectPath>,
    deleted: Arc<Mutex<Vec<String>>>,
}

#[interface(name = "org.freedesktop.ModemManager1.Modem.Messaging")]
impl FakeMessaging {
    #[zbus(property)]
    fn messages(&self) -> Vec<OwnedObjectPath> {
        self.messages.clone()
    }

    fn delete(&mut self, path: OwnedObjectPath) {
        self.messages.retain(|queued| queued != &path);
        self.deleted.lock().unwrap().push(path.as_str().to_string());
    }

    #[zbus(signal)]
    async fn added(
        emitter: &SignalEmitter<'_>,
        path: ObjectPath<'_>,
        received: bool,
    ) -> zbus::Result<()>;
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

struct Fixture {
    server: Connection,
    source: ModemManagerSource,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    /// Start a modem at [`MODEM_PATH`] holding `(path, sender, text)` messages.
    async fn start(queued: &[(&'static str, &str, &str)]) -> Self {
        let deleted = Arc::new(Mutex::new(Vec::new()));
        let messaging = FakeMessaging {
            messages: queued
                .iter()
                .map(|(path, _, _)| OwnedObjectPath::try_from(*path).unwrap())
                .collect(),
            deleted: Arc::clone(&deleted),
        };

        let (server_end, client_end) = tokio::net::UnixStream::pair().unwrap();
        let mut server = Builder::unix_stream(server_end)
            .server(Guid::generate())
            .unwrap()
            .p2p()
            .serve_at(ROOT_PATH, ObjectManager)
            .unwrap()
            .serve_at(MODEM_PATH, messaging)
            .unwrap();
        for (path, sender, text) in queued {
            server = server
                .serve_at(
                    *path,
                    FakeSms {
                        number: (*sender).to_string(),
                        text: (*text).to_string(),
                    },
                )
                .unwrap();
        }
        let client = Builder::unix_stream(client_end).p2p();

        let (server, client) = tokio::try_join!(server.build(), client.build()).unwrap();
        Self {
            server,
            source: ModemManagerSource::from_connection(client),
            deleted,
        }
    }

    async fn announce(&self, path: &str) {
        let emitter = SignalEmitter::new(&self.server, MODEM_PATH).unwrap();
        FakeMessaging::added(&emitter, ObjectPath::try_from(path).unwrap(), true)
            .await
            .unwrap();
    }
}

fn queued_sms() -> MessageRef {
    MessageRef::new(SMS_PATH, MODEM_PATH)
}

// ---------------------------------------------------------------------------
// Enumerate / read / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_enumerate_messages_with_owning_modem() {
    let modem = Fixture::start(&[(SMS_PATH, "+10000000000", "System ALERT")]).await;

    let messages = modem.source.list_messages().await.unwrap();

    assert_eq!(messages, vec![queued_sms()]);
}

#[tokio::test]
async fn should_enumerate_nothing_when_queue_is_empty() {
    let modem = Fixture::start(&[]).await;

    assert!(modem.source.list_messages().await.unwrap().is_empty());
}

#[tokio::test]
async fn should_read_sender_and_text() {
    let modem = Fixture::start(&[(SMS_PATH, "+10000000000", "System ALERT triggered")]).await;

    let contents = modem.source.read_contents(&queued_sms()).await.unwrap();

    assert_eq!(
        contents,
        MessageContents::new("+10000000000", "System ALERT triggered")
    );
}

#[tokio::test]
async fn should_fail_to_read_unknown_message() {
    let modem = Fixture::start(&[]).await;
    let missing = MessageRef::new("/org/freedesktop/ModemManager1/SMS/99", MODEM_PATH);

    let result = modem.source.read_contents(&missing).await;

    assert!(matches!(result, Err(SmsRelayError::Source(_))));
}

#[tokio::test]
async fn should_delete_message_through_owning_modem() {
    let modem = Fixture::start(&[(SMS_PATH, "+1", "ping")]).await;

    modem.source.delete_message(&queued_sms()).await.unwrap();

    assert_eq!(*modem.deleted.lock().unwrap(), vec![SMS_PATH.to_string()]);
    assert!(modem.source.list_messages().await.unwrap().is_empty());
}

#[tokio::test]
async fn should_fail_delete_for_modem_without_messaging() {
    let modem = Fixture::start(&[(SMS_PATH, "+1", "ping")]).await;
    let orphan = MessageRef::new(SMS_PATH, "/org/freedesktop/ModemManager1/Modem/5");

    let result = modem.source.delete_message(&orphan).await;

    assert!(matches!(result, Err(SmsRelayError::Source(_))));
    assert!(modem.deleted.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_notify_when_message_is_added() {
    let modem = Fixture::start(&[]).await;
    let notifications = modem.source.subscribe_added().await.unwrap();
    let mut notifications = std::pin::pin!(notifications);

    modem.announce(SMS_PATH).await;

    let next = tokio::time::timeout(TIMEOUT, notifications.next()).await;
    assert_eq!(next.unwrap(), Some(()));
}

#[tokio::test]
async fn should_keep_answering_calls_while_notifications_pile_up() {
    let modem = Fixture::start(&[(SMS_PATH, "+1", "ping")]).await;
    let notifications = modem.source.subscribe_added().await.unwrap();
    let mut notifications = std::pin::pin!(notifications);

    // Far more than zbus buffers for an unread match rule.
    for _ in 0..200 {
        modem.announce(SMS_PATH).await;
    }

    let listed = tokio::time::timeout(TIMEOUT, modem.source.list_messages())
        .await
        .expect("enumeration blocked by unread notifications");
    assert_eq!(listed.unwrap(), vec![queued_sms()]);

    let contents = tokio::time::timeout(TIMEOUT, modem.source.read_contents(&queued_sms()))
        .await
        .expect("property read blocked by unread notifications");
    assert_eq!(contents.unwrap().text, "ping");

    let next = tokio::time::timeout(TIMEOUT, notifications.next()).await;
    assert_eq!(next.unwrap(), Some(()));
}
