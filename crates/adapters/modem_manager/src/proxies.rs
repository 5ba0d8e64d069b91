//! Typed D-Bus proxies for the ModemManager interfaces we touch.

use zbus::proxy;
use zbus::zvariant::ObjectPath;

#[proxy(
    interface = "org.freedesktop.ModemManager1.Modem.Messaging",
    default_service = "org.freedesktop.ModemManager1",
    gen_blocking = false
)]
pub(crate) trait Messaging {
    /// Delete an SMS message owned by this modem.
    fn delete(&self, path: &ObjectPath<'_>) -> zbus::Result<()>;
}

#[proxy(
    interface = "org.freedesktop.ModemManager1.Sms",
    default_service = "org.freedesktop.ModemManager1",
    gen_blocking = false
)]
pub(crate) trait Sms {
    /// Message body.
    #[zbus(property)]
    fn text(&self) -> zbus::Result<String>;

    /// Sender (or recipient, for outgoing messages) number.
    #[zbus(property)]
    fn number(&self) -> zbus::Result<String>;
}
