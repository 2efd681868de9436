use tokio::sync::mpsc;

use crate::domain::ports::{Notification, Notifier};
use crate::infra::notify::tracing_notifier::log_notification;

/// Forwards notifications to a front-end over an unbounded channel.
/// Sending never blocks; with the receiver gone messages are only logged.
#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);
        let _ = self.tx.send(notification);
    }
}
