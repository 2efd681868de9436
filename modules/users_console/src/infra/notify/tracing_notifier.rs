use tracing::{info, warn};

use crate::domain::ports::{Notification, NotificationLevel, Notifier};

/// Notifier that only writes to the log. Used by non-interactive commands
/// and as the fallback when no front-end listens.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

pub(crate) fn log_notification(n: &Notification) {
    match n.level {
        NotificationLevel::Success => {
            info!(target: "users_console::notify", level = %n.level, "{}", n.message)
        }
        NotificationLevel::Warning | NotificationLevel::Failure => {
            warn!(target: "users_console::notify", level = %n.level, "{}", n.message)
        }
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);
    }
}
