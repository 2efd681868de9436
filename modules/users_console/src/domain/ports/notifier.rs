use std::fmt;

/// Severity of a user-facing status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Warning,
    Failure,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Failure => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Output port: fire-and-forget status messages. Implementations must not
/// block and nothing they do feeds back into controller state.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notification: Notification);

    fn notify_success(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Success,
            message: message.to_string(),
        });
    }

    fn notify_warning(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Warning,
            message: message.to_string(),
        });
    }

    fn notify_failure(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Failure,
            message: message.to_string(),
        });
    }
}
