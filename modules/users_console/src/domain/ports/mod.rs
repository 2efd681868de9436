pub mod navigator;
pub mod notifier;
pub mod session;

pub use navigator::{Navigator, Route};
pub use notifier::{Notification, NotificationLevel, Notifier};
pub use session::SessionContext;
