pub mod channel;
pub mod tracing_notifier;

pub use channel::ChannelNotifier;
pub use tracing_notifier::TracingNotifier;
