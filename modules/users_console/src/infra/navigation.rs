use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::ports::{Navigator, Route};

/// Delivers route changes to the front-end's event loop.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        debug!(path = route.path(), "navigate");
        if self.tx.send(route).is_err() {
            debug!(path = route.path(), "navigation dropped, front-end gone");
        }
    }
}

/// Navigator for one-shot commands where there is nowhere to go.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        debug!(path = route.path(), "navigation requested (no front-end)");
    }
}
