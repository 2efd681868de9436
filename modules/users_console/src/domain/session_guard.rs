use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::domain::messages;
use crate::domain::ports::{Navigator, Notifier, SessionContext};

/// Result of the one-shot entry check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// A session token is present; the list screen may start.
    Granted,
    /// No token; a redirect to the login screen has been scheduled.
    Redirecting,
}

/// Gate in front of the user list screen.
pub struct SessionGuard {
    session: Arc<dyn SessionContext>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    redirect_delay: Duration,
}

impl SessionGuard {
    pub fn new(
        session: Arc<dyn SessionContext>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            session,
            navigator,
            notifier,
            redirect_delay,
        }
    }

    /// Evaluate once per mount. Without a session the warning is shown right
    /// away and the redirect fires after `redirect_delay` so it stays visible.
    ///
    /// Must be called inside a Tokio runtime.
    #[instrument(name = "users_console.session_guard.check", skip(self))]
    pub fn check(&self) -> GuardDecision {
        if self.session.has_active_session() {
            return GuardDecision::Granted;
        }

        info!(
            delay_ms = self.redirect_delay.as_millis() as u64,
            "no session, redirecting to login"
        );
        self.notifier.notify_failure(messages::UNAUTHORIZED);

        let navigator = self.navigator.clone();
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.redirect_to_login();
        });

        GuardDecision::Redirecting
    }
}
