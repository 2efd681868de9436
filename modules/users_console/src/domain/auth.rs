use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::contract::client::DirectoryApi;
use crate::contract::model::{Credentials, SessionToken};
use crate::domain::error::ConsoleError;
use crate::domain::messages;
use crate::domain::ports::{Navigator, Notifier, SessionContext};

/// Login flow: exchange credentials for a token, store it, then move on to
/// the user list after `navigate_delay`.
pub struct Authenticator {
    directory: Arc<dyn DirectoryApi>,
    session: Arc<dyn SessionContext>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    navigate_delay: Duration,
}

impl Authenticator {
    pub fn new(
        directory: Arc<dyn DirectoryApi>,
        session: Arc<dyn SessionContext>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        navigate_delay: Duration,
    ) -> Self {
        Self {
            directory,
            session,
            navigator,
            notifier,
            navigate_delay,
        }
    }

    /// The token is stored only when the server accepted the credentials.
    #[instrument(
        name = "users_console.auth.login",
        skip(self, credentials),
        fields(email = %credentials.email)
    )]
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ConsoleError> {
        if credentials.email.trim().is_empty() {
            return Err(ConsoleError::validation("email", "must not be empty"));
        }
        if credentials.password.is_empty() {
            return Err(ConsoleError::validation("password", "must not be empty"));
        }

        let token = match self.directory.login(credentials).await {
            Ok(token) if !token.is_blank() => token,
            Ok(_) => {
                warn!("login answered with an empty token");
                self.notifier.notify_failure(messages::LOGIN_FAILED);
                return Err(ConsoleError::InvalidCredentials);
            }
            Err(e) => {
                warn!(error = %e, "login rejected");
                self.notifier.notify_failure(messages::LOGIN_FAILED);
                return Err(ConsoleError::InvalidCredentials);
            }
        };

        self.session.set(token.clone())?;
        info!("login succeeded");
        self.notifier.notify_success(messages::LOGIN_OK);

        let navigator = self.navigator.clone();
        let delay = self.navigate_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.open_user_list();
        });

        Ok(token)
    }

    /// Drop the stored token.
    pub fn logout(&self) -> Result<(), ConsoleError> {
        self.session.clear()?;
        info!("session cleared");
        Ok(())
    }
}
