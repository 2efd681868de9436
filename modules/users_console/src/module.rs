use std::sync::Arc;

use anyhow::Context;
use modkit::{ClientOptions, TracedClient};
use runtime::AppConfig;
use tracing::{debug, info};
use url::Url;

use crate::config::UsersConsoleConfig;
use crate::contract::client::DirectoryApi;
use crate::domain::auth::Authenticator;
use crate::domain::controller::UserListController;
use crate::domain::ports::{Navigator, Notifier, SessionContext};
use crate::domain::session_guard::SessionGuard;
use crate::infra::directory::HttpDirectoryClient;
use crate::infra::session::FileSessionStore;
use crate::screen::{self, MountedScreen, ScreenOptions};

/// Name of this module's section in `modules`.
pub const MODULE_NAME: &str = runtime::DIRECTORY_MODULE;

/// Wiring root: holds the shared adapters and hands out the domain objects.
#[derive(Clone)]
pub struct UsersConsole {
    config: UsersConsoleConfig,
    directory: Arc<dyn DirectoryApi>,
    session: Arc<dyn SessionContext>,
}

impl UsersConsole {
    pub fn new(
        config: UsersConsoleConfig,
        directory: Arc<dyn DirectoryApi>,
        session: Arc<dyn SessionContext>,
    ) -> Self {
        Self {
            config,
            directory,
            session,
        }
    }

    /// Wire HTTP directory client and file-backed session from app config.
    pub fn from_app_config(app: &AppConfig) -> anyhow::Result<Self> {
        let cfg: UsersConsoleConfig = app.module_config_required(MODULE_NAME)?;
        debug!(
            "Loaded users_console config: base_url={}, reload_after_delete={}",
            cfg.base_url, cfg.reload_after_delete
        );

        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid users_console.base_url '{}'", cfg.base_url))?;

        let mut opts = ClientOptions {
            timeout: cfg.request_timeout(),
            user_agent: Some(concat!("userdesk/", env!("CARGO_PKG_VERSION")).to_string()),
            ..Default::default()
        };
        if let Some(key) = &cfg.api_key {
            opts.default_headers.push(("x-api-key".to_string(), key.clone()));
        }
        let client = TracedClient::with_options(&opts).context("failed to build HTTP client")?;

        let session_path = app.home_dir().join(&cfg.session_file);
        info!(base = %base, session = %session_path.display(), "users_console wired");

        Ok(Self::new(
            cfg,
            Arc::new(HttpDirectoryClient::new(client, base)),
            Arc::new(FileSessionStore::new(session_path)),
        ))
    }

    pub fn config(&self) -> &UsersConsoleConfig {
        &self.config
    }

    pub fn directory(&self) -> Arc<dyn DirectoryApi> {
        self.directory.clone()
    }

    pub fn session(&self) -> Arc<dyn SessionContext> {
        self.session.clone()
    }

    pub fn authenticator(
        &self,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Authenticator {
        Authenticator::new(
            self.directory.clone(),
            self.session.clone(),
            navigator,
            notifier,
            self.config.login_redirect_delay(),
        )
    }

    pub fn session_guard(
        &self,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> SessionGuard {
        SessionGuard::new(
            self.session.clone(),
            navigator,
            notifier,
            self.config.redirect_delay(),
        )
    }

    pub fn controller(&self, notifier: Arc<dyn Notifier>) -> UserListController {
        UserListController::new(self.directory.clone(), notifier)
    }

    /// Guard, then mount the list screen. `None` means a redirect to login
    /// has been scheduled on `navigator`.
    pub fn open_user_list(
        &self,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Option<MountedScreen> {
        let guard = self.session_guard(navigator, notifier.clone());
        let opts = ScreenOptions {
            reload_after_delete: self.config.reload_after_delete,
            ..Default::default()
        };
        screen::open_user_list(&guard, self.controller(notifier), opts)
    }
}
