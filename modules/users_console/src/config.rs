use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the users_console module (`modules.users_console`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersConsoleConfig {
    /// Root of the Remote Directory Service; `users`, `login` live below it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as `x-api-key` on every request when set.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout. Unset: requests may hang indefinitely.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Delay between the "unauthorized" warning and the redirect to login.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    /// Delay between a successful login and opening the user list.
    #[serde(default = "default_login_redirect_delay_ms")]
    pub login_redirect_delay_ms: u64,
    /// Reload the current page after a successful delete.
    #[serde(default)]
    pub reload_after_delete: bool,
    /// Session token file, relative to the app home dir.
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for UsersConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_ms: None,
            redirect_delay_ms: default_redirect_delay_ms(),
            login_redirect_delay_ms: default_login_redirect_delay_ms(),
            reload_after_delete: false,
            session_file: default_session_file(),
        }
    }
}

impl UsersConsoleConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.login_redirect_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn default_base_url() -> String {
    "https://reqres.in/api".to_string()
}

fn default_redirect_delay_ms() -> u64 {
    1500
}

fn default_login_redirect_delay_ms() -> u64 {
    2000
}

fn default_session_file() -> String {
    "session.token".to_string()
}
