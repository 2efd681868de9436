use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::contract::model::SessionToken;
use crate::domain::error::ConsoleError;
use crate::domain::ports::SessionContext;

/// Session token persisted in a single file (under the app home dir), so a
/// login survives across invocations of the CLI.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionContext for FileSessionStore {
    /// Unreadable or blank files count as "no session".
    fn get(&self) -> Option<SessionToken> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let raw = raw.trim();
                (!raw.is_empty()).then(|| SessionToken::new(raw))
            }
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!(path = %self.path.display(), error = %e, "session file unreadable");
                }
                None
            }
        }
    }

    fn set(&self, token: SessionToken) -> Result<(), ConsoleError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConsoleError::session(e.to_string()))?;
        }
        fs::write(&self.path, token.as_str())
            .map_err(|e| ConsoleError::session(e.to_string()))?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConsoleError::session(e.to_string())),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), ConsoleError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| ConsoleError::session(e.to_string()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), ConsoleError> {
    Ok(())
}
