use parking_lot::RwLock;

use crate::contract::model::SessionToken;
use crate::domain::error::ConsoleError;
use crate::domain::ports::SessionContext;

/// Session token kept for the lifetime of the process only.
#[derive(Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<SessionToken>>,
}

impl MemorySessionStore {
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl SessionContext for MemorySessionStore {
    fn get(&self) -> Option<SessionToken> {
        self.token.read().clone()
    }

    fn set(&self, token: SessionToken) -> Result<(), ConsoleError> {
        *self.token.write() = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        *self.token.write() = None;
        Ok(())
    }
}
