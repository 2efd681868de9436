use crate::contract::model::SessionToken;
use crate::domain::error::ConsoleError;

/// Process-wide holder of the session token.
///
/// Injected into the session guard and the authenticator; nothing else reads
/// or writes the token.
pub trait SessionContext: Send + Sync + 'static {
    fn get(&self) -> Option<SessionToken>;
    fn set(&self, token: SessionToken) -> Result<(), ConsoleError>;
    fn clear(&self) -> Result<(), ConsoleError>;

    fn has_active_session(&self) -> bool {
        self.get().is_some_and(|t| !t.is_blank())
    }
}
