use async_trait::async_trait;

use crate::contract::{
    error::DirectoryError,
    model::{Credentials, SessionToken, UserId, UserRecord, UsersPage},
};

/// Contract of the Remote Directory Service as consumed by the console.
///
/// Every failure (transport, non-2xx status, undecodable body) collapses into
/// [`DirectoryError::Network`].
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// `GET users?page={page}`
    async fn list_users(&self, page: u32) -> Result<UsersPage, DirectoryError>;

    /// `PUT users/{id}` with the full record as body; the answer body is ignored.
    async fn update_user(&self, user: &UserRecord) -> Result<(), DirectoryError>;

    /// `DELETE users/{id}`
    async fn delete_user(&self, id: UserId) -> Result<(), DirectoryError>;

    /// `POST login`
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, DirectoryError>;
}
