use async_trait::async_trait;
use modkit::TracedClient;
use tracing::instrument;
use url::Url;

use crate::contract::client::DirectoryApi;
use crate::contract::error::DirectoryError;
use crate::contract::model::{
    Credentials, LoginResponse, SessionToken, UserId, UserRecord, UsersPage,
};

/// HTTP adapter for the Remote Directory Service.
/// All paths are resolved below `base` (e.g. `https://reqres.in/api`).
pub struct HttpDirectoryClient {
    client: TracedClient,
    base: Url,
}

impl HttpDirectoryClient {
    pub fn new(client: TracedClient, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DirectoryError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DirectoryError::network(format!("invalid directory base URL: {}", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    #[instrument(
        name = "users_console.http.directory.list_users",
        skip_all,
        fields(base = %self.base, page = page)
    )]
    async fn list_users(&self, page: u32) -> Result<UsersPage, DirectoryError> {
        let mut url = self.endpoint(&["users"])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());

        Ok(self.client.get_json::<UsersPage>(url.as_str()).await?)
    }

    #[instrument(
        name = "users_console.http.directory.update_user",
        skip_all,
        fields(base = %self.base, user_id = user.id)
    )]
    async fn update_user(&self, user: &UserRecord) -> Result<(), DirectoryError> {
        let url = self.endpoint(&["users", &user.id.to_string()])?;
        self.client.put_json(url.as_str(), user).await?;
        Ok(())
    }

    #[instrument(
        name = "users_console.http.directory.delete_user",
        skip_all,
        fields(base = %self.base, user_id = id)
    )]
    async fn delete_user(&self, id: UserId) -> Result<(), DirectoryError> {
        let url = self.endpoint(&["users", &id.to_string()])?;
        self.client.delete(url.as_str()).await?;
        Ok(())
    }

    #[instrument(
        name = "users_console.http.directory.login",
        skip_all,
        fields(base = %self.base, email = %credentials.email)
    )]
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, DirectoryError> {
        let url = self.endpoint(&["login"])?;
        let answer: LoginResponse = self.client.post_json(url.as_str(), credentials).await?;
        Ok(answer.token)
    }
}
