use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier. Never generated locally.
pub type UserId = i64;

/// A single directory entry as exchanged with the Remote Directory Service.
///
/// Wire names follow the remote API (`first_name`, `avatar`, ...); unknown
/// fields in responses are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Opaque avatar reference; never validated or edited locally.
    #[serde(rename = "avatar", default)]
    pub avatar_url: String,
}

/// One page of `GET users?page={n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersPage {
    pub data: Vec<UserRecord>,
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
}

impl UsersPage {
    pub fn new(data: Vec<UserRecord>, total_pages: u32) -> Self {
        Self {
            data,
            total_pages,
            page: None,
            per_page: None,
            total: None,
        }
    }
}

/// Body of `POST login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer credential issued by the directory's login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Answer of `POST login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: SessionToken,
}
