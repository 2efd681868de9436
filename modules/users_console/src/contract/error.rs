use modkit::HttpError;
use thiserror::Error;

/// The only error kind the Remote Directory Service surfaces: the request
/// could not complete or came back with an error status. 404 and 500 are not
/// told apart by callers; `status` is kept for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("network failure: {message}")]
    Network {
        message: String,
        status: Option<u16>,
    },
}

impl DirectoryError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
        }
    }
}

impl From<HttpError> for DirectoryError {
    fn from(e: HttpError) -> Self {
        Self::Network {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}
