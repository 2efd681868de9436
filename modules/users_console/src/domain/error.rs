use thiserror::Error;

use crate::contract::model::UserId;

/// Local precondition failures. None of these ever reach the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("No edit in progress")]
    NoDraft,

    #[error("User {id} is not on the current page")]
    UnknownUser { id: UserId },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session storage error: {message}")]
    Session { message: String },
}

impl ConsoleError {
    pub fn unknown_user(id: UserId) -> Self {
        Self::UnknownUser { id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }
}
