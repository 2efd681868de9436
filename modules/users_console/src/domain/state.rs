use std::fmt;
use std::str::FromStr;

use crate::contract::model::{UserId, UserRecord};
use crate::domain::error::ConsoleError;

/// Server-authoritative pagination cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl PageState {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// The three fields a draft may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    FirstName,
    LastName,
    Email,
}

impl EditableField {
    pub const ALL: [EditableField; 3] = [Self::FirstName, Self::LastName, Self::Email];

    pub fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EditableField {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "first_name" | "firstname" => Ok(Self::FirstName),
            "last" | "last_name" | "lastname" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            other => Err(ConsoleError::validation(
                "field",
                format!("'{other}' is not editable (first, last, email)"),
            )),
        }
    }
}

/// Snapshot of one record being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    record: UserRecord,
}

impl EditDraft {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            record: record.clone(),
        }
    }

    pub fn id(&self) -> UserId {
        self.record.id
    }

    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    pub fn get(&self, field: EditableField) -> &str {
        match field {
            EditableField::FirstName => &self.record.first_name,
            EditableField::LastName => &self.record.last_name,
            EditableField::Email => &self.record.email,
        }
    }

    pub fn set(&mut self, field: EditableField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EditableField::FirstName => self.record.first_name = value,
            EditableField::LastName => self.record.last_name = value,
            EditableField::Email => self.record.email = value,
        }
    }

    /// Every editable field must be non-blank.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        for field in EditableField::ALL {
            if self.get(field).trim().is_empty() {
                return Err(ConsoleError::validation(field.name(), "must not be empty"));
            }
        }
        Ok(())
    }

    /// `base` with this draft's editable fields applied. Identity and avatar
    /// always come from `base`.
    pub fn merge_into(&self, base: &UserRecord) -> UserRecord {
        UserRecord {
            id: base.id,
            first_name: self.record.first_name.clone(),
            last_name: self.record.last_name.clone(),
            email: self.record.email.clone(),
            avatar_url: base.avatar_url.clone(),
        }
    }
}

/// Coarse controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Loading(u32),
    Editing(UserId),
}

/// Result of a network-backed operation after it has been reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Response applied to local state.
    Applied,
    /// Request failed; local state unchanged, failure notified.
    Failed,
    /// Response arrived for a superseded request and was dropped.
    Discarded,
}

/// Ticket for an issued page read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub generation: u64,
}

/// Ticket for an issued update; `payload` is exactly what was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub payload: UserRecord,
}

/// Ticket for an issued delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: UserId,
}
