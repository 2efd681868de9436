use crate::contract::model::UserRecord;

/// Case-insensitive substring search over `"{first} {last} {email}"`.
///
/// Only ever applied to the records of the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    query: String,
    needle: String,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let needle = query.to_lowercase();
        Self { query, needle }
    }

    /// The query as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, user: &UserRecord) -> bool {
        self.is_empty() || haystack(user).contains(&self.needle)
    }

    /// Matching records in their original relative order.
    pub fn apply(&self, records: &[UserRecord]) -> Vec<UserRecord> {
        records
            .iter()
            .filter(|u| self.matches(u))
            .cloned()
            .collect()
    }
}

fn haystack(user: &UserRecord) -> String {
    format!("{} {} {}", user.first_name, user.last_name, user.email).to_lowercase()
}
