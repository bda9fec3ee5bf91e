use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code and the URL it redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub code: String,
    pub url: String,
    #[serde(default)]
    pub click_count: u64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Result of an insert against the unique `code` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Link),
    /// The store rejected the row because the code already exists
    Conflict,
}
