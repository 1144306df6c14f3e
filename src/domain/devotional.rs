use serde::{Deserialize, Serialize};

/// One devotional per calendar date, keyed by its `YYYY-MM-DD` string.
/// Created on demand; after creation only `is_read` ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Devotional {
    pub date: String,
    pub title: String,
    pub verse_reference: String,
    pub verse_text: String,
    pub body: String,
    pub prayer: Option<String>,
    pub is_read: bool,
    pub created_at: i64,
}
