//! # Breadcrumbs: the diagnostic trail recorded before an event.
//!
//! A [`Breadcrumb`] is a small timestamped record of something the host
//! program did (a query, a request, a state change). Breadcrumbs accumulate
//! in the active scope's bounded ring and are attached, in chronological
//! order, to every event captured while the scope is active.
//!
//! Once appended to a scope a breadcrumb is never mutated.
//!
//! ## Example
//! ```rust
//! use faultline::{Breadcrumb, Level};
//!
//! let crumb = Breadcrumb::new("cache miss for user profile")
//!     .with_category("cache")
//!     .with_level(Level::Debug)
//!     .with_data("key", serde_json::json!("user:42"));
//!
//! assert_eq!(crumb.category.as_deref(), Some("cache"));
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::Level;

/// A single diagnostic trail entry.
///
/// Created via [`Breadcrumb::new`] plus `with_*` builders; the timestamp is
/// taken at construction time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// When the breadcrumb was recorded.
    pub timestamp: DateTime<Utc>,
    /// Logical grouping (e.g. "http", "db", "auth").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Severity of the recorded step.
    pub level: Level,
    /// Structured payload attached to the entry.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Breadcrumb {
    /// Creates a breadcrumb with the given message, timestamped now,
    /// at [`Level::Info`].
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            category: None,
            message: Some(message.into()),
            level: Level::Info,
            data: BTreeMap::new(),
        }
    }

    /// Attaches a category.
    #[inline]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Overrides the severity.
    #[inline]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Adds one structured data entry (upsert on the key).
    #[inline]
    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let b = Breadcrumb::new("hello");
        assert_eq!(b.message.as_deref(), Some("hello"));
        assert_eq!(b.level, Level::Info);
        assert!(b.category.is_none());
        assert!(b.data.is_empty());
    }

    #[test]
    fn test_with_data_upserts() {
        let b = Breadcrumb::new("x")
            .with_data("k", serde_json::json!(1))
            .with_data("k", serde_json::json!(2));
        assert_eq!(b.data["k"], serde_json::json!(2));
    }

    #[test]
    fn test_empty_data_omitted_from_wire() {
        let b = Breadcrumb::new("x");
        let json = serde_json::to_value(&b).unwrap();
        assert!(json.get("data").is_none());
    }
}
