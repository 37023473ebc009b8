//! # The assembled event record and its identity.
//!
//! An [`Event`] is the fully assembled capture record: identity, timestamp,
//! message or exception payload, and the merged scope snapshot (tags,
//! extras, user, breadcrumbs). It exists transiently between the client
//! pipeline and the transport; once wrapped in an envelope it is never
//! mutated.
//!
//! [`EventId`] is a 16-byte random token, rendered as a fixed 32-character
//! lowercase hex string. One is generated per captured event; the client
//! fills it in if the event does not already carry one.
//!
//! ## Example
//! ```rust
//! use faultline::{Event, Level};
//!
//! let ev = Event::from_message("cache warmed", Level::Info)
//!     .with_tag("component", "cache")
//!     .with_transaction("startup");
//!
//! assert_eq!(ev.message.as_deref(), Some("cache warmed"));
//! assert_eq!(ev.level, Level::Info);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::protocol::{Breadcrumb, Exception, Level, User};

/// Unique identity of a captured event.
///
/// 16 random bytes (UUID v4); collision probability within a process
/// lifetime is negligible by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventId(Uuid);

impl EventId {
    /// Generates a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the raw 16 bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    /// Fixed-length 32-character lowercase hex, no hyphens.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl Serialize for EventId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.simple())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Uuid::parse_str(&s)
            .map(EventId)
            .map_err(serde::de::Error::custom)
    }
}

/// The fully assembled capture record.
///
/// Build one directly for `capture_event`, or let the hub convenience
/// methods construct it from a message or an error. Identity and timestamp
/// may be left empty; the client assigns them during the pipeline.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Event {
    /// Identity; filled by the client if absent.
    #[serde(rename = "event_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    /// Wall-clock capture time; filled by the client if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Severity. Defaults to [`Level::Error`].
    pub level: Level,
    /// Plain message payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Exception payload (set for captured errors and recovered panics).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<Exception>,
    /// Transaction / span context, carried through opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    /// Key-value labels, merged from the active scope.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub tags: BTreeMap<String, String>,
    /// Arbitrary structured context, merged from the active scope.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub extra: BTreeMap<String, serde_json::Value>,
    /// User record, merged from the active scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Diagnostic trail, in chronological order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl Event {
    /// Creates an empty event at the default level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an event from a plain message at the given level.
    pub fn from_message(message: impl Into<String>, level: Level) -> Self {
        Self {
            message: Some(message.into()),
            level,
            ..Self::default()
        }
    }

    /// Creates an exception-shaped event from an error value.
    ///
    /// The exception type is the error's type name; the value is its
    /// `Display` rendering. The stacktrace, if wanted, is attached by the
    /// client according to its options.
    ///
    /// Call this with the concrete error type where possible; through a
    /// `dyn Error` reference the type name degrades to `Error`.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self {
            level: Level::Error,
            exception: Some(Exception {
                ty: simplified_type_name::<E>(),
                value: err.to_string(),
                stacktrace: None,
            }),
            ..Self::default()
        }
    }

    /// Creates an exception-shaped event from a recovered panic payload.
    ///
    /// Reported at [`Level::Fatal`]; the payload is rendered with
    /// [`panic_message`](crate::protocol::panic_message). Used by the
    /// hub's `recover` path.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        Self {
            level: Level::Fatal,
            exception: Some(Exception {
                ty: "panic".to_string(),
                value: super::hint::panic_message(payload),
                stacktrace: None,
            }),
            ..Self::default()
        }
    }

    /// Attaches a tag (upsert on the key).
    #[inline]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Attaches an extra value (upsert on the key).
    #[inline]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Overrides the severity.
    #[inline]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Attaches a transaction name.
    #[inline]
    pub fn with_transaction(mut self, transaction: impl Into<String>) -> Self {
        self.transaction = Some(transaction.into());
        self
    }

    /// Attaches a user record.
    #[inline]
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }
}

/// Last path segment of the error's type name.
///
/// `std::io::Error` becomes `Error` with its module context dropped;
/// generic parameters are kept as written.
fn simplified_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    match full.rsplit_once("::") {
        Some((_, tail)) => tail.to_string(),
        None => full.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_display_is_32_hex() {
        let id = EventId::new();
        let rendered = id.to_string();
        assert_eq!(rendered.len(), 32);
        assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_event_id_serde_round_trip() {
        let id = EventId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_from_message_sets_level() {
        let ev = Event::from_message("hi", Level::Warning);
        assert_eq!(ev.level, Level::Warning);
        assert_eq!(ev.message.as_deref(), Some("hi"));
        assert!(ev.id.is_none());
        assert!(ev.timestamp.is_none());
    }

    #[test]
    fn test_from_error_builds_exception() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let ev = Event::from_error(&err);
        let exc = ev.exception.expect("exception payload");
        assert_eq!(exc.value, "boom");
        assert!(!exc.ty.is_empty());
        assert_eq!(ev.level, Level::Error);
    }

    #[test]
    fn test_empty_collections_omitted_from_wire() {
        let ev = Event::from_message("x", Level::Info);
        let json = serde_json::to_value(&ev).unwrap();
        assert!(json.get("tags").is_none());
        assert!(json.get("breadcrumbs").is_none());
        assert!(json.get("exception").is_none());
    }
}
