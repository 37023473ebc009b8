//! Supporting protocol value types: severity, user identity, exception payload.

use serde::{Deserialize, Serialize};

/// Severity of an event or breadcrumb.
///
/// Ordered from least to most severe; serialized lowercase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Diagnostic detail, normally filtered out server-side.
    Debug,
    /// Informational message.
    Info,
    /// Something unexpected but recoverable.
    Warning,
    /// A handled error.
    Error,
    /// An unrecoverable fault (recovered panics are reported at this level).
    Fatal,
}

impl Default for Level {
    /// Events default to [`Level::Error`]; plain messages are captured
    /// at [`Level::Info`] by the convenience constructors.
    fn default() -> Self {
        Level::Error
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// The user on whose behalf the host program was acting.
///
/// All fields are optional; empty fields are omitted from the wire format.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable application-level identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Login or display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Remote address, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

/// Exception payload of an event: type name, message, optional stacktrace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    /// Short type name (e.g. `io::Error`).
    #[serde(rename = "type")]
    pub ty: String,
    /// Rendered error message.
    pub value: String,
    /// Rendered stacktrace, when capture was enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Warning).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&Level::Fatal).unwrap(), "\"fatal\"");
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_user_omits_empty_fields() {
        let user = User {
            id: Some("42".into()),
            ..User::default()
        };
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, "{\"id\":\"42\"}");
    }
}
