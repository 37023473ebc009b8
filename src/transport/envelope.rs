//! # Envelope: the wire contract handed to the collector.
//!
//! An [`Envelope`] wraps one finished [`Event`] together with its
//! identity, the send timestamp, a payload classification, and optional
//! hint metadata (the raw signal the event was derived from). It is the
//! unit the transport queues, retries, and delivers; once built it is
//! never mutated.
//!
//! The exact bytes on the wire belong to the [`Sender`](crate::Sender)
//! implementation; this type only fixes the serializable shape.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::protocol::{Event, EventHint, EventId};

/// Classification of an envelope's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    /// Plain captured message.
    Message,
    /// Handled error captured via `capture_exception`.
    Exception,
    /// Panic-derived event captured via `recover`.
    Recovered,
}

/// Hint metadata carried alongside the event, rendered to plain strings.
#[derive(Clone, Debug, Serialize)]
pub struct HintMeta {
    /// `Display` rendering of the original error, for exception captures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_exception: Option<String>,
    /// Rendered panic payload, for recovered captures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered_panic: Option<String>,
}

/// One deliverable unit: identity, classification, event, hint metadata.
#[derive(Clone, Debug, Serialize)]
pub struct Envelope {
    /// Identity, equal to the wrapped event's id.
    pub event_id: EventId,
    /// When the envelope was assembled.
    pub sent_at: DateTime<Utc>,
    /// Payload classification.
    pub kind: PayloadKind,
    /// The finished event.
    pub event: Event,
    /// Raw-signal metadata, absent for plain messages and prebuilt events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<HintMeta>,
}

impl Envelope {
    /// Wraps a finished event.
    ///
    /// The event is expected to carry an id already (the client assigns
    /// one in its pipeline); one is filled in here as a fallback so an
    /// envelope is never unidentifiable.
    pub fn new(mut event: Event, hint: &EventHint) -> Self {
        let event_id = *event.id.get_or_insert_with(EventId::new);
        let kind = if hint.is_recovered() {
            PayloadKind::Recovered
        } else if event.exception.is_some() {
            PayloadKind::Exception
        } else {
            PayloadKind::Message
        };
        let hint_meta = if hint.is_recovered() || hint.is_exception() {
            Some(HintMeta {
                original_exception: hint.original_exception.as_deref().map(str::to_string),
                recovered_panic: hint.recovered_panic.as_deref().map(str::to_string),
            })
        } else {
            None
        };
        Self {
            event_id,
            sent_at: Utc::now(),
            kind,
            event,
            hint: hint_meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Level;

    #[test]
    fn test_kind_message() {
        let env = Envelope::new(Event::from_message("x", Level::Info), &EventHint::none());
        assert_eq!(env.kind, PayloadKind::Message);
        assert!(env.hint.is_none());
    }

    #[test]
    fn test_kind_exception_with_hint() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let env = Envelope::new(Event::from_error(&err), &EventHint::for_exception(&err));
        assert_eq!(env.kind, PayloadKind::Exception);
        let hint = env.hint.expect("hint meta");
        assert_eq!(hint.original_exception.as_deref(), Some("boom"));
        assert!(hint.recovered_panic.is_none());
    }

    #[test]
    fn test_kind_recovered() {
        let payload = std::panic::catch_unwind(|| panic!("sideways")).unwrap_err();
        let env = Envelope::new(
            Event::from_panic(payload.as_ref()),
            &EventHint::for_panic(payload.as_ref()),
        );
        assert_eq!(env.kind, PayloadKind::Recovered);
        let hint = env.hint.expect("hint meta");
        assert_eq!(hint.recovered_panic.as_deref(), Some("sideways"));
    }

    #[test]
    fn test_envelope_id_matches_event_id() {
        let mut event = Event::from_message("x", Level::Info);
        let id = crate::protocol::EventId::new();
        event.id = Some(id);
        let env = Envelope::new(event, &EventHint::none());
        assert_eq!(env.event_id, id);
        assert_eq!(env.event.id, Some(id));
    }

    #[test]
    fn test_serialized_id_is_simple_hex() {
        let env = Envelope::new(Event::from_message("x", Level::Info), &EventHint::none());
        let json = serde_json::to_value(&env).unwrap();
        let id = json["event_id"].as_str().unwrap();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }
}
