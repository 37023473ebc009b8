//! # Capture hints: telling ordinary errors apart from recovered panics.
//!
//! An [`EventHint`] travels alongside an event through the processor
//! pipeline but is never serialized into the event body. It carries the
//! raw signal the event was built from, rendered to plain data at the
//! capture boundary:
//!
//! - `original_exception` is set by `capture_exception`;
//! - `recovered_panic` is set by `recover` / `recover_with_context`.
//!
//! Processors use [`EventHint::is_recovered`] to treat panic-derived
//! events differently from handled errors (e.g. route them to a pager).

use std::any::Any;
use std::sync::Arc;

/// Side-channel metadata attached to a capture call.
///
/// At most one of the two fields is set; both empty means the event came
/// from a plain message or was prebuilt by the caller.
#[derive(Clone, Debug, Default)]
pub struct EventHint {
    /// `Display` rendering of the original error passed to
    /// `capture_exception`.
    pub original_exception: Option<Arc<str>>,
    /// Rendering of the panic payload passed to `recover`.
    pub recovered_panic: Option<Arc<str>>,
}

impl EventHint {
    /// An empty hint (plain message or prebuilt event).
    pub fn none() -> Self {
        Self::default()
    }

    /// Hint for an ordinary captured error.
    pub fn for_exception<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self {
            original_exception: Some(Arc::from(err.to_string().as_str())),
            recovered_panic: None,
        }
    }

    /// Hint for a recovered panic; the payload is rendered via
    /// [`panic_message`].
    pub fn for_panic(payload: &(dyn Any + Send)) -> Self {
        Self {
            original_exception: None,
            recovered_panic: Some(Arc::from(panic_message(payload).as_str())),
        }
    }

    /// True when this event was derived from a recovered panic.
    pub fn is_recovered(&self) -> bool {
        self.recovered_panic.is_some()
    }

    /// True when this event was derived from a captured error value.
    pub fn is_exception(&self) -> bool {
        self.original_exception.is_some()
    }
}

/// Renders a panic payload to a string.
///
/// `&str` and `String` payloads (the overwhelmingly common cases, produced
/// by `panic!` with a message) are captured verbatim; anything else
/// becomes an opaque placeholder.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
