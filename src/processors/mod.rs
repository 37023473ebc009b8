//! # Event processors: the mutation/filter pipeline.
//!
//! Provides [`EventProcessor`], an extension point for inspecting and
//! rewriting events before they are merged with the scope and handed to
//! the transport.
//!
//! ## Rules
//! - Processors run **in registration order** on the capture path (no
//!   worker task, no await).
//! - A processor returns the (possibly mutated) event to keep it, or
//!   `None` to drop it; the first drop short-circuits the rest of the
//!   pipeline.
//! - A panicking processor is caught by the client and counted as a drop;
//!   capture never unwinds into the host program.
//!
//! ## Implementing a processor
//! ```rust
//! use faultline::{Event, EventHint, EventProcessor};
//!
//! /// Strips noisy extras and drops recovered panics from a test build.
//! struct ScrubExtras;
//!
//! impl EventProcessor for ScrubExtras {
//!     fn process(&self, mut event: Event, hint: &EventHint) -> Option<Event> {
//!         if hint.is_recovered() {
//!             return None;
//!         }
//!         event.extra.remove("request_body");
//!         Some(event)
//!     }
//!
//!     fn name(&self) -> &str { "scrub-extras" }
//! }
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::protocol::{Event, EventHint};

/// Hook run against every event before scope merge and sampling.
///
/// Implementations must be cheap and must not block: they run on the
/// capturing caller's thread of control.
pub trait EventProcessor: Send + Sync + 'static {
    /// Inspects one event.
    ///
    /// Return `Some(event)` (mutated or not) to keep it, `None` to drop
    /// it. The hint distinguishes ordinary errors from recovered panics.
    fn process(&self, event: Event, hint: &EventHint) -> Option<Event>;

    /// Returns the processor name used in drop diagnostics.
    ///
    /// Prefer short, descriptive names (e.g. "scrub-pii", "dedupe").
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Function-backed processor implementation.
///
/// Wraps a closure so ad-hoc pipelines do not need a named type.
pub struct ProcessorFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProcessorFn<F>
where
    F: Fn(Event, &EventHint) -> Option<Event> + Send + Sync + 'static,
{
    /// Creates a new function-backed processor.
    ///
    /// Prefer [`ProcessorFn::arc`] when you immediately need an
    /// `Arc<dyn EventProcessor>` for [`ClientOptions::with_processor`](crate::ClientOptions::with_processor).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the processor and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use faultline::{Event, EventHint, Level, ProcessorFn};
    ///
    /// let drop_debug = ProcessorFn::arc("drop-debug", |event: Event, _hint: &EventHint| {
    ///     (event.level > Level::Debug).then_some(event)
    /// });
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> EventProcessor for ProcessorFn<F>
where
    F: Fn(Event, &EventHint) -> Option<Event> + Send + Sync + 'static,
{
    fn process(&self, event: Event, hint: &EventHint) -> Option<Event> {
        (self.f)(event, hint)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Level;

    #[test]
    fn test_processor_fn_keeps_and_mutates() {
        let tagger = ProcessorFn::new("tagger", |event: Event, _: &EventHint| {
            Some(event.with_tag("seen", "yes"))
        });
        let ev = tagger
            .process(Event::from_message("x", Level::Info), &EventHint::none())
            .expect("kept");
        assert_eq!(ev.tags["seen"], "yes");
    }

    #[test]
    fn test_processor_fn_drops() {
        let censor = ProcessorFn::new("censor", |_: Event, _: &EventHint| None);
        let out = censor.process(Event::new(), &EventHint::none());
        assert!(out.is_none());
    }

    #[test]
    fn test_named_processor() {
        let p = ProcessorFn::new("short-name", |e: Event, _: &EventHint| Some(e));
        assert_eq!(p.name(), "short-name");
    }
}
