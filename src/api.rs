//! # Top-level capture API.
//!
//! One-line forwarding functions that route through the process-wide hub
//! ([`Hub::current`]). They exist so straight-line application code can
//! capture without threading a hub around; anything concurrent should
//! derive its own hub ([`Hub::new_from_top`]) and call the methods
//! directly.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use faultline::{ClientOptions, Level};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), faultline::ConfigError> {
//!     faultline::init(ClientOptions::new("https://key@collector.example.com/42"))?;
//!
//!     faultline::capture_message("service started", Level::Info);
//!
//!     // drain pending envelopes before exiting
//!     faultline::flush(Duration::from_secs(2)).await;
//!     Ok(())
//! }
//! ```

use std::any::Any;
use std::time::Duration;

use crate::client::Client;
use crate::config::ClientOptions;
use crate::error::ConfigError;
use crate::hub::{Context, Hub};
use crate::protocol::{Breadcrumb, Event, EventId, Level};
use crate::scope::Scope;

/// Builds a client from the options and binds it to the process-wide hub.
///
/// The configuration error is the only failure ever surfaced; once this
/// returns `Ok`, every capture degrades gracefully instead of raising.
///
/// Spawns the delivery worker, so call it inside a tokio runtime.
pub fn init(options: ClientOptions) -> Result<(), ConfigError> {
    let client = Client::new(options)?;
    Hub::current().bind_client(Some(client));
    Ok(())
}

/// Records a breadcrumb on the current scope of the process-wide hub.
pub fn add_breadcrumb(crumb: Breadcrumb) {
    Hub::current().add_breadcrumb(crumb);
}

/// Captures a plain message at the given level.
pub fn capture_message(message: impl Into<String>, level: Level) -> Option<EventId> {
    Hub::current().capture_message(message, level)
}

/// Captures an error value as an exception-shaped event.
pub fn capture_exception<E>(err: &E) -> Option<EventId>
where
    E: std::error::Error + ?Sized,
{
    Hub::current().capture_exception(err)
}

/// Captures a prebuilt event.
///
/// The event must already be assembled; most code wants
/// [`capture_message`] or [`capture_exception`] instead. Returns `None`
/// when no client is bound or the event was dropped along the pipeline.
pub fn capture_event(event: Event) -> Option<EventId> {
    Hub::current().capture_event(event)
}

/// Captures a recovered panic payload as a fatal event.
///
/// Pair with `std::panic::catch_unwind`; whether to resume unwinding
/// afterwards stays the caller's decision:
///
/// ```no_run
/// if let Err(payload) = std::panic::catch_unwind(|| risky_work()) {
///     faultline::recover(payload.as_ref());
///     // std::panic::resume_unwind(payload) to re-raise, or swallow it
/// }
/// # fn risky_work() {}
/// ```
pub fn recover(payload: &(dyn Any + Send)) -> Option<EventId> {
    Hub::current().recover(payload)
}

/// Like [`recover`], but prefers the hub bound to `ctx` over the
/// process-wide one.
pub fn recover_with_context(ctx: &Context, payload: &(dyn Any + Send)) -> Option<EventId> {
    ctx.hub_or_current().recover(payload)
}

/// Runs `callback` inside a temporary scope on the process-wide hub.
pub fn with_scope<C, F, R>(scope_config: C, callback: F) -> R
where
    C: FnOnce(&mut Scope),
    F: FnOnce() -> R,
{
    Hub::current().with_scope(scope_config, callback)
}

/// Mutates the current scope of the process-wide hub in place.
pub fn configure_scope<C>(scope_config: C)
where
    C: FnOnce(&mut Scope),
{
    Hub::current().configure_scope(scope_config);
}

/// Pushes a cloned scope frame on the process-wide hub.
pub fn push_scope() {
    Hub::current().push_scope();
}

/// Pops the top scope frame of the process-wide hub (never the base frame).
pub fn pop_scope() {
    Hub::current().pop_scope();
}

/// Waits until pending envelopes drain or the deadline passes.
pub async fn flush(timeout: Duration) -> bool {
    Hub::current().flush(timeout).await
}

/// Identity of the most recent event captured through the process-wide hub.
pub fn last_event_id() -> Option<EventId> {
    Hub::current().last_event_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_surfaces_config_error_without_binding() {
        let err = init(ClientOptions::new("definitely not a dsn")).unwrap_err();
        assert_eq!(err.as_label(), "config_invalid_dsn");
    }
}
