//! # Hub: routing captures through the active (Scope, Client) frame.
//!
//! A [`Hub`] owns a stack of frames, each pairing a [`Scope`] with an
//! optional [`Client`] reference. The top frame is the active one; every
//! capture, recovery, and scope operation goes through it.
//!
//! ## Architecture
//! ```text
//! caller ──► Hub (frame stack)
//!              │  top frame = (Scope, Option<Arc<Client>>)
//!              │
//!              ├─ push_scope ──► clone top frame (same client, deep scope copy)
//!              ├─ pop_scope  ──► discard top frame (never the base frame)
//!              │
//!              └─ capture_* ──► Client pipeline ──► Transport ──► collector
//! ```
//!
//! ## Rules
//! - The frame stack is **never empty**: popping the base frame is a no-op.
//! - With no bound client every capture is a no-op returning `None`.
//! - Capture operations never panic and never block; `flush` is the only
//!   suspension point.
//!
//! ## Concurrency
//! A single hub serializes its own frame mutations behind a mutex with
//! short critical sections, but the intended pattern is **one hub per
//! logical unit of work**: derive one per request/task with
//! [`Hub::new_from_top`] and let the process-wide hub serve
//! single-threaded or globally-serialized use only.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use crate::client::Client;
use crate::config::DEFAULT_MAX_BREADCRUMBS;
use crate::protocol::{Breadcrumb, Event, EventHint, EventId, Level};
use crate::scope::Scope;

mod context;

pub use context::Context;

/// One stack entry: a scope plus the client active while it is on top.
#[derive(Clone)]
struct Frame {
    client: Option<Arc<Client>>,
    scope: Scope,
}

struct HubInner {
    stack: Vec<Frame>,
    last_event_id: Option<EventId>,
}

/// Entry point for all capture operations in one logical execution context.
///
/// ## Example
/// ```rust
/// use faultline::Hub;
///
/// let hub = Hub::current();
/// // no client bound yet: captures are silent no-ops
/// assert!(hub.capture_message("nobody listening", faultline::Level::Info).is_none());
/// ```
pub struct Hub {
    inner: Mutex<HubInner>,
}

/// Process-wide default hub, created lazily on first use.
static PROCESS_HUB: OnceLock<Arc<Hub>> = OnceLock::new();

impl Hub {
    /// Creates a hub with a single base frame.
    pub fn new(client: Option<Arc<Client>>, scope: Scope) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                stack: vec![Frame { client, scope }],
                last_event_id: None,
            }),
        }
    }

    /// Creates an independent hub from the top frame of `other`.
    ///
    /// The client reference is shared; the scope is deep-copied. This is
    /// the intended way to give each request/task its own hub.
    pub fn new_from_top(other: &Hub) -> Self {
        let frame = other.lock().stack.last().cloned();
        match frame {
            Some(frame) => Self::new(frame.client, frame.scope),
            None => Self::new(None, Scope::default()),
        }
    }

    /// Returns the process-wide hub, creating it (unbound) on first use.
    ///
    /// Never returns an unusable hub: before [`init`](crate::init) binds a
    /// client, captures through it are silent no-ops.
    pub fn current() -> Arc<Hub> {
        PROCESS_HUB
            .get_or_init(|| Arc::new(Hub::new(None, Scope::default())))
            .clone()
    }

    /// Replaces the client in the top frame; the scope is untouched.
    pub fn bind_client(&self, client: Option<Arc<Client>>) {
        let mut inner = self.lock();
        if let Some(frame) = inner.stack.last_mut() {
            frame.client = client;
        }
    }

    /// Returns the client bound to the top frame, if any.
    pub fn client(&self) -> Option<Arc<Client>> {
        self.lock().stack.last().and_then(|f| f.client.clone())
    }

    /// Pushes a clone of the top frame (same client, deep scope copy).
    ///
    /// Scope mutations after the push stay invisible to ancestor frames.
    pub fn push_scope(&self) {
        let mut inner = self.lock();
        if let Some(top) = inner.stack.last().cloned() {
            inner.stack.push(top);
        }
    }

    /// Discards the top frame, down to but not below the base frame.
    ///
    /// Popping the base frame is a no-op, not an error.
    pub fn pop_scope(&self) {
        let mut inner = self.lock();
        if inner.stack.len() > 1 {
            inner.stack.pop();
        }
    }

    /// Runs `callback` inside a temporary scope.
    ///
    /// Pushes a frame, applies `scope_config` to the new top scope, runs
    /// `callback`, and pops the frame again. The pop is guaranteed even
    /// if either closure panics.
    ///
    /// ## Example
    /// ```rust
    /// use faultline::Hub;
    ///
    /// let hub = Hub::new(None, Default::default());
    /// hub.with_scope(
    ///     |scope| scope.set_tag("section", "checkout"),
    ///     || {
    ///         // captures here carry section=checkout
    ///     },
    /// );
    /// // the temporary frame is gone again
    /// ```
    pub fn with_scope<C, F, R>(&self, scope_config: C, callback: F) -> R
    where
        C: FnOnce(&mut Scope),
        F: FnOnce() -> R,
    {
        self.push_scope();
        let _pop = PopGuard(self);
        self.configure_scope(scope_config);
        callback()
    }

    /// Mutates the current top scope in place (no push/pop).
    ///
    /// The closure works on a copy that is written back when it returns,
    /// so re-entrant hub calls inside the closure cannot deadlock; capture
    /// calls made inside the closure observe the scope as it was before.
    pub fn configure_scope<C>(&self, scope_config: C)
    where
        C: FnOnce(&mut Scope),
    {
        let staged = self.lock().stack.last().map(|f| f.scope.clone());
        let Some(mut scope) = staged else { return };
        scope_config(&mut scope);
        if let Some(frame) = self.lock().stack.last_mut() {
            frame.scope = scope;
        }
    }

    /// Records a breadcrumb on the current scope.
    ///
    /// The ring capacity comes from the bound client's `max_breadcrumbs`
    /// (default 100 while unbound).
    pub fn add_breadcrumb(&self, crumb: Breadcrumb) {
        let mut inner = self.lock();
        let max = inner
            .stack
            .last()
            .and_then(|f| f.client.as_ref())
            .map(|c| c.options().max_breadcrumbs)
            .unwrap_or(DEFAULT_MAX_BREADCRUMBS);
        if let Some(frame) = inner.stack.last_mut() {
            frame.scope.add_breadcrumb(crumb, max);
        }
    }

    /// Captures a plain message at the given level.
    ///
    /// Returns the event id, or `None` when no client is bound, the event
    /// was filtered or sampled out, or the transport queue was full.
    pub fn capture_message(&self, message: impl Into<String>, level: Level) -> Option<EventId> {
        self.capture_event(Event::from_message(message.into(), level))
    }

    /// Captures an error value as an exception-shaped event.
    pub fn capture_exception<E>(&self, err: &E) -> Option<EventId>
    where
        E: std::error::Error + ?Sized,
    {
        self.capture_event_with_hint(Event::from_error(err), &EventHint::for_exception(err))
    }

    /// Captures a prebuilt event with an empty hint.
    pub fn capture_event(&self, event: Event) -> Option<EventId> {
        self.capture_event_with_hint(event, &EventHint::none())
    }

    /// Captures a prebuilt event with an explicit hint.
    pub fn capture_event_with_hint(&self, event: Event, hint: &EventHint) -> Option<EventId> {
        let (client, scope) = {
            let inner = self.lock();
            match inner.stack.last() {
                Some(frame) => (frame.client.clone(), frame.scope.clone()),
                None => (None, Scope::default()),
            }
        };
        let client = client?;
        let id = client.capture_event(event, hint, Some(&scope));
        if id.is_some() {
            self.lock().last_event_id = id;
        }
        id
    }

    /// Converts a recovered panic payload into a fatal event and captures it.
    ///
    /// Never re-raises; the caller decides whether to resume unwinding
    /// after this returns.
    ///
    /// ## Example
    /// ```rust
    /// use faultline::Hub;
    ///
    /// let hub = Hub::new(None, Default::default());
    /// let result = std::panic::catch_unwind(|| panic!("worker exploded"));
    /// if let Err(payload) = result {
    ///     hub.recover(payload.as_ref());
    /// }
    /// ```
    pub fn recover(&self, payload: &(dyn Any + Send)) -> Option<EventId> {
        self.capture_event_with_hint(Event::from_panic(payload), &EventHint::for_panic(payload))
    }

    /// Like [`Hub::recover`], but prefers the hub bound to `ctx` over this one.
    pub fn recover_with_context(&self, ctx: &Context, payload: &(dyn Any + Send)) -> Option<EventId> {
        match ctx.hub() {
            Some(hub) => hub.recover(payload),
            None => self.recover(payload),
        }
    }

    /// Waits until the bound client's transport drains or the deadline
    /// passes; `true` means fully drained.
    ///
    /// With no client bound there is nothing pending and the result is
    /// `true` immediately.
    pub async fn flush(&self, timeout: Duration) -> bool {
        match self.client() {
            Some(client) => client.flush(timeout).await,
            None => true,
        }
    }

    /// Identity of the most recent event this hub captured successfully.
    pub fn last_event_id(&self) -> Option<EventId> {
        self.lock().last_event_id
    }

    /// Poison-tolerant lock: a panic inside another caller's critical
    /// section must not turn every later capture into a panic.
    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("Hub")
            .field("depth", &inner.stack.len())
            .field("bound", &inner.stack.last().map(|fr| fr.client.is_some()))
            .field("last_event_id", &inner.last_event_id)
            .finish()
    }
}

/// Pops the pushed frame when dropped, including during unwinding.
struct PopGuard<'a>(&'a Hub);

impl Drop for PopGuard<'_> {
    fn drop(&mut self) {
        self.0.pop_scope();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(hub: &Hub) -> usize {
        hub.lock().stack.len()
    }

    #[test]
    fn test_stack_never_drops_below_base() {
        let hub = Hub::new(None, Scope::default());
        assert_eq!(depth(&hub), 1);
        hub.pop_scope();
        hub.pop_scope();
        assert_eq!(depth(&hub), 1);
    }

    #[test]
    fn test_push_pop_balance() {
        let hub = Hub::new(None, Scope::default());
        hub.push_scope();
        hub.push_scope();
        assert_eq!(depth(&hub), 3);
        hub.pop_scope();
        hub.pop_scope();
        assert_eq!(depth(&hub), 1);
    }

    #[test]
    fn test_scope_mutation_invisible_after_pop() {
        let hub = Hub::new(None, Scope::default());
        hub.push_scope();
        hub.configure_scope(|scope| scope.set_tag("temp", "1"));
        hub.pop_scope();

        let mut seen = None;
        hub.configure_scope(|scope| {
            let mut ev = Event::new();
            scope.apply_to_event(&mut ev);
            seen = Some(ev.tags.contains_key("temp"));
        });
        assert_eq!(seen, Some(false));
    }

    #[test]
    fn test_breadcrumbs_invisible_after_pop() {
        let hub = Hub::new(None, Scope::default());
        hub.add_breadcrumb(Breadcrumb::new("base"));
        hub.push_scope();
        hub.add_breadcrumb(Breadcrumb::new("inner"));
        hub.pop_scope();

        let mut count = 0;
        hub.configure_scope(|scope| count = scope.breadcrumb_count());
        assert_eq!(count, 1);
    }

    #[test]
    fn test_with_scope_pops_after_panic() {
        let hub = Hub::new(None, Scope::default());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            hub.with_scope(|_| {}, || panic!("inside callback"));
        }));
        assert!(result.is_err());
        assert_eq!(depth(&hub), 1);
    }

    #[test]
    fn test_with_scope_returns_callback_value() {
        let hub = Hub::new(None, Scope::default());
        let out = hub.with_scope(|scope| scope.set_tag("k", "v"), || 7);
        assert_eq!(out, 7);
        assert_eq!(depth(&hub), 1);
    }

    #[test]
    fn test_captures_without_client_are_noops() {
        let hub = Hub::new(None, Scope::default());
        assert!(hub.capture_message("x", Level::Info).is_none());
        let err = std::io::Error::new(std::io::ErrorKind::Other, "e");
        assert!(hub.capture_exception(&err).is_none());
        assert!(hub.capture_event(Event::new()).is_none());
        assert!(hub.last_event_id().is_none());
    }

    #[test]
    fn test_recover_without_client_is_noop() {
        let hub = Hub::new(None, Scope::default());
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert!(hub.recover(payload.as_ref()).is_none());
    }

    #[test]
    fn test_new_from_top_is_independent() {
        let hub = Hub::new(None, Scope::default());
        hub.configure_scope(|scope| scope.set_tag("origin", "parent"));

        let derived = Hub::new_from_top(&hub);
        derived.configure_scope(|scope| scope.set_tag("origin", "child"));

        let mut parent_tag = String::new();
        hub.configure_scope(|scope| {
            let mut ev = Event::new();
            scope.apply_to_event(&mut ev);
            parent_tag = ev.tags["origin"].clone();
        });
        assert_eq!(parent_tag, "parent");
    }

    #[tokio::test]
    async fn test_flush_without_client_is_true() {
        let hub = Hub::new(None, Scope::default());
        assert!(hub.flush(Duration::from_millis(10)).await);
    }

    #[test]
    fn test_current_returns_same_hub() {
        let a = Hub::current();
        let b = Hub::current();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
