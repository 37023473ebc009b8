//! # Context: carrying a hub through request/task plumbing.
//!
//! A [`Context`] is an explicit, cheaply cloneable value that request or
//! task code threads through its call chain. It may carry a bound
//! [`Hub`]; the typed accessor distinguishes "bound" from "not bound"
//! instead of handing out a sentinel.
//!
//! [`Hub::recover_with_context`](crate::Hub::recover_with_context) and any
//! context-aware capture path consult this binding first and fall back to
//! the process-wide hub only when nothing is bound.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use faultline::{Context, Hub};
//!
//! let request_hub = Arc::new(Hub::new_from_top(&Hub::current()));
//! let ctx = Context::new().with_hub(request_hub.clone());
//!
//! assert!(ctx.has_hub());
//! assert!(Arc::ptr_eq(ctx.hub().unwrap(), &request_hub));
//! ```

use std::sync::Arc;

use super::Hub;

/// Request/task-scoped carrier of an optional bound hub.
#[derive(Clone, Debug, Default)]
pub struct Context {
    hub: Option<Arc<Hub>>,
}

impl Context {
    /// Creates an empty context (no hub bound).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this context with the given hub bound.
    #[inline]
    pub fn with_hub(mut self, hub: Arc<Hub>) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Binds a hub in place, replacing any previous binding.
    pub fn bind_hub(&mut self, hub: Arc<Hub>) {
        self.hub = Some(hub);
    }

    /// The bound hub, if any.
    pub fn hub(&self) -> Option<&Arc<Hub>> {
        self.hub.as_ref()
    }

    /// True when a hub is bound to this context.
    pub fn has_hub(&self) -> bool {
        self.hub.is_some()
    }

    /// The bound hub, or the process-wide hub when none is bound.
    pub fn hub_or_current(&self) -> Arc<Hub> {
        match &self.hub {
            Some(hub) => hub.clone(),
            None => Hub::current(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;

    #[test]
    fn test_unbound_context() {
        let ctx = Context::new();
        assert!(!ctx.has_hub());
        assert!(ctx.hub().is_none());
    }

    #[test]
    fn test_bound_context_prefers_its_hub() {
        let hub = Arc::new(Hub::new(None, Scope::default()));
        let ctx = Context::new().with_hub(hub.clone());
        assert!(ctx.has_hub());
        assert!(Arc::ptr_eq(&ctx.hub_or_current(), &hub));
    }

    #[test]
    fn test_unbound_context_falls_back_to_process_hub() {
        let ctx = Context::new();
        assert!(Arc::ptr_eq(&ctx.hub_or_current(), &Hub::current()));
    }
}
