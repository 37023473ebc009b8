//! # Scope: the mutable capture context.
//!
//! A [`Scope`] accumulates diagnostic context (breadcrumbs, tags, extras,
//! user, level, transaction) that should be attached to every event
//! captured while it is active.
//!
//! ## Ownership
//! A scope is owned by exactly one hub frame. [`Hub::push_scope`](crate::Hub::push_scope)
//! clones the current scope (deep copy of maps and the breadcrumb ring),
//! so mutation after a push never leaks into ancestor frames, and popping
//! the frame discards its scope entirely. No locking is needed inside the
//! scope itself.
//!
//! ## Merge semantics
//! [`Scope::apply_to_event`] merges the scope into a building event. The
//! applied scope is the innermost one, so its values win on key collision
//! (tags, extras, user, level, transaction); breadcrumbs are prepended in
//! chronological order ahead of any the event already carries.

use std::collections::BTreeMap;

use crate::protocol::{Breadcrumb, Event, Level, User};

mod ring;

use ring::BreadcrumbRing;

/// Mutable bag of contextual data merged into every captured event.
///
/// ## Example
/// ```rust
/// use faultline::{Breadcrumb, Event, Level, Scope};
///
/// let mut scope = Scope::default();
/// scope.set_tag("env", "prod");
/// scope.add_breadcrumb(Breadcrumb::new("warmed cache"), 100);
///
/// let mut event = Event::from_message("boom", Level::Error);
/// scope.apply_to_event(&mut event);
///
/// assert_eq!(event.tags["env"], "prod");
/// assert_eq!(event.breadcrumbs.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Scope {
    breadcrumbs: BreadcrumbRing,
    tags: BTreeMap<String, String>,
    extra: BTreeMap<String, serde_json::Value>,
    user: Option<User>,
    level: Option<Level>,
    transaction: Option<String>,
}

impl Scope {
    /// Appends a breadcrumb, evicting the oldest entry once `max` is
    /// reached. Breadcrumbs are immutable once appended.
    pub fn add_breadcrumb(&mut self, crumb: Breadcrumb, max: usize) {
        self.breadcrumbs.push(crumb, max);
    }

    /// Sets a tag (upsert on the key).
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Removes a tag.
    pub fn remove_tag(&mut self, key: &str) {
        self.tags.remove(key);
    }

    /// Sets an extra value (upsert on the key).
    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extra.insert(key.into(), value);
    }

    /// Sets the user record.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Overrides the severity applied to captured events.
    pub fn set_level(&mut self, level: Option<Level>) {
        self.level = level;
    }

    /// Sets the transaction / span context (opaque passthrough).
    pub fn set_transaction(&mut self, transaction: Option<String>) {
        self.transaction = transaction;
    }

    /// Number of breadcrumbs currently held.
    pub fn breadcrumb_count(&self) -> usize {
        self.breadcrumbs.len()
    }

    /// Drops all breadcrumbs, keeping the rest of the scope.
    pub fn clear_breadcrumbs(&mut self) {
        self.breadcrumbs.clear();
    }

    /// Resets the scope to its pristine state.
    pub fn clear(&mut self) {
        *self = Scope::default();
    }

    /// Merges this scope into a building event.
    ///
    /// Scope values win on key collision; the event's own breadcrumbs (if
    /// any) are kept after the scope's, preserving chronological order of
    /// the scope trail.
    pub fn apply_to_event(&self, event: &mut Event) {
        for (k, v) in &self.tags {
            event.tags.insert(k.clone(), v.clone());
        }
        for (k, v) in &self.extra {
            event.extra.insert(k.clone(), v.clone());
        }
        if let Some(user) = &self.user {
            event.user = Some(user.clone());
        }
        if let Some(level) = self.level {
            event.level = level;
        }
        if let Some(transaction) = &self.transaction {
            event.transaction = Some(transaction.clone());
        }
        if !self.breadcrumbs.is_empty() {
            let mut merged: Vec<Breadcrumb> = self.breadcrumbs.iter().cloned().collect();
            merged.append(&mut event.breadcrumbs);
            event.breadcrumbs = merged;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_deep() {
        let mut original = Scope::default();
        original.set_tag("a", "1");
        original.add_breadcrumb(Breadcrumb::new("first"), 10);

        let mut cloned = original.clone();
        cloned.set_tag("a", "2");
        cloned.set_tag("b", "3");
        cloned.add_breadcrumb(Breadcrumb::new("second"), 10);

        let mut ev = Event::new();
        original.apply_to_event(&mut ev);
        assert_eq!(ev.tags["a"], "1");
        assert!(!ev.tags.contains_key("b"));
        assert_eq!(ev.breadcrumbs.len(), 1);
    }

    #[test]
    fn test_apply_scope_wins_on_collision() {
        let mut scope = Scope::default();
        scope.set_tag("env", "prod");
        scope.set_level(Some(Level::Warning));

        let mut ev = Event::from_message("x", Level::Info).with_tag("env", "dev");
        scope.apply_to_event(&mut ev);

        assert_eq!(ev.tags["env"], "prod");
        assert_eq!(ev.level, Level::Warning);
    }

    #[test]
    fn test_apply_without_level_keeps_event_level() {
        let scope = Scope::default();
        let mut ev = Event::from_message("x", Level::Info);
        scope.apply_to_event(&mut ev);
        assert_eq!(ev.level, Level::Info);
    }

    #[test]
    fn test_apply_prepends_breadcrumbs_chronologically() {
        let mut scope = Scope::default();
        scope.add_breadcrumb(Breadcrumb::new("one"), 10);
        scope.add_breadcrumb(Breadcrumb::new("two"), 10);

        let mut ev = Event::new();
        ev.breadcrumbs.push(Breadcrumb::new("own"));
        scope.apply_to_event(&mut ev);

        let messages: Vec<_> = ev
            .breadcrumbs
            .iter()
            .filter_map(|b| b.message.as_deref())
            .collect();
        assert_eq!(messages, ["one", "two", "own"]);
    }

    #[test]
    fn test_ring_capacity_retains_most_recent() {
        let mut scope = Scope::default();
        for i in 0..=5 {
            scope.add_breadcrumb(Breadcrumb::new(i.to_string()), 5);
        }
        let mut ev = Event::new();
        scope.apply_to_event(&mut ev);
        let messages: Vec<_> = ev
            .breadcrumbs
            .iter()
            .filter_map(|b| b.message.as_deref())
            .collect();
        assert_eq!(messages, ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_clear() {
        let mut scope = Scope::default();
        scope.set_tag("a", "1");
        scope.set_user(Some(User::default()));
        scope.add_breadcrumb(Breadcrumb::new("x"), 10);
        scope.clear();

        let mut ev = Event::new();
        scope.apply_to_event(&mut ev);
        assert!(ev.tags.is_empty());
        assert!(ev.user.is_none());
        assert!(ev.breadcrumbs.is_empty());
    }
}
