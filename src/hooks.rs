//! Listeners notified around every kubectl invocation.
//!
//! Hooks are registered while building a client and cannot be removed
//! afterwards. They are shared by every session, so they must be
//! `Send + Sync` and tolerate being called from several threads at once.

use crate::engine::LastStatus;
use crate::invocation::Invocation;
use std::fmt;
use std::sync::Arc;

pub type BeforeHook = Arc<dyn Fn(&Invocation) + Send + Sync>;
pub type AfterHook = Arc<dyn Fn(&Invocation, &LastStatus) + Send + Sync>;

/// Ordered before/after listener lists.
#[derive(Clone, Default)]
pub struct Hooks {
    before: Vec<BeforeHook>,
    after: Vec<AfterHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Invocation) + Send + Sync + 'static,
    {
        self.before.push(Arc::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Invocation, &LastStatus) + Send + Sync + 'static,
    {
        self.after.push(Arc::new(hook));
        self
    }

    /// Runs before the child is spawned, in registration order.
    pub fn run_before(&self, invocation: &Invocation) {
        for hook in &self.before {
            hook(invocation);
        }
    }

    /// Runs once the exit status is recorded, in registration order.
    pub fn run_after(&self, invocation: &Invocation, status: &LastStatus) {
        for hook in &self.after {
            hook(invocation, status);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[test]
    fn hooks_fire_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c) = (Arc::clone(&seen), Arc::clone(&seen), Arc::clone(&seen));
        let hooks = Hooks::new()
            .before(move |_| a.lock().unwrap().push("before-1"))
            .before(move |_| b.lock().unwrap().push("before-2"))
            .after(move |_, _| c.lock().unwrap().push("after-1"));

        let inv = Invocation::new(vec!["kubectl".into()], BTreeMap::new());
        hooks.run_before(&inv);
        hooks.run_after(&inv, &LastStatus::from_code(Some(0)));

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["before-1", "before-2", "after-1"]
        );
    }

    #[test]
    fn empty_hooks() {
        assert!(Hooks::new().is_empty());
        assert!(!Hooks::new().before(|_| {}).is_empty());
    }
}
