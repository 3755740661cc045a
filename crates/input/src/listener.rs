//! Scoped listener registration.
//!
//! Every subscription to a global input source is represented by a
//! [`ListenerGuard`]. Dropping the guard detaches the listener, so a
//! subscription can never outlive its owner, whatever path the owner exits by.

use crate::event::InputEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// The global input sources a mode can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    KeyDown,
    /// Clicks on the ball, used as a trigger.
    Click,
    /// One-shot click used only to request motion permission.
    PermissionClick,
    DeviceMotion,
}

impl ListenerKind {
    /// Event name the listener subscribes to.
    pub fn label(&self) -> &'static str {
        match self {
            ListenerKind::KeyDown => "keydown",
            ListenerKind::Click => "click",
            ListenerKind::PermissionClick => "permission-click",
            ListenerKind::DeviceMotion => "devicemotion",
        }
    }
}

type Counts = Arc<Mutex<HashMap<ListenerKind, usize>>>;

fn lock(counts: &Counts) -> MutexGuard<'_, HashMap<ListenerKind, usize>> {
    counts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared table of attached listeners.
///
/// Cloning yields another handle to the same table.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    counts: Counts,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener; it stays attached until the guard is dropped.
    pub fn attach(&self, kind: ListenerKind) -> ListenerGuard {
        *lock(&self.counts).entry(kind).or_insert(0) += 1;
        tracing::trace!(listener = kind.label(), "listener attached");
        ListenerGuard {
            kind,
            counts: Arc::clone(&self.counts),
        }
    }

    /// Whether at least one guard of this kind is live.
    pub fn is_attached(&self, kind: ListenerKind) -> bool {
        lock(&self.counts).get(&kind).is_some_and(|n| *n > 0)
    }

    /// Number of live guards for a kind.
    pub fn count(&self, kind: ListenerKind) -> usize {
        lock(&self.counts).get(&kind).copied().unwrap_or(0)
    }

    /// All kinds with at least one live guard.
    pub fn attached(&self) -> Vec<ListenerKind> {
        let mut kinds: Vec<_> = lock(&self.counts)
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(kind, _)| *kind)
            .collect();
        kinds.sort_by_key(|k| k.label());
        kinds
    }

    /// True once every guard has been dropped.
    pub fn is_empty(&self) -> bool {
        self.attached().is_empty()
    }

    /// Whether anything is listening for this event.
    ///
    /// Events nobody listens for are dropped before they reach the arbiter.
    pub fn accepts(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(_) => self.is_attached(ListenerKind::KeyDown),
            InputEvent::Click => {
                self.is_attached(ListenerKind::Click)
                    || self.is_attached(ListenerKind::PermissionClick)
            }
            InputEvent::Motion(_) => self.is_attached(ListenerKind::DeviceMotion),
        }
    }
}

/// Live subscription. Detaches on drop.
#[derive(Debug)]
pub struct ListenerGuard {
    kind: ListenerKind,
    counts: Counts,
}

impl ListenerGuard {
    /// What this guard keeps attached.
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Detach now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let mut counts = lock(&self.counts);
        if let Some(n) = counts.get_mut(&self.kind) {
            *n = n.saturating_sub(1);
        }
        tracing::trace!(listener = self.kind.label(), "listener detached");
    }
}

/// The listeners belonging to one input mode, released together.
#[derive(Debug, Default)]
pub struct ListenerSet {
    guards: Vec<ListenerGuard>,
}

impl ListenerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach each kind and hold the guards as one set.
    pub fn attach(registry: &ListenerRegistry, kinds: &[ListenerKind]) -> Self {
        Self {
            guards: kinds.iter().map(|kind| registry.attach(*kind)).collect(),
        }
    }

    /// Take ownership of an already attached guard.
    pub fn push(&mut self, guard: ListenerGuard) {
        self.guards.push(guard);
    }

    pub fn contains(&self, kind: ListenerKind) -> bool {
        self.guards.iter().any(|g| g.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakeball_motion::MotionSample;

    #[test]
    fn test_guard_detaches_on_drop() {
        let registry = ListenerRegistry::new();
        let guard = registry.attach(ListenerKind::KeyDown);
        assert!(registry.is_attached(ListenerKind::KeyDown));

        drop(guard);
        assert!(!registry.is_attached(ListenerKind::KeyDown));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_release_is_drop() {
        let registry = ListenerRegistry::new();
        registry.attach(ListenerKind::Click).release();
        assert_eq!(registry.count(ListenerKind::Click), 0);
    }

    #[test]
    fn test_guards_are_counted() {
        let registry = ListenerRegistry::new();
        let a = registry.attach(ListenerKind::DeviceMotion);
        let b = registry.attach(ListenerKind::DeviceMotion);
        assert_eq!(registry.count(ListenerKind::DeviceMotion), 2);
        drop(a);
        assert!(registry.is_attached(ListenerKind::DeviceMotion));
        drop(b);
        assert!(!registry.is_attached(ListenerKind::DeviceMotion));
    }

    #[test]
    fn test_set_released_together() {
        let registry = ListenerRegistry::new();
        let set = ListenerSet::attach(&registry, &[ListenerKind::KeyDown, ListenerKind::Click]);
        assert!(set.contains(ListenerKind::Click));
        assert!(!set.contains(ListenerKind::DeviceMotion));
        assert_eq!(
            registry.attached(),
            vec![ListenerKind::Click, ListenerKind::KeyDown]
        );

        drop(set);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_guard_released_on_unwind() {
        let registry = ListenerRegistry::new();
        let inner = registry.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = inner.attach(ListenerKind::PermissionClick);
            panic!("permission request blew up");
        });
        assert!(result.is_err());
        assert!(!registry.is_attached(ListenerKind::PermissionClick));
    }

    #[test]
    fn test_accepts_routes_by_kind() {
        let registry = ListenerRegistry::new();
        let motion = InputEvent::Motion(MotionSample::new(1.0, 1.0, 1.0, 0));
        assert!(!registry.accepts(&InputEvent::Click));
        assert!(!registry.accepts(&motion));

        let _permission = registry.attach(ListenerKind::PermissionClick);
        assert!(registry.accepts(&InputEvent::Click));
        assert!(!registry.accepts(&InputEvent::KeyDown(crate::Key::Space)));

        let _sensor = registry.attach(ListenerKind::DeviceMotion);
        assert!(registry.accepts(&motion));
    }
}
