use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::event::{Event, EventKey, Priority, SharedListener, same_listener};

/// Priority buckets for one key. Iterated in reverse for dispatch order.
type Buckets<K, E> = BTreeMap<Priority, Vec<SharedListener<K, E>>>;

/// Listener registry with a lazily resolved dispatch order per key.
///
/// Buckets only ever hold listeners; a bucket or key that runs empty is
/// dropped, so presence of a key means it has at least one listener.
/// The resolved cache is a pure projection of the buckets and is evicted
/// on every mutation that changes a key.
pub struct ListenerRegistry<K: EventKey, E: Event> {
    listeners: HashMap<K, Buckets<K, E>>,
    resolved: HashMap<K, Arc<[SharedListener<K, E>]>>,
}

// Manual Debug implementation, listeners are opaque
impl<K: EventKey, E: Event> fmt::Debug for ListenerRegistry<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listener_count: usize = self
            .listeners
            .values()
            .flat_map(|buckets| buckets.values())
            .map(Vec::len)
            .sum();
        f.debug_struct("ListenerRegistry")
            .field("keys", &self.listeners.len())
            .field("listener_count", &listener_count)
            .field("resolved_keys", &self.resolved.len())
            .finish()
    }
}

impl<K: EventKey, E: Event> ListenerRegistry<K, E> {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            resolved: HashMap::new(),
        }
    }

    /// Append `listener` to the `(key, priority)` bucket. No deduplication.
    pub fn add_listener(&mut self, key: K, listener: SharedListener<K, E>, priority: Priority) {
        self.resolved.remove(&key);
        self.listeners
            .entry(key)
            .or_default()
            .entry(priority)
            .or_default()
            .push(listener);
    }

    /// Remove every occurrence of `listener` under `key`, across all priorities.
    ///
    /// Returns whether anything was removed. The resolved order is only
    /// evicted when it was.
    pub fn remove_listener(&mut self, key: &K, listener: &SharedListener<K, E>) -> bool {
        let Some(buckets) = self.listeners.get_mut(key) else {
            return false;
        };

        let mut removed = false;
        buckets.retain(|_, bucket| {
            let len_before = bucket.len();
            bucket.retain(|registered| !same_listener(registered, listener));
            removed |= bucket.len() < len_before;
            !bucket.is_empty()
        });

        if buckets.is_empty() {
            self.listeners.remove(key);
        }
        if removed {
            self.resolved.remove(key);
        }
        removed
    }

    /// Drop every listener registered for `key`. Returns how many were dropped.
    pub fn clear_key(&mut self, key: &K) -> usize {
        self.resolved.remove(key);
        self.listeners
            .remove(key)
            .map(|buckets| buckets.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
        self.resolved.clear();
    }

    pub fn has_listeners(&self, key: &K) -> bool {
        self.listeners
            .get(key)
            .is_some_and(|buckets| buckets.values().any(|bucket| !bucket.is_empty()))
    }

    pub fn listener_count(&self, key: &K) -> usize {
        self.listeners
            .get(key)
            .map(|buckets| buckets.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Keys with at least one listener, in no particular order
    pub fn keys(&self) -> Vec<K> {
        self.listeners.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listeners for `key` in dispatch order: descending priority, then
    /// registration order. Empty for unknown keys.
    ///
    /// The returned slice is immutable; later registry changes never show
    /// up in it.
    pub fn get_listeners(&mut self, key: &K) -> Arc<[SharedListener<K, E>]> {
        if let Some(resolved) = self.resolved.get(key) {
            return Arc::clone(resolved);
        }

        // Unknown keys are not cached
        let Some(buckets) = self.listeners.get(key) else {
            return Vec::new().into();
        };

        let resolved: Arc<[SharedListener<K, E>]> = buckets
            .values()
            .rev()
            .flat_map(|bucket| bucket.iter().cloned())
            .collect();
        self.resolved.insert(key.clone(), Arc::clone(&resolved));
        resolved
    }

    /// Whether a resolved order is currently memoized for `key`
    pub fn is_resolved(&self, key: &K) -> bool {
        self.resolved.contains_key(key)
    }
}

impl<K: EventKey, E: Event> Default for ListenerRegistry<K, E> {
    fn default() -> Self {
        Self::new()
    }
}
