use std::sync::Arc;

use crate::event::registry::ListenerRegistry;
use crate::event::{BaseEvent, SharedListener, sync_listener};

type Key = &'static str;

fn noop() -> SharedListener<Key, BaseEvent> {
    sync_listener(|_key: &Key, _event: &mut BaseEvent| Ok(()))
}

#[test]
fn test_new_registry_is_empty() {
    let mut registry: ListenerRegistry<Key, BaseEvent> = ListenerRegistry::new();
    assert!(registry.is_empty());
    assert!(!registry.has_listeners(&"anything"));
    assert_eq!(registry.listener_count(&"anything"), 0);
    assert!(registry.get_listeners(&"anything").is_empty());
    assert!(!registry.is_resolved(&"anything"), "Unknown keys must not be memoized");
}

#[test]
fn test_buckets_flatten_high_to_low() {
    let mut registry = ListenerRegistry::new();
    let (a, b, c, d) = (noop(), noop(), noop(), noop());

    registry.add_listener("k", a.clone(), -10);
    registry.add_listener("k", b.clone(), 10);
    registry.add_listener("k", c.clone(), 0);
    registry.add_listener("k", d.clone(), 10);

    let resolved = registry.get_listeners(&"k");
    let expected = [&b, &d, &c, &a];
    assert_eq!(resolved.len(), expected.len());
    for (got, want) in resolved.iter().zip(expected) {
        assert!(Arc::ptr_eq(got, want));
    }
}

#[test]
fn test_resolved_order_is_memoized() {
    let mut registry = ListenerRegistry::new();
    registry.add_listener("k", noop(), 0);

    let first = registry.get_listeners(&"k");
    let second = registry.get_listeners(&"k");
    assert!(Arc::ptr_eq(&first, &second), "Second read should hit the cache");
}

#[test]
fn test_snapshot_is_unaffected_by_later_changes() {
    let mut registry = ListenerRegistry::new();
    let a = noop();
    registry.add_listener("k", a.clone(), 0);

    let snapshot = registry.get_listeners(&"k");
    registry.add_listener("k", noop(), 1);
    registry.remove_listener(&"k", &a);

    assert_eq!(snapshot.len(), 1);
    assert!(Arc::ptr_eq(&snapshot[0], &a));
    assert_eq!(registry.get_listeners(&"k").len(), 1);
    assert!(!Arc::ptr_eq(&registry.get_listeners(&"k")[0], &a));
}

#[test]
fn test_remove_purges_every_bucket_and_drops_key() {
    let mut registry = ListenerRegistry::new();
    let dup = noop();
    let other = noop();

    registry.add_listener("k", dup.clone(), 3);
    registry.add_listener("k", dup.clone(), 3);
    registry.add_listener("k", dup.clone(), -1);
    registry.add_listener("j", dup.clone(), 0);
    registry.add_listener("k", other.clone(), 3);
    assert_eq!(registry.listener_count(&"k"), 4);

    assert!(registry.remove_listener(&"k", &dup));
    assert_eq!(registry.listener_count(&"k"), 1);
    assert!(registry.has_listeners(&"j"), "Other keys keep their registrations");

    assert!(registry.remove_listener(&"k", &other));
    assert!(!registry.has_listeners(&"k"));
    assert!(!registry.keys().contains(&"k"));
    assert!(!registry.remove_listener(&"k", &other));
}

#[test]
fn test_clear_key_and_clear() {
    let mut registry = ListenerRegistry::new();
    registry.add_listener("a", noop(), 0);
    registry.add_listener("a", noop(), 1);
    registry.add_listener("b", noop(), 0);
    registry.get_listeners(&"a");

    assert_eq!(registry.clear_key(&"a"), 2);
    assert!(!registry.is_resolved(&"a"));
    assert!(registry.get_listeners(&"a").is_empty());
    assert_eq!(registry.clear_key(&"missing"), 0);

    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn test_debug_reports_counts() {
    let mut registry = ListenerRegistry::new();
    registry.add_listener("a", noop(), 0);
    registry.add_listener("b", noop(), 0);
    registry.add_listener("b", noop(), 2);

    let debug = format!("{:?}", registry);
    assert!(debug.contains("keys: 2"), "{}", debug);
    assert!(debug.contains("listener_count: 3"), "{}", debug);
}
