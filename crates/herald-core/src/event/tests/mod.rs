#[cfg(test)]
mod registry_tests;

#[cfg(test)]
mod tests {
    use crate::event::{DEFAULT_PRIORITY, EventDispatcher, BaseEvent, sync_listener};

    #[test]
    fn test_default_priority_is_zero() {
        assert_eq!(DEFAULT_PRIORITY, 0);
    }

    #[tokio::test]
    async fn test_event_dispatch() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let dispatcher: EventDispatcher<&'static str> = EventDispatcher::new();
        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();

        dispatcher.add_listener(
            "test_event",
            sync_listener(move |_key: &&'static str, _event: &mut BaseEvent| {
                called_clone.store(true, Ordering::SeqCst);
                Ok(())
            }),
        );

        let event = dispatcher.dispatch_default(&"test_event").await.unwrap();

        assert!(called.load(Ordering::SeqCst), "Listener should have been called");
        assert!(!crate::event::Event::is_propagation_stopped(&event));
    }
}
