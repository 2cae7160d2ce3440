use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use crate::event::config::DispatcherConfig;
use crate::event::registry::ListenerRegistry;
use crate::event::types::BaseEvent;
use crate::event::{Event, EventKey, Listener, ListenerError, ListenerResult, Priority, SharedListener};

// This type represents an owned future that returns ListenerResult
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = ListenerResult> + Send + 'a>>;

//--------------------------------------------------
// Closure adapters (Internal, built by listener_fn / sync_listener)
//--------------------------------------------------

struct FnListener<F> {
    handler: F,
}

#[async_trait]
impl<K, E, F> Listener<K, E> for FnListener<F>
where
    K: EventKey,
    E: Event,
    F: for<'a> Fn(&'a K, &'a mut E) -> BoxFuture<'a> + Send + Sync,
{
    async fn handle(&self, key: &K, event: &mut E) -> ListenerResult {
        (self.handler)(key, event).await
    }
}

struct SyncListener<F> {
    handler: F,
}

#[async_trait]
impl<K, E, F> Listener<K, E> for SyncListener<F>
where
    K: EventKey,
    E: Event,
    F: Fn(&K, &mut E) -> ListenerResult + Send + Sync,
{
    async fn handle(&self, key: &K, event: &mut E) -> ListenerResult {
        (self.handler)(key, event)
    }
}

//--------------------------------------------------
// EventDispatcher (Public API)
//--------------------------------------------------

/// Priority-ordered event dispatcher.
///
/// Clones share one registry, so a listener can hold a clone and add or
/// remove listeners while a dispatch is running. Such changes only affect
/// later dispatches: each dispatch works off the order resolved when it began.
pub struct EventDispatcher<K: EventKey, E: Event = BaseEvent> {
    registry: Arc<Mutex<ListenerRegistry<K, E>>>,
    config: Arc<DispatcherConfig>,
}

impl<K: EventKey, E: Event> Clone for EventDispatcher<K, E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
        }
    }
}

// Manual Debug impl for EventDispatcher
impl<K: EventKey, E: Event> fmt::Debug for EventDispatcher<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("registry", &*self.registry())
            .field("config", &self.config)
            .finish()
    }
}

impl<K: EventKey, E: Event> EventDispatcher<K, E> {
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            registry: Arc::new(Mutex::new(ListenerRegistry::new())),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    // Never held across an await. A panic while holding it cannot leave the
    // registry half-updated in a way later operations depend on.
    fn registry(&self) -> MutexGuard<'_, ListenerRegistry<K, E>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener at the configured default priority
    pub fn add_listener(&self, key: K, listener: SharedListener<K, E>) {
        self.add_listener_with_priority(key, listener, self.config.default_priority);
    }

    pub fn add_listener_with_priority(&self, key: K, listener: SharedListener<K, E>, priority: Priority) {
        log::trace!("Adding listener for {:?} at priority {}", key, priority);
        self.registry().add_listener(key, listener, priority);
    }

    /// Remove every registration of `listener` for `key`.
    /// Unknown keys and unregistered listeners are a no-op returning false.
    pub fn remove_listener(&self, key: &K, listener: &SharedListener<K, E>) -> bool {
        let removed = self.registry().remove_listener(key, listener);
        if removed {
            log::trace!("Removed listener for {:?}", key);
        }
        removed
    }

    pub fn clear_listeners(&self, key: &K) -> usize {
        let cleared = self.registry().clear_key(key);
        log::trace!("Cleared {} listener(s) for {:?}", cleared, key);
        cleared
    }

    pub fn clear(&self) {
        self.registry().clear();
    }

    pub fn has_listeners(&self, key: &K) -> bool {
        self.registry().has_listeners(key)
    }

    /// Listeners for `key` in the order a dispatch would invoke them
    pub fn get_listeners(&self, key: &K) -> Arc<[SharedListener<K, E>]> {
        self.registry().get_listeners(key)
    }

    pub fn listener_count(&self, key: &K) -> usize {
        self.registry().listener_count(key)
    }

    pub fn keys(&self) -> Vec<K> {
        self.registry().keys()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    #[cfg(test)]
    pub(crate) fn is_resolved(&self, key: &K) -> bool {
        self.registry().is_resolved(key)
    }

    /// Dispatch an owned event and hand it back once every listener ran or
    /// one of them stopped propagation.
    pub async fn dispatch(&self, key: &K, mut event: E) -> Result<E, ListenerError> {
        self.dispatch_in_place(key, &mut event).await?;
        Ok(event)
    }

    /// Dispatch a freshly constructed default event
    pub async fn dispatch_default(&self, key: &K) -> Result<E, ListenerError>
    where
        E: Default,
    {
        self.dispatch(key, E::default()).await
    }

    /// Dispatch a borrowed event.
    ///
    /// Listeners run one at a time, each awaited before the next. The stop
    /// flag is checked before every invocation. The first listener error is
    /// returned unchanged and the remaining listeners are skipped; `event`
    /// keeps whatever state that listener left it in.
    pub async fn dispatch_in_place(&self, key: &K, event: &mut E) -> Result<(), ListenerError> {
        let listeners = self.get_listeners(key);
        log::debug!("Dispatching {:?} to {} listener(s)", key, listeners.len());

        for (index, listener) in listeners.iter().enumerate() {
            if event.is_propagation_stopped() {
                log::debug!(
                    "Propagation of {:?} stopped, skipping {} listener(s)",
                    key,
                    listeners.len() - index
                );
                break;
            }

            if self.config.trace_dispatch {
                log::trace!("Invoking listener {}/{} for {:?}", index + 1, listeners.len(), key);
            }

            if let Err(err) = listener.handle(key, event).await {
                log::debug!("Listener {}/{} for {:?} failed: {}", index + 1, listeners.len(), key, err);
                return Err(err);
            }
        }

        Ok(())
    }
}

impl<K: EventKey, E: Event> Default for EventDispatcher<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// Helper Functions
//--------------------------------------------------

/// Build a listener from a closure returning a boxed future
pub fn listener_fn<K, E, F>(handler: F) -> SharedListener<K, E>
where
    K: EventKey,
    E: Event,
    F: for<'a> Fn(&'a K, &'a mut E) -> BoxFuture<'a> + Send + Sync + 'static,
{
    Arc::new(FnListener { handler })
}

/// Build a listener from a synchronous closure
pub fn sync_listener<K, E, F>(handler: F) -> SharedListener<K, E>
where
    K: EventKey,
    E: Event,
    F: Fn(&K, &mut E) -> ListenerResult + Send + Sync + 'static,
{
    Arc::new(SyncListener { handler })
}
