pub mod config;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod types;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;

/// Listener ordering preference. Higher values run earlier.
pub type Priority = i32;

/// Priority used when none is given and no config overrides it
pub const DEFAULT_PRIORITY: Priority = 0;

/// Identifier distinguishing one event stream from another.
///
/// Anything hashable and cheaply clonable qualifies: static names, owned
/// strings, enums, or [`std::any::TypeId`] for type-keyed dispatch.
pub trait EventKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> EventKey for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// Core event trait.
///
/// The only state the dispatcher cares about is the one-way
/// "propagation stopped" flag; everything else is consumer payload.
pub trait Event: Send + 'static {
    /// Whether a listener has stopped propagation
    fn is_propagation_stopped(&self) -> bool;

    /// Stop propagation to the remaining listeners. Idempotent.
    fn stop_propagation(&mut self);
}

/// Error a listener fails with. Returned from dispatch as-is.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single listener invocation
pub type ListenerResult = std::result::Result<(), ListenerError>;

/// Asynchronous event listener
#[async_trait]
pub trait Listener<K: EventKey, E: Event>: Send + Sync {
    async fn handle(&self, key: &K, event: &mut E) -> ListenerResult;
}

/// Registered listener. Identity is the `Arc` allocation, so one value can be
/// registered several times and removed by handing the same `Arc` back.
pub type SharedListener<K, E> = Arc<dyn Listener<K, E>>;

/// Identity comparison for registered listeners
pub(crate) fn same_listener<K: EventKey, E: Event>(
    a: &SharedListener<K, E>,
    b: &SharedListener<K, E>,
) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Re-export important types
pub use config::{ConfigFormat, DispatcherConfig};
pub use dispatcher::{BoxFuture, EventDispatcher, listener_fn, sync_listener};
pub use error::{EventSystemError, Result};
pub use registry::ListenerRegistry;
pub use types::{BaseEvent, PayloadEvent, Propagation};

// Test module declaration
#[cfg(test)]
mod tests;
