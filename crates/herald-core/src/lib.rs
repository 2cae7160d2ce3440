//! # Herald Core
//!
//! In-process event mediator: components subscribe listeners to keyed
//! events, and the [`EventDispatcher`] invokes them in descending priority
//! order against a mutable event that any listener can short-circuit.
pub mod event;

// Re-export key public types/traits for easier use by applications
pub use event::{
    BaseEvent, DispatcherConfig, Event, EventDispatcher, EventKey, Listener, ListenerError,
    ListenerResult, PayloadEvent, Priority, Propagation, SharedListener, listener_fn, sync_listener,
};
pub use event::error::EventSystemError;
