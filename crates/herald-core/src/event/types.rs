use std::ops::{Deref, DerefMut};

use crate::event::Event;

/// Propagation flag to embed in consumer event structs.
///
/// Starts cleared and can only ever be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagation {
    stopped: bool,
}

impl Propagation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Implement [`Event`] for structs that carry a [`Propagation`] field.
///
/// ```
/// use herald_core::event::Propagation;
///
/// #[derive(Debug, Default)]
/// struct UserCreated {
///     id: u64,
///     propagation: Propagation,
/// }
///
/// herald_core::impl_event!(UserCreated => propagation);
/// ```
#[macro_export]
macro_rules! impl_event {
    ($($t:ty => $field:ident),+ $(,)?) => {
        $(
            impl $crate::event::Event for $t {
                fn is_propagation_stopped(&self) -> bool {
                    self.$field.is_stopped()
                }

                fn stop_propagation(&mut self) {
                    self.$field.stop()
                }
            }
        )+
    };
}

/// Event with no payload, used when the caller supplies none
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseEvent {
    propagation: Propagation,
}

impl BaseEvent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl_event!(BaseEvent => propagation);

/// Event carrying an arbitrary consumer payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadEvent<T> {
    payload: T,
    propagation: Propagation,
}

impl<T> PayloadEvent<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            propagation: Propagation::new(),
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// Consume the event, keeping only the payload
    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T: Send + 'static> Event for PayloadEvent<T> {
    fn is_propagation_stopped(&self) -> bool {
        self.propagation.is_stopped()
    }

    fn stop_propagation(&mut self) {
        self.propagation.stop()
    }
}

impl<T> Deref for PayloadEvent<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

impl<T> DerefMut for PayloadEvent<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.payload
    }
}

impl<T> From<T> for PayloadEvent<T> {
    fn from(payload: T) -> Self {
        Self::new(payload)
    }
}
