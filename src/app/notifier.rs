//! Explicit observer registration for state objects.
//!
//! Each state owns a [`Subscribers`] list and calls [`Subscribers::notify`] after
//! every mutation. Listeners receive a shared reference to the state. They cannot
//! mutate it, so a notification can never trigger a nested mutation.

use std::fmt;

type Listener<S> = Box<dyn Fn(&S)>;

/// List of change listeners for a state of type `S`.
pub struct Subscribers<S> {
    listeners: Vec<Listener<S>>,
}

impl<S> Subscribers<S> {
    /// Registers a listener and returns its position.
    pub fn subscribe(&mut self, listener: impl Fn(&S) + 'static) -> usize {
        self.listeners.push(Box::new(listener));
        self.listeners.len() - 1
    }

    /// Invokes every listener in registration order.
    pub fn notify(&self, state: &S) {
        for listener in &self.listeners {
            listener(state);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<S> Default for Subscribers<S> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<S> fmt::Debug for Subscribers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
