//! One-shot readiness future
//!
//! Code that depends on a resource which may not exist yet (the viewer is only
//! built once a render backend is attached) registers a continuation with
//! [`Readiness::when_ready`]. Continuations run exactly once, in registration
//! order, when the value is resolved, or immediately if it already was.
//!
//! There is no cancellation: a continuation registered before teardown still
//! runs if the value resolves afterwards.

use std::cell::RefCell;
use std::rc::Rc;

type Continuation<T> = Box<dyn FnOnce(T)>;

enum State<T> {
    Pending(Vec<Continuation<T>>),
    Ready(T),
}

/// Shared handle to a value that becomes available once
pub struct Readiness<T: Clone + 'static> {
    state: Rc<RefCell<State<T>>>,
}

impl<T: Clone + 'static> Clone for Readiness<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: Clone + 'static> Default for Readiness<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Readiness<T> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State::Pending(Vec::new()))),
        }
    }

    /// Create an already resolved handle
    pub fn ready(value: T) -> Self {
        Self {
            state: Rc::new(RefCell::new(State::Ready(value))),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.borrow(), State::Ready(_))
    }

    /// Current value, if resolved
    pub fn get(&self) -> Option<T> {
        match &*self.state.borrow() {
            State::Ready(value) => Some(value.clone()),
            State::Pending(_) => None,
        }
    }

    /// Number of continuations still waiting
    pub fn pending_count(&self) -> usize {
        match &*self.state.borrow() {
            State::Pending(waiting) => waiting.len(),
            State::Ready(_) => 0,
        }
    }

    /// Run `f` with the value now if resolved, otherwise once it resolves
    pub fn when_ready<F>(&self, f: F)
    where
        F: FnOnce(T) + 'static,
    {
        let value = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                State::Pending(waiting) => {
                    waiting.push(Box::new(f));
                    return;
                }
                State::Ready(value) => value.clone(),
            }
        };
        // The borrow is released so `f` may register further continuations.
        f(value);
    }

    /// Resolve the value and run every waiting continuation.
    ///
    /// Returns `false` (and leaves the first value in place) if the handle
    /// was already resolved.
    pub fn resolve(&self, value: T) -> bool {
        let waiting = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                State::Ready(_) => {
                    log::warn!("Readiness resolved twice, ignoring the second value");
                    return false;
                }
                State::Pending(waiting) => {
                    let waiting = std::mem::take(waiting);
                    *state = State::Ready(value.clone());
                    waiting
                }
            }
        };
        for continuation in waiting {
            continuation(value.clone());
        }
        true
    }
}
