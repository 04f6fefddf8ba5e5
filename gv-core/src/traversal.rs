//! Lazy sequences that report every element they produce.

use std::{cell::RefCell, fmt::Debug, iter::FusedIterator, rc::Rc};

use derivative::Derivative;
use derive_more::Display;
use tracing::trace;

use crate::observer::{ObserverError, ObserverResult};

/// A traversal observer, invoked with each element as it is produced.
pub type NodeCallback<V> = Rc<RefCell<dyn FnMut(V) -> ObserverResult>>;

/// Position of a callback in a [`TraversalRegistry`].
///
/// Removing a callback shifts the indices of the callbacks registered after it down by one.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackIndex(pub usize);

#[derive(Derivative)]
#[derivative(Default(bound = ""))]
struct Hooks<V> {
    callbacks: Vec<NodeCallback<V>>,
    fault: Option<ObserverError>,
}

/// Shared, live list of traversal callbacks.
///
/// Cloning the registry clones the handle: every clone and every [`Traversal`] created from it
/// sees the same callbacks, including ones registered after the traversal started.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Default(bound = ""))]
pub struct TraversalRegistry<V>(Rc<RefCell<Hooks<V>>>);

impl<V> Debug for TraversalRegistry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks = self.0.borrow();
        f.debug_struct("TraversalRegistry")
            .field("callbacks", &hooks.callbacks.len())
            .field("fault", &hooks.fault)
            .finish()
    }
}

impl<V> TraversalRegistry<V> {
    pub fn register<F>(&self, callback: F) -> CallbackIndex
    where
        F: FnMut(V) -> ObserverResult + 'static,
    {
        let callback: NodeCallback<V> = Rc::new(RefCell::new(callback));
        let mut hooks = self.0.borrow_mut();
        hooks.callbacks.push(callback);
        CallbackIndex(hooks.callbacks.len() - 1)
    }

    /// Removes the callback at `index`, returning `false` if there is none.
    pub fn remove(&self, index: CallbackIndex) -> bool {
        let mut hooks = self.0.borrow_mut();
        if index.0 < hooks.callbacks.len() {
            hooks.callbacks.remove(index.0);
            true
        } else {
            false
        }
    }

    pub fn clear(&self) {
        self.0.borrow_mut().callbacks.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the first failure reported by a callback since the last call.
    pub fn take_fault(&self) -> Option<ObserverError> {
        self.0.borrow_mut().fault.take()
    }

    pub fn wrap<I>(&self, iter: I) -> Traversal<I, V>
    where
        I: Iterator<Item = V>,
    {
        Traversal {
            inner: iter,
            registry: self.clone(),
            halted: false,
        }
    }

    // The registry borrow is released before any callback runs, so callbacks may register
    // further callbacks or start nested traversals.
    fn current(&self) -> Vec<NodeCallback<V>> {
        self.0.borrow().callbacks.clone()
    }

    fn record_fault(&self, error: ObserverError) {
        self.0.borrow_mut().fault.get_or_insert(error);
    }
}

/// Iterator adapter that calls every registered callback on each produced element.
///
/// The callback list is read on every pull. If a callback fails, the element that triggered it
/// is still returned, the failure is recorded in the registry and the traversal ends.
#[must_use = "traversals are lazy and do nothing unless consumed"]
pub struct Traversal<I, V> {
    inner: I,
    registry: TraversalRegistry<V>,
    halted: bool,
}

impl<I, V> Traversal<I, V> {
    /// Whether a callback failure or exhaustion has ended this traversal.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }
}

impl<I, V> Iterator for Traversal<I, V>
where
    I: Iterator<Item = V>,
    V: Clone + Debug,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if self.halted {
            return None;
        }
        let Some(item) = self.inner.next() else {
            self.halted = true;
            return None;
        };
        trace!(?item, "traversal step");
        for callback in self.registry.current() {
            let mut callback = callback.borrow_mut();
            if let Err(error) = (&mut *callback)(item.clone()) {
                self.halted = true;
                self.registry.record_fault(error);
                break;
            }
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.halted {
            (0, Some(0))
        } else {
            (0, self.inner.size_hint().1)
        }
    }
}

impl<I, V> FusedIterator for Traversal<I, V>
where
    I: Iterator<Item = V>,
    V: Clone + Debug,
{
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rstest::rstest;

    use super::*;

    fn log() -> Rc<RefCell<Vec<(char, u32)>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn yields_underlying_sequence_and_notifies_in_order() {
        let registry = TraversalRegistry::default();
        let seen = log();
        for tag in ['a', 'b'] {
            let seen = seen.clone();
            registry.register(move |x| {
                seen.borrow_mut().push((tag, x));
                Ok(())
            });
        }

        let items: Vec<u32> = registry.wrap([1, 2, 3].into_iter()).collect();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(
            *seen.borrow(),
            vec![('a', 1), ('b', 1), ('a', 2), ('b', 2), ('a', 3), ('b', 3)]
        );
    }

    #[test]
    fn late_registration_fires_on_next_pull() {
        let registry = TraversalRegistry::default();
        let seen = log();
        let mut traversal = registry.wrap([1, 2].into_iter());

        assert_eq!(traversal.next(), Some(1));
        let late = seen.clone();
        registry.register(move |x| {
            late.borrow_mut().push(('l', x));
            Ok(())
        });
        assert_eq!(traversal.next(), Some(2));

        assert_eq!(*seen.borrow(), vec![('l', 2)]);
    }

    #[test]
    fn failing_callback_returns_element_then_halts() {
        let registry = TraversalRegistry::default();
        registry.register(|x: u32| {
            if x == 2 {
                Err(ObserverError::Cancelled)
            } else {
                Ok(())
            }
        });
        let mut traversal = registry.wrap([1, 2, 3].into_iter());

        assert_eq!(traversal.next(), Some(1));
        assert_eq!(traversal.next(), Some(2));
        assert!(traversal.is_halted());
        assert_eq!(traversal.next(), None);
        assert_eq!(registry.take_fault(), Some(ObserverError::Cancelled));
        assert_eq!(registry.take_fault(), None);
    }

    #[test]
    fn stays_exhausted() {
        let registry = TraversalRegistry::<u32>::default();
        let mut traversal = registry.wrap(std::iter::once(7));
        assert_eq!(traversal.next(), Some(7));
        assert_eq!(traversal.next(), None);
        assert_eq!(traversal.next(), None);
    }

    #[rstest]
    #[case(0, true, 1)]
    #[case(1, true, 1)]
    #[case(2, false, 2)]
    fn remove_by_index(#[case] index: usize, #[case] removed: bool, #[case] remaining: usize) {
        let registry = TraversalRegistry::<u32>::default();
        registry.register(|_| Ok(()));
        registry.register(|_| Ok(()));
        assert_eq!(registry.remove(CallbackIndex(index)), removed);
        assert_eq!(registry.len(), remaining);
    }

    #[test]
    fn clear_silences_future_pulls() {
        let registry = TraversalRegistry::default();
        let seen = log();
        let inner = seen.clone();
        registry.register(move |x| {
            inner.borrow_mut().push(('a', x));
            Ok(())
        });
        let mut traversal = registry.wrap([1, 2].into_iter());
        traversal.next();
        registry.clear();
        traversal.next();
        assert!(registry.is_empty());
        assert_eq!(*seen.borrow(), vec![('a', 1)]);
    }
}
