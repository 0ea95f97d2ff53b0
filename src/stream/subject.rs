// ============================================================================
// spark-property - Subject
//
// A hot, multicast event channel. Each `next` is fanned out to every observer
// registered at that moment; `complete` closes the channel for good.
// ============================================================================
//
// Delivery takes a snapshot of the observer list and releases the internal
// mutex before calling anything, so an observer may subscribe, unsubscribe,
// or push into the same subject while it is being notified. Each observer
// slot carries its own `active` flag: an observer removed mid-delivery is
// skipped for the rest of that round, one added mid-delivery waits for the
// next round.
// ============================================================================

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::event::{Event, Sink};
use super::observable::Observable;
use super::subscription::Subscription;

// =============================================================================
// OBSERVER SLOT
// =============================================================================

struct ObserverSlot<T> {
    id: u64,
    active: Arc<AtomicBool>,
    sink: Sink<T>,
}

impl<T> Clone for ObserverSlot<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: self.active.clone(),
            sink: self.sink.clone(),
        }
    }
}

struct SubjectState<T> {
    observers: Vec<ObserverSlot<T>>,
    closed: bool,
}

struct SubjectInner<T> {
    state: Mutex<SubjectState<T>>,
    next_id: AtomicU64,
}

impl<T> SubjectInner<T> {
    fn remove(&self, id: u64) {
        self.state.lock().observers.retain(|slot| slot.id != id);
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// Multicast event channel.
///
/// Cloning a `Subject` yields another handle to the same channel.
pub struct Subject<T> {
    inner: Arc<SubjectInner<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subject<T> {
    /// Create an open channel with no observers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SubjectInner {
                state: Mutex::new(SubjectState {
                    observers: Vec::new(),
                    closed: false,
                }),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Close the channel.
    ///
    /// Every live observer receives `Event::Completed` once. Returns `false`
    /// if the channel was already closed, in which case nothing happens.
    pub fn complete(&self) -> bool {
        let observers = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return false;
            }
            state.closed = true;
            std::mem::take(&mut state.observers)
        };

        tracing::debug!(observers = observers.len(), "subject completed");
        for slot in observers {
            if slot.active.swap(false, Ordering::AcqRel) {
                (slot.sink)(Event::Completed);
            }
        }
        true
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.state.lock().observers.len()
    }
}

impl<T: Clone> Subject<T> {
    /// Deliver `value` to every observer registered right now.
    ///
    /// Does nothing once the channel is closed.
    pub fn next(&self, value: T) {
        let snapshot: Vec<ObserverSlot<T>> = {
            let state = self.inner.state.lock();
            if state.closed {
                return;
            }
            state.observers.clone()
        };

        for slot in snapshot {
            if slot.active.load(Ordering::Acquire) {
                (slot.sink)(Event::Next(value.clone()));
            }
        }
    }
}

impl<T: 'static> Subject<T> {
    /// Register an observer.
    ///
    /// If the channel is already closed the observer receives
    /// `Event::Completed` right away and an inactive subscription is returned.
    pub fn subscribe_sink(&self, sink: Sink<T>) -> Subscription {
        let mut state = self.inner.state.lock();
        if state.closed {
            drop(state);
            sink(Event::Completed);
            return Subscription::empty();
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        state.observers.push(ObserverSlot {
            id,
            active: active.clone(),
            sink,
        });
        drop(state);

        let weak: Weak<SubjectInner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            active.store(false, Ordering::Release);
            if let Some(inner) = weak.upgrade() {
                inner.remove(id);
            }
        })
    }

    /// Register a closure as an observer.
    pub fn subscribe(&self, f: impl Fn(Event<T>) + Send + Sync + 'static) -> Subscription {
        self.subscribe_sink(Arc::new(f))
    }

    /// View this channel as an observable.
    ///
    /// The observable keeps the channel alive; subscribe through it exactly
    /// as through [`Subject::subscribe_sink`].
    pub fn as_observable(&self) -> Observable<T> {
        let subject = self.clone();
        Observable::new(move |sink| subject.subscribe_sink(sink))
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Subject")
            .field("observers", &state.observers.len())
            .field("closed", &state.closed)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
