// ============================================================================
// spark-property - ViewModelProperty
// A thread-safe value cell that records *why* it changed
// ============================================================================
//
// Two kinds of mutation exist: updates (programmatic, e.g. a network
// response) and actions (user-initiated, e.g. typing into a field). Each kind
// has its own channel; every mutation emits exactly one event on its own
// channel and none on the other.
//
// One reentrant lock guards the value and both emissions. Emitting while the
// lock is held keeps channel order identical to value-swap order, and the
// reentrancy lets an observer mutate the same property from inside its
// callback: the nested mutation finishes, events included, before the outer
// delivery resumes.
// ============================================================================

use std::cell::RefCell;
use std::sync::{Arc, Weak};

use parking_lot::ReentrantMutex;

use crate::core::types::{ChangeReason, NoInfo, UpdateReason};
use crate::stream::{Event, Observable, Sink, Subject, Subscription};

// =============================================================================
// PROPERTY STATE (shared with derived views through Weak)
// =============================================================================

struct PropertyState<V, U, A> {
    value: ReentrantMutex<RefCell<V>>,
    updates: Subject<(V, U)>,
    actions: Subject<(V, A)>,
}

impl<V, U, A> Drop for PropertyState<V, U, A> {
    fn drop(&mut self) {
        let updates_closed = self.updates.complete();
        let actions_closed = self.actions.complete();
        tracing::debug!(updates_closed, actions_closed, "property released, channels closed");
    }
}

// =============================================================================
// VIEW MODEL PROPERTY
// =============================================================================

/// A mutable value that distinguishes programmatic updates from user actions.
///
/// `U` is the metadata attached to updates and `A` the metadata attached to
/// actions; both default to [`NoInfo`].
///
/// The property is `Send + Sync`; share it with `Arc`. Dropping it closes
/// both channels, completing every live subscriber.
///
/// # Example
///
/// ```
/// use spark_property::ViewModelProperty;
///
/// let name: ViewModelProperty<String> = ViewModelProperty::new("draft".into());
///
/// let previous = name.update("from server".into());
/// assert_eq!(previous, "draft");
///
/// name.act("typed by user".into());
/// assert_eq!(name.value(), "typed by user");
/// ```
pub struct ViewModelProperty<V, U = NoInfo, A = NoInfo> {
    state: Arc<PropertyState<V, U, A>>,
}

impl<V, U, A> ViewModelProperty<V, U, A>
where
    V: Clone + Send + 'static,
    U: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    /// Create a property holding `initial`.
    ///
    /// Both channels start empty; the initial value is visible through
    /// [`value`](Self::value) and the "with current" views.
    pub fn new(initial: V) -> Self {
        Self {
            state: Arc::new(PropertyState {
                value: ReentrantMutex::new(RefCell::new(initial)),
                updates: Subject::new(),
                actions: Subject::new(),
            }),
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Clone of the current value.
    pub fn value(&self) -> V {
        let guard = self.state.value.lock();
        guard.borrow().clone()
    }

    /// Run `f` against the current value while holding the property lock.
    ///
    /// No mutation from another thread can land while `f` runs. `f` sees a
    /// snapshot taken on entry, so it may itself mutate the property (same
    /// thread, reentrant lock) without invalidating what it is reading.
    /// A panic in `f` propagates after the lock is released.
    ///
    /// ```
    /// use spark_property::ViewModelProperty;
    ///
    /// let items: ViewModelProperty<Vec<i32>> = ViewModelProperty::new(vec![1, 2, 3]);
    /// assert_eq!(items.with_value(|v| v.iter().sum::<i32>()), 6);
    /// ```
    pub fn with_value<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        let guard = self.state.value.lock();
        let snapshot = guard.borrow().clone();
        let result = f(&snapshot);
        drop(guard);
        result
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Store `value` as a programmatic update and return the previous value.
    ///
    /// Emits `(value, info)` on the update channel before returning.
    pub fn set_by_update(&self, value: V, info: U) -> V {
        let guard = self.state.value.lock();
        let previous = guard.replace(value.clone());
        tracing::trace!(
            channel = "update",
            observers = self.state.updates.observer_count(),
            "property set"
        );
        self.state.updates.next((value, info));
        drop(guard);
        previous
    }

    /// Store `value` as a user action and return the previous value.
    ///
    /// Emits `(value, info)` on the action channel before returning.
    pub fn set_by_action(&self, value: V, info: A) -> V {
        let guard = self.state.value.lock();
        let previous = guard.replace(value.clone());
        tracing::trace!(
            channel = "action",
            observers = self.state.actions.observer_count(),
            "property set"
        );
        self.state.actions.next((value, info));
        drop(guard);
        previous
    }

    // =========================================================================
    // CHANNELS
    // =========================================================================

    /// Every update as `(value, info)`, in the order updates were applied.
    pub fn update_stream(&self) -> Observable<(V, U)> {
        self.derive(|state, sink| state.updates.subscribe_sink(sink))
    }

    /// Every action as `(value, info)`, in the order actions were applied.
    pub fn action_stream(&self) -> Observable<(V, A)> {
        self.derive(|state, sink| state.actions.subscribe_sink(sink))
    }

    /// Update values with the metadata dropped.
    pub fn no_info_update_stream(&self) -> Observable<V> {
        self.update_stream().map(|(value, _)| value)
    }

    /// Action values with the metadata dropped.
    pub fn no_info_action_stream(&self) -> Observable<V> {
        self.action_stream().map(|(value, _)| value)
    }

    // =========================================================================
    // WITH-CURRENT VIEWS
    // =========================================================================

    /// The current value tagged `Current`, then every later update.
    ///
    /// Each subscriber gets its own `Current` event, taken at the moment it
    /// subscribes. No update can fall between that snapshot and the
    /// subscriber's registration.
    ///
    /// ```
    /// use spark_property::{UpdateReason, ViewModelProperty};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let count: ViewModelProperty<i32, &'static str> = ViewModelProperty::new(0);
    /// count.set_by_update(3, "poll");
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let s = seen.clone();
    /// let _sub = count.update_view().subscribe_next(move |e| s.lock().unwrap().push(e));
    ///
    /// count.set_by_update(4, "poll");
    /// assert_eq!(
    ///     *seen.lock().unwrap(),
    ///     vec![(3, UpdateReason::Current), (4, UpdateReason::Update("poll"))]
    /// );
    /// ```
    pub fn update_view(&self) -> Observable<(V, UpdateReason<U>)> {
        self.derive(|state, sink| {
            let forwarded = state
                .updates
                .as_observable()
                .map(|(value, info)| (value, UpdateReason::Update(info)));
            subscribe_with_current(state, forwarded, sink, UpdateReason::Current)
        })
    }

    /// The current value tagged `Current`, then every later update and action.
    ///
    /// Updates and actions keep their own channel order; between the two
    /// channels events arrive in the order they happened.
    pub fn all_changes_view(&self) -> Observable<(V, ChangeReason<U, A>)> {
        self.derive(|state, sink| {
            let updates = state
                .updates
                .as_observable()
                .map(|(value, info)| (value, ChangeReason::Update(info)));
            let actions = state
                .actions
                .as_observable()
                .map(|(value, info)| (value, ChangeReason::Action(info)));
            subscribe_with_current(state, updates.merge(&actions), sink, ChangeReason::Current)
        })
    }

    /// [`update_view`](Self::update_view) with the reason stripped.
    pub fn no_info_update_view(&self) -> Observable<V> {
        self.update_view().map(|(value, _)| value)
    }

    /// [`all_changes_view`](Self::all_changes_view) with the reason stripped.
    pub fn no_info_all_changes_view(&self) -> Observable<V> {
        self.all_changes_view().map(|(value, _)| value)
    }

    /// Values from both channels, without a `Current` event.
    ///
    /// Completes once both channels have closed.
    pub fn changes_only_stream(&self) -> Observable<V> {
        self.no_info_update_stream().merge(&self.no_info_action_stream())
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Build a fresh observable over the shared state.
    ///
    /// Views hold only a `Weak` reference: once the property is gone,
    /// subscribing completes immediately.
    fn derive<T, F>(&self, subscribe: F) -> Observable<T>
    where
        T: 'static,
        F: Fn(&PropertyState<V, U, A>, Sink<T>) -> Subscription + Send + Sync + 'static,
    {
        let weak: Weak<PropertyState<V, U, A>> = Arc::downgrade(&self.state);
        Observable::new(move |sink: Sink<T>| match weak.upgrade() {
            Some(state) => subscribe(&state, sink),
            None => {
                tracing::trace!("subscribed to a released property");
                sink(Event::Completed);
                Subscription::empty()
            }
        })
    }
}

/// Register `sink` on `forwarded`, then hand it the current value.
///
/// Both steps run under the property lock so no mutation can slip between
/// them. Registering first means a mutation made re-entrantly from the
/// `Current` callback is still delivered, right after it.
fn subscribe_with_current<V, U, A, R>(
    state: &PropertyState<V, U, A>,
    forwarded: Observable<(V, R)>,
    sink: Sink<(V, R)>,
    current: R,
) -> Subscription
where
    V: Clone + 'static,
    R: 'static,
{
    let guard = state.value.lock();
    let value = guard.borrow().clone();
    let subscription = forwarded.subscribe_sink(sink.clone());
    tracing::trace!("view subscribed");
    sink(Event::Next((value, current)));
    drop(guard);
    subscription
}

// =============================================================================
// NO-METADATA CONVENIENCE FORMS
// =============================================================================

impl<V, A> ViewModelProperty<V, NoInfo, A>
where
    V: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    /// [`set_by_update`](Self::set_by_update) without metadata.
    pub fn update(&self, value: V) -> V {
        self.set_by_update(value, NoInfo)
    }
}

impl<V, U> ViewModelProperty<V, U, NoInfo>
where
    V: Clone + Send + 'static,
    U: Clone + Send + 'static,
{
    /// [`set_by_action`](Self::set_by_action) without metadata.
    pub fn act(&self, value: V) -> V {
        self.set_by_action(value, NoInfo)
    }
}

impl<V, U, A> std::fmt::Debug for ViewModelProperty<V, U, A>
where
    V: Clone + Send + std::fmt::Debug + 'static,
    U: Clone + Send + 'static,
    A: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewModelProperty")
            .field("value", &self.value())
            .field("update_observers", &self.state.updates.observer_count())
            .field("action_observers", &self.state.actions.observer_count())
            .finish()
    }
}

// =============================================================================
// CREATION FUNCTION
// =============================================================================

/// Create a property with no update or action metadata.
///
/// ```
/// use spark_property::property;
///
/// let flag = property(false);
/// flag.act(true);
/// assert!(flag.value());
/// ```
pub fn property<V>(initial: V) -> ViewModelProperty<V>
where
    V: Clone + Send + 'static,
{
    ViewModelProperty::new(initial)
}

// =============================================================================
// TESTS
// =============================================================================
