// ============================================================================
// spark-property - Observable
//
// A cold, cloneable stream description. Nothing happens until `subscribe`;
// every subscription runs the subscribe function afresh, so per-subscriber
// state (like a "current value" snapshot) is never shared.
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::event::{Event, Sink};
use super::subscription::Subscription;

type SubscribeFn<T> = dyn Fn(Sink<T>) -> Subscription + Send + Sync;

/// A stream of `T` values that can be subscribed to any number of times.
pub struct Observable<T> {
    subscribe_fn: Arc<SubscribeFn<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: self.subscribe_fn.clone(),
        }
    }
}

impl<T: 'static> Observable<T> {
    /// Create an observable from its subscribe function.
    ///
    /// The function receives the subscriber's sink and returns the
    /// subscription that ends delivery to it.
    pub fn new(subscribe_fn: impl Fn(Sink<T>) -> Subscription + Send + Sync + 'static) -> Self {
        Self {
            subscribe_fn: Arc::new(subscribe_fn),
        }
    }

    /// An observable that completes immediately without values.
    pub fn empty() -> Self {
        Self::new(|sink| {
            sink(Event::Completed);
            Subscription::empty()
        })
    }

    pub fn subscribe_sink(&self, sink: Sink<T>) -> Subscription {
        (self.subscribe_fn)(sink)
    }

    /// Subscribe with a closure receiving every event, completion included.
    pub fn subscribe(&self, f: impl Fn(Event<T>) + Send + Sync + 'static) -> Subscription {
        self.subscribe_sink(Arc::new(f))
    }

    /// Subscribe to values only; completion is ignored.
    pub fn subscribe_next(&self, f: impl Fn(T) + Send + Sync + 'static) -> Subscription {
        self.subscribe(move |event| {
            if let Event::Next(value) = event {
                f(value);
            }
        })
    }

    /// Transform every value.
    pub fn map<R: 'static>(&self, f: impl Fn(T) -> R + Send + Sync + 'static) -> Observable<R> {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::new(move |sink: Sink<R>| {
            let f = f.clone();
            source.subscribe(move |event| sink(event.map(|value| f(value))))
        })
    }

    /// Interleave the values of two streams in arrival order.
    ///
    /// The merged stream completes once both sides have completed.
    pub fn merge(&self, other: &Observable<T>) -> Observable<T> {
        let left = self.clone();
        let right = other.clone();
        Observable::new(move |sink: Sink<T>| {
            let remaining = Arc::new(AtomicUsize::new(2));
            let left_sub = left.subscribe(merge_sink(sink.clone(), remaining.clone()));
            let right_sub = right.subscribe(merge_sink(sink, remaining));
            left_sub.join(right_sub)
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Emit `value` to each new subscriber, then everything from `self`.
    pub fn start_with(&self, value: T) -> Observable<T> {
        let source = self.clone();
        Observable::new(move |sink: Sink<T>| {
            sink(Event::Next(value.clone()));
            source.subscribe_sink(sink)
        })
    }
}

/// Forward values, and forward completion only when the last side completes.
fn merge_sink<T: 'static>(
    sink: Sink<T>,
    remaining: Arc<AtomicUsize>,
) -> impl Fn(Event<T>) + Send + Sync + 'static {
    move |event| match event {
        Event::Next(value) => sink(Event::Next(value)),
        Event::Completed => {
            if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                sink(Event::Completed);
            }
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Subject;
    use parking_lot::Mutex;

    fn collect<T: Send + 'static>(
        observable: &Observable<T>,
    ) -> (Arc<Mutex<Vec<Event<T>>>>, Subscription) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        let sub = observable.subscribe(move |event| l.lock().push(event));
        (log, sub)
    }

    #[test]
    fn empty_completes_on_subscribe() {
        let (log, sub) = collect(&Observable::<i32>::empty());
        assert_eq!(*log.lock(), vec![Event::Completed]);
        assert!(!sub.is_active());
    }

    #[test]
    fn map_transforms_values_and_forwards_completion() {
        let subject = Subject::new();
        let doubled = subject.as_observable().map(|v: i32| v * 2);
        let (log, _sub) = collect(&doubled);

        subject.next(1);
        subject.next(4);
        subject.complete();

        assert_eq!(
            *log.lock(),
            vec![Event::Next(2), Event::Next(8), Event::Completed]
        );
    }

    #[test]
    fn start_with_leads_every_subscription() {
        let subject = Subject::new();
        let prefixed = subject.as_observable().start_with(0);

        let (first, _a) = collect(&prefixed);
        subject.next(1);
        let (second, _b) = collect(&prefixed);
        subject.next(2);
        subject.complete();

        assert_eq!(
            *first.lock(),
            vec![Event::Next(0), Event::Next(1), Event::Next(2), Event::Completed]
        );
        assert_eq!(
            *second.lock(),
            vec![Event::Next(0), Event::Next(2), Event::Completed]
        );
    }

    #[test]
    fn start_with_on_finished_source_emits_value_then_completes() {
        let (log, _sub) = collect(&Observable::<i32>::empty().start_with(7));
        assert_eq!(*log.lock(), vec![Event::Next(7), Event::Completed]);
    }

    #[test]
    fn merge_interleaves_in_arrival_order() {
        let left = Subject::new();
        let right = Subject::new();
        let merged = left.as_observable().merge(&right.as_observable());
        let (log, _sub) = collect(&merged);

        left.next("l1");
        right.next("r1");
        left.next("l2");

        assert_eq!(
            *log.lock(),
            vec![Event::Next("l1"), Event::Next("r1"), Event::Next("l2")]
        );
    }

    #[test]
    fn merge_completes_after_both_sides() {
        let left: Subject<i32> = Subject::new();
        let right: Subject<i32> = Subject::new();
        let merged = left.as_observable().merge(&right.as_observable());
        let (log, _sub) = collect(&merged);

        left.complete();
        assert!(log.lock().is_empty());

        right.next(9);
        right.complete();
        assert_eq!(*log.lock(), vec![Event::Next(9), Event::Completed]);
    }

    #[test]
    fn unsubscribing_merged_stream_detaches_both_sides() {
        let left: Subject<i32> = Subject::new();
        let right: Subject<i32> = Subject::new();
        let merged = left.as_observable().merge(&right.as_observable());

        let (_log, sub) = collect(&merged);
        assert_eq!(left.observer_count(), 1);
        assert_eq!(right.observer_count(), 1);

        sub.unsubscribe();
        assert_eq!(left.observer_count(), 0);
        assert_eq!(right.observer_count(), 0);
    }

    #[test]
    fn subscribe_next_ignores_completion() {
        let subject = Subject::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let _sub = subject
            .as_observable()
            .subscribe_next(move |v: i32| s.lock().push(v));

        subject.next(3);
        subject.complete();

        assert_eq!(*seen.lock(), vec![3]);
    }
}
