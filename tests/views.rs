use parking_lot::Mutex;
use spark_property::{ChangeReason, Observable, Subscription, UpdateReason, ViewModelProperty};
use std::sync::Arc;

fn record<T: Send + 'static>(stream: &Observable<T>) -> (Arc<Mutex<Vec<T>>>, Subscription) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let l = log.clone();
    let sub = stream.subscribe_next(move |value| l.lock().push(value));
    (log, sub)
}

type Counter = ViewModelProperty<i32, &'static str, char>;

#[test]
fn late_subscriber_receives_current_before_updates() {
    let p = Counter::new(0);
    p.set_by_update(1, "a");
    p.set_by_update(2, "b");
    p.set_by_action(3, 'x');

    let (log, _sub) = record(&p.update_view());
    p.set_by_update(4, "c");

    assert_eq!(
        *log.lock(),
        vec![(3, UpdateReason::Current), (4, UpdateReason::Update("c"))]
    );
}

#[test]
fn update_view_ignores_actions() {
    let p = Counter::new(0);
    let (log, _sub) = record(&p.update_view());
    p.set_by_action(9, 'k');

    assert_eq!(*log.lock(), vec![(0, UpdateReason::Current)]);
}

#[test]
fn each_subscriber_gets_its_own_current_event() {
    let p = Counter::new(10);
    let view = p.update_view();

    let (first, _f) = record(&view);
    p.set_by_update(11, "u");
    let (second, _s) = record(&view);
    p.set_by_update(12, "v");

    assert_eq!(
        *first.lock(),
        vec![
            (10, UpdateReason::Current),
            (11, UpdateReason::Update("u")),
            (12, UpdateReason::Update("v")),
        ]
    );
    assert_eq!(
        *second.lock(),
        vec![(11, UpdateReason::Current), (12, UpdateReason::Update("v"))]
    );
}

#[test]
fn all_changes_view_forwards_both_channels_in_arrival_order() {
    let p = Counter::new(0);
    let (log, _sub) = record(&p.all_changes_view());

    p.set_by_action(1, 'a');
    p.set_by_update(2, "net");
    p.set_by_action(3, 'b');

    assert_eq!(
        *log.lock(),
        vec![
            (0, ChangeReason::Current),
            (1, ChangeReason::Action('a')),
            (2, ChangeReason::Update("net")),
            (3, ChangeReason::Action('b')),
        ]
    );
}

#[test]
fn no_info_views_strip_reasons() {
    let p = Counter::new(5);
    let (updates, _u) = record(&p.no_info_update_view());
    let (all, _a) = record(&p.no_info_all_changes_view());

    p.set_by_update(6, "x");
    p.set_by_action(7, 'y');

    assert_eq!(*updates.lock(), vec![5, 6]);
    assert_eq!(*all.lock(), vec![5, 6, 7]);
}

#[test]
fn subscriber_may_mutate_the_property_reentrantly() {
    let p = Arc::new(Counter::new(0));
    let (log, _log_sub) = record(&p.all_changes_view());

    let weak = Arc::downgrade(&p);
    let _echo = p.update_stream().subscribe_next(move |(value, _)| {
        if value == 1 {
            if let Some(p) = weak.upgrade() {
                assert_eq!(p.set_by_action(2, 'e'), 1);
            }
        }
    });

    assert_eq!(p.set_by_update(1, "net"), 0);

    assert_eq!(p.value(), 2);
    assert_eq!(
        *log.lock(),
        vec![
            (0, ChangeReason::Current),
            (1, ChangeReason::Update("net")),
            (2, ChangeReason::Action('e')),
        ]
    );
}

#[test]
fn mutation_from_current_callback_is_not_lost() {
    let p = Arc::new(Counter::new(0));
    let weak = Arc::downgrade(&p);
    let log = Arc::new(Mutex::new(Vec::new()));
    let l = log.clone();

    let _sub = p.update_view().subscribe_next(move |(value, reason)| {
        l.lock().push((value, reason.clone()));
        if reason.is_current() {
            if let Some(p) = weak.upgrade() {
                p.set_by_update(value + 1, "bump");
            }
        }
    });

    assert_eq!(
        *log.lock(),
        vec![(0, UpdateReason::Current), (1, UpdateReason::Update("bump"))]
    );
    assert_eq!(p.value(), 1);
}

#[test]
fn views_are_fresh_per_call() {
    let p = Counter::new(0);
    let a = p.update_view();
    let b = p.update_view();

    let (la, _sa) = record(&a);
    p.set_by_update(1, "one");
    let (lb, _sb) = record(&b);

    assert_eq!(la.lock().len(), 2);
    assert_eq!(*lb.lock(), vec![(1, UpdateReason::Current)]);
}
