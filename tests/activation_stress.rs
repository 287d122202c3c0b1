use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
    time::Duration,
};

use rxcell::{
    observable::stop_signal,
    subscribe::{Subscription, UnsubscribeLogic, SubscriptionHandle},
    Observable, ObservableCell, Observer,
};

const TOGGLES: usize = 300;

/// Counts subscriptions that are live according to the producer side.
#[derive(Default)]
struct Liveness {
    live: AtomicUsize,
    max_live: AtomicUsize,
    subscribed: AtomicUsize,
}

/// A producer that emits `(i, i)` pairs from an OS thread until unsubscribed.
fn pair_stream(liveness: Arc<Liveness>) -> Observable<(u64, u64), String> {
    Observable::new(move |mut o| {
        let now = liveness.live.fetch_add(1, Ordering::SeqCst) + 1;
        liveness.max_live.fetch_max(now, Ordering::SeqCst);
        liveness.subscribed.fetch_add(1, Ordering::SeqCst);

        let (handle, token) = stop_signal();
        thread::spawn(move || {
            let mut i = 0;
            while !token.is_stopped() && i < 10_000 {
                o.next((i, i));
                i += 1;
                thread::yield_now();
            }
        });

        let liveness = Arc::clone(&liveness);
        Subscription::new(
            UnsubscribeLogic::Logic(Box::new(move || {
                liveness.live.fetch_sub(1, Ordering::SeqCst);
                handle.stop();
            })),
            SubscriptionHandle::Nil,
        )
    })
}

#[test]
fn concurrent_toggles_keep_at_most_one_subscription() {
    let liveness = Arc::new(Liveness::default());
    let factory_liveness = Arc::clone(&liveness);
    let cell = Arc::new(ObservableCell::new((0, 0), move || {
        pair_stream(Arc::clone(&factory_liveness))
    }));

    let barrier = Arc::new(Barrier::new(3));
    let togglers: Vec<_> = [true, false]
        .into_iter()
        .map(|first| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..TOGGLES {
                    cell.set_active((i % 2 == 0) == first);
                }
            })
        })
        .collect();

    let reader = {
        let cell = Arc::clone(&cell);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..TOGGLES * 10 {
                let (a, b) = cell.get().unwrap();
                assert_eq!(a, b, "torn cached value");
            }
        })
    };

    for t in togglers {
        t.join().unwrap();
    }
    reader.join().unwrap();

    cell.set_active(false);
    assert_eq!(liveness.live.load(Ordering::SeqCst), 0);
    assert!(liveness.max_live.load(Ordering::SeqCst) <= 1);
    assert!(liveness.subscribed.load(Ordering::SeqCst) >= 1);
}

#[test]
fn concurrent_activations_subscribe_once() {
    let liveness = Arc::new(Liveness::default());
    let factory_liveness = Arc::clone(&liveness);
    let cell = Arc::new(ObservableCell::new((0, 0), move || {
        pair_stream(Arc::clone(&factory_liveness))
    }));

    let barrier = Arc::new(Barrier::new(8));
    let activators: Vec<_> = (0..8)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cell.set_active(true);
            })
        })
        .collect();
    for a in activators {
        a.join().unwrap();
    }

    assert_eq!(liveness.subscribed.load(Ordering::SeqCst), 1);
    assert!(cell.is_active());

    thread::sleep(Duration::from_millis(20));
    cell.set_active(false);
    assert_eq!(liveness.live.load(Ordering::SeqCst), 0);

    // The stopped producer can no longer move the cached value.
    let frozen = cell.get().unwrap();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(cell.get().unwrap(), frozen);
}
