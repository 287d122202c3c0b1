#![allow(dead_code)]

use std::time::Duration;

use rxcell::{
    observable::stop_signal,
    subscribe::{Subscription, SubscriptionHandle, UnsubscribeLogic},
    Observable, Observer,
};

/// Emits `values` from an OS thread, sleeping `step` before each emission, then
/// completes. Stops early once unsubscribed.
pub fn delayed_values<T, E>(values: Vec<T>, step: Duration) -> Observable<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    Observable::new(move |mut o| {
        let (handle, token) = stop_signal();
        let values = values.clone();

        let jh = std::thread::spawn(move || {
            for v in values {
                std::thread::sleep(step);
                if token.is_stopped() {
                    return;
                }
                o.next(v);
            }
            o.complete();
        });

        Subscription::new(
            handle.into_unsubscribe_logic(),
            SubscriptionHandle::JoinThread(jh),
        )
    })
}

/// Fails with `error` from an OS thread after `delay`.
pub fn delayed_failure<T, E>(error: E, delay: Duration) -> Observable<T, E>
where
    T: Send + 'static,
    E: Clone + Send + Sync + 'static,
{
    Observable::new(move |mut o| {
        let error = error.clone();
        let jh = std::thread::spawn(move || {
            std::thread::sleep(delay);
            o.error(error);
        });
        Subscription::new(UnsubscribeLogic::Nil, SubscriptionHandle::JoinThread(jh))
    })
}

/// Emits `0, 1, 2, ...` from a Tokio task every `period` until unsubscribed.
///
/// Cancellation is delivered through asynchronous unsubscribe logic.
pub fn task_counter<E: Send + 'static>(period: Duration) -> Observable<u64, E> {
    Observable::new(move |mut o| {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);

        let jh = tokio::task::spawn(async move {
            let mut i = 0;
            loop {
                tokio::select! {
                    _ = rx.recv() => break,
                    _ = tokio::time::sleep(period) => {
                        o.next(i);
                        i += 1;
                    }
                }
            }
        });

        Subscription::new(
            UnsubscribeLogic::Future(Box::pin(async move {
                let _ = tx.send(()).await;
            })),
            SubscriptionHandle::JoinTask(jh),
        )
    })
}
