//! The `observable` module provides the stream type that cells subscribe to,
//! together with a handful of stock producers.

mod stop_signal;

pub use stop_signal::*;

use crate::observer::Observer;
use crate::subscription::subscribe::{Subscribeable, Subscriber, Subscription};

type SubscribeFn<T, E> = Box<dyn FnMut(Subscriber<T, E>) -> Subscription + Send + Sync>;

/// The `Observable` struct represents a cold source of values.
///
/// Nothing happens until it is subscribed to; every subscription runs the
/// user-supplied subscribe function again. A stream emits zero or more values and
/// then at most one terminal signal.
///
/// # Example: synchronous `Observable`
///
/// ```no_run
/// use rxcell::subscribe::{Subscriber, Subscription};
/// use rxcell::{Observable, Observer, Subscribeable};
///
/// let mut emit_3_observable = Observable::<u32, ()>::new(|mut subscriber| {
///     for i in 1..=3 {
///         subscriber.next(i);
///     }
///     subscriber.complete();
///
///     // Nothing to cancel, nothing to await.
///     Subscription::empty()
/// });
///
/// emit_3_observable.subscribe(Subscriber::new(
///     |v| println!("Emitted {}", v),
///     |_| eprintln!("Error"),
///     || println!("Completed"),
/// ));
/// ```
///
/// # Example: OS thread `Observable` with `unsubscribe`
///
/// The returned `Subscription` raises a stop signal that the emitting thread
/// checks before every emission.
///
/// ```no_run
/// use std::time::Duration;
///
/// use rxcell::observable::stop_signal;
/// use rxcell::subscribe::{Subscriber, Subscription, SubscriptionHandle, Unsubscribeable};
/// use rxcell::{Observable, Observer, Subscribeable};
///
/// let mut observable = Observable::<u32, ()>::new(|mut o| {
///     let (handle, token) = stop_signal();
///
///     let join_handle = std::thread::spawn(move || {
///         for i in 0..=10000 {
///             if token.is_stopped() {
///                 break;
///             }
///             o.next(i);
///             std::thread::sleep(Duration::from_millis(1));
///         }
///         o.complete();
///     });
///
///     Subscription::new(
///         handle.into_unsubscribe_logic(),
///         SubscriptionHandle::JoinThread(join_handle),
///     )
/// });
///
/// let subscription = observable.subscribe(Subscriber::on_next(|v| println!("Emitted {}", v)));
/// std::thread::sleep(Duration::from_millis(50));
/// subscription.unsubscribe();
/// ```
pub struct Observable<T, E> {
    subscribe_fn: SubscribeFn<T, E>,
}

impl<T: 'static, E: 'static> Observable<T, E> {
    /// Creates a new `Observable` from the function run on every subscription.
    pub fn new(
        sf: impl FnMut(Subscriber<T, E>) -> Subscription + Send + Sync + 'static,
    ) -> Self {
        Observable {
            subscribe_fn: Box::new(sf),
        }
    }

    /// Emits every item of `values` synchronously on the subscribing thread and
    /// completes.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
    {
        Observable::new(move |mut o| {
            for v in values.clone() {
                o.next(v);
            }
            o.complete();
            Subscription::empty()
        })
    }

    /// Emits every item of `values` synchronously on the subscribing thread and
    /// then fails with `error`.
    pub fn throw<I>(values: I, error: E) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
        E: Clone + Send + Sync,
    {
        Observable::new(move |mut o| {
            for v in values.clone() {
                o.next(v);
            }
            o.error(error.clone());
            Subscription::empty()
        })
    }

    /// A stream that never emits and never terminates.
    pub fn never() -> Self {
        Observable::new(|_| Subscription::empty())
    }
}

impl<T: 'static, E: 'static> Subscribeable for Observable<T, E> {
    type ObsType = T;
    type ErrType = E;

    fn subscribe(&mut self, s: Subscriber<Self::ObsType, Self::ErrType>) -> Subscription {
        (self.subscribe_fn)(s)
    }
}
