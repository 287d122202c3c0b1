//! Lazy observable cells.
//!
//! An [`ObservableCell`] caches the most recent outcome of a stream and only keeps
//! the stream running while it is active. Readers get the cached outcome at any
//! time without blocking on the producer. A [`CallbackCell`] is the no-failure
//! variant that can also push every value into a callback.

mod callback;
mod defaults;
mod notify;

pub use callback::CallbackCell;

use std::{
    borrow::Cow,
    cell::RefCell,
    convert::Infallible,
    sync::{Arc, Weak},
};

use parking_lot::ReentrantMutex;
use tracing::{debug, trace};

use crate::errors::{Outcome, StaleFailure};
use crate::subscription::subscribe::{
    Subscribeable, Subscriber, Subscription, SubscriptionHandle, UnsubscribeLogic,
    Unsubscribeable,
};

use callback::{Delivery, DeliveryFn};
use notify::ChangeObservers;

type Stream<T, E> = Box<dyn Subscribeable<ObsType = T, ErrType = E>>;
type Factory<T, E> = Box<dyn Fn() -> Stream<T, E> + Send + Sync>;

/// A live subscription and everything that belongs to it.
struct Activation<T> {
    epoch: u64,
    // `None` while the stream's `subscribe` call is still running.
    subscription: Option<Subscription>,
    delivery: Option<Delivery<T>>,
}

struct State<T, E> {
    cached: Outcome<T, E>,
    activation: Option<Activation<T>>,
    last_epoch: u64,
    observers: ChangeObservers<T, E>,
    label: Cow<'static, str>,
}

impl<T, E> State<T, E> {
    fn is_current(&self, epoch: u64) -> bool {
        self.activation.as_ref().is_some_and(|a| a.epoch == epoch)
    }
}

pub(crate) struct Inner<T, E> {
    factory: Factory<T, E>,
    state: ReentrantMutex<RefCell<State<T, E>>>,
}

/// A cached, lazily subscribed view of a stream.
///
/// The cell starts idle, holding `Ok(initial_value)`. Activating it invokes the
/// producer factory and subscribes to the stream it returns; every emitted value
/// replaces the cached outcome and notifies change observers. A stream failure is
/// cached as `Err(error)`. Deactivating cancels the subscription and keeps the
/// last cached outcome.
///
/// All state transitions happen under one reentrant lock owned by the cell, so a
/// change observer may read the cell or toggle its activation from inside its
/// notification.
///
/// Dropping the cell cancels its live subscription.
///
/// # Example
///
/// ```no_run
/// use rxcell::{Observable, ObservableCell};
///
/// let cell = ObservableCell::new(0, || Observable::<i32, String>::from_values(vec![1, 2, 3]));
/// assert_eq!(cell.value(), Ok(0));
///
/// cell.set_active(true);
/// assert_eq!(cell.value(), Ok(3));
///
/// cell.set_active(false);
/// assert_eq!(cell.get(), Ok(3));
/// ```
pub struct ObservableCell<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> ObservableCell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an idle cell caching `Ok(initial_value)`.
    ///
    /// `producer_factory` is not invoked until the cell is activated, and is
    /// invoked again on every activation so each one gets a fresh stream.
    pub fn new<F, S>(initial_value: T, producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = T, ErrType = E> + 'static,
    {
        let factory: Factory<T, E> = Box::new(move || Box::new(producer_factory()) as Stream<T, E>);

        ObservableCell {
            inner: Arc::new(Inner {
                factory,
                state: ReentrantMutex::new(RefCell::new(State {
                    cached: Ok(initial_value),
                    activation: None,
                    last_epoch: 0,
                    observers: ChangeObservers::new(),
                    label: Cow::Borrowed("cell"),
                })),
            }),
        }
    }

    /// Sets the label this cell reports in log records.
    #[must_use]
    pub fn named(self, label: impl Into<Cow<'static, str>>) -> Self {
        self.inner.state.lock().borrow_mut().label = label.into();
        self
    }

    /// Returns the cached outcome.
    ///
    /// Never waits for the producer: before the first activation this is the
    /// initial value, after deactivation it is the last observed outcome.
    pub fn value(&self) -> Outcome<T, E> {
        self.inner.state.lock().borrow().cached.clone()
    }

    /// Returns the cached value.
    ///
    /// # Errors
    ///
    /// Returns [`StaleFailure`] carrying the stream's error if the cached outcome
    /// is a failure.
    pub fn get(&self) -> Result<T, StaleFailure<E>> {
        self.value().map_err(StaleFailure)
    }

    /// Applies `selector` to the cached value without cloning it.
    ///
    /// `selector` runs while the cell is borrowed and must not call back into the
    /// cell.
    ///
    /// # Errors
    ///
    /// Returns the stream's error if the cached outcome is a failure.
    ///
    /// # Panics
    ///
    /// Panics if `selector` changes the cell, for example by calling
    /// [`set_active`](Self::set_active). Reading the cell from `selector` is fine.
    pub fn map<U>(&self, selector: impl FnOnce(&T) -> U) -> Outcome<U, E> {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        match &state.cached {
            Ok(v) => Ok(selector(v)),
            Err(e) => Err(e.clone()),
        }
    }

    /// Starts or stops the underlying subscription.
    ///
    /// Activating an active cell and deactivating an idle cell are no-ops.
    pub fn set_active(&self, active: bool) {
        if active {
            self.inner.activate(None);
        } else {
            self.inner.deactivate();
        }
    }

    /// Returns `true` while the cell holds a subscription.
    ///
    /// A cell whose stream completed stays active until it is deactivated.
    pub fn is_active(&self) -> bool {
        self.inner.state.lock().borrow().activation.is_some()
    }

    /// Registers `observer` to be called with the new outcome after every change
    /// of the cached outcome.
    ///
    /// The observer runs synchronously on the thread that changed the outcome,
    /// while the cell's lock is held. Unsubscribing the returned `Subscription`
    /// removes the observer.
    pub fn subscribe_changes(
        &self,
        observer: impl Fn(&Outcome<T, E>) + Send + Sync + 'static,
    ) -> Subscription {
        let key = self
            .inner
            .state
            .lock()
            .borrow_mut()
            .observers
            .insert(Arc::new(observer));

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(
            UnsubscribeLogic::Logic(Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.state.lock().borrow_mut().observers.remove(key);
                }
            })),
            SubscriptionHandle::Nil,
        )
    }

    /// Returns the number of registered change observers.
    pub fn observer_count(&self) -> usize {
        self.inner.state.lock().borrow().observers.len()
    }
}

impl<T> ObservableCell<T, Infallible>
where
    T: Clone + Send + 'static,
{
    /// Returns the cached value of a cell whose stream cannot fail.
    pub fn current(&self) -> T {
        match self.value() {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }
}

impl<T, E> Drop for ObservableCell<T, E> {
    fn drop(&mut self) {
        self.inner.deactivate();
    }
}

impl<T, E> Inner<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Transitions idle to active. Returns `false` if the cell was already active.
    fn activate(self: &Arc<Self>, delivery: Option<DeliveryFn<T>>) -> bool {
        let guard = self.state.lock();
        let epoch = {
            let mut state = guard.borrow_mut();
            if state.activation.is_some() {
                trace!(cell = %state.label, "cell already active");
                return false;
            }
            state.last_epoch += 1;
            let epoch = state.last_epoch;
            state.activation = Some(Activation {
                epoch,
                subscription: None,
                delivery: delivery.map(Delivery::new),
            });
            debug!(cell = %state.label, epoch, "activating cell");
            epoch
        };

        // The stream may emit synchronously from `subscribe`; those deliveries
        // reenter the lock on this thread.
        let mut stream = (self.factory)();
        let subscription = stream.subscribe(self.subscriber(epoch));

        let mut state = guard.borrow_mut();
        if state.is_current(epoch) {
            if let Some(activation) = state.activation.as_mut() {
                activation.subscription = Some(subscription);
            }
        } else {
            trace!(cell = %state.label, epoch, "cell deactivated while subscribing");
            drop(state);
            subscription.unsubscribe();
        }
        true
    }

    fn subscriber(self: &Arc<Self>, epoch: u64) -> Subscriber<T, E> {
        let on_next = Arc::downgrade(self);
        let on_error = Weak::clone(&on_next);
        let on_complete = Weak::clone(&on_next);

        Subscriber::new(
            move |v| {
                if let Some(inner) = on_next.upgrade() {
                    inner.receive_value(epoch, v);
                }
            },
            move |e| {
                if let Some(inner) = on_error.upgrade() {
                    inner.receive_failure(epoch, e);
                }
            },
            move || {
                if let Some(inner) = on_complete.upgrade() {
                    inner.receive_completion(epoch);
                }
            },
        )
    }

    fn receive_value(&self, epoch: u64, v: T) {
        let guard = self.state.lock();
        let delivered = {
            let mut state = guard.borrow_mut();
            if !state.is_current(epoch) {
                trace!(cell = %state.label, epoch, "dropping value from cancelled subscription");
                return;
            }
            let has_delivery = state
                .activation
                .as_ref()
                .is_some_and(|a| a.delivery.is_some());
            let delivered = has_delivery.then(|| v.clone());
            state.cached = Ok(v);
            trace!(cell = %state.label, epoch, "cached new value");
            delivered
        };

        self.notify(&guard);
        if let Some(v) = delivered {
            self.deliver(&guard, epoch, v);
        }
    }

    fn receive_failure(&self, epoch: u64, e: E) {
        let guard = self.state.lock();
        {
            let mut state = guard.borrow_mut();
            if !state.is_current(epoch) {
                trace!(cell = %state.label, epoch, "dropping failure from cancelled subscription");
                return;
            }
            state.cached = Err(e);
            debug!(cell = %state.label, epoch, "stream failed; caching failure");
        }
        self.notify(&guard);
    }

    fn receive_completion(&self, epoch: u64) {
        let guard = self.state.lock();
        let state = guard.borrow();
        if state.is_current(epoch) {
            debug!(cell = %state.label, epoch, "stream completed; cell stays active");
        }
    }

    /// Calls every change observer with the cached outcome.
    fn notify(&self, cell: &RefCell<State<T, E>>) {
        let (observers, outcome) = {
            let state = cell.borrow();
            if state.observers.is_empty() {
                return;
            }
            (state.observers.snapshot(), state.cached.clone())
        };
        for observer in observers {
            observer(&outcome);
        }
    }
}

impl<T, E> Inner<T, E> {
    /// Transitions active to idle. Returns `false` if the cell was already idle.
    ///
    /// The subscription is cancelled before the lock is released, so unsubscribe
    /// logic must not wait for a producer that is blocked on this cell.
    fn deactivate(&self) -> bool {
        let guard = self.state.lock();
        let activation = {
            let mut state = guard.borrow_mut();
            match state.activation.take() {
                Some(activation) => {
                    debug!(cell = %state.label, epoch = activation.epoch, "deactivating cell");
                    activation
                }
                None => return false,
            }
        };

        if let Some(subscription) = activation.subscription {
            subscription.unsubscribe();
        }
        drop(guard);
        true
    }
}
