use std::{borrow::Cow, cell::RefCell, convert::Infallible};

use tracing::trace;

use super::{Inner, ObservableCell, State};
use crate::subscription::subscribe::{Subscribeable, Subscription};

pub(super) type DeliveryFn<T> = Box<dyn FnMut(T) + Send>;

/// Callback attached to one activation of a [`CallbackCell`].
pub(super) struct Delivery<T> {
    // Taken out while the callback runs so it can read the cell.
    callback: Option<DeliveryFn<T>>,
}

impl<T> Delivery<T> {
    pub(super) fn new(callback: DeliveryFn<T>) -> Self {
        Delivery {
            callback: Some(callback),
        }
    }
}

fn current_delivery<T, E>(state: &mut State<T, E>, epoch: u64) -> Option<&mut Delivery<T>> {
    state
        .activation
        .as_mut()
        .filter(|a| a.epoch == epoch)
        .and_then(|a| a.delivery.as_mut())
}

impl<T, E> Inner<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Hands `v` to the callback of activation `epoch`, if it has one.
    pub(super) fn deliver(&self, cell: &RefCell<State<T, E>>, epoch: u64, v: T) {
        let Some(mut callback) =
            current_delivery(&mut cell.borrow_mut(), epoch).and_then(|d| d.callback.take())
        else {
            return;
        };

        callback(v);

        // Dropped if the callback deactivated the cell.
        if let Some(delivery) = current_delivery(&mut cell.borrow_mut(), epoch) {
            delivery.callback = Some(callback);
        }
    }
}

/// A cell whose stream cannot fail, with synchronous push delivery.
///
/// Besides being read like an [`ObservableCell`], a `CallbackCell` can drive a
/// callback: [`attach_and_deliver`] calls it with the current value right away,
/// activates the cell, and then calls it with every value the stream emits, in
/// emission order. Each call happens after the value has been cached, so reading
/// the cell from inside the callback returns the value being delivered.
///
/// [`attach_and_deliver`]: CallbackCell::attach_and_deliver
///
/// # Example
///
/// ```no_run
/// use std::convert::Infallible;
///
/// use rxcell::{CallbackCell, Observable};
///
/// let cell = CallbackCell::new(0, || Observable::<i32, Infallible>::from_values(vec![2, 3, 5]));
///
/// cell.attach_and_deliver(|v| println!("delivered {}", v)); // 0, 2, 3, 5
/// assert_eq!(cell.value(), 5);
/// ```
pub struct CallbackCell<T> {
    cell: ObservableCell<T, Infallible>,
}

impl<T> CallbackCell<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an idle cell holding `initial_value`.
    pub fn new<F, S>(initial_value: T, producer_factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Subscribeable<ObsType = T, ErrType = Infallible> + 'static,
    {
        CallbackCell {
            cell: ObservableCell::new(initial_value, producer_factory),
        }
    }

    /// Sets the label this cell reports in log records.
    #[must_use]
    pub fn named(self, label: impl Into<Cow<'static, str>>) -> Self {
        CallbackCell {
            cell: self.cell.named(label),
        }
    }

    /// Calls `callback` with the current value, then activates the cell and calls
    /// `callback` with every value the stream emits.
    ///
    /// If the cell is already active nothing happens and `false` is returned;
    /// a cell has at most one live callback. Deactivating the cell drops the
    /// callback.
    pub fn attach_and_deliver(&self, mut callback: impl FnMut(T) + Send + 'static) -> bool {
        let inner = &self.cell.inner;
        let guard = inner.state.lock();
        let current = {
            let state = guard.borrow();
            if state.activation.is_some() {
                trace!(cell = %state.label, "cell already active; callback rejected");
                return false;
            }
            match &state.cached {
                Ok(v) => v.clone(),
                Err(never) => match *never {},
            }
        };

        // The lock stays held so no activation can slip in between the initial
        // delivery and the subscription.
        callback(current);
        let attached = inner.activate(Some(Box::new(callback)));
        drop(guard);
        attached
    }

    /// Returns the cached value.
    pub fn value(&self) -> T {
        self.cell.current()
    }

    /// Returns the cached value. Never fails for a `CallbackCell`.
    pub fn get(&self) -> T {
        self.cell.current()
    }

    /// Applies `selector` to the cached value without cloning it.
    ///
    /// `selector` must not call back into the cell.
    ///
    /// # Panics
    ///
    /// Panics if `selector` changes the cell.
    pub fn map<U>(&self, selector: impl FnOnce(&T) -> U) -> U {
        match self.cell.map(selector) {
            Ok(u) => u,
            Err(never) => match never {},
        }
    }

    /// Starts or stops the underlying subscription without a callback.
    pub fn set_active(&self, active: bool) {
        self.cell.set_active(active);
    }

    /// Returns `true` while the cell holds a subscription.
    pub fn is_active(&self) -> bool {
        self.cell.is_active()
    }

    /// Registers `observer` to be called with the new value after every change.
    pub fn subscribe_changes(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.cell.subscribe_changes(move |outcome| match outcome {
            Ok(v) => observer(v),
            Err(never) => match *never {},
        })
    }

    /// Returns the number of registered change observers.
    pub fn observer_count(&self) -> usize {
        self.cell.observer_count()
    }

    /// Returns the underlying cell.
    pub fn as_cell(&self) -> &ObservableCell<T, Infallible> {
        &self.cell
    }
}
