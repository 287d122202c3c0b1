use std::{any::Any, future::Future, pin::Pin, thread::JoinHandle as ThreadJoinHandle};

use tokio::runtime;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::observer::Observer;

/// A trait for types that can be subscribed to, allowing consumers to receive
/// values emitted by a stream.
pub trait Subscribeable {
    /// The type of items emitted by the stream.
    type ObsType;

    /// The type of error the stream may terminate with.
    type ErrType;

    /// Subscribes to the stream and specifies how to handle emitted values.
    ///
    /// The `Subscriber` parameter defines the behavior for processing values,
    /// the terminal error and the completion signal. The implementation should
    /// establish the subscription and manage the delivery of signals to the
    /// subscriber.
    ///
    /// The returned `Subscription` allows the caller to cancel the stream.
    fn subscribe(&mut self, s: Subscriber<Self::ObsType, Self::ErrType>) -> Subscription;
}

impl<S: Subscribeable + ?Sized> Subscribeable for Box<S> {
    type ObsType = S::ObsType;
    type ErrType = S::ErrType;

    fn subscribe(&mut self, s: Subscriber<Self::ObsType, Self::ErrType>) -> Subscription {
        (**self).subscribe(s)
    }
}

/// A trait for types that can be unsubscribed, allowing the clean release of resources
/// associated with a subscription.
pub trait Unsubscribeable {
    /// Unsubscribes from a subscription and releases associated resources.
    ///
    /// This method serves as a signal to the stream that it should stop emitting
    /// values. The instance it is called on is consumed.
    fn unsubscribe(self);
}

type NextFn<T> = Box<dyn FnMut(T) + Send>;
type CompleteFn = Box<dyn FnMut() + Send>;
type ErrorFn<E> = Box<dyn FnMut(E) + Send>;

/// A type that acts as an observer, allowing users to handle emitted values, the
/// terminal error and completion when subscribing to a stream.
///
/// Once a terminal signal has been delivered, the `Subscriber` ignores every
/// further signal.
pub struct Subscriber<NextFnType, ErrType> {
    next_fn: NextFn<NextFnType>,
    complete_fn: Option<CompleteFn>,
    error_fn: Option<ErrorFn<ErrType>>,
    completed: bool,
    errored: bool,
}

impl<NextFnType, ErrType> Subscriber<NextFnType, ErrType> {
    /// Creates a new `Subscriber` instance with custom handling functions for emitted
    /// values, errors, and completion.
    pub fn new(
        next_fn: impl FnMut(NextFnType) + 'static + Send,
        error_fn: impl FnMut(ErrType) + 'static + Send,
        complete_fn: impl FnMut() + 'static + Send,
    ) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            complete_fn: Some(Box::new(complete_fn)),
            error_fn: Some(Box::new(error_fn)),
            completed: false,
            errored: false,
        }
    }

    /// Create a new Subscriber with the provided `next` function.
    ///
    /// The `next` closure is called when the stream emits a new item.
    pub fn on_next(next_fn: impl FnMut(NextFnType) + 'static + Send) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            complete_fn: None,
            error_fn: None,
            completed: false,
            errored: false,
        }
    }

    /// Set the completion function for the Subscriber.
    pub fn on_complete(&mut self, complete_fn: impl FnMut() + 'static + Send) {
        self.complete_fn = Some(Box::new(complete_fn));
    }

    /// Set the error-handling function for the Subscriber.
    pub fn on_error(&mut self, error_fn: impl FnMut(ErrType) + 'static + Send) {
        self.error_fn = Some(Box::new(error_fn));
    }

    /// Returns `true` once `complete` or `error` has been delivered.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.completed || self.errored
    }
}

impl<T, E> Observer for Subscriber<T, E> {
    type NextFnType = T;
    type ErrorType = E;

    fn next(&mut self, v: Self::NextFnType) {
        if self.is_terminated() {
            return;
        }
        (self.next_fn)(v);
    }

    fn error(&mut self, e: Self::ErrorType) {
        if self.is_terminated() {
            return;
        }
        self.errored = true;
        if let Some(efn) = &mut self.error_fn {
            (efn)(e);
        }
    }

    fn complete(&mut self) {
        if self.is_terminated() {
            return;
        }
        self.completed = true;
        if let Some(cfn) = &mut self.complete_fn {
            (cfn)();
        }
    }
}

/// Enumeration representing different types of handles used to await
/// asynchronous streams.
pub enum SubscriptionHandle {
    /// No specific handle for task or thread awaiting.
    Nil,

    /// Holds a join handle for awaiting a stream that uses a Tokio task.
    JoinTask(JoinHandle<()>),

    /// Holds a join handle for awaiting a stream that uses an OS thread.
    JoinThread(ThreadJoinHandle<()>),
}

/// Represents a live subscription to a stream.
///
/// Subscribing to a stream returns a `Subscription`. It is used to cancel the
/// stream through its [`UnsubscribeLogic`] and to await streams that run on
/// `Tokio` tasks or OS threads.
///
/// [`UnsubscribeLogic`]: enum.UnsubscribeLogic.html
pub struct Subscription {
    unsubscribe_logic: UnsubscribeLogic,
    subscription_future: SubscriptionHandle,
    runtime_handle: Result<runtime::Handle, runtime::TryCurrentError>,
}

impl Subscription {
    /// Creates a new Subscription instance with the specified unsubscribe logic and
    /// subscription handle.
    ///
    /// The Tokio runtime current at creation time, if any, is captured and later
    /// used to run [`UnsubscribeLogic::Future`].
    #[must_use]
    pub fn new(
        unsubscribe_logic: UnsubscribeLogic,
        subscription_future: SubscriptionHandle,
    ) -> Self {
        let runtime_handle = runtime::Handle::try_current();
        Subscription {
            unsubscribe_logic,
            subscription_future,
            runtime_handle,
        }
    }

    /// A subscription with nothing to cancel and nothing to await.
    #[must_use]
    pub fn empty() -> Self {
        Subscription::new(UnsubscribeLogic::Nil, SubscriptionHandle::Nil)
    }

    /// Awaits the completion of the Tokio task or OS thread associated with
    /// this subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if joining a thread or awaiting a task used by the
    /// stream fails.
    pub async fn join_concurrent(self) -> Result<(), Box<dyn Any + Send>> {
        match self.subscription_future {
            SubscriptionHandle::JoinTask(task_handle) => task_handle
                .await
                .map_err(|e| Box::new(e) as Box<dyn Any + Send>),
            SubscriptionHandle::JoinThread(thread_handle) => thread_handle.join(),
            SubscriptionHandle::Nil => Ok(()),
        }
    }

    /// Blocks until the OS thread associated with this subscription finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if joining a thread used by the stream fails.
    ///
    /// # Panics
    ///
    /// If this method is used to await a `Tokio` task, it will panic. Use
    /// `join_concurrent().await` for those instead.
    pub fn join(self) -> Result<(), Box<dyn Any + Send>> {
        match self.subscription_future {
            SubscriptionHandle::JoinThread(thread_handle) => thread_handle.join(),
            SubscriptionHandle::Nil => Ok(()),
            SubscriptionHandle::JoinTask(_) => {
                panic!("Handle should be OS thread handle but it is Tokio task handle instead. When working with Tokio, use `join_concurrent().await` to await the completion of streams.")
            }
        }
    }
}

impl Unsubscribeable for Subscription {
    fn unsubscribe(self) {
        self.unsubscribe_logic.unsubscribe(self.runtime_handle);
    }
}

/// Enumerates various unsubscribe logic options for a subscription.
pub enum UnsubscribeLogic {
    /// No specific unsubscribe logic.
    Nil,

    /// If one subscription depends on another. Wrapped subscription's unsubscribe
    /// will be called upon unsubscribing.
    Wrapped(Box<Subscription>),

    /// Unsubscribe logic defined by a function. Runs inline on the thread that
    /// unsubscribes.
    Logic(Box<dyn FnOnce() + Send>),

    /// Asynchronous unsubscribe logic represented by a future. Use if you need to
    /// `.await` as a part of the unsubscribe logic.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

impl UnsubscribeLogic {
    fn unsubscribe(self, runtime_handle: Result<runtime::Handle, runtime::TryCurrentError>) {
        match self {
            UnsubscribeLogic::Nil => (),
            UnsubscribeLogic::Logic(fnc) => fnc(),
            UnsubscribeLogic::Wrapped(subscription) => subscription.unsubscribe(),
            UnsubscribeLogic::Future(future) => {
                // Fall back to the runtime of the unsubscribing thread when the
                // subscription was created outside of Tokio.
                match runtime_handle.or_else(|_| runtime::Handle::try_current()) {
                    Ok(handle) => {
                        handle.spawn(future);
                    }
                    Err(e) => {
                        warn!(error = %e, "asynchronous unsubscribe logic dropped outside of Tokio runtime");
                    }
                }
            }
        }
    }
}
