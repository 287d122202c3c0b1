use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::Notify;

use crate::subscription::subscribe::UnsubscribeLogic;

struct Signal {
    stopped: AtomicBool,
    notify: Notify,
}

/// Raising side of a stop signal, held by the unsubscribe logic of a stream.
pub struct StopHandle(Arc<Signal>);

/// Observing side of a stop signal, moved into the thread or task that emits.
#[derive(Clone)]
pub struct StopToken(Arc<Signal>);

/// Opens a stop signal for a stream that emits from an OS thread or a Tokio task.
///
/// The stream returns the [`StopHandle`] as its unsubscribe logic and polls or
/// awaits the [`StopToken`] between emissions. Works both inside and outside of a
/// Tokio runtime.
#[must_use]
pub fn stop_signal() -> (StopHandle, StopToken) {
    let signal = Arc::new(Signal {
        stopped: AtomicBool::new(false),
        notify: Notify::new(),
    });
    (StopHandle(Arc::clone(&signal)), StopToken(signal))
}

impl StopHandle {
    /// Raises the signal. Raising it more than once has no further effect.
    pub fn stop(&self) {
        if !self.0.stopped.swap(true, Ordering::AcqRel) {
            self.0.notify.notify_waiters();
        }
    }

    /// Converts the handle into unsubscribe logic that raises the signal inline.
    #[must_use]
    pub fn into_unsubscribe_logic(self) -> UnsubscribeLogic {
        UnsubscribeLogic::Logic(Box::new(move || self.stop()))
    }
}

impl StopToken {
    /// Returns `true` once the subscription has been cancelled.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.stopped.load(Ordering::Acquire)
    }

    /// Resolves once the subscription has been cancelled.
    pub async fn stopped(&self) {
        loop {
            let notified = self.0.notify.notified();
            if self.is_stopped() {
                return;
            }
            notified.await;
        }
    }
}
