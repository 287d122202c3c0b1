#![allow(dead_code)]

use std::{
    sync::{mpsc, Arc, Mutex},
    time::Duration,
};

use rxcell::{subscribe::Subscription, ObservableCell, Outcome};

/// Records every outcome a cell announces and lets the test wait for them.
pub struct ChangeRecorder<T, E> {
    pub seen: Arc<Mutex<Vec<Outcome<T, E>>>>,
    rx: mpsc::Receiver<()>,
    _subscription: Subscription,
}

impl<T, E> ChangeRecorder<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn attach(cell: &ObservableCell<T, E>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_c = Arc::clone(&seen);
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);

        let subscription = cell.subscribe_changes(move |outcome| {
            seen_c.lock().unwrap().push(outcome.clone());
            let _ = tx.lock().unwrap().send(());
        });

        ChangeRecorder {
            seen,
            rx,
            _subscription: subscription,
        }
    }

    /// Waits for `n` more notifications. Returns `false` on timeout.
    pub fn wait_for(&self, n: usize) -> bool {
        (0..n).all(|_| self.rx.recv_timeout(Duration::from_secs(3)).is_ok())
    }

    /// Returns `true` if no notification arrives within `window`.
    pub fn stays_quiet(&self, window: Duration) -> bool {
        self.rx.recv_timeout(window).is_err()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}
