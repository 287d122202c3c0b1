use std::sync::Arc;

use crate::errors::Outcome;

pub(super) type ChangeFn<T, E> = Arc<dyn Fn(&Outcome<T, E>) + Send + Sync>;

/// Keyed registry of change observers.
///
/// Observers are handed out as a snapshot before being called, so an observer
/// may register or remove observers, or trigger another change, while it runs.
pub(super) struct ChangeObservers<T, E> {
    entries: Vec<(u64, ChangeFn<T, E>)>,
    last_key: u64,
}

impl<T, E> ChangeObservers<T, E> {
    pub(super) fn new() -> Self {
        ChangeObservers {
            entries: Vec::with_capacity(4),
            last_key: 0,
        }
    }

    pub(super) fn insert(&mut self, observer: ChangeFn<T, E>) -> u64 {
        self.last_key += 1;
        self.entries.push((self.last_key, observer));
        self.last_key
    }

    pub(super) fn remove(&mut self, key: u64) {
        self.entries.retain(|(k, _)| *k != key);
    }

    pub(super) fn snapshot(&self) -> Vec<ChangeFn<T, E>> {
        self.entries.iter().map(|(_, o)| Arc::clone(o)).collect()
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
