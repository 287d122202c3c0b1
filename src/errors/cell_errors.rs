use thiserror::Error;

/// Snapshot of the most recently observed state of a stream: the last value it
/// emitted, or the error it failed with.
pub type Outcome<T, E> = std::result::Result<T, E>;

/// Returned by the unwrapping read of a cell whose cached outcome is a failure.
///
/// Carries the error the stream terminated with, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cached outcome is a stream failure: {0}")]
pub struct StaleFailure<E>(pub E);

impl<E> StaleFailure<E> {
    /// Returns the error the stream failed with.
    pub fn into_inner(self) -> E {
        self.0
    }

    /// Borrows the error the stream failed with.
    pub fn error(&self) -> &E {
        &self.0
    }
}

impl<E> From<E> for StaleFailure<E> {
    fn from(e: E) -> Self {
        StaleFailure(e)
    }
}
