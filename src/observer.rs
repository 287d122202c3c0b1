//! The `Observer` trait is the receiving side of every stream consumed by a cell.

/// A trait for types that receive the signals of a stream.
///
/// A stream delivers zero or more values through `next`, followed by at most one
/// terminal signal: `error` when it fails or `complete` when it finishes.
pub trait Observer {
    /// The type of values delivered through `next`.
    type NextFnType;

    /// The type of the error delivered through `error`.
    type ErrorType;

    /// Delivers a value.
    fn next(&mut self, _: Self::NextFnType);

    /// Terminates the stream with an error.
    fn error(&mut self, _: Self::ErrorType);

    /// Terminates the stream without an error.
    fn complete(&mut self);
}
