//! Provides structures and traits related to subscription management.
//!
//! This module includes types such as `Subscriber` for handling emitted values,
//! errors, and completions, as well as `Subscription` for cancelling the streams
//! a cell subscribes to.
//!
//! Additionally, it defines enums and traits for subscription handling, awaiting
//! asynchronous streams and defining unsubscribe logic.
pub mod subscribe;
