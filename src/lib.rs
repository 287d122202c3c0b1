//! `rxcell` bridges push-based streams into pull-based cached values.
//!
//! An [`ObservableCell`] holds the latest outcome of a stream: the last value it
//! emitted, or the error it failed with. The stream only runs while the cell is
//! active; activation invokes a producer factory and subscribes to the fresh
//! stream it returns, deactivation cancels that subscription and keeps the
//! cached outcome readable. Change observers are notified synchronously after
//! every change of the cached outcome.
//!
//! [`CallbackCell`] is the variant for streams that cannot fail. It can push the
//! current value and every following emission into a callback.
//!
//! Streams are [`Observable`]s, or any other [`Subscribeable`] type. They may emit
//! synchronously while being subscribed, from OS threads, or from `Tokio` tasks.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use rxcell::observable::stop_signal;
//! use rxcell::subscribe::{Subscription, SubscriptionHandle};
//! use rxcell::{Observable, ObservableCell, Observer};
//!
//! let ticks = ObservableCell::optional(|| {
//!     Observable::<Option<u64>, String>::new(|mut o| {
//!         let (handle, token) = stop_signal();
//!         let jh = std::thread::spawn(move || {
//!             for i in 0.. {
//!                 if token.is_stopped() {
//!                     break;
//!                 }
//!                 o.next(Some(i));
//!                 std::thread::sleep(Duration::from_millis(10));
//!             }
//!         });
//!         Subscription::new(handle.into_unsubscribe_logic(), SubscriptionHandle::JoinThread(jh))
//!     })
//! });
//!
//! let _changes = ticks.subscribe_changes(|outcome| println!("tick {:?}", outcome));
//!
//! assert_eq!(ticks.get(), Ok(None));
//! ticks.set_active(true);
//! std::thread::sleep(Duration::from_millis(100));
//! ticks.set_active(false);
//! println!("last tick: {:?}", ticks.value());
//! ```

mod cell;
mod errors;
pub mod observable;
mod observer;
mod subscription;

pub use cell::*;
pub use errors::*;
pub use observable::Observable;
pub use observer::Observer;
pub use subscription::*;
pub use subscription::subscribe::{Subscribeable, Unsubscribeable};
