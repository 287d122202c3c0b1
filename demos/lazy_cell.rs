/**
 * A cell that caches the latest reading of a sensor running on an OS thread.
 * The sensor thread only exists while the cell is active; the last reading stays
 * readable after the cell is deactivated.
 */
use std::time::Duration;

use rxcell::{
    observable::stop_signal,
    subscribe::{Subscription, SubscriptionHandle},
    Observable, ObservableCell, Observer,
};

#[derive(Clone, Debug)]
struct SensorError(String);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let temperature = ObservableCell::optional(|| {
        Observable::<Option<f64>, SensorError>::new(|mut o| {
            let (handle, token) = stop_signal();

            let join_handle = std::thread::spawn(move || {
                for i in 0..20 {
                    if token.is_stopped() {
                        return;
                    }
                    o.next(Some(20.0 + f64::from(i) * 0.5));
                    std::thread::sleep(Duration::from_millis(50));
                }
                o.error(SensorError("sensor unplugged".to_string()));
            });

            Subscription::new(
                handle.into_unsubscribe_logic(),
                SubscriptionHandle::JoinThread(join_handle),
            )
        })
    })
    .named("temperature");

    let _changes = temperature.subscribe_changes(|outcome| match outcome {
        Ok(Some(t)) => println!("temperature changed to {:.1}", t),
        Ok(None) => println!("no reading yet"),
        Err(e) => println!("sensor failed: {:?}", e),
    });

    println!("before activation: {:?}", temperature.value());

    temperature.set_active(true);
    std::thread::sleep(Duration::from_millis(300));
    temperature.set_active(false);
    println!("after deactivation: {:?}", temperature.value());

    // Reactivating starts a fresh sensor thread which runs until it fails.
    temperature.set_active(true);
    std::thread::sleep(Duration::from_millis(1200));
    match temperature.get() {
        Ok(t) => println!("final reading: {:?}", t),
        Err(stale) => println!("final reading unavailable: {}", stale.error().0),
    }
}
