/**
 * A `CallbackCell` fed by a `Tokio` task. The callback receives the current value
 * as soon as it is attached, then every value the task emits.
 */
use std::{convert::Infallible, time::Duration};

use rxcell::{
    subscribe::{Subscription, SubscriptionHandle, UnsubscribeLogic},
    CallbackCell, Observable, Observer,
};

use tokio::{sync::mpsc::channel, task, time};

#[tokio::main()]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let users = CallbackCell::sequence(|| {
        Observable::<Vec<String>, Infallible>::new(|mut o| {
            let (tx, mut rx) = channel::<()>(1);

            let join_handle = task::spawn(async move {
                let mut names = Vec::new();
                for name in ["ada", "grace", "barbara"] {
                    tokio::select! {
                        _ = rx.recv() => return,
                        _ = time::sleep(Duration::from_millis(100)) => {
                            names.push(name.to_string());
                            o.next(names.clone());
                        }
                    }
                }
                o.complete();
            });

            Subscription::new(
                UnsubscribeLogic::Future(Box::pin(async move {
                    let _ = tx.send(()).await;
                })),
                SubscriptionHandle::JoinTask(join_handle),
            )
        })
    })
    .named("users");

    users.attach_and_deliver(|names| println!("users: {:?}", names));

    time::sleep(Duration::from_millis(500)).await;
    println!("{} users loaded", users.map(Vec::len));
    users.set_active(false);
}
