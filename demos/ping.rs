//! # Ping Example
//!
//! Subscribes to an unqualified channel and an id-qualified one, publishes a
//! few payloads and shows that only matching subscribers receive them.
//!
//! ## Run
//! ```bash
//! RUST_LOG=topicbus=trace cargo run --example ping
//! ```

use futures::StreamExt;
use topicbus::{PubSub, Topic, channel};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct User {
    name: String,
}

channel!(Ping: "ping" => u32);
channel!(UserUpdated: "userUpdated" [str] => User);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bus = PubSub::new();

    let mut pings = bus.subscribe::<Ping>();
    let consumer = tokio::spawn(async move {
        while let Some(v) = pings.next().await {
            println!("[ping] {v}");
            if v == 3 {
                break;
            }
        }
    });
    while bus.listener_count(&Topic::new("ping")) == 0 {
        tokio::task::yield_now().await;
    }

    let mut u1 = bus.subscribe_to::<UserUpdated>("u1");
    let mut u2 = bus.subscribe_to::<UserUpdated>("u2");
    u1.activate();
    u2.activate();

    for v in 1..=3 {
        bus.publish::<Ping>(v);
    }
    bus.publish_to::<UserUpdated>("u1", User { name: "Alice".into() });

    let _ = consumer.await;
    if let Some(user) = u1.next().await {
        println!("[u1] {}", user.name);
    }
    println!("[u2] queued={}", u2.queued());

    u1.cancel();
    u2.cancel();
    println!(
        "listeners left: ping={} u1={} u2={}",
        bus.listener_count(&Topic::new("ping")),
        bus.listener_count(u1.topic()),
        bus.listener_count(u2.topic()),
    );
}
