//! # Handlers Example
//!
//! Attaches background handlers to subscriptions: the built-in `LogHandler`
//! and a custom metrics handler. Shows panic isolation and graceful shutdown.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example handlers --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use topicbus::{Handler, HandlerSet, LogHandler, PubSub, channel};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Order {
    id: u64,
    amount: u64,
}

channel!(OrderPaid: "orderPaid" => Order);

struct MetricsHandler {
    orders: AtomicU64,
    revenue: AtomicU64,
}

impl MetricsHandler {
    fn new() -> Self {
        Self {
            orders: AtomicU64::new(0),
            revenue: AtomicU64::new(0),
        }
    }

    fn print_stats(&self) {
        println!();
        println!("Metrics:");
        println!(" ├─► Orders:  {}", self.orders.load(Ordering::Relaxed));
        println!(" └─► Revenue: {}", self.revenue.load(Ordering::Relaxed));
    }
}

#[async_trait]
impl Handler<Order> for MetricsHandler {
    async fn handle(&self, order: Order) {
        if order.amount == 0 {
            panic!("order {} has no amount", order.id);
        }
        self.orders.fetch_add(1, Ordering::Relaxed);
        self.revenue.fetch_add(order.amount, Ordering::Relaxed);
    }

    fn name(&self) -> &'static str {
        "metrics"
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bus = PubSub::new();
    let metrics = Arc::new(MetricsHandler::new());

    let mut set = HandlerSet::new();
    set.attach(bus.subscribe::<OrderPaid>(), Arc::new(LogHandler::new()));
    set.attach(bus.subscribe::<OrderPaid>(), metrics.clone());

    for (id, amount) in [(1, 120), (2, 0), (3, 80)] {
        bus.publish::<OrderPaid>(Order { id, amount });
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    set.shutdown().await;
    metrics.print_stats();
}
