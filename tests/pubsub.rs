//! End-to-end behaviour of the publish/subscribe engine over the default
//! in-memory dispatch surface.
#![cfg(feature = "local")]

use std::sync::Arc;
use std::time::Duration;

use futures::{FutureExt, StreamExt};
use topicbus::{
    Dispatch, Event, ListenerFn, LocalDispatch, PubSub, SubscriptionState, Topic, channel,
};

#[derive(Clone, Debug, PartialEq)]
struct User {
    name: String,
}

channel!(Ping: "ping" => u32);
channel!(UserUpdated: "userUpdated" [str] => User);
channel!(Msg: "msg" [str] => String);

async fn wait_for_listeners(bus: &PubSub, topic: &Topic, n: usize) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while bus.listener_count(topic) != n {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("listener count reached in time");
}

#[tokio::test]
async fn ping_scenario_pending_pull_resolves() {
    let bus = PubSub::new();
    let mut pings = bus.subscribe::<Ping>();

    let pull = tokio::spawn(async move { pings.next().await });
    wait_for_listeners(&bus, &Topic::new("ping"), 1).await;

    bus.publish::<Ping>(42);
    assert_eq!(pull.await.expect("join"), Some(42));
}

#[tokio::test]
async fn user_updated_scenario_only_matching_id_receives() {
    let bus = PubSub::new();
    let mut u1 = bus.subscribe_to::<UserUpdated>("u1");
    let mut u2 = bus.subscribe_to::<UserUpdated>("u2");
    u1.activate();
    u2.activate();

    bus.publish_to::<UserUpdated>("u1", User { name: "A".into() });

    assert_eq!(u1.next().await, Some(User { name: "A".into() }));
    assert!(u2.next().now_or_never().is_none());
    assert_eq!(u2.queued(), 0);
}

#[tokio::test]
async fn each_payload_yielded_once_in_publish_order() {
    let bus = PubSub::new();
    let mut sub = bus.subscribe::<Ping>();
    sub.activate();

    for v in 0..100 {
        bus.publish::<Ping>(v);
    }

    let got: Vec<u32> = sub.by_ref().take(100).collect().await;
    assert_eq!(got, (0..100).collect::<Vec<_>>());
    assert!(sub.next().now_or_never().is_none());
}

#[tokio::test]
async fn no_replay_of_events_published_before_listening() {
    let bus = PubSub::new();
    bus.publish::<Ping>(1);

    let mut sub = bus.subscribe::<Ping>();
    bus.publish::<Ping>(2); // still Created: not listening yet
    sub.activate();
    bus.publish::<Ping>(3);

    assert_eq!(sub.next().await, Some(3));
}

#[tokio::test]
async fn publish_to_unknown_topic_is_silent() {
    let bus = PubSub::new();
    bus.publish_to::<Msg>("never-subscribed", "hello".into());
    bus.publish_topic(Topic::new("arbitrary"), 5u8);
    assert_eq!(bus.listener_count(&Topic::new("msg:never-subscribed")), 0);
}

#[tokio::test]
async fn cancelled_subscription_is_inert_and_leaves_no_listener() {
    let bus = PubSub::new();
    let topic = Topic::new("msg:a");
    let mut sub = bus.subscribe_to::<Msg>("a");
    sub.activate();
    assert_eq!(bus.listener_count(&topic), 1);

    sub.cancel();
    bus.publish_to::<Msg>("a", "late".into());

    assert_eq!(sub.state(), SubscriptionState::Cancelled);
    assert_eq!(bus.listener_count(&topic), 0);
    assert_eq!(sub.next().await, None);
    assert_eq!(sub.next().await, None);
}

#[tokio::test]
async fn fan_out_respects_each_registration_time() {
    let bus = PubSub::new();
    let mut early = bus.subscribe::<Ping>();
    early.activate();
    bus.publish::<Ping>(1);

    let mut late = bus.subscribe::<Ping>();
    late.activate();
    bus.publish::<Ping>(2);

    assert_eq!(early.next().await, Some(1));
    assert_eq!(early.next().await, Some(2));
    assert_eq!(late.next().await, Some(2));
}

#[tokio::test]
async fn engines_sharing_a_dispatch_surface_see_each_other() {
    let shared = Arc::new(LocalDispatch::new());
    let a = PubSub::builder(Default::default())
        .with_dispatch(shared.clone())
        .build()
        .expect("build a");
    let b = PubSub::builder(Default::default())
        .with_dispatch(shared.clone())
        .build()
        .expect("build b");

    let mut sub = a.subscribe::<Ping>();
    sub.activate();
    b.publish::<Ping>(7);

    assert_eq!(sub.next().await, Some(7));
    assert_eq!(shared.topic_count(), 1);
}

#[tokio::test]
async fn raw_listener_sees_published_events() {
    let bus = PubSub::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let listener = ListenerFn::arc("raw", move |ev: &Event| {
        let _ = tx.send((ev.topic.clone(), ev.data::<String>().cloned()));
    });
    let topic = Topic::new("msg:x");
    bus.dispatch().add_listener(&topic, listener.clone());

    bus.publish_to::<Msg>("x", "hi".into());
    assert_eq!(rx.recv().await, Some((topic.clone(), Some("hi".to_string()))));

    assert!(bus.dispatch().remove_listener(&topic, &listener));
}

#[tokio::test]
async fn subscriptions_move_across_tasks() {
    let bus = PubSub::new();
    let topic = Topic::new("ping");
    let mut handles = Vec::new();
    for _ in 0..4 {
        let mut sub = bus.subscribe::<Ping>();
        handles.push(tokio::spawn(async move {
            let mut got = Vec::new();
            while let Some(v) = sub.next().await {
                got.push(v);
                if got.len() == 3 {
                    break;
                }
            }
            got
        }));
    }
    wait_for_listeners(&bus, &topic, 4).await;

    for v in [10, 20, 30] {
        bus.publish::<Ping>(v);
    }

    for h in handles {
        assert_eq!(h.await.expect("join"), vec![10, 20, 30]);
    }
    wait_for_listeners(&bus, &topic, 0).await;
}
