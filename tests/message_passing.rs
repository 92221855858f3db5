// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

use lapin::types::{AMQPValue, FieldTable, LongString, ShortString};
use mockall::{mock, predicate::eq, Sequence};
use rabbitmq_mock::{Attributes, Channel, Connection, ExchangeKind, Options, Payload};
use serde_json::json;

mock! {
    Target {
        fn handle_message(&self, payload: &Payload);
    }
}

fn ha_arguments() -> FieldTable {
    let mut arguments = FieldTable::default();
    arguments.insert(
        ShortString::from("x-ha-policy"),
        AMQPValue::LongString(LongString::from("all")),
    );
    arguments
}

#[test]
fn handles_the_basics_of_message_passing() {
    let bunny = Connection::new();
    let queue = bunny.queue(
        "integration_queue",
        Options::new()
            .durable(true)
            .auto_delete(true)
            .exclusive(false)
            .arguments(ha_arguments()),
    );
    let exchange = bunny.exchange(
        "integration_exchange",
        ExchangeKind::Direct,
        Options::new().durable(true).auto_delete(true),
    );
    queue.bind(&exchange);

    assert!(queue.messages().is_empty());
    assert_eq!(exchange.queues().len(), 1);
    assert!(exchange.bound_to("integration_queue"));
    assert_eq!(queue.default_consumer().message_count(), 0);

    exchange.publish("Message 1");
    exchange.publish("Message 2");
    exchange.publish("Message 3");

    let expected = vec![json!("Message 1"), json!("Message 2"), json!("Message 3")];
    assert_eq!(queue.messages(), expected);
    assert_eq!(queue.snapshot_messages(), expected);

    let mut target = MockTarget::new();
    let mut seq = Sequence::new();
    for message in ["Message 1", "Message 2", "Message 3"] {
        target
            .expect_handle_message()
            .with(eq(json!(message)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
    }

    let mut msg_count = 0;
    queue.subscribe(|delivery| {
        target.handle_message(delivery.payload());
        msg_count += 1;
        assert_eq!(queue.default_consumer().message_count(), msg_count);
    });

    assert_eq!(msg_count, 3);
    assert!(queue.messages().is_empty());
}

#[test]
fn direct_exchange_scenario() {
    let channel = Channel::new();
    let queue = channel.queue(
        "Q",
        Options::new().durable(true).arguments(ha_arguments()),
    );
    let exchange = channel.direct("E");
    queue.bind(&exchange);

    exchange.publish("m1");
    exchange.publish("m2");

    assert_eq!(queue.messages(), vec![json!("m1"), json!("m2")]);
    assert!(exchange.bound_to("Q"));
    assert_eq!(queue.get_bool("durable?"), Ok(true));
    assert_eq!(
        queue.get("arguments"),
        Ok(AMQPValue::FieldTable(ha_arguments()))
    );

    let mut payloads = vec![];
    queue.subscribe(|delivery| payloads.push(delivery.payload().clone()));

    assert_eq!(payloads, vec![json!("m1"), json!("m2")]);
    assert!(queue.messages().is_empty());
    assert_eq!(queue.delivery_count(), 2);
    assert_eq!(queue.default_consumer().message_count(), 2);
}

#[test]
fn one_exchange_fans_out_to_queues_on_the_same_channel() {
    let channel = Channel::new();
    let exchange = channel.fanout("broadcast");
    let audit = channel.queue("audit", Options::new());
    let billing = channel.queue("billing", Options::new());
    audit.bind(&exchange);
    billing.bind(&exchange);

    for n in 0..4 {
        exchange.publish(json!({ "n": n }));
    }

    let expected: Vec<Payload> = (0..4).map(|n| json!({ "n": n })).collect();
    assert_eq!(audit.messages(), expected);
    assert_eq!(billing.messages(), expected);

    audit.subscribe(|_| {});
    assert!(audit.messages().is_empty());
    assert_eq!(billing.messages(), expected);
}

#[test]
fn a_queue_can_be_bound_to_several_exchanges() {
    let channel = Channel::new();
    let orders = channel.direct("orders");
    let refunds = channel.topic("refunds", Options::new());
    let queue = channel.queue("ledger", Options::new());
    queue.bind(&orders);
    queue.bind(&refunds);

    orders.publish("order");
    refunds.publish("refund");

    assert_eq!(queue.messages(), vec![json!("order"), json!("refund")]);
    assert!(orders.bound_to("ledger"));
    assert!(refunds.bound_to("ledger"));
}
