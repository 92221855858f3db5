// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Exchange
//!
//! This module defines the exchange types known to the mock and the in-memory
//! exchange itself. Whatever its kind, a mock exchange behaves like a fanout:
//! a publish appends the message to every bound queue, in bind order. Routing
//! keys and topic patterns are accepted and ignored.

use crate::{
    attributes::{options_value, string_array, Attributes},
    channel::{Channel, ChannelInner},
    consumer::Payload,
    options::Options,
    queue::Queue,
};
use lapin::types::{AMQPValue, LongString};
use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};
use tracing::debug;

const FIXED_ATTRIBUTES: &[&str] = &["name", "type", "channel", "options", "queues"];

/// Key looked up in publish options for logging purposes
const ROUTING_KEY: &str = "routing_key";

/// Represents the types of exchanges available in RabbitMQ.
///
/// The kind is recorded for inspection only; see the module documentation
/// for how messages are actually routed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExchangeKind {
    #[default]
    Direct,
    Fanout,
    Topic,
    Headers,
    Custom(String),
}

impl ExchangeKind {
    /// The type name as RabbitMQ spells it.
    pub fn as_str(&self) -> &str {
        match self {
            ExchangeKind::Direct => "direct",
            ExchangeKind::Fanout => "fanout",
            ExchangeKind::Topic => "topic",
            ExchangeKind::Headers => "headers",
            ExchangeKind::Custom(kind) => kind,
        }
    }
}

impl From<&str> for ExchangeKind {
    fn from(kind: &str) -> Self {
        match kind {
            "direct" => ExchangeKind::Direct,
            "fanout" => ExchangeKind::Fanout,
            "topic" => ExchangeKind::Topic,
            "headers" => ExchangeKind::Headers,
            other => ExchangeKind::Custom(other.to_owned()),
        }
    }
}

impl From<ExchangeKind> for lapin::ExchangeKind {
    /// Converts the mock's kind into lapin's, so topology written against
    /// the mock can be replayed on a real channel.
    fn from(kind: ExchangeKind) -> Self {
        match kind {
            ExchangeKind::Direct => lapin::ExchangeKind::Direct,
            ExchangeKind::Fanout => lapin::ExchangeKind::Fanout,
            ExchangeKind::Headers => lapin::ExchangeKind::Headers,
            ExchangeKind::Topic => lapin::ExchangeKind::Topic,
            ExchangeKind::Custom(kind) => lapin::ExchangeKind::Custom(kind),
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a declared exchange.
///
/// The exchange holds shared handles to its bound queues; it does not own
/// their lifetime and a queue may be bound to several exchanges.
#[derive(Clone)]
pub struct Exchange {
    inner: Rc<ExchangeInner>,
}

struct ExchangeInner {
    name: String,
    kind: ExchangeKind,
    channel: Weak<ChannelInner>,
    options: Options,
    queues: RefCell<Vec<Queue>>,
}

impl Exchange {
    /// Creates a standalone exchange that belongs to no channel.
    ///
    /// # Parameters
    /// * `name` - The name of the exchange
    /// * `kind` - The exchange type
    /// * `options` - The options the exchange is declared with
    ///
    /// # Returns
    /// A new exchange with no bound queues
    pub fn new(name: &str, kind: ExchangeKind, options: Options) -> Exchange {
        Exchange::with_channel(Weak::new(), name, kind, options)
    }

    pub(crate) fn with_channel(
        channel: Weak<ChannelInner>,
        name: &str,
        kind: ExchangeKind,
        options: Options,
    ) -> Exchange {
        debug!(name = name, kind = kind.as_str(), "declaring exchange");

        Exchange {
            inner: Rc::new(ExchangeInner {
                name: name.to_owned(),
                kind,
                channel,
                options,
                queues: RefCell::new(vec![]),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn kind(&self) -> &ExchangeKind {
        &self.inner.kind
    }

    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// The channel this exchange was declared on, while it is still alive.
    pub fn channel(&self) -> Option<Channel> {
        self.inner.channel.upgrade().map(Channel::from_inner)
    }

    /// The bound queues in bind order, duplicates included.
    pub fn queues(&self) -> Vec<Queue> {
        self.inner.queues.borrow().clone()
    }

    /// Publishes a message to every bound queue.
    pub fn publish<M: Into<Payload>>(&self, message: M) {
        self.publish_with(message, &Options::default())
    }

    /// Publishes a message with publish options.
    ///
    /// The options (routing key, headers, delivery mode...) are accepted for
    /// call-site compatibility and otherwise ignored. Publishing to an
    /// exchange with no bound queue drops the message silently.
    ///
    /// # Parameters
    /// * `message` - The payload to publish
    /// * `options` - Publish options
    pub fn publish_with<M: Into<Payload>>(&self, message: M, options: &Options) {
        let payload = message.into();
        let queues = self.queues();

        debug!(
            exchange = self.name(),
            routing_key = ?options.get(ROUTING_KEY),
            queues = queues.len(),
            "publishing message"
        );

        for queue in queues {
            queue.push(payload.clone());
        }
    }

    /// Whether a queue named `queue_name` is bound to this exchange.
    pub fn bound_to(&self, queue_name: &str) -> bool {
        self.inner
            .queues
            .borrow()
            .iter()
            .any(|queue| queue.name() == queue_name)
    }

    pub(crate) fn add_queue(&self, queue: Queue) {
        self.inner.queues.borrow_mut().push(queue);
    }
}

impl Attributes for Exchange {
    fn declared_options(&self) -> &Options {
        &self.inner.options
    }

    fn fixed_attributes(&self) -> &'static [&'static str] {
        FIXED_ATTRIBUTES
    }

    fn fixed_attribute(&self, key: &str) -> Option<AMQPValue> {
        match key {
            "name" => Some(AMQPValue::LongString(LongString::from(self.name()))),
            "type" => Some(AMQPValue::LongString(LongString::from(self.kind().as_str()))),
            "channel" => Some(AMQPValue::Boolean(self.channel().is_some())),
            "options" => Some(options_value(self.options())),
            "queues" => Some(string_array(
                self.queues().iter().map(|queue| queue.name().to_owned()),
            )),
            _ => None,
        }
    }
}

impl PartialEq for Exchange {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Exchange {}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queues: Vec<String> = self
            .inner
            .queues
            .borrow()
            .iter()
            .map(|queue| queue.name().to_owned())
            .collect();

        f.debug_struct("Exchange")
            .field("name", &self.inner.name)
            .field("kind", &self.inner.kind)
            .field("options", &self.inner.options)
            .field("queues", &queues)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AmqpError;
    use serde_json::json;

    fn exchange_options() -> Options {
        Options::new()
            .kind("direct")
            .durable(true)
            .auto_delete(true)
    }

    fn exchange() -> Exchange {
        Exchange::new("my_test_exchange", ExchangeKind::Direct, exchange_options())
    }

    #[test]
    fn test_new_exchange() {
        let exchange = exchange();

        assert_eq!(exchange.name(), "my_test_exchange");
        assert_eq!(exchange.kind(), &ExchangeKind::Direct);
        assert_eq!(exchange.options(), &exchange_options());
        assert!(exchange.queues().is_empty());
        assert!(exchange.channel().is_none());
    }

    #[test]
    fn test_bound_to() {
        let exchange = exchange();
        let queue = Queue::new("a_queue", Options::new());
        queue.bind(&exchange);

        assert_eq!(exchange.queues().len(), 1);
        assert_eq!(exchange.queues()[0], queue);
        assert!(exchange.bound_to("a_queue"));
        assert!(!exchange.bound_to("another_queue"));
    }

    #[test]
    fn test_bind_is_append_only() {
        let exchange = exchange();
        let queue = Queue::new("a_queue", Options::new());
        queue.bind(&exchange);
        queue.bind(&exchange);

        assert_eq!(exchange.queues(), vec![queue.clone(), queue.clone()]);

        exchange.publish("twice");
        assert_eq!(queue.messages(), vec![json!("twice"), json!("twice")]);
    }

    #[test]
    fn test_publish_reaches_every_bound_queue() {
        let exchange = exchange();
        let queue1 = Queue::new("queue1", Options::new());
        let queue2 = Queue::new("queue2", Options::new());
        queue1.bind(&exchange);
        queue2.bind(&exchange);

        exchange.publish("the message");

        assert_eq!(queue1.messages(), vec![json!("the message")]);
        assert_eq!(queue1.snapshot_messages(), vec![json!("the message")]);
        assert_eq!(queue2.messages(), vec![json!("the message")]);
        assert_eq!(queue2.snapshot_messages(), vec![json!("the message")]);
    }

    #[test]
    fn test_publish_keeps_order_and_ignores_routing_key() {
        let exchange = Exchange::new("events", ExchangeKind::Topic, Options::new());
        let queue = Queue::new("audit", Options::new());
        queue.bind(&exchange);

        let options = Options::new().param(
            "routing_key",
            AMQPValue::LongString(LongString::from("does.not.match")),
        );
        exchange.publish("m1");
        exchange.publish_with(json!({ "n": 2 }), &options);
        exchange.publish(3);

        assert_eq!(
            queue.messages(),
            vec![json!("m1"), json!({ "n": 2 }), json!(3)]
        );
    }

    #[test]
    fn test_publish_without_queues_is_noop() {
        let exchange = exchange();
        exchange.publish("lost");
        assert!(exchange.queues().is_empty());
    }

    #[test]
    fn test_declared_attributes() {
        let exchange = exchange();

        assert_eq!(
            exchange.get("type"),
            Ok(AMQPValue::LongString(LongString::from("direct")))
        );
        assert_eq!(exchange.get("durable"), Ok(AMQPValue::Boolean(true)));
        assert_eq!(exchange.get_bool("durable?"), Ok(true));
        assert_eq!(exchange.get("auto_delete"), Ok(AMQPValue::Boolean(true)));
        assert_eq!(exchange.get_bool("auto_delete?"), Ok(true));
        assert_eq!(
            exchange.get("wtf"),
            Err(AmqpError::UnknownAttribute("wtf".to_owned()))
        );
        assert!(exchange.has_attribute("type"));
        assert!(!exchange.has_attribute("wtf?"));
    }

    #[test]
    fn test_every_fixed_field_is_an_attribute() {
        let channel = Channel::new();
        let exchange = channel.topic("events", exchange_options());

        for field in ["name", "type", "channel", "options", "queues"] {
            assert!(exchange.has_attribute(field), "{field}");
            assert!(exchange.has_attribute(&format!("{field}?")), "{field}?");
            assert!(exchange.get(field).is_ok(), "{field}");
        }
    }

    #[test]
    fn test_fixed_field_values() {
        let channel = Channel::new();
        let exchange = channel.fanout("broadcast");
        channel.queue("audit", Options::new()).bind(&exchange);
        channel.queue("billing", Options::new()).bind(&exchange);

        let Ok(AMQPValue::FieldArray(queues)) = exchange.get("queues") else {
            panic!("queues should be a field array");
        };
        assert_eq!(
            queues.as_slice(),
            &[
                AMQPValue::LongString(LongString::from("audit")),
                AMQPValue::LongString(LongString::from("billing")),
            ]
        );
        assert_eq!(exchange.get("channel"), Ok(AMQPValue::Boolean(true)));
        assert_eq!(
            exchange.get("options"),
            Ok(AMQPValue::FieldTable(Default::default()))
        );

        let standalone = Exchange::new("standalone", ExchangeKind::Direct, Options::new());
        assert_eq!(standalone.get_bool("channel?"), Ok(false));
    }

    #[test]
    fn test_type_attribute_follows_kind() {
        let exchange = Exchange::new("fan", ExchangeKind::Fanout, Options::new());
        assert_eq!(
            exchange.get("type"),
            Ok(AMQPValue::LongString(LongString::from("fanout")))
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ExchangeKind::from("topic"), ExchangeKind::Topic);
        assert_eq!(
            ExchangeKind::from("x-consistent-hash"),
            ExchangeKind::Custom("x-consistent-hash".to_owned())
        );
        assert_eq!(
            ExchangeKind::from("x-delayed-message"),
            ExchangeKind::Custom("x-delayed-message".to_owned())
        );
        assert_eq!(ExchangeKind::from("headers").to_string(), "headers");

        let kind: lapin::ExchangeKind = ExchangeKind::Fanout.into();
        assert!(matches!(kind, lapin::ExchangeKind::Fanout));
        let kind: lapin::ExchangeKind = ExchangeKind::from("x-delayed-message").into();
        assert!(matches!(kind, lapin::ExchangeKind::Custom(name) if name == "x-delayed-message"));
    }
}
