// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! In-memory RabbitMQ test double.
//!
//! Declare exchanges and queues, bind them, publish, and drain queues
//! synchronously from tests without a running broker.
//!
//! ```
//! use rabbitmq_mock::{Attributes, Connection, Options};
//!
//! let conn = Connection::new();
//! let channel = conn.create_channel();
//! let exchange = channel.direct("orders");
//! let queue = channel.queue("billing", Options::new().durable(true));
//! queue.bind(&exchange);
//!
//! exchange.publish("order #1");
//!
//! let mut received = vec![];
//! queue.subscribe(|delivery| received.push(delivery.into_payload()));
//!
//! assert_eq!(received, vec![serde_json::json!("order #1")]);
//! assert_eq!(queue.delivery_count(), 1);
//! assert_eq!(queue.get_bool("durable?"), Ok(true));
//! ```

pub mod attributes;
pub mod channel;
pub mod connection;
pub mod consumer;
pub mod errors;
pub mod exchange;
pub mod options;
pub mod queue;
pub mod registry;

pub use attributes::Attributes;
pub use channel::{new_amqp_channel, Channel};
pub use connection::{Connection, ConnectionStatus, QosStatus};
pub use consumer::{Consumer, Delivery, Payload};
pub use errors::AmqpError;
pub use exchange::{Exchange, ExchangeKind};
pub use options::Options;
pub use queue::Queue;
pub use registry::{LocalRegistry, Registry};
