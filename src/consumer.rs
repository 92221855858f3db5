// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Consumers and Deliveries
//!
//! A [`Consumer`] is a frozen snapshot of how many messages a queue had
//! delivered when it was requested. A [`Delivery`] is what a subscribe
//! handler receives for every drained message.

use crate::errors::AmqpError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Arbitrary message body carried through exchanges and queues.
pub type Payload = Value;

/// Snapshot of a queue's delivery count.
///
/// The count is copied at construction and never recalculated; request a new
/// consumer from the queue to observe later deliveries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumer {
    message_count: u64,
    consumer_tag: String,
}

impl Consumer {
    /// Creates a consumer with the given delivery count and a fresh tag.
    ///
    /// # Parameters
    /// * `message_count` - The delivery count to freeze
    ///
    /// # Returns
    /// A new Consumer instance
    pub fn new(message_count: u64) -> Consumer {
        Consumer {
            message_count,
            consumer_tag: format!("mock-{}", Uuid::new_v4()),
        }
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn consumer_tag(&self) -> &str {
        &self.consumer_tag
    }
}

/// A message handed to a subscribe handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub(crate) payload: Payload,
    pub(crate) delivery_tag: u64,
    pub(crate) queue: String,
}

impl Delivery {
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Position of this delivery in the queue's lifetime, starting at 1.
    pub fn delivery_tag(&self) -> u64 {
        self.delivery_tag
    }

    /// Name of the queue the message was drained from.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Consumes the delivery and returns its payload.
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Decodes the payload into a typed message.
    ///
    /// # Returns
    /// The decoded value or `AmqpError::ParsePayloadError`
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, AmqpError> {
        serde_json::from_value(self.payload.clone())
            .map_err(|err| AmqpError::ParsePayloadError(err.to_string()))
    }
}
