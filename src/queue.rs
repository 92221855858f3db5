// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue
//!
//! An in-memory queue: a FIFO buffer of published payloads plus a counter of
//! how many of them have been delivered.
//!
//! Unlike a real broker subscription, [`Queue::subscribe`] does not wait for
//! future messages. It drains whatever is buffered, synchronously, and
//! returns. This keeps tests deterministic.

use crate::{
    attributes::{options_value, string_array, Attributes},
    channel::{Channel, ChannelInner},
    consumer::{Consumer, Delivery, Payload},
    exchange::Exchange,
    options::Options,
};
use lapin::types::{AMQPValue, LongLongInt, LongString};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    rc::{Rc, Weak},
};
use tracing::debug;

const FIXED_ATTRIBUTES: &[&str] = &["name", "channel", "options", "messages", "delivery_count"];

/// Handle to a declared queue.
///
/// Clones share the same buffer. Two handles compare equal only when they
/// point at the same queue.
#[derive(Clone)]
pub struct Queue {
    inner: Rc<QueueInner>,
}

struct QueueInner {
    name: String,
    channel: Weak<ChannelInner>,
    options: Options,
    messages: RefCell<VecDeque<Payload>>,
    delivery_count: Cell<u64>,
}

impl Queue {
    /// Creates a standalone queue that belongs to no channel.
    ///
    /// # Parameters
    /// * `name` - The name of the queue
    /// * `options` - The options the queue is declared with
    ///
    /// # Returns
    /// A new, empty queue
    pub fn new(name: &str, options: Options) -> Queue {
        Queue::with_channel(Weak::new(), name, options)
    }

    pub(crate) fn with_channel(channel: Weak<ChannelInner>, name: &str, options: Options) -> Queue {
        debug!(name = name, "declaring queue");

        Queue {
            inner: Rc::new(QueueInner {
                name: name.to_owned(),
                channel,
                options,
                messages: RefCell::new(VecDeque::new()),
                delivery_count: Cell::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// The channel this queue was declared on, while it is still alive.
    pub fn channel(&self) -> Option<Channel> {
        self.inner.channel.upgrade().map(Channel::from_inner)
    }

    /// The buffered payloads, oldest first.
    pub fn messages(&self) -> Vec<Payload> {
        self.inner.messages.borrow().iter().cloned().collect()
    }

    /// Number of buffered payloads.
    pub fn message_count(&self) -> usize {
        self.inner.messages.borrow().len()
    }

    /// Total number of payloads drained by [`Queue::subscribe`].
    pub fn delivery_count(&self) -> u64 {
        self.inner.delivery_count.get()
    }

    /// Binds this queue to an exchange.
    ///
    /// Binding is append-only: binding the same queue twice makes it appear
    /// twice in the exchange, and it then receives every publish twice.
    pub fn bind(&self, exchange: &Exchange) {
        debug!(queue = self.name(), exchange = exchange.name(), "binding queue");
        exchange.add_queue(self.clone());
    }

    /// Drains the queue into `handler`.
    ///
    /// Pops the oldest payload, bumps the delivery count and hands the
    /// payload to `handler`, until the buffer is empty. Payloads published
    /// by the handler itself are drained by the same call.
    ///
    /// # Parameters
    /// * `handler` - Called once per drained payload, in FIFO order
    ///
    /// # Returns
    /// The number of payloads delivered by this call
    pub fn subscribe<F>(&self, mut handler: F) -> u64
    where
        F: FnMut(Delivery),
    {
        let mut delivered = 0;

        loop {
            // the buffer must not stay borrowed while the handler runs
            let Some(payload) = self.inner.messages.borrow_mut().pop_front() else {
                break;
            };

            let delivery_tag = self.inner.delivery_count.get() + 1;
            self.inner.delivery_count.set(delivery_tag);
            delivered += 1;

            handler(Delivery {
                payload,
                delivery_tag,
                queue: self.inner.name.clone(),
            });
        }

        debug!(name = self.name(), delivered = delivered, "queue drained");
        delivered
    }

    /// A consumer frozen at the current delivery count.
    pub fn default_consumer(&self) -> Consumer {
        Consumer::new(self.delivery_count())
    }

    /// Deep copy of the buffered payloads.
    ///
    /// Real clients have no equivalent. It lets a test check what was
    /// published without draining the queue.
    pub fn snapshot_messages(&self) -> Vec<Payload> {
        self.messages()
    }

    pub(crate) fn push(&self, payload: Payload) {
        self.inner.messages.borrow_mut().push_back(payload);
    }
}

impl Attributes for Queue {
    fn declared_options(&self) -> &Options {
        &self.inner.options
    }

    fn fixed_attributes(&self) -> &'static [&'static str] {
        FIXED_ATTRIBUTES
    }

    fn fixed_attribute(&self, key: &str) -> Option<AMQPValue> {
        match key {
            "name" => Some(AMQPValue::LongString(LongString::from(self.name()))),
            "delivery_count" => Some(AMQPValue::LongLongInt(
                self.delivery_count() as LongLongInt,
            )),
            "channel" => Some(AMQPValue::Boolean(self.channel().is_some())),
            "options" => Some(options_value(self.options())),
            // payloads as JSON text
            "messages" => Some(string_array(
                self.messages().iter().map(|payload| payload.to_string()),
            )),
            _ => None,
        }
    }
}

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Queue {}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.inner.name)
            .field("options", &self.inner.options)
            .field("messages", &self.inner.messages.borrow())
            .field("delivery_count", &self.inner.delivery_count.get())
            .finish()
    }
}
