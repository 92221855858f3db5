// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # AMQP Channel Mock
//!
//! A channel is where exchanges and queues get declared. It caches every
//! declaration by name: declaring a name a second time returns the object
//! from the first declaration, whatever kind or options are passed the
//! second time.

use crate::{
    connection::Connection,
    exchange::{Exchange, ExchangeKind},
    options::Options,
    queue::Queue,
    registry::{LocalRegistry, Registry},
};
use lapin::ConnectionProperties;
use std::{collections::BTreeMap, fmt, rc::Rc};
use tracing::debug;

/// Handle to a channel and its declaration caches.
///
/// Clones share the same caches.
#[derive(Clone)]
pub struct Channel {
    inner: Rc<ChannelInner>,
}

pub(crate) struct ChannelInner {
    exchanges: Box<dyn Registry<Exchange>>,
    queues: Box<dyn Registry<Queue>>,
}

impl Channel {
    /// Creates a channel backed by single-threaded registries.
    pub fn new() -> Channel {
        Channel::with_registries(LocalRegistry::new(), LocalRegistry::new())
    }

    /// Creates a channel backed by the given registries.
    ///
    /// # Parameters
    /// * `exchanges` - Storage for declared exchanges
    /// * `queues` - Storage for declared queues
    ///
    /// # Returns
    /// A new Channel instance
    pub fn with_registries<E, Q>(exchanges: E, queues: Q) -> Channel
    where
        E: Registry<Exchange> + 'static,
        Q: Registry<Queue> + 'static,
    {
        Channel {
            inner: Rc::new(ChannelInner {
                exchanges: Box::new(exchanges),
                queues: Box::new(queues),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<ChannelInner>) -> Channel {
        Channel { inner }
    }

    /// Declares a direct exchange or returns the cached one.
    pub fn direct(&self, name: &str) -> Exchange {
        self.exchange(name, ExchangeKind::Direct, Options::default())
    }

    /// Declares a fanout exchange or returns the cached one.
    pub fn fanout(&self, name: &str) -> Exchange {
        self.exchange(name, ExchangeKind::Fanout, Options::default())
    }

    /// Declares a topic exchange or returns the cached one.
    pub fn topic(&self, name: &str, options: Options) -> Exchange {
        self.exchange(name, ExchangeKind::Topic, options)
    }

    /// Declares an exchange of any kind or returns the cached one.
    ///
    /// # Parameters
    /// * `name` - The name of the exchange
    /// * `kind` - The exchange type, ignored on a cache hit
    /// * `options` - Declare options, ignored on a cache hit
    ///
    /// # Returns
    /// The exchange registered under `name`
    pub fn exchange(&self, name: &str, kind: ExchangeKind, options: Options) -> Exchange {
        let channel = Rc::downgrade(&self.inner);
        self.inner.exchanges.get_or_declare(
            name,
            Box::new(move || Exchange::with_channel(channel, name, kind, options)),
        )
    }

    /// Declares a queue or returns the cached one.
    ///
    /// # Parameters
    /// * `name` - The name of the queue
    /// * `options` - Declare options, ignored on a cache hit
    ///
    /// # Returns
    /// The queue registered under `name`
    pub fn queue(&self, name: &str, options: Options) -> Queue {
        let channel = Rc::downgrade(&self.inner);
        self.inner.queues.get_or_declare(
            name,
            Box::new(move || Queue::with_channel(channel, name, options)),
        )
    }

    /// Every exchange declared on this channel, by name.
    pub fn exchanges(&self) -> BTreeMap<String, Exchange> {
        self.inner.exchanges.entries()
    }

    /// Every queue declared on this channel, by name.
    pub fn queues(&self) -> BTreeMap<String, Queue> {
        self.inner.queues.entries()
    }

    pub fn find_exchange(&self, name: &str) -> Option<Exchange> {
        self.inner.exchanges.lookup(name)
    }

    pub fn find_queue(&self, name: &str) -> Option<Queue> {
        self.inner.queues.lookup(name)
    }
}

impl Default for Channel {
    fn default() -> Self {
        Channel::new()
    }
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Channel {}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("exchanges", &self.exchanges().keys().collect::<Vec<_>>())
            .field("queues", &self.queues().keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Creates a mock connection and opens a channel on it.
///
/// Mirrors the "connect, then create a channel" sequence of a real client so
/// application wiring can be pointed at the mock unchanged. Never fails.
///
/// # Parameters
/// * `uri` - The AMQP URI the application would connect to
/// * `properties` - Connection properties, kept on the connection
///
/// # Returns
/// A tuple containing the connection and the channel
pub fn new_amqp_channel(uri: &str, properties: ConnectionProperties) -> (Connection, Channel) {
    debug!("creating amqp connection...");
    let conn = Connection::connect(uri, properties);
    debug!("amqp connected");

    debug!("creating amqp channel...");
    let channel = conn.create_channel();
    debug!("channel created");

    (conn, channel)
}
