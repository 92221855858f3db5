// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Connection Mock
//!
//! Stand-in for a broker session. It performs no handshake and holds no
//! declarations of its own: every lifecycle call answers with a fixed status,
//! and the declaration shortcuts open a brand-new channel on each call.

use crate::{
    channel::Channel,
    exchange::{Exchange, ExchangeKind},
    options::Options,
    queue::Queue,
};
use lapin::ConnectionProperties;
use std::fmt;
use tracing::debug;

/// Answer of [`Connection::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
}

/// Answer of [`Connection::qos`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QosStatus {
    QosOk,
}

/// Mock of a broker connection.
#[derive(Clone, Default)]
pub struct Connection {
    uri: Option<String>,
    properties: ConnectionProperties,
}

impl Connection {
    pub fn new() -> Connection {
        Connection::default()
    }

    /// Builds a connection the way a real client would be opened.
    ///
    /// Nothing is dialled; the arguments are only kept for inspection.
    ///
    /// # Parameters
    /// * `uri` - The AMQP URI
    /// * `properties` - Connection properties
    ///
    /// # Returns
    /// A new Connection instance
    pub fn connect(uri: &str, properties: ConnectionProperties) -> Connection {
        debug!(uri = uri, "mock connection opened");
        Connection {
            uri: Some(uri.to_owned()),
            properties,
        }
    }

    /// The URI given to [`Connection::connect`], if any.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn properties(&self) -> &ConnectionProperties {
        &self.properties
    }

    pub fn start(&self) -> ConnectionStatus {
        ConnectionStatus::Connected
    }

    pub fn qos(&self) -> QosStatus {
        QosStatus::QosOk
    }

    pub fn stop(&self) {}

    pub fn close(&self) {}

    /// Opens a new channel with empty declaration caches.
    pub fn create_channel(&self) -> Channel {
        Channel::new()
    }

    /// Declares a queue on a fresh channel.
    ///
    /// Each call uses its own channel, so two calls with the same name
    /// return two distinct queues. Declare through [`Connection::create_channel`]
    /// to share a cache.
    pub fn queue(&self, name: &str, options: Options) -> Queue {
        self.create_channel().queue(name, options)
    }

    /// Declares an exchange on a fresh channel.
    ///
    /// Same caching caveat as [`Connection::queue`].
    pub fn exchange(&self, name: &str, kind: ExchangeKind, options: Options) -> Exchange {
        self.create_channel().exchange(name, kind, options)
    }

    /// Declares a direct exchange on a fresh channel.
    pub fn direct(&self, name: &str, options: Options) -> Exchange {
        self.exchange(name, ExchangeKind::Direct, options)
    }

    /// Every queue is reported as existing: the connection keeps no registry
    /// to check against.
    pub fn queue_exists(&self, _name: &str) -> bool {
        true
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("uri", &self.uri).finish()
    }
}
