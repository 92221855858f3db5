// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Declared Options
//!
//! The configuration captured when a queue or an exchange is declared. Options
//! are an open mapping from attribute name to an AMQP value, so tests can
//! assert on any declaration flag (`durable`, `auto_delete`, `exclusive`,
//! `arguments`, ...) without the mock knowing the full set in advance.
//!
//! The builder offers setters for the well-known keys and for the standard
//! `x-*` queue arguments; anything else goes through [`Options::param`].

use lapin::types::{AMQPValue, FieldTable, LongInt, LongString, ShortString};
use std::collections::BTreeMap;

/// Key under which the durability flag is stored
pub const DURABLE: &str = "durable";
/// Key under which the auto-delete flag is stored
pub const AUTO_DELETE: &str = "auto_delete";
/// Key under which the exclusive flag is stored
pub const EXCLUSIVE: &str = "exclusive";
/// Key under which the internal flag is stored
pub const INTERNAL: &str = "internal";
/// Key under which the passive flag is stored
pub const PASSIVE: &str = "passive";
/// Key under which the no-wait flag is stored
pub const NO_WAIT: &str = "no_wait";
/// Key under which an exchange type is stored
pub const TYPE: &str = "type";
/// Key under which the declare arguments table is stored
pub const ARGUMENTS: &str = "arguments";

/// Constant for the argument used to specify a dead letter exchange
pub const AMQP_HEADERS_DEAD_LETTER_EXCHANGE: &str = "x-dead-letter-exchange";
/// Constant for the argument used to specify a dead letter routing key
pub const AMQP_HEADERS_DEAD_LETTER_ROUTING_KEY: &str = "x-dead-letter-routing-key";
/// Constant for the argument used to specify message TTL
pub const AMQP_HEADERS_MESSAGE_TTL: &str = "x-message-ttl";
/// Constant for the argument used to specify maximum queue length
pub const AMQP_HEADERS_MAX_LENGTH: &str = "x-max-length";
/// Constant for the argument used to specify maximum queue size in bytes
pub const AMQP_HEADERS_MAX_LENGTH_BYTES: &str = "x-max-length-bytes";

/// Immutable mapping of declared attributes.
///
/// Built with the chaining setters below and then moved into the entity that
/// owns it; the entity only ever hands out shared references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    params: BTreeMap<ShortString, AMQPValue>,
}

impl Options {
    /// Creates an empty set of options.
    pub fn new() -> Options {
        Options::default()
    }

    /// Stores an arbitrary attribute.
    ///
    /// # Parameters
    /// * `key` - The attribute name
    /// * `value` - The attribute value
    ///
    /// # Returns
    /// Self for method chaining
    pub fn param(mut self, key: &str, value: AMQPValue) -> Self {
        self.params.insert(ShortString::from(key), value);
        self
    }

    /// Stores the `durable` flag.
    pub fn durable(self, durable: bool) -> Self {
        self.param(DURABLE, AMQPValue::Boolean(durable))
    }

    /// Stores the `auto_delete` flag.
    pub fn auto_delete(self, auto_delete: bool) -> Self {
        self.param(AUTO_DELETE, AMQPValue::Boolean(auto_delete))
    }

    /// Stores the `exclusive` flag.
    pub fn exclusive(self, exclusive: bool) -> Self {
        self.param(EXCLUSIVE, AMQPValue::Boolean(exclusive))
    }

    /// Stores the `internal` flag.
    pub fn internal(self, internal: bool) -> Self {
        self.param(INTERNAL, AMQPValue::Boolean(internal))
    }

    /// Stores the `passive` flag.
    pub fn passive(self, passive: bool) -> Self {
        self.param(PASSIVE, AMQPValue::Boolean(passive))
    }

    /// Stores the `no_wait` flag.
    pub fn no_wait(self, no_wait: bool) -> Self {
        self.param(NO_WAIT, AMQPValue::Boolean(no_wait))
    }

    /// Stores an exchange type name under `type`.
    pub fn kind(self, kind: &str) -> Self {
        self.param(TYPE, AMQPValue::LongString(LongString::from(kind)))
    }

    /// Replaces the whole `arguments` table.
    pub fn arguments(self, arguments: FieldTable) -> Self {
        self.param(ARGUMENTS, AMQPValue::FieldTable(arguments))
    }

    /// Adds a single entry to the `arguments` table, creating it if needed.
    ///
    /// # Parameters
    /// * `key` - The argument name, usually one of the `x-*` constants
    /// * `value` - The argument value
    ///
    /// # Returns
    /// Self for method chaining
    pub fn argument(mut self, key: &str, value: AMQPValue) -> Self {
        let mut table = match self.params.remove(ARGUMENTS) {
            Some(AMQPValue::FieldTable(table)) => table,
            _ => FieldTable::default(),
        };
        table.insert(ShortString::from(key), value);
        self.arguments(table)
    }

    /// Sets the message Time-To-Live (TTL) argument, in milliseconds.
    pub fn message_ttl(self, ttl: i32) -> Self {
        self.argument(AMQP_HEADERS_MESSAGE_TTL, AMQPValue::LongInt(LongInt::from(ttl)))
    }

    /// Sets the maximum number of messages argument.
    pub fn max_length(self, max: i32) -> Self {
        self.argument(AMQP_HEADERS_MAX_LENGTH, AMQPValue::LongInt(LongInt::from(max)))
    }

    /// Sets the maximum size in bytes argument.
    pub fn max_length_bytes(self, max_bytes: i32) -> Self {
        self.argument(
            AMQP_HEADERS_MAX_LENGTH_BYTES,
            AMQPValue::LongInt(LongInt::from(max_bytes)),
        )
    }

    /// Sets the dead letter exchange argument.
    pub fn dead_letter_exchange(self, exchange: &str) -> Self {
        self.argument(
            AMQP_HEADERS_DEAD_LETTER_EXCHANGE,
            AMQPValue::LongString(LongString::from(exchange)),
        )
    }

    /// Sets the dead letter routing key argument.
    pub fn dead_letter_routing_key(self, key: &str) -> Self {
        self.argument(
            AMQP_HEADERS_DEAD_LETTER_ROUTING_KEY,
            AMQPValue::LongString(LongString::from(key)),
        )
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&AMQPValue> {
        self.params.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShortString, &AMQPValue)> {
        self.params.iter()
    }

    /// The underlying map, e.g. to build a `FieldTable` for a real declare.
    pub fn inner(&self) -> &BTreeMap<ShortString, AMQPValue> {
        &self.params
    }
}

impl From<BTreeMap<ShortString, AMQPValue>> for Options {
    fn from(params: BTreeMap<ShortString, AMQPValue>) -> Self {
        Options { params }
    }
}

impl From<FieldTable> for Options {
    fn from(table: FieldTable) -> Self {
        Options {
            params: table.inner().clone(),
        }
    }
}
