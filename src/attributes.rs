// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Dynamic Attribute Lookup
//!
//! Queues and exchanges expose the options they were declared with as
//! attributes. A plain lookup returns the stored value verbatim and a
//! predicate lookup returns its truthiness; both fail with
//! [`AmqpError::UnknownAttribute`] when the key was never declared.
//!
//! Keys may be written in predicate form (`durable?`). The trailing `?` is
//! stripped before the lookup, so `get("durable?")` and `get("durable")` read
//! the same entry.

use crate::{errors::AmqpError, options::Options};
use lapin::types::{AMQPValue, FieldArray, FieldTable, LongString};

/// Removes a trailing predicate marker from an attribute name.
fn attribute_key(key: &str) -> &str {
    key.strip_suffix('?').unwrap_or(key)
}

/// Truthiness of a stored value: everything counts as set except an explicit
/// `false` and `Void`.
pub fn is_truthy(value: &AMQPValue) -> bool {
    !matches!(value, AMQPValue::Boolean(false) | AMQPValue::Void)
}

/// Declared options as a single `FieldTable` value.
pub(crate) fn options_value(options: &Options) -> AMQPValue {
    AMQPValue::FieldTable(FieldTable::from(options.inner().clone()))
}

/// A list of strings as a `FieldArray` value.
pub(crate) fn string_array<I>(items: I) -> AMQPValue
where
    I: IntoIterator<Item = String>,
{
    let values: Vec<AMQPValue> = items
        .into_iter()
        .map(|item| AMQPValue::LongString(LongString::from(item)))
        .collect();
    AMQPValue::FieldArray(FieldArray::from(values))
}

/// Attribute-backed entity behaviour shared by queues and exchanges.
pub trait Attributes {
    /// The options captured at declaration.
    fn declared_options(&self) -> &Options;

    /// Names of the fixed fields reachable through [`Attributes::get`].
    fn fixed_attributes(&self) -> &'static [&'static str];

    /// Value of a fixed field, or `None` when `key` is not one.
    fn fixed_attribute(&self, key: &str) -> Option<AMQPValue>;

    /// Looks up an attribute and returns its value verbatim.
    ///
    /// # Parameters
    /// * `key` - The attribute name, with or without a trailing `?`
    ///
    /// # Returns
    /// The stored value or `AmqpError::UnknownAttribute`
    fn get(&self, key: &str) -> Result<AMQPValue, AmqpError> {
        let name = attribute_key(key);
        if let Some(value) = self.fixed_attribute(name) {
            return Ok(value);
        }

        self.declared_options()
            .get(name)
            .cloned()
            .ok_or_else(|| AmqpError::UnknownAttribute(key.to_owned()))
    }

    /// Predicate form of [`Attributes::get`].
    fn get_bool(&self, key: &str) -> Result<bool, AmqpError> {
        self.get(key).map(|value| is_truthy(&value))
    }

    /// Whether an accessor for `key` (plain or predicate form) would succeed.
    fn has_attribute(&self, key: &str) -> bool {
        let name = attribute_key(key);
        self.fixed_attributes().iter().any(|fixed| *fixed == name)
            || self.declared_options().contains_key(name)
    }
}
