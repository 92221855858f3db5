// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Error Types for the RabbitMQ Mock
//!
//! The mock performs no I/O, so almost every operation is total. The few
//! fallible paths (dynamic attribute lookup and payload decoding) report
//! through the `AmqpError` enum.

use thiserror::Error;

/// Represents errors that can occur while interacting with the mock.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmqpError {
    /// An attribute accessor was invoked for a key that is neither a fixed
    /// field nor one of the declared options of the entity
    #[error("undefined attribute `{0}`")]
    UnknownAttribute(String),

    /// Error decoding a delivered payload into the requested type
    #[error("failure to parse payload `{0}`")]
    ParsePayloadError(String),
}
