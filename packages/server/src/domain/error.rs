//! Domain error types.

use thiserror::Error;

/// Errors raised while constructing value objects from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Required text was empty (or blank after normalization)
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Text exceeded the maximum accepted length
    #[error("{name} is too long ({len} > {max} bytes)")]
    TooLong {
        name: &'static str,
        len: usize,
        max: usize,
    },
}

/// Errors raised by repository adapters.
///
/// The in-memory adapters never fail; the variant exists so that a durable
/// store can be wired in without changing the port signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while pushing notifications to connections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The connection is not (or no longer) registered
    #[error("Connection '{0}' not found")]
    ClientNotFound(String),

    /// The connection's outbound queue is full; it has been dropped
    #[error("Outbound queue of connection '{0}' is full")]
    QueueFull(String),

    /// The connection's writer has gone away
    #[error("Connection '{0}' is closed")]
    Closed(String),

    /// The notification could not be encoded for the wire
    #[error("Failed to encode notification: {0}")]
    Encode(String),
}
