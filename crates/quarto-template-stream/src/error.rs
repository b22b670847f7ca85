/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for value resolution and template streaming.

use thiserror::Error;

/// Errors that can terminate a resolution or template stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// An object with no invocation or iteration capability reached the
    /// terminal position, where only primitives have a text form.
    #[error("{description} is not callable or iterable")]
    InvalidTerminal { description: String },

    /// A symbol was interpolated. Symbols have no implicit text form.
    #[error("Cannot convert a Symbol value to a string: {description}")]
    SymbolConversion { description: String },

    /// The template's fragments and values are not interleavable.
    #[error("Template needs {} fragments for {values} values, got {fragments}", .values + 1)]
    FragmentCount { fragments: usize, values: usize },

    /// More sequences were nested than `ResolveOptions::max_depth` allows.
    #[error("Sequence nesting exceeded the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },

    /// Failure raised by a user-supplied capability.
    #[error("{message}")]
    Message { message: String },

    /// Failure raised by a user-supplied capability, wrapping its cause.
    #[error("{0}")]
    External(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StreamError {
    /// Create a failure for a user capability from a message.
    pub fn message(message: impl Into<String>) -> Self {
        StreamError::Message {
            message: message.into(),
        }
    }

    /// Create a failure for a user capability from any error.
    pub fn external(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StreamError::External(error.into())
    }
}

/// Result type for resolution and streaming.
pub type StreamResult<T> = Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_count_message() {
        let err = StreamError::FragmentCount {
            fragments: 1,
            values: 2,
        };
        assert_eq!(
            err.to_string(),
            "Template needs 3 fragments for 2 values, got 1"
        );
    }

    #[test]
    fn test_external_keeps_message() {
        let io = std::io::Error::other("disk on fire");
        let err = StreamError::external(io);
        assert_eq!(err.to_string(), "disk on fire");
    }
}
