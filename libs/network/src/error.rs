//! Transport Error Types
//!
//! Errors raised while receiving ETI messages from the multiplexer or
//! appending reassembled frames to the output sink.

use thiserror::Error;

/// Main transport error type
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connecting or subscribing to the publisher failed
    #[error("Connection error: {message} (endpoint: {endpoint})")]
    Connection {
        endpoint: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A receive failed for a reason other than an interruption
    #[error("Receive error: {message}")]
    Receive {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The receive was interrupted before a message arrived; retry it
    #[error("Receive interrupted")]
    Interrupted,

    /// The source has no more messages
    #[error("Transport closed")]
    Closed,

    /// Writing to the frame sink failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        source: std::io::Error,
    },
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// Create a connection error
    pub fn connection(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            endpoint: endpoint.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error with source
    pub fn connection_with_source(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            endpoint: endpoint.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a receive error
    pub fn receive(message: impl Into<String>) -> Self {
        Self::Receive {
            message: message.into(),
            source: None,
        }
    }

    /// Create a receive error with source
    pub fn receive_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Receive {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Check if the operation can simply be attempted again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Check if the source ended in an orderly way
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::Interrupted {
            return Self::Interrupted;
        }
        Self::io(err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_only_interruptions_are_retryable() {
        assert!(TransportError::Interrupted.is_retryable());
        assert!(!TransportError::Closed.is_retryable());
        assert!(!TransportError::receive("socket gone").is_retryable());
        assert!(!TransportError::connection("tcp://a:1", "refused").is_retryable());
    }

    #[test]
    fn test_io_conversion() {
        let err: TransportError = io::Error::new(io::ErrorKind::Interrupted, "EINTR").into();
        assert!(err.is_retryable());

        let err: TransportError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert!(matches!(err, TransportError::Io { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_connection_display() {
        let err = TransportError::connection_with_source(
            "tcp://localhost:9100",
            "connect failed",
            io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert_eq!(
            err.to_string(),
            "Connection error: connect failed (endpoint: tcp://localhost:9100)"
        );
        assert!(err.source().is_some());
    }
}
