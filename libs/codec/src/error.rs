//! Protocol-level errors for ETI message processing
//!
//! Every variant carries enough context (offsets, sizes, indices) to tell a
//! corrupted message apart from a producer speaking a different format.

use thiserror::Error;

use crate::constants::ENVELOPE_VERSION;

/// ETI envelope, metadata and frame decoding errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolError {
    /// Message is too small to hold the envelope header
    #[error("Short message: need {need} bytes for envelope header, got {got}")]
    ShortMessage { need: usize, got: usize },

    /// Envelope version is not supported by this receiver
    #[error("Unsupported envelope version {version}: supported version is {supported}")]
    UnsupportedVersion { version: u32, supported: u32 },

    /// A declared sub-frame length is negative or exceeds the frame capacity
    #[error("Invalid length {length} for sub-frame {index}: must be within 0..={capacity}")]
    InvalidSubframeLength {
        index: usize,
        length: i16,
        capacity: usize,
    },

    /// Declared sub-frame payloads extend past the received message
    #[error("Payload overrun in sub-frame {index}: {length} bytes at offset {offset} exceed message of {message_size} bytes")]
    PayloadOverrun {
        index: usize,
        offset: usize,
        length: usize,
        message_size: usize,
    },

    /// Metadata block ends before a record's declared consumption
    #[error("Truncated metadata: need {need} bytes for tag {tag:?} at offset {offset}, {remaining} remaining")]
    TruncatedMetadata {
        tag: Option<u8>,
        offset: usize,
        need: usize,
        remaining: usize,
    },

    /// Separation marker reached before all required fields were seen
    #[error("Incomplete metadata: missing {missing} before separation marker at offset {offset}")]
    IncompleteMetadata { missing: String, offset: usize },

    /// Frame carries no FIC; this profile requires it
    #[error("No FIC in data stream (FCT={fct})")]
    MissingFic { fct: u8 },

    /// A computed field offset lies outside its buffer
    #[error("Field {field} out of bounds: need {need} bytes at offset {offset}, buffer has {buffer_size}")]
    FieldOutOfBounds {
        field: &'static str,
        offset: usize,
        need: usize,
        buffer_size: usize,
    },
}

impl ProtocolError {
    pub fn short_message(need: usize, got: usize) -> Self {
        Self::ShortMessage { need, got }
    }

    pub fn unsupported_version(version: u32) -> Self {
        Self::UnsupportedVersion {
            version,
            supported: ENVELOPE_VERSION,
        }
    }

    pub fn payload_overrun(index: usize, offset: usize, length: usize, message_size: usize) -> Self {
        Self::PayloadOverrun {
            index,
            offset,
            length,
            message_size,
        }
    }

    pub fn truncated_metadata(tag: Option<u8>, offset: usize, need: usize, remaining: usize) -> Self {
        Self::TruncatedMetadata {
            tag,
            offset,
            need,
            remaining,
        }
    }

    /// Build an IncompleteMetadata error from the names of the absent fields
    pub fn incomplete_metadata(missing: &[&str], offset: usize) -> Self {
        Self::IncompleteMetadata {
            missing: missing.join(", "),
            offset,
        }
    }

    /// True for errors raised while decoding the optional timing diagnostics,
    /// as opposed to errors in the envelope or frame payload layout
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            Self::TruncatedMetadata { .. }
                | Self::IncompleteMetadata { .. }
                | Self::MissingFic { .. }
                | Self::FieldOutOfBounds { .. }
        )
    }
}

/// Result type for protocol operations
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_metadata_lists_missing_fields() {
        let err = ProtocolError::incomplete_metadata(&["edi_time", "dlfc"], 12);
        assert_eq!(
            err.to_string(),
            "Incomplete metadata: missing edi_time, dlfc before separation marker at offset 12"
        );
    }

    #[test]
    fn test_diagnostic_classification() {
        assert!(!ProtocolError::short_message(12, 3).is_diagnostic());
        assert!(!ProtocolError::unsupported_version(2).is_diagnostic());
        assert!(!ProtocolError::payload_overrun(1, 12, 6000, 100).is_diagnostic());
        assert!(ProtocolError::MissingFic { fct: 0 }.is_diagnostic());
        assert!(ProtocolError::truncated_metadata(Some(2), 0, 7, 4).is_diagnostic());
    }

    #[test]
    fn test_truncated_metadata_message() {
        assert_eq!(
            ProtocolError::truncated_metadata(Some(2), 5, 7, 4).to_string(),
            "Truncated metadata: need 7 bytes for tag Some(2) at offset 5, 4 remaining"
        );
        assert_eq!(
            ProtocolError::truncated_metadata(None, 17, 3, 1).to_string(),
            "Truncated metadata: need 3 bytes for tag None at offset 17, 1 remaining"
        );
    }
}
