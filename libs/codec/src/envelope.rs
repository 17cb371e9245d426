//! # Envelope Parser
//!
//! Reads the fixed header that precedes every ZeroMQ message: a 32-bit version
//! followed by one signed 16-bit length per packed ETI frame. Both fields are in
//! the producer's native byte order, which is little-endian on every platform the
//! multiplexer ships for.

use tracing::debug;

use crate::constants::{ENVELOPE_HEADER_SIZE, ENVELOPE_VERSION, ETI_FRAME_SIZE, FRAMES_PER_MESSAGE};
use crate::error::{ProtocolError, ProtocolResult};
use crate::validation::ByteCursor;

/// Parsed message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub version: u32,
    /// Declared payload length of each sub-frame, validated to `0..=ETI_FRAME_SIZE`
    pub subframe_lengths: [usize; FRAMES_PER_MESSAGE],
}

impl Envelope {
    pub const SIZE: usize = ENVELOPE_HEADER_SIZE;

    /// Sum of all declared sub-frame lengths
    pub fn payload_len(&self) -> usize {
        self.subframe_lengths.iter().sum()
    }

    /// Offset of the first byte after the payload region
    pub fn payload_end(&self) -> usize {
        Self::SIZE + self.payload_len()
    }
}

/// Parse and validate the envelope header at the start of `message`
pub fn parse_envelope(message: &[u8]) -> ProtocolResult<Envelope> {
    if message.len() < Envelope::SIZE {
        return Err(ProtocolError::short_message(Envelope::SIZE, message.len()));
    }

    let mut cursor = ByteCursor::new(&message[..Envelope::SIZE]);
    let version = cursor
        .read_u32_le()
        .map_err(|e| e.into_field_error("version"))?;

    if version != ENVELOPE_VERSION {
        debug!(
            header = %hex::encode(&message[..Envelope::SIZE]),
            "Rejecting envelope with version {}", version
        );
        return Err(ProtocolError::unsupported_version(version));
    }

    let mut subframe_lengths = [0usize; FRAMES_PER_MESSAGE];
    for (index, slot) in subframe_lengths.iter_mut().enumerate() {
        let length = cursor
            .read_i16_le()
            .map_err(|e| e.into_field_error("buflen"))?;

        *slot = usize::try_from(length)
            .ok()
            .filter(|&len| len <= ETI_FRAME_SIZE)
            .ok_or(ProtocolError::InvalidSubframeLength {
                index,
                length,
                capacity: ETI_FRAME_SIZE,
            })?;
    }

    Ok(Envelope {
        version,
        subframe_lengths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: u32, lengths: [i16; FRAMES_PER_MESSAGE]) -> Vec<u8> {
        let mut bytes = version.to_le_bytes().to_vec();
        for len in lengths {
            bytes.extend_from_slice(&len.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_parse_valid_header() {
        let bytes = header(1, [6144, 100, 0, 42]);
        let envelope = parse_envelope(&bytes).unwrap();

        assert_eq!(envelope.version, 1);
        assert_eq!(envelope.subframe_lengths, [6144, 100, 0, 42]);
        assert_eq!(envelope.payload_len(), 6286);
        assert_eq!(envelope.payload_end(), 12 + 6286);
    }

    #[test]
    fn test_short_message() {
        let bytes = header(1, [0; FRAMES_PER_MESSAGE]);
        let err = parse_envelope(&bytes[..11]).unwrap_err();
        assert_eq!(err, ProtocolError::ShortMessage { need: 12, got: 11 });

        assert!(matches!(
            parse_envelope(&[]),
            Err(ProtocolError::ShortMessage { need: 12, got: 0 })
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let bytes = header(2, [0; FRAMES_PER_MESSAGE]);
        assert_eq!(
            parse_envelope(&bytes).unwrap_err(),
            ProtocolError::UnsupportedVersion {
                version: 2,
                supported: 1
            }
        );
    }

    #[test]
    fn test_negative_and_oversized_lengths_rejected() {
        let bytes = header(1, [10, -1, 0, 0]);
        assert!(matches!(
            parse_envelope(&bytes),
            Err(ProtocolError::InvalidSubframeLength {
                index: 1,
                length: -1,
                ..
            })
        ));

        let bytes = header(1, [0, 0, 0, 6145]);
        assert!(matches!(
            parse_envelope(&bytes),
            Err(ProtocolError::InvalidSubframeLength { index: 3, .. })
        ));
    }
}
