//! # Metadata TLV Decoder
//!
//! Decodes the optional block appended after the frame payloads. The block holds
//! one record group per frame, in frame order, each terminated by a separation
//! marker. A group must carry `utc_offset`, `edi_time` and `dlfc` before its
//! marker.
//!
//! Record sizes come from [`MetadataTag`]: a recognized tag always consumes its
//! fixed wire size, even when the declared length disagrees (the mismatch is
//! logged). Unknown tags are skipped by their declared length.

use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, warn};

use crate::constants::TLV_HEADER_SIZE;
use crate::error::{ProtocolError, ProtocolResult};
use crate::tlv_types::{MetadataTag, MetadataTagRegistry};
use crate::validation::ByteCursor;

/// Timing attributes of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetadata {
    /// TAI-UTC in seconds
    pub utc_offset: i16,
    /// Seconds since 2000-01-01T00:00:00Z (TAI-based)
    pub edi_time: u32,
    pub dlfc: u16,
}

#[derive(Debug, Default)]
struct PartialMetadata {
    utc_offset: Option<i16>,
    edi_time: Option<u32>,
    dlfc: Option<u16>,
}

impl PartialMetadata {
    fn store(&mut self, tag: MetadataTag, value: &[u8]) {
        match tag {
            MetadataTag::UtcOffset => self.utc_offset = Some(BigEndian::read_i16(value)),
            MetadataTag::EdiTime => self.edi_time = Some(BigEndian::read_u32(value)),
            MetadataTag::Dlfc => self.dlfc = Some(BigEndian::read_u16(value)),
            MetadataTag::SeparationMarker => {}
        }
    }

    fn has(&self, tag: MetadataTag) -> bool {
        match tag {
            MetadataTag::UtcOffset => self.utc_offset.is_some(),
            MetadataTag::EdiTime => self.edi_time.is_some(),
            MetadataTag::Dlfc => self.dlfc.is_some(),
            MetadataTag::SeparationMarker => true,
        }
    }

    fn complete(self, marker_offset: usize) -> ProtocolResult<FrameMetadata> {
        if let (Some(utc_offset), Some(edi_time), Some(dlfc)) =
            (self.utc_offset, self.edi_time, self.dlfc)
        {
            return Ok(FrameMetadata {
                utc_offset,
                edi_time,
                dlfc,
            });
        }
        let missing: Vec<&str> = MetadataTag::REQUIRED
            .into_iter()
            .filter(|&tag| !self.has(tag))
            .map(MetadataTag::name)
            .collect();
        Err(ProtocolError::incomplete_metadata(&missing, marker_offset))
    }
}

/// Decode the record group at the start of `buf`
///
/// Returns the metadata and the number of bytes consumed, separation marker
/// included.
pub fn decode_frame_metadata(buf: &[u8]) -> ProtocolResult<(FrameMetadata, usize)> {
    decode_group_at(buf, 0)
}

/// Decode one record group starting at `start`; returns metadata and end offset
fn decode_group_at(block: &[u8], start: usize) -> ProtocolResult<(FrameMetadata, usize)> {
    let mut cursor = ByteCursor::at(block, start)
        .map_err(|_| ProtocolError::truncated_metadata(None, start, TLV_HEADER_SIZE, 0))?;
    let mut partial = PartialMetadata::default();

    loop {
        let offset = cursor.position();
        if cursor.remaining() < TLV_HEADER_SIZE {
            return Err(ProtocolError::truncated_metadata(
                None,
                offset,
                TLV_HEADER_SIZE,
                cursor.remaining(),
            ));
        }

        let raw_tag = cursor.read_u8().map_err(|e| e.into_field_error("tag"))?;
        let declared_len = cursor
            .read_u16_be()
            .map_err(|e| e.into_field_error("length"))? as usize;

        let Some(tag) = MetadataTagRegistry::lookup(raw_tag) else {
            debug!(tag = raw_tag, len = declared_len, offset, "Skipping unknown metadata record");
            cursor.skip(declared_len).map_err(|_| {
                ProtocolError::truncated_metadata(
                    Some(raw_tag),
                    offset,
                    TLV_HEADER_SIZE + declared_len,
                    block.len() - offset,
                )
            })?;
            continue;
        };

        if !MetadataTagRegistry::validate_len(tag, declared_len) {
            warn!(
                "Invalid length {} for metadata: {} (expected {})",
                declared_len,
                tag.name(),
                tag.expected_value_len()
            );
        }

        let value = cursor.take(tag.expected_value_len()).map_err(|_| {
            ProtocolError::truncated_metadata(Some(raw_tag), offset, tag.wire_size(), block.len() - offset)
        })?;

        if tag == MetadataTag::SeparationMarker {
            let metadata = partial.complete(offset)?;
            return Ok((metadata, cursor.position()));
        }
        partial.store(tag, value);
    }
}

/// Sequential reader over the record groups of one metadata block
#[derive(Debug, Clone)]
pub struct MetadataReader<'a> {
    block: &'a [u8],
    offset: usize,
}

impl<'a> MetadataReader<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        Self { block, offset: 0 }
    }

    /// Decode the next group and advance past it
    pub fn next_group(&mut self) -> ProtocolResult<FrameMetadata> {
        let (metadata, end) = decode_group_at(self.block, self.offset)?;
        self.offset = end;
        Ok(metadata)
    }

    /// Bytes consumed so far
    pub fn consumed(&self) -> usize {
        self.offset
    }
}

/// Decode `count` consecutive record groups
pub fn decode_metadata_groups(block: &[u8], count: usize) -> ProtocolResult<Vec<FrameMetadata>> {
    let mut reader = MetadataReader::new(block);
    (0..count).map(|_| reader.next_group()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: u8, value: &[u8]) -> Vec<u8> {
        let mut bytes = vec![tag];
        bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        bytes.extend_from_slice(value);
        bytes
    }

    fn group(utc_offset: i16, edi_time: u32, dlfc: u16) -> Vec<u8> {
        let mut bytes = record(1, &utc_offset.to_be_bytes());
        bytes.extend(record(2, &edi_time.to_be_bytes()));
        bytes.extend(record(3, &dlfc.to_be_bytes()));
        bytes.extend(record(0, &[]));
        bytes
    }

    #[test]
    fn test_decode_complete_group() {
        let bytes = group(5, 700_000_000, 123);
        let (md, consumed) = decode_frame_metadata(&bytes).unwrap();
        assert_eq!(
            md,
            FrameMetadata {
                utc_offset: 5,
                edi_time: 700_000_000,
                dlfc: 123
            }
        );
        assert_eq!(consumed, 20);
    }

    #[test]
    fn test_negative_utc_offset() {
        let (md, _) = decode_frame_metadata(&group(-3, 1, 2)).unwrap();
        assert_eq!(md.utc_offset, -3);
    }

    #[test]
    fn test_missing_dlfc_is_incomplete() {
        let mut bytes = record(1, &37i16.to_be_bytes());
        bytes.extend(record(2, &1u32.to_be_bytes()));
        bytes.extend(record(0, &[]));

        let err = decode_frame_metadata(&bytes).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::IncompleteMetadata {
                missing: "dlfc".to_string(),
                offset: 12
            }
        );
    }

    #[test]
    fn test_bare_marker_reports_every_required_tag() {
        let err = decode_frame_metadata(&record(0, &[])).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::IncompleteMetadata {
                missing: "utc_offset, edi_time, dlfc".to_string(),
                offset: 0
            }
        );
    }

    #[test]
    fn test_block_without_marker_is_truncated() {
        let mut bytes = group(37, 1, 2);
        bytes.truncate(17);
        assert!(matches!(
            decode_frame_metadata(&bytes),
            Err(ProtocolError::TruncatedMetadata { tag: None, offset: 17, .. })
        ));
        assert!(matches!(
            decode_frame_metadata(&[]),
            Err(ProtocolError::TruncatedMetadata { .. })
        ));
    }

    #[test]
    fn test_truncated_value() {
        let bytes = [2u8, 0, 4, 0x01, 0x02];
        assert_eq!(
            decode_frame_metadata(&bytes).unwrap_err(),
            ProtocolError::TruncatedMetadata {
                tag: Some(2),
                offset: 0,
                need: 7,
                remaining: 5
            }
        );
    }

    #[test]
    fn test_length_mismatch_uses_fixed_size() {
        // dlfc declares 4 bytes but the table size of 2 is consumed
        let mut bytes = record(1, &37i16.to_be_bytes());
        bytes.extend(record(2, &9u32.to_be_bytes()));
        bytes.extend_from_slice(&[3, 0, 4, 0x00, 0x2A]);
        bytes.extend(record(0, &[]));

        let (md, consumed) = decode_frame_metadata(&bytes).unwrap();
        assert_eq!(md.dlfc, 42);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_unknown_tag_is_skipped() {
        let mut bytes = record(9, &[0xDE, 0xAD, 0xBE]);
        bytes.extend(group(37, 10, 20));
        let (md, consumed) = decode_frame_metadata(&bytes).unwrap();
        assert_eq!(md.dlfc, 20);
        assert_eq!(consumed, 6 + 20);
    }

    #[test]
    fn test_reader_walks_groups_in_order() {
        let mut block = Vec::new();
        for dlfc in 0..4u16 {
            block.extend(group(37, 1000 + dlfc as u32, dlfc));
        }

        let mut reader = MetadataReader::new(&block);
        for dlfc in 0..4u16 {
            assert_eq!(reader.next_group().unwrap().dlfc, dlfc);
        }
        assert_eq!(reader.consumed(), 80);
        assert!(reader.next_group().is_err());

        let all = decode_metadata_groups(&block, 4).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].edi_time, 1003);
    }
}
