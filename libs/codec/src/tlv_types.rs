//! # Metadata TLV Type Registry
//!
//! Declarative table of the per-frame metadata records the multiplexer appends
//! after the frame payloads. Each record is `tag:u8`, `length:u16 BE`, `value`.
//! The decoder consults this table instead of branching per tag, so adding a
//! record type means adding one variant and one row.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Metadata record tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MetadataTag {
    /// Ends the record group of one frame; carries no value
    SeparationMarker = 0,
    /// TAI-UTC offset in seconds, `i16`
    UtcOffset = 1,
    /// SI seconds since 2000-01-01T00:00:00Z, `u32`
    EdiTime = 2,
    /// DLFC from the EDI `deti` tag, `u16`
    Dlfc = 3,
}

impl MetadataTag {
    /// Expected value length in bytes
    pub const fn expected_value_len(self) -> usize {
        match self {
            Self::SeparationMarker => 0,
            Self::UtcOffset => 2,
            Self::EdiTime => 4,
            Self::Dlfc => 2,
        }
    }

    /// Bytes consumed on the wire, header included, regardless of the declared length
    pub const fn wire_size(self) -> usize {
        crate::constants::TLV_HEADER_SIZE + self.expected_value_len()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::SeparationMarker => "separation_marker",
            Self::UtcOffset => "utc_offset",
            Self::EdiTime => "edi_time",
            Self::Dlfc => "dlfc",
        }
    }

    /// Value-carrying tags that must appear before the separation marker
    pub const REQUIRED: [MetadataTag; 3] = [Self::UtcOffset, Self::EdiTime, Self::Dlfc];
}

/// Registry helpers over [`MetadataTag`]
pub struct MetadataTagRegistry;

impl MetadataTagRegistry {
    /// Look up a raw tag byte
    pub fn lookup(raw: u8) -> Option<MetadataTag> {
        MetadataTag::try_from(raw).ok()
    }

    /// True if `declared_len` matches the table for `tag`
    pub fn validate_len(tag: MetadataTag, declared_len: usize) -> bool {
        tag.expected_value_len() == declared_len
    }
}
