//! # TIST Field Extractor
//!
//! Locates the timestamp field of a reassembled ETI(NI) frame. Its position
//! depends on the frame's own layout: the stream characterisation (STC)
//! entries, the FIC length implied by the transmission mode, and the total
//! size of the main service channel.
//!
//! ```text
//! 0     1-3    4    5          6-7   8..8+4*NST   +2    +2    FIC        MST      +4   TIST
//! ERR   FSYNC  FCT  FICF|NST   FP/MID/FL  STC     MNSC  CRC   ficl*4    sum(STL*8) EOF  4 bytes
//! ```

use tracing::warn;

use crate::constants::{FCT_MODULUS, TIST_MASK, TIST_TICKS_PER_MS};
use crate::error::{ProtocolError, ProtocolResult};
use crate::validation::ByteCursor;

const FCT_OFFSET: usize = 4;
const STC_OFFSET: usize = 8;
const STC_ENTRY_SIZE: usize = 4;
/// MNSC and header CRC between the STC and the FIC
const EOH_SIZE: usize = 4;
/// End-of-frame CRC and reserved bytes before TIST
const EOF_SIZE: usize = 4;
/// FIC words (4 bytes each) for transmission mode III
const FIC_WORDS_MODE_3: usize = 32;
const FIC_WORDS_DEFAULT: usize = 24;

/// One stream characterisation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub scid: u8,
    pub start_address: u16,
    pub tpl: u8,
    /// Stream length in 64-bit words
    pub stream_length: u16,
}

impl StreamDescriptor {
    fn parse(entry: &[u8]) -> Self {
        Self {
            scid: entry[0] >> 2,
            start_address: (u16::from(entry[0] & 0x03) << 8) | u16::from(entry[1]),
            tpl: entry[2] >> 2,
            stream_length: (u16::from(entry[2] & 0x03) << 8) | u16::from(entry[3]),
        }
    }

    /// Size of this stream in the main service channel, in bytes
    pub fn data_len(&self) -> usize {
        usize::from(self.stream_length) * 8
    }
}

/// Fields decoded on the way to the TIST and the TIST itself
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampInfo {
    pub fct: u8,
    /// `dlfc % 250`, what FCT should have been
    pub expected_fct: u8,
    pub fic_present: bool,
    pub nst: u8,
    /// FIC length in 32-bit words
    pub fic_words: usize,
    pub mnsc: u16,
    pub streams: Vec<StreamDescriptor>,
    /// Total main service channel length in bytes
    pub data_len: usize,
    /// Byte offset of the TIST field inside the frame
    pub tist_offset: usize,
    pub tist_raw: u32,
    /// Offset from the last 1PPS edge, in milliseconds
    pub pps_offset_ms: f64,
}

impl TimestampInfo {
    pub fn fct_matches(&self) -> bool {
        self.fct == self.expected_fct
    }

    /// The frame reaches into the next second; treat the value as advisory
    pub fn is_advisory(&self) -> bool {
        self.pps_offset_ms >= 1000.0
    }
}

/// Walk the frame layout and decode the TIST of `frame`
pub fn extract_timestamp(frame: &[u8], dlfc: u16) -> ProtocolResult<TimestampInfo> {
    let mut cursor = ByteCursor::at(frame, FCT_OFFSET).map_err(|e| e.into_field_error("FCT"))?;

    let fct = cursor.read_u8().map_err(|e| e.into_field_error("FCT"))?;
    let expected_fct = (dlfc % FCT_MODULUS) as u8;
    if fct != expected_fct {
        warn!("Frame FCT={} does not correspond to DLFC={}", fct, dlfc);
    }

    let ficf_nst = cursor.read_u8().map_err(|e| e.into_field_error("FICF/NST"))?;
    let fic_present = ficf_nst & 0x80 != 0;
    let nst = ficf_nst & 0x7F;

    let fp_mid = cursor.read_u8().map_err(|e| e.into_field_error("MID"))?;
    let mid = (fp_mid & 0x18) >> 3;
    let fic_words = if mid == 3 {
        FIC_WORDS_MODE_3
    } else {
        FIC_WORDS_DEFAULT
    };

    if !fic_present {
        return Err(ProtocolError::MissingFic { fct });
    }

    cursor.seek(STC_OFFSET).map_err(|e| e.into_field_error("STC"))?;
    let mut streams = Vec::with_capacity(usize::from(nst));
    for _ in 0..nst {
        let entry = cursor
            .take(STC_ENTRY_SIZE)
            .map_err(|e| e.into_field_error("STC"))?;
        streams.push(StreamDescriptor::parse(entry));
    }
    let data_len: usize = streams.iter().map(StreamDescriptor::data_len).sum();

    let mnsc = cursor.read_u16_be().map_err(|e| e.into_field_error("MNSC"))?;

    let tist_offset = STC_OFFSET
        + STC_ENTRY_SIZE * usize::from(nst)
        + EOH_SIZE
        + fic_words * 4
        + data_len
        + EOF_SIZE;

    let tist_raw = ByteCursor::at(frame, tist_offset)
        .and_then(|mut c| c.read_u32_be())
        .map_err(|e| e.into_field_error("TIST"))?;
    let pps_offset_ms = f64::from(tist_raw & TIST_MASK) / TIST_TICKS_PER_MS;

    Ok(TimestampInfo {
        fct,
        expected_fct,
        fic_present,
        nst,
        fic_words,
        mnsc,
        streams,
        data_len,
        tist_offset,
        tist_raw,
        pps_offset_ms,
    })
}
