//! # Protocol Constants - ETI over ZeroMQ
//!
//! ## Purpose
//!
//! Central registry of the wire-level constants shared by the envelope parser,
//! the frame reassembler and the TIST extractor. These values are fixed by the
//! multiplexer's ZeroMQ output format and by the ETI(NI) frame layout; they must
//! stay in sync with the producer.
//!
//! ## Message Layout
//!
//! ```text
//! +---------+-----------+-----------+-----------+-----------+------------+----------+
//! | version | buflen[0] | buflen[1] | buflen[2] | buflen[3] | payloads.. | metadata |
//! |  u32 LE |   i16 LE  |   i16 LE  |   i16 LE  |   i16 LE  |            | TLV (opt)|
//! +---------+-----------+-----------+-----------+-----------+------------+----------+
//! ```

/// Number of ETI frames packed into one ZeroMQ message
pub const FRAMES_PER_MESSAGE: usize = 4;

/// Size of one canonical ETI(NI) frame in bytes
pub const ETI_FRAME_SIZE: usize = 6144;

/// Filler written past the declared payload of an underfilled frame
pub const FRAME_FILLER: u8 = 0x55;

/// The only envelope version this receiver understands
pub const ENVELOPE_VERSION: u32 = 1;

/// `version:u32` followed by `FRAMES_PER_MESSAGE` x `buflen:i16`
pub const ENVELOPE_HEADER_SIZE: usize = 4 + 2 * FRAMES_PER_MESSAGE;

/// Largest message carrying full frames and no metadata
pub const MAX_PAYLOAD_MESSAGE_SIZE: usize = ENVELOPE_HEADER_SIZE + FRAMES_PER_MESSAGE * ETI_FRAME_SIZE;

/// Default receive limit; leaves headroom for one metadata group per frame
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = MAX_PAYLOAD_MESSAGE_SIZE + 1024;

/// Tag byte plus 16-bit length
pub const TLV_HEADER_SIZE: usize = 3;

/// FCT wraps at this value, DLFC at 5000
pub const FCT_MODULUS: u16 = 250;

/// TIST ticks per millisecond (16.384 MHz reference)
pub const TIST_TICKS_PER_MS: f64 = 16384.0;

/// TIST occupies the low 24 bits of its 32-bit field
pub const TIST_MASK: u32 = 0x00FF_FFFF;

/// POSIX timestamp of 2000-01-01T00:00:00Z, the EDI time epoch
pub const EDI_EPOCH_UNIX_SECONDS: i64 = 946_684_800;

/// FSYNC values alternate between even and odd frames
pub const FSYNC_EVEN: [u8; 3] = [0x07, 0x3A, 0xB6];
pub const FSYNC_ODD: [u8; 3] = [0xF8, 0xC5, 0x49];

/// ERR byte value meaning "no error"
pub const ERR_NONE: u8 = 0xFF;
