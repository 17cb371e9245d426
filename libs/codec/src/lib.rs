//! # ETI Codec - ZeroMQ Envelope, Frame Reassembly and TIST Decoding
//!
//! ## Purpose
//!
//! This crate contains the protocol rules for the ETI stream a DAB multiplexer
//! publishes over ZeroMQ:
//! - Envelope parsing (version and per-frame lengths)
//! - Reassembly of packed sub-frames into canonical 6144-byte ETI frames
//! - Decoding of the per-frame metadata TLV block
//! - Extraction of the TIST field from a reassembled frame
//! - Alignment of EDI time and TIST against the wall clock
//!
//! ## Architecture Role
//!
//! ```text
//! network (ZeroMQ SUB) → [codec] → service (sink, statistics)
//!        ↑                  ↓               ↓
//!   Raw messages      Envelope/TLV      ETI stream
//!                     FrameSet/TIST     Latency logs
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Transport logic (belongs in `eti-network`)
//! - Output writing or statistics reporting
//! - Frame encoding; the codec is decode-only
//!
//! All decoders read through [`validation::ByteCursor`]; a malformed length or
//! offset produces a [`ProtocolError`], never an out-of-bounds read.

pub mod constants;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod metadata;
pub mod reassembly;
pub mod timestamp;
pub mod timing;
pub mod tlv_types;
pub mod validation;

pub use constants::*;
pub use envelope::{parse_envelope, Envelope};
pub use error::{ProtocolError, ProtocolResult};
pub use frame::{inspect_frame_sync, FrameSync, SyncInfo};
pub use metadata::{decode_frame_metadata, decode_metadata_groups, FrameMetadata, MetadataReader};
pub use reassembly::{FrameSet, Reassembler, Reassembly};
pub use timestamp::{extract_timestamp, StreamDescriptor, TimestampInfo};
pub use timing::{frame_unix_seconds, FrameTiming};
pub use tlv_types::{MetadataTag, MetadataTagRegistry};
