//! # Frame Reassembler
//!
//! Copies the packed sub-frame payloads of one message into
//! [`FRAMES_PER_MESSAGE`] canonical ETI frames of [`ETI_FRAME_SIZE`] bytes each.
//!
//! The frame buffers live in a single reusable allocation. Every call rewrites
//! every byte: the declared payload, then [`FRAME_FILLER`] up to the frame end.
//! A rejected message leaves the buffers entirely filler so nothing from an
//! earlier message can be mistaken for current data.

use tracing::trace;

use crate::constants::{ETI_FRAME_SIZE, FRAMES_PER_MESSAGE, FRAME_FILLER};
use crate::envelope::{parse_envelope, Envelope};
use crate::error::{ProtocolError, ProtocolResult};
use crate::validation::ByteCursor;

/// The canonical frames produced from one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    buf: Vec<u8>,
    payload_lens: [usize; FRAMES_PER_MESSAGE],
}

impl FrameSet {
    pub fn new() -> Self {
        Self {
            buf: vec![FRAME_FILLER; FRAMES_PER_MESSAGE * ETI_FRAME_SIZE],
            payload_lens: [0; FRAMES_PER_MESSAGE],
        }
    }

    /// Frame `index`, always exactly `ETI_FRAME_SIZE` bytes
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        self.buf.chunks_exact(ETI_FRAME_SIZE).nth(index)
    }

    pub fn frames(&self) -> impl Iterator<Item = &[u8]> {
        self.buf.chunks_exact(ETI_FRAME_SIZE)
    }

    /// Declared payload length of frame `index` (0 for an out-of-range index)
    pub fn payload_len(&self, index: usize) -> usize {
        self.payload_lens.get(index).copied().unwrap_or(0)
    }

    pub fn payload_lens(&self) -> &[usize; FRAMES_PER_MESSAGE] {
        &self.payload_lens
    }

    pub fn total_payload(&self) -> usize {
        self.payload_lens.iter().sum()
    }

    /// All frames back to back, as written to the output sink
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn reset(&mut self) {
        self.buf.fill(FRAME_FILLER);
        self.payload_lens = [0; FRAMES_PER_MESSAGE];
    }

    fn load(&mut self, payloads: &[&[u8]; FRAMES_PER_MESSAGE]) {
        for ((frame, payload), len) in self
            .buf
            .chunks_exact_mut(ETI_FRAME_SIZE)
            .zip(payloads)
            .zip(self.payload_lens.iter_mut())
        {
            frame[..payload.len()].copy_from_slice(payload);
            frame[payload.len()..].fill(FRAME_FILLER);
            *len = payload.len();
        }
    }
}

impl Default for FrameSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of reassembling one message
#[derive(Debug)]
pub struct Reassembly<'f, 'm> {
    pub envelope: Envelope,
    pub frames: &'f FrameSet,
    /// Bytes following the payload region, bounded by the received length
    pub metadata: &'m [u8],
}

/// Reassembles messages into a reused [`FrameSet`]
#[derive(Debug, Default)]
pub struct Reassembler {
    frames: FrameSet,
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames from the most recent call; all filler after a rejected message
    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Parse the envelope of `message` and rebuild its frames
    pub fn reassemble<'m>(&mut self, message: &'m [u8]) -> ProtocolResult<Reassembly<'_, 'm>> {
        let (envelope, payloads, metadata) = match split_message(message) {
            Ok(parts) => parts,
            Err(e) => {
                self.frames.reset();
                return Err(e);
            }
        };

        self.frames.load(&payloads);
        trace!(
            lengths = ?envelope.subframe_lengths,
            metadata_len = metadata.len(),
            "Reassembled message of {} bytes",
            message.len()
        );

        Ok(Reassembly {
            envelope,
            frames: &self.frames,
            metadata,
        })
    }
}

/// Split a message into envelope, per-frame payload slices and trailing metadata
fn split_message(message: &[u8]) -> ProtocolResult<(Envelope, [&[u8]; FRAMES_PER_MESSAGE], &[u8])> {
    let envelope = parse_envelope(message)?;
    let mut cursor = ByteCursor::at(message, Envelope::SIZE)
        .map_err(|_| ProtocolError::short_message(Envelope::SIZE, message.len()))?;

    let mut payloads: [&[u8]; FRAMES_PER_MESSAGE] = [&[]; FRAMES_PER_MESSAGE];
    for (index, (slot, &length)) in payloads
        .iter_mut()
        .zip(envelope.subframe_lengths.iter())
        .enumerate()
    {
        let offset = cursor.position();
        *slot = cursor
            .take(length)
            .map_err(|_| ProtocolError::payload_overrun(index, offset, length, message.len()))?;
    }

    Ok((envelope, payloads, cursor.rest()))
}
