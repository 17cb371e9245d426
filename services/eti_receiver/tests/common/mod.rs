//! Message builders for the receiver tests

#![allow(dead_code)]

use eti_codec::{ETI_FRAME_SIZE, FRAMES_PER_MESSAGE, FRAME_FILLER};

pub fn build_message(payloads: &[Vec<u8>; FRAMES_PER_MESSAGE], metadata: &[u8]) -> Vec<u8> {
    let mut bytes = 1u32.to_le_bytes().to_vec();
    for payload in payloads {
        bytes.extend_from_slice(&(payload.len() as i16).to_le_bytes());
    }
    for payload in payloads {
        bytes.extend_from_slice(payload);
    }
    bytes.extend_from_slice(metadata);
    bytes
}

/// A message with an unsupported envelope version
pub fn wrong_version_message() -> Vec<u8> {
    let mut bytes = build_message(&Default::default(), &[]);
    bytes[0] = 2;
    bytes
}

/// What the sink must receive for `payloads`: four padded frames
pub fn expected_frames(payloads: &[Vec<u8>; FRAMES_PER_MESSAGE]) -> Vec<u8> {
    let mut out = Vec::with_capacity(FRAMES_PER_MESSAGE * ETI_FRAME_SIZE);
    for payload in payloads {
        let mut frame = payload.clone();
        frame.resize(ETI_FRAME_SIZE, FRAME_FILLER);
        out.extend(frame);
    }
    out
}

fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut bytes = vec![tag];
    bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
    bytes.extend_from_slice(value);
    bytes
}

pub fn metadata_group(utc_offset: i16, edi_time: u32, dlfc: u16) -> Vec<u8> {
    let mut bytes = tlv(1, &utc_offset.to_be_bytes());
    bytes.extend(tlv(2, &edi_time.to_be_bytes()));
    bytes.extend(tlv(3, &dlfc.to_be_bytes()));
    bytes.extend(tlv(0, &[]));
    bytes
}

/// Full-length mode I frame with one empty stream; TIST at offset 116
pub fn eti_frame(dlfc: u16, tist: u32) -> Vec<u8> {
    let mut frame = vec![FRAME_FILLER; ETI_FRAME_SIZE];
    frame[0] = 0xFF;
    if dlfc % 2 == 0 {
        frame[1..4].copy_from_slice(&[0x07, 0x3A, 0xB6]);
    } else {
        frame[1..4].copy_from_slice(&[0xF8, 0xC5, 0x49]);
    }
    frame[4] = (dlfc % 250) as u8;
    frame[5] = 0x80 | 1;
    frame[6] = 1 << 3;
    frame[8..12].copy_from_slice(&[0x04, 0x00, 0x0C, 0x00]);
    frame[116..120].copy_from_slice(&tist.to_be_bytes());
    frame
}

/// Four consecutive frames starting at `first_dlfc`, with matching metadata
pub fn timed_message(first_dlfc: u16, edi_time: u32) -> Vec<u8> {
    let frames: [Vec<u8>; FRAMES_PER_MESSAGE] =
        std::array::from_fn(|i| eti_frame(first_dlfc + i as u16, 16384 * 24 * i as u32));
    let mut metadata = Vec::new();
    for i in 0..FRAMES_PER_MESSAGE {
        metadata.extend(metadata_group(37, edi_time, first_dlfc + i as u16));
    }
    build_message(&frames, &metadata)
}
