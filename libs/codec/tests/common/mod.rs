//! Message and frame builders shared by the codec integration tests

#![allow(dead_code)]

use eti_codec::{ETI_FRAME_SIZE, FRAMES_PER_MESSAGE, FRAME_FILLER};

/// Serialize an envelope header with explicit (possibly invalid) fields
pub fn header(version: u32, lengths: [i16; FRAMES_PER_MESSAGE]) -> Vec<u8> {
    let mut bytes = version.to_le_bytes().to_vec();
    for len in lengths {
        bytes.extend_from_slice(&len.to_le_bytes());
    }
    bytes
}

/// A version 1 message carrying `payloads` followed by `metadata`
pub fn build_message(payloads: &[Vec<u8>; FRAMES_PER_MESSAGE], metadata: &[u8]) -> Vec<u8> {
    let lengths = payloads.clone().map(|p| p.len() as i16);
    let mut bytes = header(1, lengths);
    for payload in payloads {
        bytes.extend_from_slice(payload);
    }
    bytes.extend_from_slice(metadata);
    bytes
}

pub fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut bytes = vec![tag];
    bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
    bytes.extend_from_slice(value);
    bytes
}

/// utc_offset, edi_time, dlfc and a separation marker
pub fn metadata_group(utc_offset: i16, edi_time: u32, dlfc: u16) -> Vec<u8> {
    let mut bytes = tlv(1, &utc_offset.to_be_bytes());
    bytes.extend(tlv(2, &edi_time.to_be_bytes()));
    bytes.extend(tlv(3, &dlfc.to_be_bytes()));
    bytes.extend(tlv(0, &[]));
    bytes
}

/// Full-length ETI frame, mode I, one empty stream, TIST at offset 116
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
    let tist_ix = 12 + 4 + 24 * 4 + 4;
    frame[tist_ix..tist_ix + 4].copy_from_slice(&tist.to_be_bytes());
    frame
}
