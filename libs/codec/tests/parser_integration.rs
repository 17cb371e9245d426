//! Integration tests for ETI message parsing
//!
//! End-to-end workflows over complete ZeroMQ messages: envelope, reassembly,
//! metadata groups and TIST decoding of every reassembled frame.

mod common;

use common::{build_message, eti_frame, metadata_group, tlv};
use eti_codec::{
    decode_frame_metadata, extract_timestamp, FrameMetadata, FrameTiming, MetadataReader,
    ProtocolError, Reassembler, ETI_FRAME_SIZE, FRAMES_PER_MESSAGE, FRAME_FILLER,
};

#[test]
fn test_complete_message_parse_workflow() {
    let frames: [Vec<u8>; FRAMES_PER_MESSAGE] =
        std::array::from_fn(|i| eti_frame(1000 + i as u16, (i as u32 + 1) * 16384 * 100));
    let mut metadata = Vec::new();
    for i in 0..FRAMES_PER_MESSAGE {
        metadata.extend(metadata_group(37, 700_000_000, 1000 + i as u16));
    }
    let message = build_message(&frames, &metadata);

    let mut reassembler = Reassembler::new();
    let result = reassembler.reassemble(&message).expect("valid message");
    assert_eq!(result.envelope.subframe_lengths, [ETI_FRAME_SIZE; FRAMES_PER_MESSAGE]);
    assert_eq!(result.metadata.len(), 4 * 20);

    let mut reader = MetadataReader::new(result.metadata);
    for (i, frame) in result.frames.frames().enumerate() {
        assert_eq!(frame, frames[i].as_slice());

        let md = reader.next_group().expect("metadata group");
        assert_eq!(md.dlfc, 1000 + i as u16);

        let info = extract_timestamp(frame, md.dlfc).expect("TIST");
        assert!(info.fct_matches());
        assert_eq!(info.tist_offset, 116);
        assert_eq!(info.pps_offset_ms, (i as f64 + 1.0) * 100.0);

        let timing = FrameTiming::align_now(&md, &info);
        assert!(timing.frame_time.timestamp() > 946_684_800);
    }
    assert_eq!(reader.consumed(), result.metadata.len());
}

#[test]
fn test_reference_metadata_group() {
    let group = metadata_group(5, 700_000_000, 123);
    let (md, consumed) = decode_frame_metadata(&group).unwrap();
    assert_eq!(
        md,
        FrameMetadata {
            utc_offset: 5,
            edi_time: 700_000_000,
            dlfc: 123
        }
    );
    assert_eq!(consumed, 5 + 7 + 5 + 3);
}

#[test]
fn test_group_missing_dlfc() {
    let mut group = tlv(1, &5i16.to_be_bytes());
    group.extend(tlv(2, &700_000_000u32.to_be_bytes()));
    group.extend(tlv(0, &[]));

    assert!(matches!(
        decode_frame_metadata(&group),
        Err(ProtocolError::IncompleteMetadata { .. })
    ));
}

#[test]
fn test_underfilled_frames_without_metadata() {
    let payloads = [vec![0xA1; 3000], Vec::new(), vec![0xA3; 6144], vec![0xA4; 1]];
    let message = build_message(&payloads, &[]);

    let mut reassembler = Reassembler::new();
    let result = reassembler.reassemble(&message).unwrap();

    for (i, frame) in result.frames.frames().enumerate() {
        let len = payloads[i].len();
        assert_eq!(frame.len(), ETI_FRAME_SIZE);
        assert_eq!(&frame[..len], payloads[i].as_slice());
        assert!(frame[len..].iter().all(|&b| b == FRAME_FILLER));
    }
    assert!(result.metadata.is_empty());
    assert_eq!(result.frames.total_payload(), 3000 + 6144 + 1);
}

#[test]
fn test_metadata_groups_are_bounded_by_message() {
    let frames: [Vec<u8>; FRAMES_PER_MESSAGE] = std::array::from_fn(|i| eti_frame(i as u16, 0));
    let mut metadata = metadata_group(37, 1, 0);
    metadata.extend(metadata_group(37, 1, 1));
    // Third group cut short
    metadata.extend(&metadata_group(37, 1, 2)[..9]);
    let message = build_message(&frames, &metadata);

    let mut reassembler = Reassembler::new();
    let result = reassembler.reassemble(&message).unwrap();
    let mut reader = MetadataReader::new(result.metadata);
    assert!(reader.next_group().is_ok());
    assert!(reader.next_group().is_ok());
    assert!(matches!(
        reader.next_group(),
        Err(ProtocolError::TruncatedMetadata { tag: Some(2), .. })
    ));
}

#[test]
fn test_tist_reaching_next_second_is_advisory() {
    let info = extract_timestamp(&eti_frame(10, 0x00FA_0000), 10).unwrap();
    assert_eq!(info.pps_offset_ms, 1000.0);
    assert!(info.is_advisory());

    // Upper byte is not part of the offset
    let info = extract_timestamp(&eti_frame(10, 0xFFF9_C000), 10).unwrap();
    assert_eq!(info.pps_offset_ms, 999.0);
    assert!(!info.is_advisory());
}
