//! ETI(NI) frame sync inspection
//!
//! The first four bytes of every ETI frame are the ERR byte and the 24-bit FSYNC
//! word, which alternates between two values on consecutive frames.

use crate::constants::{ERR_NONE, FSYNC_EVEN, FSYNC_ODD};
use crate::error::ProtocolResult;
use crate::validation::ByteCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSync {
    Even,
    Odd,
    Invalid([u8; 3]),
}

/// ERR and FSYNC of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncInfo {
    pub err: u8,
    pub fsync: FrameSync,
}

impl SyncInfo {
    pub fn is_synchronised(&self) -> bool {
        !matches!(self.fsync, FrameSync::Invalid(_))
    }

    /// ERR = 0xFF means the multiplexer flagged no error
    pub fn error_free(&self) -> bool {
        self.err == ERR_NONE
    }
}

pub fn inspect_frame_sync(frame: &[u8]) -> ProtocolResult<SyncInfo> {
    let mut cursor = ByteCursor::new(frame);
    let err = cursor.read_u8().map_err(|e| e.into_field_error("ERR"))?;
    let word = cursor.take(3).map_err(|e| e.into_field_error("FSYNC"))?;

    let fsync = match [word[0], word[1], word[2]] {
        FSYNC_EVEN => FrameSync::Even,
        FSYNC_ODD => FrameSync::Odd,
        other => FrameSync::Invalid(other),
    };

    Ok(SyncInfo { err, fsync })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FRAME_FILLER;

    #[test]
    fn test_both_sync_words_recognised() {
        let even = inspect_frame_sync(&[0xFF, 0x07, 0x3A, 0xB6, 0x00]).unwrap();
        assert_eq!(even.fsync, FrameSync::Even);
        assert!(even.error_free());

        let odd = inspect_frame_sync(&[0x00, 0xF8, 0xC5, 0x49]).unwrap();
        assert_eq!(odd.fsync, FrameSync::Odd);
        assert!(odd.is_synchronised());
        assert!(!odd.error_free());
    }

    #[test]
    fn test_filler_frame_is_not_synchronised() {
        let info = inspect_frame_sync(&[FRAME_FILLER; 8]).unwrap();
        assert_eq!(info.fsync, FrameSync::Invalid([0x55, 0x55, 0x55]));
        assert!(!info.is_synchronised());
    }

    #[test]
    fn test_short_frame() {
        assert!(inspect_frame_sync(&[0xFF, 0x07]).is_err());
    }
}
