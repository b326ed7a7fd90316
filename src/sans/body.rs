//! States processing a framed record.

use thiserror::Error;

use crate::record::{FieldError, SleepRecord, decode};

use super::{
    check::compute_crc,
    cursor::Cursor,
    header::{Framing, HeaderError, Version},
};

/// Offset of the stored checksum within a record, header included.
pub const CHECKSUM_OFFSET: usize = 12;
pub const CHECKSUM_SIZE: usize = 4;

/// An error decoding a framed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The header could not be framed.
    #[error("{0}")]
    Header(#[from] HeaderError),
    /// The span does not match the size of its version.
    #[error("Expected {expected} record bytes, found {found}.")]
    Length { expected: usize, found: usize },
    /// Calculated and stored checksums do not match.
    #[error("Calculated ({calculated}) and stored ({found}) checksums do not match.")]
    Checksum { found: u32, calculated: u16 },
    /// A field could not be decoded.
    #[error("{0}")]
    Field(#[from] FieldError),
}

/// State token to check and decode the bytes of one framed record.
#[derive(Debug)]
pub struct Body {
    pub(super) version: Version,
}

impl Body {
    pub fn version(&self) -> Version {
        self.version
    }

    /// Transition to another state by checking and decoding a record.
    ///
    /// `r` must hold the whole record, header included. Returns the decoded
    /// record, and a successor state token for the header that should
    /// follow it.
    pub fn advance(self, r: &[u8]) -> Result<(SleepRecord, Framing), RecordError> {
        let expected = self.version.size();
        if r.len() != expected {
            Err(RecordError::Length {
                expected,
                found: r.len(),
            })?;
        }

        let found = stored_checksum(r)?;
        let calculated = checksum(r);

        if found != u32::from(calculated) {
            Err(RecordError::Checksum { found, calculated })?;
        }

        let raw = decode::decode(self.version, r)?;
        let record = SleepRecord::new(raw)?;

        Ok((record, Framing(())))
    }
}

/// Read the checksum stored in a record.
pub fn stored_checksum(r: &[u8]) -> Result<u32, FieldError> {
    let mut c = Cursor::new(r);
    c.skip(CHECKSUM_OFFSET)?;
    Ok(c.u32()?)
}

/// Checksum a whole record as the firmware does, reading its stored checksum
/// field as zero.
///
/// Panics if `r` is shorter than the checksum field's end.
pub fn checksum(r: &[u8]) -> u16 {
    let (head, tail) = r.split_at(CHECKSUM_OFFSET);
    let tail = &tail[CHECKSUM_SIZE..];

    let c = compute_crc(0, head);
    let c = compute_crc(c, &[0; CHECKSUM_SIZE]);
    compute_crc(c, tail)
}
