//! States locating and framing record headers.

use thiserror::Error;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::body::Body;

/// Identifier opening every record.
pub const IDENTIFIER: [u8; IDENTIFIER_SIZE] = *b"SLEEP\0";
pub const IDENTIFIER_SIZE: usize = 6;
/// Size of the identifier and version tag.
pub const HEADER_SIZE: usize = IDENTIFIER_SIZE + 2;
/// Furthest distance searched for the next identifier.
///
/// No valid record starts further along than this from a failed one.
pub const MAX_SEARCH_BYTES: usize = 2000;

/// A record layout version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Version {
    #[default]
    V22,
}

impl Version {
    /// Look up a version by its header tag.
    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            22 => Some(Self::V22),
            _ => None,
        }
    }

    pub fn tag(self) -> u16 {
        match self {
            Self::V22 => 22,
        }
    }

    /// Size of a whole record of this version, header included.
    pub fn size(self) -> usize {
        match self {
            Self::V22 => 1680,
        }
    }
}

/// The fixed header opening every record.
#[repr(C, packed)]
#[derive(Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RecordHeader {
    pub identifier: [u8; IDENTIFIER_SIZE],
    pub version: [u8; 2],
}

impl RecordHeader {
    pub fn new(version: Version) -> Self {
        Self {
            identifier: IDENTIFIER,
            version: version.tag().to_le_bytes(),
        }
    }
}

/// An error advancing over a record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Incorrect record identifier.
    #[error("Invalid record identifier.")]
    Identifier,
    /// Unknown record version.
    #[error("Unable to handle record version {0}.")]
    UnknownVersion(u16),
}

/// State token to search for the next record identifier.
#[derive(Debug)]
pub struct Searching;

impl Searching {
    /// Transition to another state by searching bytes for an identifier.
    ///
    /// At most [`MAX_SEARCH_BYTES`] starting positions are tried. Returns the
    /// offset of the identifier within `r` and a framing state token, or
    /// `None` if no identifier was found.
    pub fn advance(r: &[u8]) -> Option<(usize, Framing)> {
        let offset = r
            .windows(IDENTIFIER_SIZE)
            .take(MAX_SEARCH_BYTES)
            .position(|w| w == IDENTIFIER)?;

        Some((offset, Framing(())))
    }
}

/// State token to decode a record header.
#[derive(Debug)]
pub struct Framing(pub(super) ());

impl Framing {
    /// Transition to another state by decoding a record header.
    ///
    /// Returns the size of the whole record, and a successor state token
    /// expecting that many bytes starting from the header.
    pub fn advance(self, r: [u8; HEADER_SIZE]) -> Result<(usize, Body), HeaderError> {
        let RecordHeader {
            identifier,
            version,
        } = zerocopy::transmute!(r);

        if identifier != IDENTIFIER {
            Err(HeaderError::Identifier)?;
        }

        let tag = u16::from_le_bytes(version);
        let version = Version::from_tag(tag).ok_or(HeaderError::UnknownVersion(tag))?;

        Ok((version.size(), Body { version }))
    }
}
