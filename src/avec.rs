//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode every record in a card's log, from a
//! slice or a reader, and fold the records into sleep episodes. Problems with
//! the log never end decoding early; they are collected as [`Diagnostic`]s
//! alongside the records recovered, in the order they were met.
//!
//! ```
//! let bytes = std::fs::read("ZEOSLEEP.DAT")?;
//! let (episodes, diagnostics) = nightcap::avec::decode_slice(&bytes);
//!
//! for diagnostic in &diagnostics {
//!     eprintln!("warning: {diagnostic}");
//! }
//!
//! for episode in episodes.iter().filter(|e| !e.is_nap()) {
//!     println!("{:?} to {:?}", episode.start_of_night(), episode.rise_time());
//! }
//! ```

use thiserror::Error;

use crate::sans::body::RecordError;

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

/// A problem met while decoding a log, reported without ending decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// No record identifier was found at the start of the log.
    #[error("No records found. The log may be encrypted, or in an unknown format.")]
    NoRecordFound,
    /// A candidate record was rejected, and a search made for the next.
    #[error("Skipped a record after record {after}: {reason}")]
    Skipped { after: usize, reason: SkipReason },
    /// Bytes too few to hold a record ended the log.
    #[error("Dropped {remaining} trailing bytes after record {after}.")]
    Truncated { after: usize, remaining: usize },
    /// No record identifier was found after a skipped record.
    #[error("Stopped decoding after record {after}: no further records found.")]
    Stopped { after: usize },
    /// Records were decoded, but none survived reduction.
    #[error("Decoded {decoded} records but kept none. Try an expanded decode.")]
    NothingKept { decoded: usize },
}

/// Why a candidate record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// Bytes before the first identifier.
    #[error("bytes before the first record identifier")]
    LeadingBytes,
    #[error("{0}")]
    Record(#[from] RecordError),
}

/// How decoded records are folded before being returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reduction {
    /// One record per night; see [`crate::episode::reduce`].
    #[default]
    Episodes,
    /// Every decoded record, in log order.
    Expanded,
    /// Only records written right after a watchdog reset; see
    /// [`crate::episode::keep_resets`].
    Resets,
}

/// Decoding options.
///
/// Naps are labelled whichever [`Reduction`] is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub reduction: Reduction,
}
