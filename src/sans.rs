//! Internal finite-state machine for implementing decoders.
//!
//! This module is intended for applications that need control over how bytes
//! are located and buffered, such as those reading a card incrementally. See
//! [`crate::avec`] for implementations covering common decoding patterns.
//!
//! # Architecture
//!
//! All states are represented by a non-copy token. Once enough bytes are
//! ready, transition to another state by calling the token's `advance`
//! method. This will return a successor state token, along with any extracted
//! data.
//!
//! Only the initial state, re-exported for convenience as [`Scanner`], can be
//! constructed. Its `advance` is called on the bytes to search rather than on
//! a token, since a search may begin afresh at any offset.
//!
//! Decoding begins in [`Searching`](header::Searching), which scans for the
//! identifier opening a record. A [`Framing`](header::Framing) token reads the
//! record header and reports how many bytes the record spans, and a
//! [`Body`](body::Body) token checks and decodes exactly that span, handing
//! back a `Framing` token for the header expected to follow.
//!
//! Any failure consumes the token. To recover, begin a fresh search one byte
//! past the header that failed, so that identifiers overlapping the rejected
//! record are still found.
//!
//! Some areas of the decoding process are not represented in the finite-state
//! machine and must be carefully written:
//!
//! - Reading bytes from the correct place in the document, and advancing past
//! whole records once they are accepted.
//!
//! - Ending decoding when the document is exhausted, or when too few bytes
//! remain to hold a header or a record.
//!
//! Implementers are recommended to begin by studying and modifying the decoder
//! in [`crate::avec::slice`].

pub mod body;
pub mod check;
pub mod cursor;
pub mod header;

/// Entrypoint to the finite-state machine.
pub type Scanner = header::Searching;
