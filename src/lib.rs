#![no_std]

//! A decoder for the sleep logs written by Zeo bedside units to their memory
//! cards.
//!
//! Nightcap recovers every intact record from a log, skipping past corrupt or
//! unrecognized ones, and folds the records into one sleep episode per night
//! with naps labelled. It exposes its underlying finite-state machine for
//! applications needing finer control over how a log is read.
//!
//! Most users should begin with the functions in the [`avec`] module. Decoded
//! records are described in the [`record`] module, and the folding of records
//! into episodes in the [`episode`] module. If these prove insufficient,
//! consider implementing a decoder as described in the [`sans`] module.
//!
//! Nightcap writes nothing to any stream. Problems with a log are returned as
//! [`avec::Diagnostic`]s, and also emitted through the [`log`] facade.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-based decoder (default).

extern crate alloc;

pub mod avec;
pub mod episode;
pub mod record;
pub mod sans;

pub use avec::slice::decode;
