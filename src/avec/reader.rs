//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, vec::Vec};

use crate::record::SleepRecord;

use super::{Diagnostic, Options, slice};

extern crate std;

/// Read a whole log and decode it into sleep episodes, with naps labelled.
///
/// A record may be rejected and resynchronized past, so the log is read to
/// its end before decoding. Only errors from the reader are returned; problems
/// with the log are reported as diagnostics.
///
/// This method is also re-exported as `nightcap::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read) -> std::io::Result<(Vec<SleepRecord>, Vec<Diagnostic>)> {
    decode_with(r, &Options::default())
}

/// Read a whole log, folding records as chosen in `options`.
///
/// _Requires Cargo feature `std`._
pub fn decode_with(
    r: &mut impl Read,
    options: &Options,
) -> std::io::Result<(Vec<SleepRecord>, Vec<Diagnostic>)> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    log::debug!("Read {} log bytes.", buf.len());

    Ok(slice::decode_with(&buf, options))
}
