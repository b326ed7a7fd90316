//! Slice-based decoder implementation.

use alloc::vec::Vec;

use crate::{
    episode,
    record::SleepRecord,
    sans::{
        Scanner,
        body::RecordError,
        header::{Framing, HEADER_SIZE},
    },
};

use super::{Diagnostic, Options, Reduction, SkipReason};

/// Decode a whole log into sleep episodes, with naps labelled.
///
/// This method is also re-exported as `nightcap::avec::decode_slice`.
pub fn decode(r: &[u8]) -> (Vec<SleepRecord>, Vec<Diagnostic>) {
    decode_with(r, &Options::default())
}

/// Decode a whole log, folding records as chosen in `options`.
pub fn decode_with(r: &[u8], options: &Options) -> (Vec<SleepRecord>, Vec<Diagnostic>) {
    let (records, mut diagnostics) = scan(r);
    let decoded = records.len();

    let mut records = match options.reduction {
        Reduction::Episodes => episode::reduce(records),
        Reduction::Expanded => records,
        Reduction::Resets => episode::keep_resets(records),
    };

    if options.reduction == Reduction::Episodes && decoded > 0 && records.is_empty() {
        warn(&mut diagnostics, Diagnostic::NothingKept { decoded });
    }

    episode::classify_naps(&mut records);

    (records, diagnostics)
}

/// Decode every well-formed record in a log, in log order.
///
/// A rejected record is reported, and a search for the next identifier begins
/// one byte past the rejected header.
pub fn scan(r: &[u8]) -> (Vec<SleepRecord>, Vec<Diagnostic>) {
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    let Some((offset, mut state)) = Scanner::advance(r) else {
        warn(&mut diagnostics, Diagnostic::NoRecordFound);
        return (records, diagnostics);
    };

    if offset > 0 {
        let reason = SkipReason::LeadingBytes;
        warn(&mut diagnostics, Diagnostic::Skipped { after: 0, reason });
    }

    let mut i = offset; // Offset of the next header.

    while i < r.len() {
        match frame(state, r, i) {
            Framed::Accepted(record, successor) => {
                log::debug!("Decoded record written at {:?}.", record.written_at());
                i += record.raw().version.size();
                records.push(record);
                state = successor;
            }
            Framed::Truncated => {
                let diagnostic = Diagnostic::Truncated {
                    after: records.len(),
                    remaining: r.len() - i,
                };
                warn(&mut diagnostics, diagnostic);
                break;
            }
            Framed::Rejected(reason) => {
                let after = records.len();
                let reason = SkipReason::Record(reason);
                warn(&mut diagnostics, Diagnostic::Skipped { after, reason });

                let Some((offset, successor)) = Scanner::advance(&r[i + 1..]) else {
                    warn(&mut diagnostics, Diagnostic::Stopped { after });
                    break;
                };

                i += 1 + offset;
                state = successor;
            }
        }
    }

    (records, diagnostics)
}

enum Framed {
    Accepted(SleepRecord, Framing),
    Truncated,
    Rejected(RecordError),
}

/// Frame and decode the record whose header begins at `i`.
fn frame(state: Framing, r: &[u8], i: usize) -> Framed {
    let Some(header) = r.get(i..i + HEADER_SIZE) else {
        return Framed::Truncated;
    };
    // Exactly `HEADER_SIZE` bytes long.
    let mut bytes = [0; HEADER_SIZE];
    bytes.copy_from_slice(header);

    let (size, body) = match state.advance(bytes) {
        Ok(next) => next,
        Err(err) => return Framed::Rejected(err.into()),
    };

    let Some(span) = r.get(i..i + size) else {
        return Framed::Truncated;
    };

    match body.advance(span) {
        Ok((record, successor)) => Framed::Accepted(record, successor),
        Err(err) => Framed::Rejected(err),
    }
}

fn warn(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("{diagnostic}");
    diagnostics.push(diagnostic);
}
