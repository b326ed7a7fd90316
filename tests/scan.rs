mod support;

use nightcap::{
    avec::{Diagnostic, SkipReason, slice::scan},
    record::{FieldError, Ordinal, SleepStage},
    sans::{
        body::RecordError,
        header::{HeaderError, Version},
    },
};
use support::{at, encode_log, night, patch};

const SIZE: usize = 1680;

fn nights(n: usize) -> Vec<nightcap::record::RawRecord> {
    (0..n)
        .map(|i| night(&format!("2011-03-{:02}T23:00:00Z", i + 1), 420))
        .collect()
}

#[test]
fn scan_clean_log() {
    let data = encode_log(&nights(3));
    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 3);
    assert!(diagnostics.is_empty());
    assert_eq!(records[2].start_of_night(), Some(at("2011-03-03T23:00:00Z")));
}

#[test]
fn scan_garbage_between_records() {
    let mut data = encode_log(&nights(4));
    data.insert(2 * SIZE, 0xAA);

    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 4);
    assert_eq!(
        diagnostics,
        [Diagnostic::Skipped {
            after: 2,
            reason: SkipReason::Record(RecordError::Header(HeaderError::Identifier)),
        }]
    );
    assert_eq!(records[2].start_of_night(), Some(at("2011-03-03T23:00:00Z")));
}

#[test]
fn scan_bad_checksum() {
    let mut data = encode_log(&nights(3));
    data[SIZE + 100] ^= 0xFF;

    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].start_of_night(), Some(at("2011-03-03T23:00:00Z")));
    assert!(matches!(
        diagnostics[..],
        [Diagnostic::Skipped {
            after: 1,
            reason: SkipReason::Record(RecordError::Checksum { .. }),
        }]
    ));
}

#[test]
fn scan_unknown_version() {
    let mut data = encode_log(&nights(2));
    data[6..8].copy_from_slice(&23u16.to_le_bytes());

    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 1);
    assert_eq!(
        diagnostics,
        [Diagnostic::Skipped {
            after: 0,
            reason: SkipReason::Record(RecordError::Header(HeaderError::UnknownVersion(23))),
        }]
    );
}

#[test]
fn scan_invalid_base_stage() {
    let mut data = encode_log(&nights(2));
    // Low nibble of the first packed base track byte.
    patch(&mut data[..SIZE], 720, &[0x39]);

    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 1);
    assert_eq!(
        diagnostics,
        [Diagnostic::Skipped {
            after: 0,
            reason: SkipReason::Record(RecordError::Field(FieldError::Ordinal {
                kind: SleepStage::KIND,
                value: 9,
            })),
        }]
    );
}

#[test]
fn scan_forced_index_out_of_range() {
    let mut raw = nights(1).remove(0);
    raw.forced_index = 192;
    raw.forced_stage = SleepStage::Wake.ordinal().into();

    let (records, diagnostics) = scan(&raw.encode());

    assert!(records.is_empty());
    assert_eq!(
        diagnostics,
        [
            Diagnostic::Skipped {
                after: 0,
                reason: SkipReason::Record(RecordError::Field(FieldError::ForcedIndex(192))),
            },
            Diagnostic::Stopped { after: 0 },
        ]
    );
}

#[test]
fn scan_truncated_tail() {
    let mut data = encode_log(&nights(3));
    data.truncate(2 * SIZE + 100);

    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 2);
    assert_eq!(
        diagnostics,
        [Diagnostic::Truncated {
            after: 2,
            remaining: 100,
        }]
    );
}

#[test]
fn scan_short_tail() {
    let mut data = encode_log(&nights(1));
    data.extend_from_slice(b"SLEEP");

    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 1);
    assert_eq!(
        diagnostics,
        [Diagnostic::Truncated {
            after: 1,
            remaining: 5,
        }]
    );
}

#[test]
fn scan_trailing_garbage() {
    let mut data = encode_log(&nights(1));
    data.extend_from_slice(&[0xFF; 32]);

    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 1);
    assert_eq!(
        diagnostics,
        [
            Diagnostic::Skipped {
                after: 1,
                reason: SkipReason::Record(RecordError::Header(HeaderError::Identifier)),
            },
            Diagnostic::Stopped { after: 1 },
        ]
    );
}

#[test]
fn scan_leading_garbage() {
    let mut data = b"FAT32 boot sector".to_vec();
    data.extend(encode_log(&nights(2)));

    let (records, diagnostics) = scan(&data);

    assert_eq!(records.len(), 2);
    assert_eq!(
        diagnostics,
        [Diagnostic::Skipped {
            after: 0,
            reason: SkipReason::LeadingBytes,
        }]
    );
}

#[test]
fn scan_no_identifier() {
    // Identifier beyond the search span.
    let mut data = vec![0; 2500];
    data.extend(encode_log(&nights(1)));

    let (records, diagnostics) = scan(&data);

    assert!(records.is_empty());
    assert_eq!(diagnostics, [Diagnostic::NoRecordFound]);
}

#[test]
fn scan_empty() {
    let (records, diagnostics) = scan(&[]);

    assert!(records.is_empty());
    assert_eq!(diagnostics, [Diagnostic::NoRecordFound]);
}

#[test]
fn version_sizes() {
    assert_eq!(Version::from_tag(22), Some(Version::V22));
    assert_eq!(Version::from_tag(21), None);
    assert_eq!(Version::V22.size(), SIZE);
}
