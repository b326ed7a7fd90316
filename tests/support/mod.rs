#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, Utc};
use nightcap::record::{RawRecord, SleepRecord, SleepStage, WriteReason};

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// A complete night, with a base track asleep from start to end.
pub fn night(start: &str, minutes: i64) -> RawRecord {
    let start = at(start);
    let end = start + TimeDelta::minutes(minutes);
    let samples = (minutes * 2) as usize;

    let mut raw = RawRecord {
        written_at: Some(end),
        start_of_night: Some(start),
        end_of_night: Some(end),
        hypnogram_start: Some(start),
        base_track: vec![SleepStage::Light; samples],
        ..Default::default()
    };
    raw.state.write_reason = WriteReason::NightEnd;
    raw
}

pub fn sleep_record(raw: RawRecord) -> SleepRecord {
    SleepRecord::new(raw).unwrap()
}

/// Concatenate encoded records into a log.
pub fn encode_log(records: &[RawRecord]) -> Vec<u8> {
    records.iter().flat_map(RawRecord::encode).collect()
}

/// Overwrite bytes in an encoded record, then restore its checksum.
pub fn patch(record: &mut [u8], offset: usize, bytes: &[u8]) {
    use nightcap::sans::body::{CHECKSUM_OFFSET, checksum};

    record[offset..offset + bytes.len()].copy_from_slice(bytes);
    let calculated = u32::from(checksum(record));
    record[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 4].copy_from_slice(&calculated.to_le_bytes());
}
