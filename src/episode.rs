//! Folding decoded records into sleep episodes.
//!
//! The bedside unit writes a record for the night in progress several times:
//! tentatively, when the night ends, when the alarm is silenced, when the
//! sleeper rates the night, and so on. [`reduce`] keeps one record per night,
//! and [`classify_naps`] labels the secondary episodes of each sleep day.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::record::{SleepRecord, derived};

/// Order two records by how much of the night they hold.
///
/// A record without an end orders before one with an end. Otherwise the
/// longer night orders last, then the longer base track.
pub fn compare_length(a: &SleepRecord, b: &SleepRecord) -> Ordering {
    match (a.end_of_night(), b.end_of_night()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(_), Some(_)) => a
            .length()
            .cmp(&b.length())
            .then_with(|| a.base_track().len().cmp(&b.base_track().len())),
    }
}

/// Keep the most complete record of each night, in chronological order.
///
/// Incomplete records are dropped. Runs of records sharing a start of night
/// are merged into their longest member, with a later sleep-rated record
/// replacing an equally long one. Merging runs once in file order and again
/// after a stable sort by start of night.
pub fn reduce(records: Vec<SleepRecord>) -> Vec<SleepRecord> {
    let complete = records.into_iter().filter(|r| {
        let keep = r.is_complete();
        if !keep {
            log::trace!("Dropping incomplete record written at {:?}.", r.written_at());
        }
        keep
    });

    let mut episodes = merge(complete);
    episodes.sort_by_key(|r| r.start_of_night());
    merge(episodes)
}

fn merge(records: impl IntoIterator<Item = SleepRecord>) -> Vec<SleepRecord> {
    let mut merged: Vec<SleepRecord> = Vec::new();

    for record in records {
        let Some(kept) = merged.last_mut().filter(|k| k.same_start(&record)) else {
            merged.push(record);
            continue;
        };

        let replace = match compare_length(kept, &record) {
            Ordering::Less => true,
            Ordering::Equal => record.is_sleep_rated(),
            Ordering::Greater => false,
        };

        log::trace!(
            "Merging records starting {:?}, keeping the one written at {:?}.",
            record.start_of_night(),
            if replace { record.written_at() } else { kept.written_at() },
        );

        if replace {
            *kept = record;
        }
    }

    merged
}

/// Assign each record its sleep day and label the naps.
///
/// Records should already be reduced. On each sleep day the longest record
/// is the night and every other record is a nap; of equally long records the
/// last one is the night. Records without a start of night are never naps.
pub fn classify_naps(records: &mut [SleepRecord]) {
    for record in records.iter_mut() {
        record.sleep_day = derived::sleep_day(record.start_of_night());
        record.is_nap = false;
    }

    let mut largest: Option<usize> = None;

    for i in 0..records.len() {
        let Some(l) = largest.filter(|l| records[*l].same_sleep_day(&records[i])) else {
            largest = Some(i);
            continue;
        };

        let nap = if compare_length(&records[l], &records[i]) == Ordering::Greater {
            i
        } else {
            largest = Some(i);
            l
        };

        log::trace!(
            "Labelling record starting {:?} a nap on {:?}.",
            records[nap].start_of_night(),
            records[nap].sleep_day(),
        );
        records[nap].is_nap = true;
    }
}

/// Keep only the records written right after a watchdog reset.
pub fn keep_resets(records: Vec<SleepRecord>) -> Vec<SleepRecord> {
    records
        .into_iter()
        .filter(SleepRecord::is_reset_record)
        .collect()
}
