//! Fields computed from a record's stored fields.

use chrono::{NaiveTime, TimeDelta};

use super::{DISPLAY_STEP_SECONDS, RawRecord, SleepStage, TimeChange, Timestamp, time};

/// Hour of the morning at which a sleep day begins.
const SLEEP_DAY_START_HOUR: u32 = 6;

/// End of the last display slot spent asleep.
///
/// Unset when the hypnogram start is unset, or when no slot is asleep.
pub fn rise_time(hypnogram_start: Timestamp, display_track: &[SleepStage]) -> Timestamp {
    let start = hypnogram_start?;
    let last = display_track.iter().rposition(|s| s.is_sleep())?;

    // Bounded by the display track's capacity.
    let slots = last as i64 + 1;
    start.checked_add_signed(TimeDelta::seconds(DISPLAY_STEP_SECONDS * slots))
}

/// The alarm time in effect at the end of the night, placed on the first
/// occurrence of that time of day at or after the start of the night.
///
/// The alarm in effect is the latest change made before the first ring, or
/// before the end of the night if the alarm never rang. The startup value
/// counts as made before any cutoff.
pub fn alarm_set_time(raw: &RawRecord) -> Timestamp {
    let start = raw.start_of_night?;
    let end = raw.end_of_night?;
    let cutoff = raw.alarm_ring[0].unwrap_or(end);

    let mut latest: Option<&TimeChange> = None;
    for change in time::effective_changes(&raw.alarm_changes) {
        let before = change.time.is_none_or(|t| t < cutoff);
        if !before {
            continue;
        }

        let later = match latest {
            None => true,
            Some(TimeChange { time: None, .. }) => true,
            Some(TimeChange { time: Some(l), .. }) => change.time.is_some_and(|t| t > *l),
        };
        if later {
            latest = Some(change);
        }
    }

    let alarm = latest?.value?;
    let set = start.date_naive().and_time(alarm.time()).and_utc();

    if set < start {
        set.checked_add_signed(TimeDelta::days(1))
    } else {
        Some(set)
    }
}

/// 6:00 on the morning opening the 24 hours that hold `start`.
pub fn sleep_day(start: Timestamp) -> Timestamp {
    let start = start?;
    let shifted = start.checked_sub_signed(TimeDelta::hours(i64::from(SLEEP_DAY_START_HOUR)))?;
    let opening = NaiveTime::from_hms_opt(SLEEP_DAY_START_HOUR, 0, 0)?;

    Some(shifted.date_naive().and_time(opening).and_utc())
}
