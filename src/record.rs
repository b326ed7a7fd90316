//! Decoded sleep records.
//!
//! A [`RawRecord`] holds every field stored in one record exactly as written
//! by the bedside unit, and converts to and from the wire layout with
//! [`decode::decode`] and [`RawRecord::encode`]. A [`SleepRecord`] wraps a raw
//! record together with the fields derived from it: the 5-minute display
//! track, the rise time, and the time the alarm was set for. Nap labelling
//! (see [`crate::episode`]) is the only thing that changes a sleep record
//! after it is built.

use alloc::vec::Vec;

use chrono::TimeDelta;
use thiserror::Error;

use crate::sans::{cursor::EndOfRecord, header::Version};

pub mod decode;
pub mod derived;
pub mod encode;
pub mod stage;
pub mod state;
pub mod time;

pub use stage::SleepStage;
pub use state::{AlarmReason, ClockMode, DeviceState, SleepRating, WakeTone, WriteReason};
pub use time::{TimeChange, Timestamp};

/// Derive [`Ordinal`] for a fieldless enum.
///
/// Each variant maps to its discriminant, which must be an integer literal
/// fitting in a `u8` (or be implicit, counting up from the previous variant).
/// The trait must be in scope where the derive is used.
///
/// ```
/// #[derive(Debug, Clone, Copy, Ordinal)]
/// enum Backlight {
///     Off = 0,
///     Dim,
///     Bright = 4,
/// }
/// ```
pub use nightcap_derive::Ordinal;

/// A closed enumeration stored on the wire as a small integer.
///
/// See the [`Ordinal`](macro@Ordinal) derive macro for an automatic
/// implementation of this trait.
pub trait Ordinal: Sized + Copy {
    /// Name of the enumeration, used when reporting an unknown ordinal.
    const KIND: &'static str;

    /// Convert from a stored integer, if it names a variant.
    fn from_ordinal(value: u8) -> Option<Self>;

    /// The stored integer for this variant.
    fn ordinal(self) -> u8;
}

/// Convert a stored integer to an enumeration, failing on unknown values.
pub(crate) fn ordinal<T: Ordinal>(value: u8) -> Result<T, FieldError> {
    T::from_ordinal(value).ok_or(FieldError::Ordinal {
        kind: T::KIND,
        value,
    })
}

/// Number of alarm and real-time clock changes kept in each record.
pub const CHANGES_SAVED: usize = 4;
/// Number of alarm ring times kept in each record.
pub const ALARM_RINGS_SAVED: usize = 2;
/// Number of snooze times kept in each record.
pub const SNOOZES_SAVED: usize = 9;
/// Length of the firmware assert function name.
pub const ASSERT_NAME_MAX: usize = 20;

pub const HEADBAND_IMPEDANCE_SIZE: usize = 144;
pub const HEADBAND_PACKETS_SIZE: usize = 144;
pub const HEADBAND_RSSI_SIZE: usize = 144;
pub const HEADBAND_STATUS_SIZE: usize = 36;

/// Seconds covered by one base track sample.
pub const BASE_STEP_SECONDS: i64 = 30;
/// Seconds covered by one display track sample.
pub const DISPLAY_STEP_SECONDS: i64 = 5 * 60;
/// Base track samples folded into each display track sample.
pub const BASE_PER_DISPLAY: usize = (DISPLAY_STEP_SECONDS / BASE_STEP_SECONDS) as usize;
/// Capacity of the base track (sixteen hours).
pub const BASE_TRACK_LEN: usize = 16 * 60 * 60 / BASE_STEP_SECONDS as usize;
/// Capacity of the display track (sixteen hours).
pub const DISPLAY_TRACK_LEN: usize = BASE_TRACK_LEN / BASE_PER_DISPLAY;

/// An error decoding the fields of a single record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The record ended part way through a field.
    #[error("Unexpectedly reached the end of the record.")]
    EndOfRecord,
    /// An enumerated field held a value outside its enumeration.
    #[error("Unrecognized {kind} value ({value}).")]
    Ordinal { kind: &'static str, value: u8 },
    /// The base track claims more samples than it can hold.
    #[error("Base track count ({0}) exceeds its capacity.")]
    TrackOverflow(u32),
    /// The forced display track index lies outside the display track.
    #[error("Forced display index ({0}) lies outside the display track.")]
    ForcedIndex(u16),
    /// The forced display stage is not a sleep stage, at a slot within the
    /// populated display track.
    #[error("Forced display stage ({0}) is not a sleep stage.")]
    ForcedStage(u16),
}

impl From<EndOfRecord> for FieldError {
    fn from(_: EndOfRecord) -> Self {
        Self::EndOfRecord
    }
}

/// A nightly measure with its rolling average.
///
/// Durations are counted in 30-second epochs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
    pub current: u16,
    pub average: u16,
}

/// A nightly measure with its rolling average and personal best.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankedStat {
    pub current: u16,
    pub average: u16,
    pub best: u16,
}

/// Sleep summary figures computed by the bedside unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NightStats {
    pub awakenings: Stat,
    pub time_in_deep: RankedStat,
    pub time_in_light: Stat,
    pub time_in_rem: RankedStat,
    pub time_in_wake: Stat,
    pub time_to_z: Stat,
    pub total_z: RankedStat,
    pub zq_score: RankedStat,
}

/// Headband identity and radio link history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headband {
    pub id: u32,
    pub impedance: [u8; HEADBAND_IMPEDANCE_SIZE],
    pub packets: [u8; HEADBAND_PACKETS_SIZE],
    pub rssi: [i8; HEADBAND_RSSI_SIZE],
    pub status: [u8; HEADBAND_STATUS_SIZE],
}

impl Default for Headband {
    fn default() -> Self {
        Self {
            id: 0,
            impedance: [0; HEADBAND_IMPEDANCE_SIZE],
            packets: [0; HEADBAND_PACKETS_SIZE],
            rssi: [0; HEADBAND_RSSI_SIZE],
            status: [0; HEADBAND_STATUS_SIZE],
        }
    }
}

/// Every field stored in one record, as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub version: Version,
    /// When the record was written.
    pub written_at: Timestamp,
    /// Checksum stored in the record.
    pub checksum: u32,
    pub state: DeviceState,
    pub airplane_off: Timestamp,
    pub airplane_on: Timestamp,
    pub alarm_changes: [TimeChange; CHANGES_SAVED],
    /// NUL-padded name of the function holding the last failed assert.
    pub assert_function: [u8; ASSERT_NAME_MAX],
    pub assert_line: i32,
    pub factory_reset: Timestamp,
    pub headband: Headband,
    pub hardware_id: u16,
    pub software_id: u16,
    pub rtc_changes: [TimeChange; CHANGES_SAVED],
    pub sensor_life_reset: Timestamp,
    pub sleep_stat_reset: Timestamp,
    /// The first ring of the night, and the latest ring after it.
    pub alarm_ring: [Timestamp; ALARM_RINGS_SAVED],
    pub alarm_snooze: [Timestamp; SNOOZES_SAVED],
    pub alarm_off: Timestamp,
    pub start_of_night: Timestamp,
    pub end_of_night: Timestamp,
    pub stats: NightStats,
    /// Display track slot overridden after voting, or `0` for none.
    pub forced_index: u16,
    pub forced_stage: u16,
    pub hypnogram_start: Timestamp,
    /// User rating of the night, or `0` if not rated.
    pub sleep_rating: u8,
    pub reserved: [u8; 7],
    /// Populated base track samples, one per 30 seconds.
    pub base_track: Vec<SleepStage>,
    /// Raw nibbles stored after the populated base track, up to its capacity.
    ///
    /// Never read as stages. Missing nibbles are written as zero.
    pub base_track_tail: Vec<u8>,
}

/// A decoded record with its derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepRecord {
    raw: RawRecord,
    display_track: Vec<SleepStage>,
    rise_time: Timestamp,
    alarm_set_time: Timestamp,
    pub(crate) is_nap: bool,
    pub(crate) sleep_day: Timestamp,
}

impl SleepRecord {
    /// Build a record from its raw fields, computing the derived fields.
    pub fn new(raw: RawRecord) -> Result<Self, FieldError> {
        let mut display_track = stage::display_track(&raw.base_track);

        if raw.forced_index > 0 {
            let index = usize::from(raw.forced_index);
            if index >= DISPLAY_TRACK_LEN {
                Err(FieldError::ForcedIndex(raw.forced_index))?;
            }

            // Slots past the populated track are ignored, stage included.
            if let Some(slot) = display_track.get_mut(index) {
                *slot = u8::try_from(raw.forced_stage)
                    .ok()
                    .and_then(SleepStage::from_ordinal)
                    .ok_or(FieldError::ForcedStage(raw.forced_stage))?;
            }
        }

        let rise_time = derived::rise_time(raw.hypnogram_start, &display_track);
        let alarm_set_time = derived::alarm_set_time(&raw);

        Ok(Self {
            raw,
            display_track,
            rise_time,
            alarm_set_time,
            is_nap: false,
            sleep_day: None,
        })
    }

    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }

    pub fn into_raw(self) -> RawRecord {
        self.raw
    }

    pub fn written_at(&self) -> Timestamp {
        self.raw.written_at
    }

    pub fn write_reason(&self) -> WriteReason {
        self.raw.state.write_reason
    }

    pub fn start_of_night(&self) -> Timestamp {
        self.raw.start_of_night
    }

    pub fn end_of_night(&self) -> Timestamp {
        self.raw.end_of_night
    }

    /// Time from the start to the end of the night, if both are set.
    pub fn length(&self) -> Option<TimeDelta> {
        Some(self.raw.end_of_night? - self.raw.start_of_night?)
    }

    /// Whether both the start and the end of the night are set.
    pub fn is_complete(&self) -> bool {
        self.raw.start_of_night.is_some() && self.raw.end_of_night.is_some()
    }

    pub fn base_track(&self) -> &[SleepStage] {
        &self.raw.base_track
    }

    pub fn display_track(&self) -> &[SleepStage] {
        &self.display_track
    }

    /// When the sleeper got up: the end of the last 5-minute slot spent
    /// asleep.
    pub fn rise_time(&self) -> Timestamp {
        self.rise_time
    }

    /// The alarm time in effect for this night, placed on the night's date.
    pub fn alarm_set_time(&self) -> Timestamp {
        self.alarm_set_time
    }

    /// Alarm changes, excluding padding entries.
    pub fn alarm_changes(&self) -> impl Iterator<Item = &TimeChange> {
        time::effective_changes(&self.raw.alarm_changes)
    }

    /// Clock changes, excluding padding entries.
    pub fn rtc_changes(&self) -> impl Iterator<Item = &TimeChange> {
        time::effective_changes(&self.raw.rtc_changes)
    }

    pub fn sleep_rating(&self) -> Option<SleepRating> {
        SleepRating::from_ordinal(self.raw.sleep_rating)
    }

    /// Whether this record is a secondary sleep episode on its sleep day.
    ///
    /// Only meaningful after [`crate::episode::classify_naps`].
    pub fn is_nap(&self) -> bool {
        self.is_nap
    }

    /// 6:00 on the morning that opens the 24 hours this night belongs to.
    ///
    /// Only meaningful after [`crate::episode::classify_naps`].
    pub fn sleep_day(&self) -> Timestamp {
        self.sleep_day
    }

    /// Whether the record was written because the user rated the night.
    pub fn is_sleep_rated(&self) -> bool {
        self.raw.state.write_reason == WriteReason::SleepRated
    }

    /// Whether this is the first record written after a watchdog reset.
    pub fn is_reset_record(&self) -> bool {
        const FIRST_RECORD_TIMEOUT: i64 = 10;

        let startup = &self.raw.rtc_changes[0];
        let written = i64::from(time::to_seconds(self.raw.written_at));
        let clock = i64::from(time::to_seconds(startup.value));

        self.raw.state.watchdog_reset
            && self.raw.state.write_reason == WriteReason::CardInsert
            && startup.time.is_none()
            && written > clock
            && written - clock < FIRST_RECORD_TIMEOUT
    }

    pub(crate) fn same_start(&self, other: &Self) -> bool {
        self.raw.start_of_night.is_some() && self.raw.start_of_night == other.raw.start_of_night
    }

    pub(crate) fn same_sleep_day(&self, other: &Self) -> bool {
        self.sleep_day.is_some() && self.sleep_day == other.sleep_day
    }
}
