//! Timestamps as stored by the bedside unit.

use chrono::{DateTime, Utc};

/// A UTC instant, or `None` where the record stores zero.
///
/// `None` orders before every set instant, and equal to itself.
pub type Timestamp = Option<DateTime<Utc>>;

/// Convert stored seconds since the epoch, where zero means unset.
pub fn from_seconds(seconds: u32) -> Timestamp {
    if seconds == 0 {
        None
    } else {
        DateTime::from_timestamp(i64::from(seconds), 0)
    }
}

/// Convert to stored seconds since the epoch.
///
/// Unset instants, and instants the field cannot hold, are stored as zero.
pub fn to_seconds(timestamp: Timestamp) -> u32 {
    timestamp
        .and_then(|t| u32::try_from(t.timestamp()).ok())
        .unwrap_or(0)
}

/// A change to the alarm or the real-time clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeChange {
    /// When the change was made. Unset for the value in force at startup.
    pub time: Timestamp,
    /// The value set. Unset for an alarm that was switched off.
    pub value: Timestamp,
}

impl TimeChange {
    pub fn new(time: Timestamp, value: Timestamp) -> Self {
        Self { time, value }
    }

    /// Whether this is the value in force at startup.
    pub fn is_startup(&self) -> bool {
        self.time.is_none()
    }
}

/// Iterate over the changes in a saved list, stopping at padding.
///
/// Only the first entry may carry an unset change time; an unset time in any
/// later entry marks the end of the list.
pub fn effective_changes(changes: &[TimeChange]) -> impl Iterator<Item = &TimeChange> {
    changes
        .iter()
        .enumerate()
        .take_while(|(i, c)| *i == 0 || c.time.is_some())
        .map(|(_, c)| c)
}
