//! The packed device state word and its enumerations.

use tartan_bitfield::bitfield;

use super::{FieldError, Ordinal, ordinal};

/// Why the alarm last rang.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ordinal)]
pub enum AlarmReason {
    RemToNrem = 0,
    NremToRem = 1,
    WakeOnWake = 2,
    /// Rang early to avoid waking the sleeper from deep sleep.
    DeepRising = 3,
    EndOfWakeWindow = 4,
    #[default]
    NoAlarm = 5,
}

/// Clock display format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ordinal)]
pub enum ClockMode {
    #[default]
    TwentyFourHour = 0,
    TwelveHour = 1,
}

/// Wake tone selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ordinal)]
pub enum WakeTone {
    #[default]
    Zen = 0,
    Sine = 1,
    Reveille = 2,
    Neutral = 3,
    Upbeat = 4,
}

/// Why the firmware flushed a record to the card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ordinal)]
pub enum WriteReason {
    #[default]
    TentativeNightEnd = 0,
    NightEnd = 1,
    AlarmOff = 2,
    CardInsert = 3,
    DailyUpdate = 4,
    SleepRated = 5,
}

/// The sleeper's own rating of the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal)]
pub enum SleepRating {
    Terribly = 1,
    Poorly = 2,
    Okay = 3,
    Well = 4,
    Great = 5,
}

bitfield! {
    struct StateWord(u32) {
        [0] airplane_mode,
        [1..4] alarm_reason: u8,
        [4..8] backlight: u8,
        [8] twelve_hour,
        [9] sleep_valid,
        [10..15] snooze_time: u8,
        [15..18] wake_tone: u8,
        [18..24] wake_window: u8,
        [24..27] write_reason: u8,
        [27] smart_wake,
        [28] watchdog_reset,
        [29..32] reserved: u8,
    }
}

/// Device settings and status flags, unpacked from a single 32-bit word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub airplane_mode: bool,
    pub alarm_reason: AlarmReason,
    /// Display backlight level (4 bits).
    pub backlight: u8,
    pub clock_mode: ClockMode,
    pub sleep_valid: bool,
    /// Snooze length in minutes (5 bits).
    pub snooze_time: u8,
    pub wake_tone: WakeTone,
    /// Smart wake window in minutes (6 bits).
    pub wake_window: u8,
    pub write_reason: WriteReason,
    /// Whether the unit chooses when to wake the sleeper.
    pub smart_wake: bool,
    /// Whether a watchdog reset occurred.
    pub watchdog_reset: bool,
    /// Unassigned high bits (3 bits).
    pub reserved: u8,
}

impl DeviceState {
    /// Unpack a stored state word.
    pub fn from_word(r: u32) -> Result<Self, FieldError> {
        let word = StateWord(r);

        Ok(Self {
            airplane_mode: word.airplane_mode(),
            alarm_reason: ordinal(word.alarm_reason())?,
            backlight: word.backlight(),
            clock_mode: if word.twelve_hour() {
                ClockMode::TwelveHour
            } else {
                ClockMode::TwentyFourHour
            },
            sleep_valid: word.sleep_valid(),
            snooze_time: word.snooze_time(),
            wake_tone: ordinal(word.wake_tone())?,
            wake_window: word.wake_window(),
            write_reason: ordinal(word.write_reason())?,
            smart_wake: word.smart_wake(),
            watchdog_reset: word.watchdog_reset(),
            reserved: word.reserved(),
        })
    }

    /// Pack into a state word. Values wider than their field are truncated.
    pub fn to_word(&self) -> u32 {
        let mut word = StateWord(0);

        word.set_airplane_mode(self.airplane_mode);
        word.set_alarm_reason(self.alarm_reason.ordinal() & 0x7);
        word.set_backlight(self.backlight & 0xF);
        word.set_twelve_hour(self.clock_mode == ClockMode::TwelveHour);
        word.set_sleep_valid(self.sleep_valid);
        word.set_snooze_time(self.snooze_time & 0x1F);
        word.set_wake_tone(self.wake_tone.ordinal() & 0x7);
        word.set_wake_window(self.wake_window & 0x3F);
        word.set_write_reason(self.write_reason.ordinal() & 0x7);
        word.set_smart_wake(self.smart_wake);
        word.set_watchdog_reset(self.watchdog_reset);
        word.set_reserved(self.reserved & 0x7);

        word.0
    }
}
