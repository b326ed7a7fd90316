mod support;

use chrono::TimeDelta;
use nightcap::{
    record::{
        AlarmReason, ClockMode, DeviceState, FieldError, SleepRating, SleepRecord, SleepStage,
        TimeChange, WakeTone, WriteReason, decode::decode,
    },
    sans::{
        body::{checksum, stored_checksum},
        check::crc16,
        header::Version,
    },
};
use support::{at, night, patch, sleep_record};

use SleepStage::{Deep, Deep2, Light, Rem, Undefined, Wake};

#[test]
fn crc_check_value() {
    assert_eq!(crc16(b"123456789"), 0x31C3);
    assert_eq!(crc16(&[]), 0);
}

#[test]
fn encoded_checksum_matches() {
    let bytes = night("2011-03-04T23:00:00Z", 450).encode();

    assert_eq!(bytes.len(), Version::V22.size());
    assert_eq!(&bytes[..8], b"SLEEP\0\x16\x00");
    assert_eq!(stored_checksum(&bytes), Ok(u32::from(checksum(&bytes))));

    // The stored field itself never feeds the checksum.
    let mut altered = bytes.clone();
    altered[12..16].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(checksum(&altered), checksum(&bytes));
}

#[test]
fn decode_encode_every_field() {
    let mut raw = night("2011-03-04T23:00:00Z", 450);

    raw.state = DeviceState {
        airplane_mode: true,
        alarm_reason: AlarmReason::DeepRising,
        backlight: 9,
        clock_mode: ClockMode::TwelveHour,
        sleep_valid: true,
        snooze_time: 9,
        wake_tone: WakeTone::Reveille,
        wake_window: 30,
        write_reason: WriteReason::AlarmOff,
        smart_wake: true,
        watchdog_reset: false,
        reserved: 5,
    };
    raw.airplane_off = Some(at("2011-03-04T22:30:00Z"));
    raw.alarm_changes[0] = TimeChange::new(None, Some(at("2011-01-01T06:30:00Z")));
    raw.alarm_changes[1] = TimeChange::new(
        Some(at("2011-03-04T22:55:00Z")),
        Some(at("2011-03-04T06:45:00Z")),
    );
    raw.assert_function[..8].copy_from_slice(b"rtc_tick");
    raw.assert_line = -412;
    raw.factory_reset = Some(at("2010-11-20T10:00:00Z"));
    raw.headband.id = 0x00C0_FFEE;
    raw.headband.impedance[3] = 200;
    raw.headband.packets[143] = 17;
    raw.headband.rssi[0] = -71;
    raw.headband.status[35] = 0x80;
    raw.hardware_id = 3;
    raw.software_id = 263;
    raw.rtc_changes[0] = TimeChange::new(None, Some(at("2011-03-01T12:00:00Z")));
    raw.sensor_life_reset = Some(at("2011-02-01T08:00:00Z"));
    raw.sleep_stat_reset = Some(at("2011-02-02T08:00:00Z"));
    raw.alarm_ring = [
        Some(at("2011-03-05T06:40:00Z")),
        Some(at("2011-03-05T06:49:00Z")),
    ];
    raw.alarm_snooze[0] = Some(at("2011-03-05T06:41:00Z"));
    raw.alarm_snooze[8] = Some(at("2011-03-05T06:48:00Z"));
    raw.alarm_off = Some(at("2011-03-05T06:50:00Z"));
    raw.stats.awakenings.current = 3;
    raw.stats.time_in_deep.best = 140;
    raw.stats.time_in_light.average = 400;
    raw.stats.time_in_rem.current = 220;
    raw.stats.time_in_wake.current = 30;
    raw.stats.time_to_z.average = 28;
    raw.stats.total_z.best = 1000;
    raw.stats.zq_score.current = 97;
    raw.forced_index = 4;
    raw.forced_stage = 1;
    raw.sleep_rating = 4;
    raw.reserved = [1, 2, 3, 4, 5, 6, 7];
    raw.base_track[0] = Undefined;
    raw.base_track[1] = Deep2;
    raw.base_track[898] = Rem;
    raw.base_track.push(Wake);
    raw.base_track_tail = vec![0; 1920 - 901];
    raw.base_track_tail[0] = 0xF;

    let bytes = raw.encode();
    let decoded = decode(Version::V22, &bytes).unwrap();

    raw.checksum = u32::from(checksum(&bytes));
    assert_eq!(decoded, raw);
    assert_eq!(decoded.encode(), bytes);
}

#[test]
fn reencode_keeps_bytes_past_populated_track() {
    let mut bytes = night("2011-03-04T23:00:00Z", 450).encode();
    // 900 populated samples fill the first 450 packed bytes.
    patch(&mut bytes, 720 + 600, &[0x93]);
    patch(&mut bytes, 720 + 959, &[0xE0]);

    let raw = decode(Version::V22, &bytes).unwrap();
    assert_eq!(raw.base_track.len(), 900);
    assert_eq!(raw.base_track_tail.len(), 1920 - 900);

    assert_eq!(raw.encode(), bytes);
}

#[test]
fn reencode_keeps_odd_count_high_nibble() {
    let mut raw = night("2011-03-04T23:00:00Z", 450);
    raw.base_track.truncate(899);
    let mut bytes = raw.encode();
    // High nibble of the last populated byte lies past the count.
    patch(&mut bytes, 720 + 449, &[0x73]);

    let raw = decode(Version::V22, &bytes).unwrap();
    assert_eq!(raw.base_track.last(), Some(&Light));
    assert_eq!(raw.base_track_tail.first(), Some(&7));

    assert_eq!(raw.encode(), bytes);
}

#[test]
fn decode_keeps_first_and_latest_alarm_ring() {
    let mut bytes = night("2011-03-04T23:00:00Z", 450).encode();
    let first = at("2011-03-05T06:30:00Z").timestamp() as u32;

    // First ring set, second cleared.
    bytes[604..608].copy_from_slice(&first.to_le_bytes());
    bytes[608..612].copy_from_slice(&0u32.to_le_bytes());

    let raw = decode(Version::V22, &bytes).unwrap();
    assert_eq!(raw.alarm_ring, [Some(at("2011-03-05T06:30:00Z")), None]);
}

#[test]
fn decode_rejects_overlong_base_track() {
    let mut bytes = night("2011-03-04T23:00:00Z", 450).encode();
    bytes[716..720].copy_from_slice(&1921u32.to_le_bytes());

    assert_eq!(
        decode(Version::V22, &bytes),
        Err(FieldError::TrackOverflow(1921))
    );
}

#[test]
fn decode_short_record() {
    let bytes = night("2011-03-04T23:00:00Z", 450).encode();

    assert_eq!(
        decode(Version::V22, &bytes[..1000]),
        Err(FieldError::EndOfRecord)
    );
}

#[test]
fn state_word_bits() {
    let word = 1
        | 3 << 1
        | 9 << 4
        | 1 << 8
        | 9 << 10
        | 2 << 15
        | 30 << 18
        | 5 << 24
        | 1 << 27
        | 1 << 28;

    let state = DeviceState::from_word(word).unwrap();

    assert!(state.airplane_mode);
    assert_eq!(state.alarm_reason, AlarmReason::DeepRising);
    assert_eq!(state.backlight, 9);
    assert_eq!(state.clock_mode, ClockMode::TwelveHour);
    assert!(!state.sleep_valid);
    assert_eq!(state.snooze_time, 9);
    assert_eq!(state.wake_tone, WakeTone::Reveille);
    assert_eq!(state.wake_window, 30);
    assert_eq!(state.write_reason, WriteReason::SleepRated);
    assert!(state.smart_wake);
    assert!(state.watchdog_reset);
    assert_eq!(state.reserved, 0);

    assert_eq!(state.to_word(), word);
}

#[test]
fn state_word_unknown_alarm_reason() {
    assert_eq!(
        DeviceState::from_word(6 << 1),
        Err(FieldError::Ordinal {
            kind: "AlarmReason",
            value: 6,
        })
    );
}

#[test]
fn vote_wake_overrides() {
    let window = [Wake, Rem, Rem, Light, Light, Light, Deep, Deep, Deep, Deep];
    assert_eq!(SleepStage::vote(&window), Wake);
}

#[test]
fn vote_tie_prefers_rem() {
    let window = [
        Rem, Rem, Light, Light, Deep, Deep, Undefined, Undefined, Undefined, Undefined,
    ];
    assert_eq!(SleepStage::vote(&window), Rem);
}

#[test]
fn vote_light_over_deep_on_tie() {
    let window = [Rem, Light, Light, Light, Deep, Deep, Deep, Undefined, Undefined, Undefined];
    assert_eq!(SleepStage::vote(&window), Light);
}

#[test]
fn vote_counts_second_deep_as_deep() {
    let window = [Light, Light, Light, Deep, Deep, Deep2, Deep2, Rem, Rem, Rem];
    assert_eq!(SleepStage::vote(&window), Deep);
}

#[test]
fn vote_all_undefined() {
    assert_eq!(SleepStage::vote(&[Undefined; 10]), Undefined);
}

#[test]
fn display_track_drops_partial_window() {
    let mut raw = night("2011-03-04T23:00:00Z", 0);
    raw.base_track = [vec![Deep; 10], vec![Wake; 10], vec![Rem; 5]].concat();

    let record = sleep_record(raw);
    assert_eq!(record.display_track(), [Deep, Wake]);
}

#[test]
fn forced_stage_overrides_display_slot() {
    let mut raw = night("2011-03-04T23:00:00Z", 20);
    raw.forced_index = 2;
    raw.forced_stage = 1;

    let record = sleep_record(raw.clone());
    assert_eq!(record.display_track(), [Light, Light, Wake, Light]);

    // Slots past the populated track are left alone.
    raw.forced_index = 10;
    let record = sleep_record(raw.clone());
    assert_eq!(record.display_track(), [Light; 4]);

    // Their stage is never shown, so it goes unchecked.
    raw.forced_stage = 7;
    let record = sleep_record(raw.clone());
    assert_eq!(record.display_track(), [Light; 4]);

    raw.forced_index = 3;
    assert_eq!(SleepRecord::new(raw).err(), Some(FieldError::ForcedStage(7)));
}

#[test]
fn rise_time_after_last_sleep_slot() {
    let mut raw = night("2011-03-04T23:00:00Z", 45);
    raw.base_track = [vec![Light; 60], vec![Wake; 30]].concat();

    let record = sleep_record(raw);
    assert_eq!(record.rise_time(), Some(at("2011-03-04T23:30:00Z")));
}

#[test]
fn rise_time_unset_without_sleep() {
    let mut raw = night("2011-03-04T23:00:00Z", 30);
    raw.base_track = vec![Wake; 60];
    assert_eq!(sleep_record(raw).rise_time(), None);

    let mut raw = night("2011-03-04T23:00:00Z", 30);
    raw.hypnogram_start = None;
    assert_eq!(sleep_record(raw).rise_time(), None);
}

#[test]
fn alarm_set_on_following_morning() {
    let mut raw = night("2011-03-04T23:00:00Z", 510);
    raw.alarm_changes[0] = TimeChange::new(None, Some(at("2011-01-01T07:00:00Z")));

    let record = sleep_record(raw);
    assert_eq!(record.end_of_night(), Some(at("2011-03-05T07:30:00Z")));
    assert_eq!(record.alarm_set_time(), Some(at("2011-03-05T07:00:00Z")));
}

#[test]
fn alarm_set_on_same_evening() {
    let mut raw = night("2011-03-04T13:00:00Z", 90);
    raw.alarm_changes[0] = TimeChange::new(None, Some(at("2011-01-01T14:15:00Z")));

    let record = sleep_record(raw);
    assert_eq!(record.alarm_set_time(), Some(at("2011-03-04T14:15:00Z")));
}

#[test]
fn alarm_set_ignores_changes_after_ring() {
    let mut raw = night("2011-03-04T23:00:00Z", 510);
    raw.alarm_changes[0] = TimeChange::new(None, Some(at("2011-01-01T07:00:00Z")));
    raw.alarm_changes[1] = TimeChange::new(
        Some(at("2011-03-05T06:50:00Z")),
        Some(at("2011-03-05T08:00:00Z")),
    );

    let record = sleep_record(raw.clone());
    assert_eq!(record.alarm_set_time(), Some(at("2011-03-05T08:00:00Z")));

    raw.alarm_ring[0] = Some(at("2011-03-05T06:45:00Z"));
    let record = sleep_record(raw);
    assert_eq!(record.alarm_set_time(), Some(at("2011-03-05T07:00:00Z")));
}

#[test]
fn alarm_set_stops_at_padding() {
    let mut raw = night("2011-03-04T23:00:00Z", 510);
    raw.alarm_changes[0] = TimeChange::new(None, Some(at("2011-01-01T07:00:00Z")));
    raw.alarm_changes[1] = TimeChange::new(None, Some(at("2011-01-01T05:00:00Z")));
    raw.alarm_changes[2] = TimeChange::new(
        Some(at("2011-03-04T22:00:00Z")),
        Some(at("2011-01-01T06:00:00Z")),
    );

    let record = sleep_record(raw);
    assert_eq!(record.alarm_changes().count(), 1);
    assert_eq!(record.alarm_set_time(), Some(at("2011-03-05T07:00:00Z")));
}

#[test]
fn alarm_set_unset_when_switched_off() {
    let mut raw = night("2011-03-04T23:00:00Z", 510);
    raw.alarm_changes[0] = TimeChange::new(None, Some(at("2011-01-01T07:00:00Z")));
    raw.alarm_changes[1] = TimeChange::new(Some(at("2011-03-04T22:00:00Z")), None);
    assert_eq!(sleep_record(raw).alarm_set_time(), None);

    let mut raw = night("2011-03-04T23:00:00Z", 510);
    raw.end_of_night = None;
    raw.alarm_changes[0] = TimeChange::new(None, Some(at("2011-01-01T07:00:00Z")));
    assert_eq!(sleep_record(raw).alarm_set_time(), None);
}

#[test]
fn reset_record_follows_clock_set() {
    let mut raw = night("2011-03-04T23:00:00Z", 30);
    raw.state.watchdog_reset = true;
    raw.state.write_reason = WriteReason::CardInsert;
    raw.rtc_changes[0] = TimeChange::new(None, Some(at("2011-03-05T12:00:00Z")));
    raw.written_at = Some(at("2011-03-05T12:00:05Z"));

    assert!(sleep_record(raw.clone()).is_reset_record());

    raw.written_at = Some(at("2011-03-05T12:00:10Z"));
    assert!(!sleep_record(raw.clone()).is_reset_record());

    raw.written_at = Some(at("2011-03-05T12:00:05Z"));
    raw.state.write_reason = WriteReason::NightEnd;
    assert!(!sleep_record(raw).is_reset_record());
}

#[test]
fn sleep_rating_and_length() {
    let mut raw = night("2011-03-04T23:00:00Z", 450);
    assert_eq!(sleep_record(raw.clone()).sleep_rating(), None);

    raw.sleep_rating = 4;
    raw.state.write_reason = WriteReason::SleepRated;
    let record = sleep_record(raw);

    assert_eq!(record.sleep_rating(), Some(SleepRating::Well));
    assert!(record.is_sleep_rated());
    assert_eq!(record.length(), Some(TimeDelta::minutes(450)));
}
