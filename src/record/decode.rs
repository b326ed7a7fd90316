//! Field layout of a record, read in wire order.

use alloc::vec::Vec;

use crate::sans::{
    cursor::Cursor,
    header::{HEADER_SIZE, Version},
};

use super::{
    ALARM_RINGS_SAVED, BASE_TRACK_LEN, CHANGES_SAVED, DeviceState, FieldError, Headband,
    NightStats, RankedStat, RawRecord, SNOOZES_SAVED, SleepStage, Stat, TimeChange, Timestamp,
    ordinal, time::from_seconds,
};

/// Decode the fields of a whole record, header included.
///
/// The header and checksum are not validated here; see
/// [`crate::sans::body::Body`].
pub fn decode(version: Version, r: &[u8]) -> Result<RawRecord, FieldError> {
    match version {
        Version::V22 => decode_v22(&mut Cursor::new(r)),
    }
}

fn decode_v22(c: &mut Cursor) -> Result<RawRecord, FieldError> {
    c.skip(HEADER_SIZE)?;

    let written_at = timestamp(c)?;
    let checksum = c.u32()?;
    let state = DeviceState::from_word(c.u32()?)?;
    let airplane_off = timestamp(c)?;
    let airplane_on = timestamp(c)?;
    let alarm_changes = changes(c)?;
    let assert_function = c.take()?;
    let assert_line = c.i32()?;
    let factory_reset = timestamp(c)?;

    let headband = Headband {
        id: c.u32()?,
        impedance: c.take()?,
        packets: c.take()?,
        rssi: c.take::<{ super::HEADBAND_RSSI_SIZE }>()?.map(|b| b as i8),
        status: c.take()?,
    };

    let hardware_id = c.u16()?;
    let software_id = c.u16()?;
    let rtc_changes = changes(c)?;
    let sensor_life_reset = timestamp(c)?;
    let sleep_stat_reset = timestamp(c)?;
    let alarm_ring = alarm_ring(c)?;

    let mut alarm_snooze = [None; SNOOZES_SAVED];
    for snooze in &mut alarm_snooze {
        *snooze = timestamp(c)?;
    }

    let alarm_off = timestamp(c)?;
    let awakenings = stat(c)?;
    let end_of_night = timestamp(c)?;
    let start_of_night = timestamp(c)?;

    let stats = NightStats {
        awakenings,
        time_in_deep: ranked_stat(c)?,
        time_in_light: stat(c)?,
        time_in_rem: ranked_stat(c)?,
        time_in_wake: stat(c)?,
        time_to_z: stat(c)?,
        total_z: ranked_stat(c)?,
        zq_score: ranked_stat(c)?,
    };

    let forced_index = c.u16()?;
    let forced_stage = c.u16()?;
    let hypnogram_start = timestamp(c)?;
    let sleep_rating = c.u8()?;
    let reserved = c.take()?;
    let (base_track, base_track_tail) = base_track(c)?;

    Ok(RawRecord {
        version: Version::V22,
        written_at,
        checksum,
        state,
        airplane_off,
        airplane_on,
        alarm_changes,
        assert_function,
        assert_line,
        factory_reset,
        headband,
        hardware_id,
        software_id,
        rtc_changes,
        sensor_life_reset,
        sleep_stat_reset,
        alarm_ring,
        alarm_snooze,
        alarm_off,
        start_of_night,
        end_of_night,
        stats,
        forced_index,
        forced_stage,
        hypnogram_start,
        sleep_rating,
        reserved,
        base_track,
        base_track_tail,
    })
}

fn timestamp(c: &mut Cursor) -> Result<Timestamp, FieldError> {
    Ok(from_seconds(c.u32()?))
}

/// Read a list of changes, stored as all change times followed by all values.
fn changes(c: &mut Cursor) -> Result<[TimeChange; CHANGES_SAVED], FieldError> {
    let mut changes = [TimeChange::default(); CHANGES_SAVED];

    for change in &mut changes {
        change.time = timestamp(c)?;
    }
    for change in &mut changes {
        change.value = timestamp(c)?;
    }

    Ok(changes)
}

/// Keep the first ring of the night, and the latest set ring after it.
fn alarm_ring(c: &mut Cursor) -> Result<[Timestamp; 2], FieldError> {
    let first = timestamp(c)?;
    let mut latest = None;

    for _ in 1..ALARM_RINGS_SAVED {
        if let Some(ring) = timestamp(c)? {
            latest = Some(ring);
        }
    }

    Ok([first, latest])
}

fn stat(c: &mut Cursor) -> Result<Stat, FieldError> {
    Ok(Stat {
        current: c.u16()?,
        average: c.u16()?,
    })
}

fn ranked_stat(c: &mut Cursor) -> Result<RankedStat, FieldError> {
    Ok(RankedStat {
        current: c.u16()?,
        average: c.u16()?,
        best: c.u16()?,
    })
}

/// Read the base track, packed two samples per byte, low nibble first.
///
/// Returns the populated samples, and the raw nibbles after them.
fn base_track(c: &mut Cursor) -> Result<(Vec<SleepStage>, Vec<u8>), FieldError> {
    let count = c.u32()?;
    let populated = usize::try_from(count)
        .ok()
        .filter(|n| *n <= BASE_TRACK_LEN)
        .ok_or(FieldError::TrackOverflow(count))?;

    let packed: [u8; BASE_TRACK_LEN / 2] = c.take()?;
    let mut nibbles = packed.iter().flat_map(|b| [b & 0xF, b >> 4]);

    let stages = nibbles
        .by_ref()
        .take(populated)
        .map(ordinal)
        .collect::<Result<_, _>>()?;

    Ok((stages, nibbles.collect()))
}
