//! Field layout of a record, written in wire order.

use alloc::vec::Vec;

use zerocopy::IntoBytes;

use crate::sans::{
    body::{CHECKSUM_OFFSET, CHECKSUM_SIZE, checksum},
    cursor::Writer,
    header::RecordHeader,
};

use super::{BASE_TRACK_LEN, Ordinal, RankedStat, RawRecord, Stat, TimeChange, Timestamp, time};

impl RawRecord {
    /// Encode into a whole record, header included.
    ///
    /// The stored checksum is recomputed over the written bytes, so
    /// [`RawRecord::checksum`] is ignored. Base track samples past the track's
    /// capacity are dropped. The
    /// [`base_track_tail`](RawRecord::base_track_tail) fills the rest of the
    /// track, and any space after it is written as zero.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::with_capacity(self.version.size());

        w.put(RecordHeader::new(self.version).as_bytes());
        timestamp(&mut w, self.written_at);
        w.put(&[0; CHECKSUM_SIZE]);
        w.u32(self.state.to_word());
        timestamp(&mut w, self.airplane_off);
        timestamp(&mut w, self.airplane_on);
        changes(&mut w, &self.alarm_changes);
        w.put(&self.assert_function);
        w.i32(self.assert_line);
        timestamp(&mut w, self.factory_reset);

        let headband = &self.headband;
        w.u32(headband.id);
        w.put(&headband.impedance);
        w.put(&headband.packets);
        for rssi in headband.rssi {
            w.i8(rssi);
        }
        w.put(&headband.status);

        w.u16(self.hardware_id);
        w.u16(self.software_id);
        changes(&mut w, &self.rtc_changes);
        timestamp(&mut w, self.sensor_life_reset);
        timestamp(&mut w, self.sleep_stat_reset);
        for ring in self.alarm_ring {
            timestamp(&mut w, ring);
        }
        for snooze in self.alarm_snooze {
            timestamp(&mut w, snooze);
        }
        timestamp(&mut w, self.alarm_off);

        let stats = &self.stats;
        stat(&mut w, stats.awakenings);
        timestamp(&mut w, self.end_of_night);
        timestamp(&mut w, self.start_of_night);
        ranked_stat(&mut w, stats.time_in_deep);
        stat(&mut w, stats.time_in_light);
        ranked_stat(&mut w, stats.time_in_rem);
        stat(&mut w, stats.time_in_wake);
        stat(&mut w, stats.time_to_z);
        ranked_stat(&mut w, stats.total_z);
        ranked_stat(&mut w, stats.zq_score);

        w.u16(self.forced_index);
        w.u16(self.forced_stage);
        timestamp(&mut w, self.hypnogram_start);
        w.u8(self.sleep_rating);
        w.put(&self.reserved);

        let populated = self.base_track.len().min(BASE_TRACK_LEN);
        // Capacity is far below `u32::MAX`.
        w.u32(populated as u32);

        let stages = self.base_track.iter().take(populated).map(|s| s.ordinal());
        let nibbles = stages.chain(self.base_track_tail.iter().copied());

        let mut packed = [0u8; BASE_TRACK_LEN / 2];
        for (i, nibble) in nibbles.take(BASE_TRACK_LEN).enumerate() {
            packed[i / 2] |= (nibble & 0xF) << (4 * (i % 2));
        }
        w.put(&packed);

        let calculated = u32::from(checksum(w.as_slice()));
        w.patch(CHECKSUM_OFFSET, &calculated.to_le_bytes());

        w.into_inner()
    }
}

fn timestamp(w: &mut Writer, t: Timestamp) {
    w.u32(time::to_seconds(t));
}

fn changes(w: &mut Writer, changes: &[TimeChange]) {
    for change in changes {
        timestamp(w, change.time);
    }
    for change in changes {
        timestamp(w, change.value);
    }
}

fn stat(w: &mut Writer, s: Stat) {
    w.u16(s.current);
    w.u16(s.average);
}

fn ranked_stat(w: &mut Writer, s: RankedStat) {
    w.u16(s.current);
    w.u16(s.average);
    w.u16(s.best);
}
