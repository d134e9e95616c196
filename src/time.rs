//! Time types (§3.1): `TimePoint` (microsecond epoch), `TimePointSec` (second epoch), and
//! `BlockTimestamp` (half-second ticks since the Antelope epoch, 2000-01-01 00:00:00 UTC).

use std::io::Write;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::error::Result;

/// Milliseconds-per-block-timestamp-tick is 500ms; the epoch predates Unix time, so this
/// offset (in whole seconds) is subtracted before converting to Unix-epoch microseconds.
const BLOCK_TIMESTAMP_EPOCH_UNIX_SECONDS: i64 = 946_684_800; // 2000-01-01T00:00:00Z
const BLOCK_TIMESTAMP_INTERVAL_MS: i64 = 500;

/// `TimePoint` (§3.1): signed microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimePoint(pub i64);

impl TimePoint {
    pub const fn from_unix_micros(micros: i64) -> Self {
        TimePoint(micros)
    }

    pub const fn unix_micros(self) -> i64 {
        self.0
    }
}

impl Encode for TimePoint {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_i64(self.0)
    }
}

impl Decode for TimePoint {
    const MIN_SIZE: usize = 8;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(TimePoint(dec.read_i64()?))
    }
}

/// `TimePointSec` (§3.1): unsigned seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimePointSec(pub u32);

impl TimePointSec {
    pub const fn from_unix_secs(secs: u32) -> Self {
        TimePointSec(secs)
    }

    pub const fn unix_secs(self) -> u32 {
        self.0
    }
}

impl Encode for TimePointSec {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u32(self.0)
    }
}

impl Decode for TimePointSec {
    const MIN_SIZE: usize = 4;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(TimePointSec(dec.read_u32()?))
    }
}

/// `BlockTimestamp` (§3.1): unsigned half-seconds since 2000-01-01 00:00:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BlockTimestamp(pub u32);

impl BlockTimestamp {
    pub const fn from_slot(slot: u32) -> Self {
        BlockTimestamp(slot)
    }

    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Builds a `BlockTimestamp` from a Unix epoch microsecond timestamp, truncating to
    /// the nearest half-second tick (mirrors `chain.NewBlockTimestamp` in the reference
    /// fixtures, which is always called with a UTC `time.Time`).
    pub fn from_unix_micros(unix_micros: i64) -> Self {
        let unix_ms = unix_micros.div_euclid(1000);
        let epoch_ms = unix_ms - BLOCK_TIMESTAMP_EPOCH_UNIX_SECONDS * 1000;
        let slot = epoch_ms.div_euclid(BLOCK_TIMESTAMP_INTERVAL_MS);
        BlockTimestamp(slot as u32)
    }

    pub fn unix_micros(self) -> i64 {
        let epoch_ms = self.0 as i64 * BLOCK_TIMESTAMP_INTERVAL_MS;
        (BLOCK_TIMESTAMP_EPOCH_UNIX_SECONDS * 1000 + epoch_ms) * 1000
    }
}

impl Encode for BlockTimestamp {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u32(self.0)
    }
}

impl Decode for BlockTimestamp {
    const MIN_SIZE: usize = 4;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(BlockTimestamp(dec.read_u32()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_point_wire_round_trip() {
        let tp = TimePoint::from_unix_micros(1_700_000_000_123_456);
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&tp).unwrap();
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        let decoded: TimePoint = dec.decode().unwrap();
        assert_eq!(decoded, tp);
    }

    #[test]
    fn time_point_sec_wire_round_trip() {
        let tp = TimePointSec::from_unix_secs(1_700_000_000);
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&tp).unwrap();
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        let decoded: TimePointSec = dec.decode().unwrap();
        assert_eq!(decoded, tp);
    }

    #[test]
    fn block_timestamp_epoch_is_zero_slot() {
        let bt = BlockTimestamp::from_unix_micros(BLOCK_TIMESTAMP_EPOCH_UNIX_SECONDS * 1_000_000);
        assert_eq!(bt.slot(), 0);
    }

    #[test]
    fn block_timestamp_wire_round_trip() {
        let bt = BlockTimestamp::from_slot(756);
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&bt).unwrap();
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        let decoded: BlockTimestamp = dec.decode().unwrap();
        assert_eq!(decoded, bt);
    }
}
