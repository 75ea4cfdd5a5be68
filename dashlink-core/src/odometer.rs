//! Odometer persistence
//!
//! The host sends a running distance counter with every telemetry record.
//! Writing it to flash on every record would wear the flash out in hours,
//! so a new value is persisted only after it has advanced by the configured
//! delta, or when it goes backwards (the host reset its counter).
//!
//! The record is postcard encoded and carries a guard word. Anything that
//! fails to decode or carries the wrong guard restores as zero.

use dashlink_hal::{FlashError, FlashStorage, StorageKey};
use serde::{Deserialize, Serialize};

/// Guard word stored with every record ("ODO1")
pub const ODOMETER_GUARD: u32 = 0x4F44_4F31;

/// Upper bound of an encoded record (two varint u32s)
pub const MAX_ODOMETER_RECORD_SIZE: usize = 16;

/// Odometer persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OdometerError {
    /// Flash operation failed
    Flash(FlashError),
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Guard word did not match
    GuardMismatch,
}

impl From<FlashError> for OdometerError {
    fn from(e: FlashError) -> Self {
        OdometerError::Flash(e)
    }
}

/// Persisted odometer value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OdometerRecord {
    pub guard: u32,
    pub distance: u32,
}

impl OdometerRecord {
    pub const fn new(distance: u32) -> Self {
        Self {
            guard: ODOMETER_GUARD,
            distance,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.guard == ODOMETER_GUARD
    }

    /// Encode into `buffer`, returning the used prefix
    pub fn encode<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], OdometerError> {
        postcard::to_slice(self, buffer).map_err(|_| OdometerError::Serialize)
    }

    /// Decode and check the guard
    pub fn decode(bytes: &[u8]) -> Result<Self, OdometerError> {
        let record: OdometerRecord =
            postcard::from_bytes(bytes).map_err(|_| OdometerError::Deserialize)?;
        if !record.is_valid() {
            return Err(OdometerError::GuardMismatch);
        }
        Ok(record)
    }
}

/// Decides when a new counter value is worth writing
#[derive(Debug, Clone, Copy)]
pub struct OdometerTracker {
    persisted: u32,
    persist_delta: u32,
}

impl OdometerTracker {
    pub const fn new(persist_delta: u32) -> Self {
        Self {
            persisted: 0,
            persist_delta,
        }
    }

    /// Set the baseline to a value restored from flash
    pub fn restore(&mut self, distance: u32) {
        self.persisted = distance;
    }

    /// Last value known to be in flash
    pub fn persisted(&self) -> u32 {
        self.persisted
    }

    /// Check a new counter value
    ///
    /// Returns the record to write when the value is due for persistence.
    /// The baseline only moves on [`commit`](Self::commit), so a failed
    /// write is retried by the next due value.
    pub fn observe(&self, distance: u32) -> Option<OdometerRecord> {
        let due = distance < self.persisted
            || distance - self.persisted >= self.persist_delta.max(1);
        due.then(|| OdometerRecord::new(distance))
    }

    /// Record a successful write
    pub fn commit(&mut self, record: &OdometerRecord) {
        self.persisted = record.distance;
    }
}

/// Load the odometer record from flash
pub async fn load_odometer<S: FlashStorage>(storage: &mut S) -> Result<OdometerRecord, OdometerError> {
    let mut buffer = [0u8; MAX_ODOMETER_RECORD_SIZE];
    let len = storage.read(StorageKey::Odometer, &mut buffer).await?;
    OdometerRecord::decode(&buffer[..len])
}

/// Write the odometer record to flash
pub async fn store_odometer<S: FlashStorage>(
    storage: &mut S,
    record: &OdometerRecord,
) -> Result<(), OdometerError> {
    let mut buffer = [0u8; MAX_ODOMETER_RECORD_SIZE];
    let bytes = record.encode(&mut buffer)?;
    storage.write(StorageKey::Odometer, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemStorage;
    use embassy_futures::block_on;

    #[test]
    fn test_not_due_below_delta() {
        let tracker = OdometerTracker::new(10);
        assert_eq!(tracker.observe(0), None);
        assert_eq!(tracker.observe(9), None);
        assert_eq!(tracker.observe(10), Some(OdometerRecord::new(10)));
    }

    #[test]
    fn test_reset_is_due() {
        let mut tracker = OdometerTracker::new(10);
        tracker.restore(500);
        assert_eq!(tracker.observe(3), Some(OdometerRecord::new(3)));
    }

    #[test]
    fn test_baseline_moves_on_commit_only() {
        let mut tracker = OdometerTracker::new(10);
        let record = tracker.observe(25).unwrap();
        assert_eq!(tracker.persisted(), 0);
        tracker.commit(&record);
        assert_eq!(tracker.persisted(), 25);
        assert_eq!(tracker.observe(30), None);
    }

    #[test]
    fn test_store_then_load() {
        let mut storage = MemStorage::default();
        block_on(store_odometer(&mut storage, &OdometerRecord::new(123_456))).unwrap();
        let record = block_on(load_odometer(&mut storage)).unwrap();
        assert_eq!(record.distance, 123_456);
    }

    #[test]
    fn test_missing_record() {
        let mut storage = MemStorage::default();
        assert_eq!(
            block_on(load_odometer(&mut storage)),
            Err(OdometerError::Flash(FlashError::NotFound))
        );
    }

    #[test]
    fn test_guard_mismatch() {
        let mut buffer = [0u8; MAX_ODOMETER_RECORD_SIZE];
        let bad = OdometerRecord {
            guard: 0xDEAD_BEEF,
            distance: 5,
        };
        let bytes = bad.encode(&mut buffer).unwrap();
        assert_eq!(OdometerRecord::decode(bytes), Err(OdometerError::GuardMismatch));
    }

    #[test]
    fn test_garbage_does_not_decode() {
        assert!(OdometerRecord::decode(&[]).is_err());
        assert!(OdometerRecord::decode(&[0xFF; 3]).is_err());
    }
}
