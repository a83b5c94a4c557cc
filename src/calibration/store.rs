//! Persistence of calibration bounds.
//!
//! The store only knows about a 16-byte record; where it lives (a flash
//! sector on the device, RAM in the simulator) is up to the
//! [`CalibrationStorage`] implementation.

use core::fmt;

use super::{CalibrationBounds, CalibrationError, RECORD_LEN};
use crate::config::DEFAULT_CALIBRATION;

/// Failure reported by the storage backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    Read,
    Erase,
    Write,
}

impl fmt::Display for StorageError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Read => f.write_str("storage read failed"),
            Self::Erase => f.write_str("storage erase failed"),
            Self::Write => f.write_str("storage write failed"),
        }
    }
}

/// Why stored bounds could not be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Storage has never been written.
    Blank,
    /// The record decoded to unusable bounds.
    Invalid(CalibrationError),
    /// The backend failed.
    Storage(StorageError),
}

impl fmt::Display for LoadError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("no stored calibration"),
            Self::Invalid(e) => write!(f, "stored calibration invalid: {e}"),
            Self::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl From<StorageError> for LoadError {
    fn from(e: StorageError) -> Self { Self::Storage(e) }
}

/// Backend holding one calibration record.
pub trait CalibrationStorage {
    /// Read the record into `buf`.
    fn read_record(
        &mut self,
        buf: &mut [u8; RECORD_LEN],
    ) -> Result<(), StorageError>;

    /// Replace the record. Must not return before the data is committed.
    fn write_record(
        &mut self,
        record: &[u8; RECORD_LEN],
    ) -> Result<(), StorageError>;
}

impl<T: CalibrationStorage + ?Sized> CalibrationStorage for &mut T {
    fn read_record(
        &mut self,
        buf: &mut [u8; RECORD_LEN],
    ) -> Result<(), StorageError> {
        (**self).read_record(buf)
    }

    fn write_record(
        &mut self,
        record: &[u8; RECORD_LEN],
    ) -> Result<(), StorageError> {
        (**self).write_record(record)
    }
}

/// Loads and saves [`CalibrationBounds`] through a storage backend.
pub struct CalibrationStore<S> {
    storage: S,
}

impl<S: CalibrationStorage> CalibrationStore<S> {
    pub const fn new(storage: S) -> Self { Self { storage } }

    /// Load the stored bounds, or the compiled-in defaults if there are none.
    pub fn load(&mut self) -> CalibrationBounds { self.try_load().unwrap_or(DEFAULT_CALIBRATION) }

    /// Load the stored bounds, reporting why they are unusable.
    pub fn try_load(&mut self) -> Result<CalibrationBounds, LoadError> {
        let mut record = [0u8; RECORD_LEN];
        self.storage.read_record(&mut record)?;
        let bounds = CalibrationBounds::from_record(&record).ok_or(LoadError::Blank)?;
        bounds.validated().map_err(LoadError::Invalid)
    }

    /// Persist `bounds` synchronously.
    pub fn save(
        &mut self,
        bounds: &CalibrationBounds,
    ) -> Result<(), StorageError> {
        self.storage.write_record(&bounds.to_record())
    }

    /// Give the backend back.
    pub fn into_inner(self) -> S { self.storage }
}

/// Volatile storage that starts out erased.
///
/// Used by the simulator, which has nowhere to persist to, and by tests.
#[derive(Clone, Debug)]
pub struct RamStorage {
    record: [u8; RECORD_LEN],
}

impl RamStorage {
    pub const fn new() -> Self {
        Self {
            record: [0xFF; RECORD_LEN],
        }
    }

    /// Storage pre-loaded with an arbitrary record.
    pub const fn with_record(record: [u8; RECORD_LEN]) -> Self { Self { record } }

    pub const fn record(&self) -> &[u8; RECORD_LEN] { &self.record }
}

impl Default for RamStorage {
    fn default() -> Self { Self::new() }
}

impl CalibrationStorage for RamStorage {
    fn read_record(
        &mut self,
        buf: &mut [u8; RECORD_LEN],
    ) -> Result<(), StorageError> {
        buf.copy_from_slice(&self.record);
        Ok(())
    }

    fn write_record(
        &mut self,
        record: &[u8; RECORD_LEN],
    ) -> Result<(), StorageError> {
        self.record = *record;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Axis;

    struct FailingStorage;

    impl CalibrationStorage for FailingStorage {
        fn read_record(
            &mut self,
            _buf: &mut [u8; RECORD_LEN],
        ) -> Result<(), StorageError> {
            Err(StorageError::Read)
        }

        fn write_record(
            &mut self,
            _record: &[u8; RECORD_LEN],
        ) -> Result<(), StorageError> {
            Err(StorageError::Write)
        }
    }

    #[test]
    fn test_blank_storage_loads_defaults() {
        let mut store = CalibrationStore::new(RamStorage::new());
        assert_eq!(store.try_load(), Err(LoadError::Blank));
        assert_eq!(store.load(), DEFAULT_CALIBRATION);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let bounds = CalibrationBounds::new(212, 3871, 298, 3790);
        let mut store = CalibrationStore::new(RamStorage::new());
        store.save(&bounds).unwrap();
        assert_eq!(store.load(), bounds);
    }

    #[test]
    fn test_store_survives_reopen() {
        let bounds = CalibrationBounds::new(400, 3900, 420, 3700);
        let mut store = CalibrationStore::new(RamStorage::new());
        store.save(&bounds).unwrap();

        let mut reopened = CalibrationStore::new(store.into_inner());
        assert_eq!(reopened.try_load(), Ok(bounds));
    }

    #[test]
    fn test_degenerate_record_falls_back_to_defaults() {
        let record = CalibrationBounds::new(350, 3950, 2000, 2000).to_record();
        let mut store = CalibrationStore::new(RamStorage::with_record(record));
        assert_eq!(store.try_load(), Err(LoadError::Invalid(CalibrationError::Degenerate(Axis::Y))));
        assert_eq!(store.load(), DEFAULT_CALIBRATION);
    }

    #[test]
    fn test_swapped_record_is_corrected_on_load() {
        let record = CalibrationBounds::new(3950, 350, 350, 3850).to_record();
        let mut store = CalibrationStore::new(RamStorage::with_record(record));
        assert_eq!(store.load(), CalibrationBounds::new(350, 3950, 350, 3850));
    }

    #[test]
    fn test_read_failure_falls_back_to_defaults() {
        let mut store = CalibrationStore::new(FailingStorage);
        assert_eq!(store.try_load(), Err(LoadError::Storage(StorageError::Read)));
        assert_eq!(store.load(), DEFAULT_CALIBRATION);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut store = CalibrationStore::new(FailingStorage);
        assert_eq!(store.save(&DEFAULT_CALIBRATION), Err(StorageError::Write));
    }

    #[test]
    fn test_store_over_borrowed_storage() {
        let mut storage = RamStorage::new();
        CalibrationStore::new(&mut storage).save(&DEFAULT_CALIBRATION).unwrap();
        assert_eq!(storage.record(), &DEFAULT_CALIBRATION.to_record());
    }
}
