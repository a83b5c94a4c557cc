//! Calibration record in the last 4K sector of the on-board flash.
//!
//! `memory.x` shortens the program region by one sector so the record is
//! never overwritten by a reflash of a smaller image.

use embassy_rp::flash::{Blocking, ERASE_SIZE, Flash};
use embassy_rp::peripherals::FLASH;
use touch_panel::calibration::{RECORD_LEN, StorageError};
use touch_panel::CalibrationStorage;

/// Flash size of the Pico 2.
pub const FLASH_SIZE: usize = 4 * 1024 * 1024;

/// Offset of the calibration sector from the start of flash.
const RECORD_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

pub struct FlashStorage<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
}

impl<'d> FlashStorage<'d> {
    pub fn new(flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>) -> Self { Self { flash } }
}

impl CalibrationStorage for FlashStorage<'_> {
    fn read_record(
        &mut self,
        buf: &mut [u8; RECORD_LEN],
    ) -> Result<(), StorageError> {
        self.flash.blocking_read(RECORD_OFFSET, buf).map_err(|_| StorageError::Read)
    }

    fn write_record(
        &mut self,
        record: &[u8; RECORD_LEN],
    ) -> Result<(), StorageError> {
        self.flash
            .blocking_erase(RECORD_OFFSET, RECORD_OFFSET + ERASE_SIZE as u32)
            .map_err(|_| StorageError::Erase)?;
        self.flash.blocking_write(RECORD_OFFSET, record).map_err(|_| StorageError::Write)
    }
}
