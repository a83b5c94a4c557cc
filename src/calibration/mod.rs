//! Touch calibration: raw ADC bounds, their persisted record and the wizard.
//!
//! - [`CalibrationBounds`]: raw min/max per axis, with validation/normalization
//! - [`store`]: persistence of the 16-byte record through [`CalibrationStorage`]
//! - [`wizard`]: tick-driven two-target calibration procedure
//!
//! # Record Format
//!
//! ```text
//! offset  0: x_min (i32 LE)
//! offset  4: x_max (i32 LE)
//! offset  8: y_min (i32 LE)
//! offset 12: y_max (i32 LE)
//! ```
//!
//! Erased flash reads back as all `0xFF`, which decodes to `-1` in every field.
//! That pattern is treated as "never calibrated".

pub mod store;
pub mod wizard;

use core::fmt;

pub use store::{CalibrationStorage, CalibrationStore, LoadError, RamStorage, StorageError};
pub use wizard::{CalibrationWizard, WizardStep};

use crate::config::TOUCH_ADC_MAX;

/// Size of the persisted calibration record in bytes.
pub const RECORD_LEN: usize = 16;

/// Smallest raw span accepted for an axis.
///
/// Two calibration taps closer than this would make a single ADC count move the
/// mapped point by several pixels.
pub const MIN_AXIS_SPAN: i32 = 100;

/// Touch axis, used in error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
}

/// Why a set of bounds (or a calibration run) was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// A bound lies outside the 12-bit ADC range.
    OutOfRange(Axis),
    /// Min and max of an axis are equal or too close together.
    Degenerate(Axis),
    /// No touch (or no release) within the step timeout.
    Timeout,
}

impl fmt::Display for CalibrationError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::OutOfRange(axis) => write!(f, "{axis:?} bound outside ADC range"),
            Self::Degenerate(axis) => write!(f, "{axis:?} span too small"),
            Self::Timeout => f.write_str("calibration step timed out"),
        }
    }
}

/// Raw touch ADC bounds per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationBounds {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl CalibrationBounds {
    pub const fn new(
        x_min: i32,
        x_max: i32,
        y_min: i32,
        y_max: i32,
    ) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Check the bounds and return them with each axis in ascending order.
    ///
    /// Swapped axes (min > max) are corrected rather than rejected: the
    /// calibration wizard records whichever raw value the top-left target
    /// produced as the minimum, and on panels with a mirrored axis that value
    /// is the larger one.
    pub fn validated(self) -> Result<Self, CalibrationError> {
        let (x_min, x_max) = check_axis(self.x_min, self.x_max, Axis::X)?;
        let (y_min, y_max) = check_axis(self.y_min, self.y_max, Axis::Y)?;
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Encode as the persisted record.
    pub fn to_record(&self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        record[0..4].copy_from_slice(&self.x_min.to_le_bytes());
        record[4..8].copy_from_slice(&self.x_max.to_le_bytes());
        record[8..12].copy_from_slice(&self.y_min.to_le_bytes());
        record[12..16].copy_from_slice(&self.y_max.to_le_bytes());
        record
    }

    /// Decode a persisted record. Returns `None` for blank storage.
    ///
    /// The decoded bounds are not validated; see [`validated`](Self::validated).
    pub fn from_record(record: &[u8; RECORD_LEN]) -> Option<Self> {
        if is_erased(record) {
            return None;
        }
        let field = |i: usize| i32::from_le_bytes([record[i], record[i + 1], record[i + 2], record[i + 3]]);
        Some(Self {
            x_min: field(0),
            x_max: field(4),
            y_min: field(8),
            y_max: field(12),
        })
    }
}

impl Default for CalibrationBounds {
    fn default() -> Self { crate::config::DEFAULT_CALIBRATION }
}

/// Blank storage: all bytes erased, or an `x_min` left at the 16-bit erased
/// value by older firmware that stored 16-bit fields.
fn is_erased(record: &[u8; RECORD_LEN]) -> bool {
    if record.iter().all(|&b| b == 0xFF) {
        return true;
    }
    let x_min = i32::from_le_bytes([record[0], record[1], record[2], record[3]]);
    x_min == -1 || x_min == 0xFFFF
}

fn check_axis(
    a: i32,
    b: i32,
    axis: Axis,
) -> Result<(i32, i32), CalibrationError> {
    let range = 0..=TOUCH_ADC_MAX;
    if !range.contains(&a) || !range.contains(&b) {
        return Err(CalibrationError::OutOfRange(axis));
    }
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    if max - min < MIN_AXIS_SPAN {
        return Err(CalibrationError::Degenerate(axis));
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CALIBRATION;

    #[test]
    fn test_record_layout_is_little_endian() {
        let bounds = CalibrationBounds::new(0x0102, 0x0304, 0x0506, 0x0708);
        let record = bounds.to_record();
        assert_eq!(&record[0..4], &[0x02, 0x01, 0x00, 0x00]);
        assert_eq!(&record[12..16], &[0x08, 0x07, 0x00, 0x00]);
    }

    #[test]
    fn test_record_decodes_what_was_encoded() {
        let record = DEFAULT_CALIBRATION.to_record();
        assert_eq!(CalibrationBounds::from_record(&record), Some(DEFAULT_CALIBRATION));
    }

    #[test]
    fn test_erased_record_is_blank() {
        assert_eq!(CalibrationBounds::from_record(&[0xFF; RECORD_LEN]), None);
    }

    #[test]
    fn test_sixteen_bit_erased_marker_is_blank() {
        let mut record = DEFAULT_CALIBRATION.to_record();
        record[0..4].copy_from_slice(&0xFFFF_i32.to_le_bytes());
        assert_eq!(CalibrationBounds::from_record(&record), None);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(DEFAULT_CALIBRATION.validated(), Ok(DEFAULT_CALIBRATION));
    }

    #[test]
    fn test_swapped_axes_are_normalized() {
        let swapped = CalibrationBounds::new(3950, 350, 3850, 350);
        let fixed = swapped.validated().unwrap();
        assert_eq!(fixed, CalibrationBounds::new(350, 3950, 350, 3850));
    }

    #[test]
    fn test_equal_bounds_rejected() {
        let degenerate = CalibrationBounds::new(2000, 2000, 350, 3850);
        assert_eq!(degenerate.validated(), Err(CalibrationError::Degenerate(Axis::X)));
    }

    #[test]
    fn test_narrow_span_rejected() {
        let narrow = CalibrationBounds::new(350, 3950, 1000, 1050);
        assert_eq!(narrow.validated(), Err(CalibrationError::Degenerate(Axis::Y)));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let bad = CalibrationBounds::new(-5, 3950, 350, 3850);
        assert_eq!(bad.validated(), Err(CalibrationError::OutOfRange(Axis::X)));
        let bad = CalibrationBounds::new(350, 3950, 350, 5000);
        assert_eq!(bad.validated(), Err(CalibrationError::OutOfRange(Axis::Y)));
    }
}
