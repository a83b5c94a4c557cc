//! XPT2046 conversion frames.
//!
//! Each conversion is a 3-byte full-duplex transfer: a control byte followed
//! by two clocking bytes. The 12-bit result comes back MSB first in bits 14..3
//! of the two response bytes.
//!
//! ```text
//! MOSI: [ctrl] [0x00] [0x00]
//! MISO: [ -- ] [ hi ] [ lo ]   value = ((hi << 8) | lo) >> 3
//! ```
//!
//! Only the frame layout lives here; the SPI transfer is the firmware's job.

use crate::touch::RawPoint;

/// Differential X position, 12-bit, power-down between conversions.
pub const CMD_X: u8 = 0xD0;

/// Differential Y position.
pub const CMD_Y: u8 = 0x90;

/// Pressure Z1.
pub const CMD_Z1: u8 = 0xB0;

/// Pressure Z2.
pub const CMD_Z2: u8 = 0xC0;

/// Bytes per conversion frame.
pub const FRAME_LEN: usize = 3;

/// Z above this counts as contact.
pub const PRESSURE_THRESHOLD: u16 = 400;

/// Samples averaged per [`RawPoint`].
pub const SAMPLES_PER_POINT: usize = 3;

/// Outgoing frame for `command`.
#[inline]
pub const fn frame(command: u8) -> [u8; FRAME_LEN] { [command, 0x00, 0x00] }

/// Decode the 12-bit result from a received frame.
#[inline]
pub const fn decode(rx: &[u8; FRAME_LEN]) -> u16 { ((((rx[1] as u16) << 8) | rx[2] as u16) >> 3) & 0x0FFF }

/// Pressure estimate from the Z1/Z2 conversions (larger is firmer).
///
/// `z = z1 + 4095 - z2`, saturating at zero.
pub const fn pressure(
    z1: u16,
    z2: u16,
) -> u16 {
    let z = z1 as i32 + 4095 - z2 as i32;
    if z < 0 { 0 } else { z as u16 }
}

/// Average of X/Y sample pairs.
///
/// Returns `None` for an empty slice.
pub fn average(samples: &[(u16, u16)]) -> Option<RawPoint> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as i32;
    let (sum_x, sum_y) = samples
        .iter()
        .fold((0i32, 0i32), |(sx, sy), &(x, y)| (sx + i32::from(x), sy + i32::from(y)));
    Some(RawPoint::new(sum_x / n, sum_y / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        assert_eq!(frame(CMD_X), [0xD0, 0x00, 0x00]);
        assert_eq!(frame(CMD_Y), [0x90, 0x00, 0x00]);
    }

    #[test]
    fn test_decode_full_scale() {
        // 4095 << 3 = 0x7FF8
        assert_eq!(decode(&[0x00, 0x7F, 0xF8]), 4095);
    }

    #[test]
    fn test_decode_ignores_low_bits() {
        // 2000 << 3 = 0x3E80, plus garbage in the 3 trailing bits
        assert_eq!(decode(&[0xFF, 0x3E, 0x87]), 2000);
    }

    #[test]
    fn test_decode_masks_to_twelve_bits() {
        assert_eq!(decode(&[0x00, 0xFF, 0xFF]), 4095);
    }

    #[test]
    fn test_pressure() {
        assert_eq!(pressure(0, 4095), 0);
        assert_eq!(pressure(800, 3000), 1895);
        assert!(pressure(600, 3500) > PRESSURE_THRESHOLD);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[(100, 200), (110, 220), (120, 240)]), Some(RawPoint::new(110, 220)));
    }
}
