//! Color constants for the control panel.
//!
//! The palette is a dark theme: near-black background, a dark grey panel
//! surface, a green accent for active indicators and light grey for tracks.
//!
//! ## Rgb565 Conversion
//!
//! The 24-bit design colors are reduced to 5-6-5 bits with
//! `Rgb565::new(r >> 3, g >> 2, b >> 3)`, which is what the panel stores.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Calibration screen background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Labels and slider knobs.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Calibration targets and failure text.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green. Calibration success text.
pub const GREEN: Rgb565 = Rgb565::GREEN;

// =============================================================================
// Theme Colors
// =============================================================================

/// Screen background (#121212).
pub const BACKGROUND: Rgb565 = Rgb565::new(0x12 >> 3, 0x12 >> 2, 0x12 >> 3);

/// Panel surface (#282828).
pub const PANEL_BG: Rgb565 = Rgb565::new(0x28 >> 3, 0x28 >> 2, 0x28 >> 3);

/// Accent (#1DB954). Slider indicator and icons.
pub const ACCENT: Rgb565 = Rgb565::new(0x1D >> 3, 0xB9 >> 2, 0x54 >> 3);

/// Slider track (#B3B3B3).
pub const TRACK: Rgb565 = Rgb565::new(0xB3 >> 3, 0xB3 >> 2, 0xB3 >> 3);
