//! Pre-computed static text styles.
//!
//! `MonoTextStyle` and `TextStyle` values are `const`, so draw functions
//! reference them directly instead of building a style every frame.
//!
//! Labels use `ProFont` 9pt (6x11 glyphs): small enough for a "100%" label to
//! fit in the 40px gutter right of the sliders.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_9_POINT, PROFONT_12_POINT};

use crate::colors::{GREEN, RED, TRACK, WHITE};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, top baseline. Calibration instructions.
pub const LEFT_TOP: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Right-aligned, top baseline. Slider percentages and the voltage readout.
pub const RIGHT_TOP: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Top)
    .build();

/// Right-aligned, middle baseline. Labels beside a slider track.
pub const RIGHT_MIDDLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Fonts and Text Styles
// =============================================================================

/// Small white text for panel labels.
pub const LABEL_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_9_POINT, WHITE);

/// Dimmed hint text on the home screen.
pub const HINT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_9_POINT, TRACK);

/// Calibration instruction text.
pub const MESSAGE_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_12_POINT, WHITE);

/// Calibration success text.
pub const MESSAGE_STYLE_GREEN: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_12_POINT, GREEN);

/// Calibration failure text.
pub const MESSAGE_STYLE_RED: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_12_POINT, RED);
