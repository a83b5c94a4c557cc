//! Application configuration.
//!
//! Layout values are pre-computed `const`s so drawing code never does the
//! arithmetic per frame. Timing values have a `const` default and are also
//! collected into [`Config`], which is handed to [`App::new`](crate::app::App::new)
//! so the simulator and tests can shorten them.

use crate::calibration::CalibrationBounds;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (ST7789, portrait).
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 320;

// =============================================================================
// Touch Calibration Defaults
// =============================================================================

/// Raw X reading at the right edge (X axis runs right-to-left on this panel).
pub const DEFAULT_X_MIN: i32 = 350;
/// Raw X reading at the left edge.
pub const DEFAULT_X_MAX: i32 = 3950;
/// Raw Y reading at the bottom edge.
pub const DEFAULT_Y_MIN: i32 = 350;
/// Raw Y reading at the top edge.
pub const DEFAULT_Y_MAX: i32 = 3850;

/// Compiled-in bounds used when storage is blank or invalid.
pub const DEFAULT_CALIBRATION: CalibrationBounds = CalibrationBounds {
    x_min: DEFAULT_X_MIN,
    x_max: DEFAULT_X_MAX,
    y_min: DEFAULT_Y_MIN,
    y_max: DEFAULT_Y_MAX,
};

/// Largest value the touch ADC can report (12-bit).
pub const TOUCH_ADC_MAX: i32 = 4095;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Main loop tick period in milliseconds.
pub const TICK_MS: u64 = 5;

/// Idle time before the backlight is switched off.
pub const SCREEN_TIMEOUT_MS: u64 = 30_000;

/// Period of the battery voltage refresh while the panel is shown.
pub const VOLTAGE_REFRESH_MS: u64 = 500;

/// Duration of the panel slide animation.
pub const PANEL_ANIM_MS: u64 = 200;

/// Hold time before a calibration sample is taken.
pub const CALIBRATION_DEBOUNCE_MS: u64 = 50;

/// Pause after each calibration release before the next target is shown.
pub const CALIBRATION_SETTLE_MS: u64 = 500;

/// Time the user has to complete a single calibration step.
pub const CALIBRATION_STEP_TIMEOUT_MS: u64 = 15_000;

/// How long the calibration result message stays up.
pub const CALIBRATION_RESULT_MS: u64 = 1_000;

// =============================================================================
// Output Configuration
// =============================================================================

/// Backlight duty applied at boot, also the initial screen slider value.
pub const BOOT_SCREEN_BRIGHTNESS: u8 = 180;

/// Lowest backlight duty the screen slider can command.
pub const MIN_SCREEN_BRIGHTNESS: u8 = 10;

/// Battery ADC full scale (12-bit).
pub const BATTERY_ADC_MAX: u16 = 4095;

/// Battery ADC reference voltage.
pub const BATTERY_VREF: f32 = 3.3;

// =============================================================================
// Pre-computed Layout Constants
// =============================================================================

/// Height of the pull-down panel.
pub const PANEL_HEIGHT: u32 = 100;

/// Panel top edge when hidden (fully above the screen).
pub const PANEL_HIDDEN_Y: i32 = -(PANEL_HEIGHT as i32);

/// Panel top edge when shown.
pub const PANEL_SHOWN_Y: i32 = 0;

/// Slider track width (67% of the screen width).
pub const SLIDER_WIDTH: u32 = SCREEN_WIDTH * 67 / 100;

/// Slider track height.
pub const SLIDER_HEIGHT: u32 = 10;

/// Slider track left edge (centered, shifted 7px left to leave room for labels).
pub const SLIDER_X: i32 = ((SCREEN_WIDTH - SLIDER_WIDTH) / 2) as i32 - 7;

/// Screen brightness slider top edge, relative to the panel.
pub const SCREEN_SLIDER_Y: i32 = 20;

/// LED slider top edge, relative to the panel.
pub const LED_SLIDER_Y: i32 = 60;

/// Vertical travel that turns a drag into a swipe gesture.
pub const GESTURE_LIMIT: i32 = 50;

/// Calibration target inset from the screen corners.
pub const CALIBRATION_TARGET_INSET: i32 = 20;

/// Calibration target radius.
pub const CALIBRATION_TARGET_RADIUS: u32 = 10;

/// Screen center X coordinate.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

/// Screen center Y coordinate.
pub const CENTER_Y: i32 = (SCREEN_HEIGHT / 2) as i32;

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Timing knobs consumed by the application shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Idle time before the screen sleeps.
    pub screen_timeout_ms: u64,
    /// Voltage refresh period while the panel is shown.
    pub voltage_refresh_ms: u64,
    /// Panel slide duration.
    pub panel_anim_ms: u64,
    /// Calibration hold time before sampling.
    pub calibration_debounce_ms: u64,
    /// Calibration pause between targets.
    pub calibration_settle_ms: u64,
    /// Calibration per-step timeout.
    pub calibration_step_timeout_ms: u64,
    /// Calibration result message duration.
    pub calibration_result_ms: u64,
    /// Backlight duty at boot.
    pub boot_screen_brightness: u8,
}

impl Config {
    /// Configuration with the compiled-in defaults.
    pub const fn new() -> Self {
        Self {
            screen_timeout_ms: SCREEN_TIMEOUT_MS,
            voltage_refresh_ms: VOLTAGE_REFRESH_MS,
            panel_anim_ms: PANEL_ANIM_MS,
            calibration_debounce_ms: CALIBRATION_DEBOUNCE_MS,
            calibration_settle_ms: CALIBRATION_SETTLE_MS,
            calibration_step_timeout_ms: CALIBRATION_STEP_TIMEOUT_MS,
            calibration_result_ms: CALIBRATION_RESULT_MS,
            boot_screen_brightness: BOOT_SCREEN_BRIGHTNESS,
        }
    }
}

impl Default for Config {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_layout_fits_screen() {
        assert_eq!(SLIDER_WIDTH, 160);
        assert_eq!(SLIDER_X, 33);
        assert!(SLIDER_X + SLIDER_WIDTH as i32 <= SCREEN_WIDTH as i32);
    }

    #[test]
    fn test_sliders_inside_panel() {
        assert!(LED_SLIDER_Y + (SLIDER_HEIGHT as i32) < PANEL_HEIGHT as i32);
        assert!(SCREEN_SLIDER_Y < LED_SLIDER_Y);
    }

    #[test]
    fn test_default_config_matches_constants() {
        let config = Config::default();
        assert_eq!(config.screen_timeout_ms, 30_000);
        assert_eq!(config.voltage_refresh_ms, 500);
        assert_eq!(config.panel_anim_ms, 200);
        assert!(config.boot_screen_brightness >= MIN_SCREEN_BRIGHTNESS);
    }
}
