//! Mouse as touchscreen.
//!
//! The left button is the finger. Window coordinates are turned back into
//! raw ADC counts with the inverse of the default calibration, so the
//! whole touch pipeline runs exactly as on the device.

use embedded_graphics::prelude::Point;
use touch_panel::config::{DEFAULT_CALIBRATION, SCREEN_HEIGHT, SCREEN_WIDTH};
use touch_panel::{CalibrationBounds, RawPoint, TouchController};

/// Raw reading that maps to `point` under `bounds`.
pub fn screen_to_raw(
    point: Point,
    bounds: &CalibrationBounds,
) -> RawPoint {
    let x = bounds.x_max - point.x * (bounds.x_max - bounds.x_min) / SCREEN_WIDTH as i32;
    let y = bounds.y_max - point.y * (bounds.y_max - bounds.y_min) / SCREEN_HEIGHT as i32;
    RawPoint::new(x, y)
}

#[derive(Default)]
pub struct MouseTouch {
    /// Cursor position while the button is held.
    pressed_at: Option<Point>,
}

impl MouseTouch {
    pub const fn new() -> Self { Self { pressed_at: None } }

    pub fn press(
        &mut self,
        point: Point,
    ) {
        self.pressed_at = Some(point);
    }

    /// Follow the cursor, only while pressed.
    pub fn drag(
        &mut self,
        point: Point,
    ) {
        if self.pressed_at.is_some() {
            self.pressed_at = Some(point);
        }
    }

    pub fn release(&mut self) { self.pressed_at = None; }
}

impl TouchController for MouseTouch {
    fn is_touched(&mut self) -> bool { self.pressed_at.is_some() }

    fn read_raw(&mut self) -> RawPoint {
        self.pressed_at
            .map(|point| screen_to_raw(point, &DEFAULT_CALIBRATION))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touch_panel::touch::map_to_screen;

    #[test]
    fn test_inverse_mapping_round_trips() {
        for point in [Point::new(0, 0), Point::new(120, 160), Point::new(240, 320), Point::new(33, 70)] {
            let mapped = map_to_screen(screen_to_raw(point, &DEFAULT_CALIBRATION), &DEFAULT_CALIBRATION);
            assert!((mapped.x - point.x).abs() <= 1, "{point:?} -> {mapped:?}");
            assert!((mapped.y - point.y).abs() <= 1, "{point:?} -> {mapped:?}");
        }
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut touch = MouseTouch::new();
        touch.drag(Point::new(10, 10));
        assert!(!touch.is_touched());
        touch.press(Point::new(10, 10));
        touch.drag(Point::new(20, 20));
        assert_eq!(touch.read_raw(), screen_to_raw(Point::new(20, 20), &DEFAULT_CALIBRATION));
        touch.release();
        assert!(!touch.is_touched());
    }
}
