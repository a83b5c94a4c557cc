//! Horizontal slider: track, filled indicator and round knob.
//!
//! Geometry is stored relative to the panel's top edge so the slider moves
//! with the panel while it animates. Every method that needs screen
//! coordinates takes the current `panel_y`.
//!
//! ```text
//!  ┌──────────────●────────────────┐
//!  │▓▓▓▓▓▓▓▓▓▓▓▓▓▓│                │   ▓ indicator (ACCENT), rest TRACK
//!  └──────────────●────────────────┘
//!  origin.x      knob        origin.x + width
//! ```

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, CornerRadii, PrimitiveStyle, Rectangle, RoundedRectangle};

use crate::colors::{ACCENT, TRACK, WHITE};

/// Knob radius. Also the extra margin around the track that still counts as a hit.
pub const KNOB_RADIUS: u32 = 8;

const TRACK_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(TRACK);
const INDICATOR_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(ACCENT);
const KNOB_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(WHITE);

/// A slider over the inclusive range `min..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slider {
    origin: Point,
    width: u32,
    height: u32,
    min: u8,
    max: u8,
    value: u8,
}

impl Slider {
    /// `origin` is the track's top-left corner relative to the panel.
    pub const fn new(
        origin: Point,
        size: Size,
        min: u8,
        max: u8,
        value: u8,
    ) -> Self {
        let value = if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        };
        Self {
            origin,
            width: size.width,
            height: size.height,
            min,
            max,
            value,
        }
    }

    #[inline]
    pub const fn value(&self) -> u8 { self.value }

    /// Set the value, clamped to the range. Returns `true` if it changed.
    pub fn set_value(
        &mut self,
        value: u8,
    ) -> bool {
        let value = value.clamp(self.min, self.max);
        let changed = value != self.value;
        self.value = value;
        changed
    }

    /// Track rectangle in screen coordinates.
    pub fn track(
        &self,
        panel_y: i32,
    ) -> Rectangle {
        Rectangle::new(self.origin + Point::new(0, panel_y), Size::new(self.width, self.height))
    }

    /// Whether `point` grabs this slider: the track plus a knob-sized margin.
    pub fn contains(
        &self,
        point: Point,
        panel_y: i32,
    ) -> bool {
        self.track(panel_y)
            .offset(KNOB_RADIUS as i32)
            .contains(point)
    }

    /// Value under screen column `x`, rounded to the nearest step.
    pub fn value_at(
        &self,
        x: i32,
    ) -> u8 {
        let width = self.width as i32;
        if width == 0 {
            return self.min;
        }
        let rel = (x - self.origin.x).clamp(0, width);
        let span = i32::from(self.max) - i32::from(self.min);
        let value = i32::from(self.min) + (rel * span + width / 2) / width;
        value.clamp(i32::from(self.min), i32::from(self.max)) as u8
    }

    /// Knob center in screen coordinates.
    pub fn knob_center(
        &self,
        panel_y: i32,
    ) -> Point {
        let span = i32::from(self.max) - i32::from(self.min);
        let offset = if span == 0 {
            0
        } else {
            (i32::from(self.value) - i32::from(self.min)) * self.width as i32 / span
        };
        Point::new(
            self.origin.x + offset,
            self.origin.y + panel_y + self.height as i32 / 2,
        )
    }

    pub fn draw<D>(
        &self,
        display: &mut D,
        panel_y: i32,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let track = self.track(panel_y);
        let radii = CornerRadii::new(Size::new(self.height / 2, self.height / 2));

        RoundedRectangle::new(track, radii)
            .into_styled(TRACK_FILL)
            .draw(display)
            .ok();

        let knob = self.knob_center(panel_y);
        let filled = (knob.x - track.top_left.x).max(0) as u32;
        if filled > 0 {
            RoundedRectangle::new(Rectangle::new(track.top_left, Size::new(filled, self.height)), radii)
                .into_styled(INDICATOR_FILL)
                .draw(display)
                .ok();
        }

        Circle::with_center(knob, KNOB_RADIUS * 2)
            .into_styled(KNOB_FILL)
            .draw(display)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn led_slider() -> Slider { Slider::new(Point::new(33, 60), Size::new(160, 10), 0, 255, 0) }

    #[test]
    fn test_initial_value_clamped() {
        let slider = Slider::new(Point::zero(), Size::new(100, 10), 10, 255, 0);
        assert_eq!(slider.value(), 10);
    }

    #[test]
    fn test_value_at_ends_and_middle() {
        let slider = led_slider();
        assert_eq!(slider.value_at(33), 0);
        assert_eq!(slider.value_at(193), 255);
        assert_eq!(slider.value_at(113), 128);
        assert_eq!(slider.value_at(0), 0);
        assert_eq!(slider.value_at(500), 255);
    }

    #[test]
    fn test_value_at_respects_min() {
        let slider = Slider::new(Point::new(33, 20), Size::new(160, 10), 10, 255, 180);
        assert_eq!(slider.value_at(33), 10);
        assert_eq!(slider.value_at(193), 255);
    }

    #[test]
    fn test_set_value_reports_change() {
        let mut slider = led_slider();
        assert!(slider.set_value(128));
        assert!(!slider.set_value(128));
        assert_eq!(slider.value(), 128);
    }

    #[test]
    fn test_hit_area_follows_panel() {
        let slider = led_slider();
        assert!(slider.contains(Point::new(100, 65), 0));
        assert!(slider.contains(Point::new(100, 55), 0));
        assert!(!slider.contains(Point::new(100, 65), -100));
        assert!(slider.contains(Point::new(100, 15), -50));
        assert!(!slider.contains(Point::new(100, 90), 0));
    }

    #[test]
    fn test_knob_tracks_value() {
        let mut slider = led_slider();
        assert_eq!(slider.knob_center(0), Point::new(33, 65));
        slider.set_value(255);
        assert_eq!(slider.knob_center(0), Point::new(193, 65));
        assert_eq!(slider.knob_center(-100), Point::new(193, -35));
    }
}
