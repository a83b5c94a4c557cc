//! Touch sampling: raw controller readings to screen-space points.
//!
//! The [`TouchSampler`] is polled once per tick. It asks the
//! [`TouchController`] whether the panel is pressed, reads one raw sample,
//! rescales it with the current [`CalibrationBounds`] and clamps it to the
//! screen. A press while the screen is asleep only wakes the screen; it is
//! not reported as a press until the finger has been lifted once.
//!
//! # Axis Directions
//!
//! ```text
//! raw X: x_min ........ x_max     screen X: width ........ 0
//! raw Y: y_max ........ y_min     screen Y: 0 ........ height
//! ```
//!
//! Both screen axes therefore decrease as the raw reading increases.

use embedded_graphics::prelude::Point;

use crate::calibration::CalibrationBounds;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sleep::ActivityTracker;

/// Uncalibrated reading from the touch controller, in ADC counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPoint {
    pub x: i32,
    pub y: i32,
}

impl RawPoint {
    pub const fn new(
        x: i32,
        y: i32,
    ) -> Self {
        Self { x, y }
    }
}

/// Calibrated touch state reported for one poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    /// Screen X in `0..=SCREEN_WIDTH`.
    pub x: i32,
    /// Screen Y in `0..=SCREEN_HEIGHT`.
    pub y: i32,
    pub pressed: bool,
}

impl TouchSample {
    #[inline]
    pub const fn point(&self) -> Point { Point::new(self.x, self.y) }
}

/// Result of a single [`TouchSampler::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchReading {
    pub sample: TouchSample,
    /// This poll woke the screen; the contact was swallowed.
    pub woke: bool,
}

/// Poll-side view of a touch controller.
pub trait TouchController {
    /// Whether the panel is currently pressed.
    fn is_touched(&mut self) -> bool;

    /// Read one raw sample. Only meaningful while [`is_touched`](Self::is_touched) is true.
    fn read_raw(&mut self) -> RawPoint;
}

impl<T: TouchController + ?Sized> TouchController for &mut T {
    fn is_touched(&mut self) -> bool { (**self).is_touched() }

    fn read_raw(&mut self) -> RawPoint { (**self).read_raw() }
}

/// Linearly rescale `value` from `[in_from, in_to]` to `[out_from, out_to]`.
///
/// Integer arithmetic truncating toward zero. Returns `None` when the input
/// range is empty.
pub fn rescale(
    value: i32,
    in_from: i32,
    in_to: i32,
    out_from: i32,
    out_to: i32,
) -> Option<i32> {
    let in_span = i64::from(in_to) - i64::from(in_from);
    if in_span == 0 {
        return None;
    }
    let out_span = i64::from(out_to) - i64::from(out_from);
    let scaled = (i64::from(value) - i64::from(in_from)) * out_span / in_span + i64::from(out_from);
    Some(scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Map a raw sample to a clamped screen point.
///
/// A degenerate axis (min == max) maps to the middle of the screen on that axis.
pub fn map_to_screen(
    raw: RawPoint,
    bounds: &CalibrationBounds,
) -> Point {
    let width = SCREEN_WIDTH as i32;
    let height = SCREEN_HEIGHT as i32;

    let x = rescale(raw.x, bounds.x_min, bounds.x_max, width, 0).unwrap_or(width / 2);
    let y = rescale(raw.y, bounds.y_max, bounds.y_min, 0, height).unwrap_or(height / 2);

    Point::new(x.clamp(0, width), y.clamp(0, height))
}

/// Turns controller polls into calibrated [`TouchSample`]s.
pub struct TouchSampler {
    bounds: CalibrationBounds,
    last_point: Point,
    last_raw: Option<RawPoint>,
    /// Set by a wake tap, cleared once the finger lifts.
    swallow_until_release: bool,
}

impl TouchSampler {
    pub const fn new(bounds: CalibrationBounds) -> Self {
        Self {
            bounds,
            last_point: Point::zero(),
            last_raw: None,
            swallow_until_release: false,
        }
    }

    #[inline]
    pub const fn bounds(&self) -> &CalibrationBounds { &self.bounds }

    /// Replace the calibration, e.g. after a calibration run.
    pub fn set_bounds(
        &mut self,
        bounds: CalibrationBounds,
    ) {
        self.bounds = bounds;
    }

    /// Last raw reading taken; the app reports it with each accepted press.
    #[inline]
    pub const fn last_raw(&self) -> Option<RawPoint> { self.last_raw }

    /// Poll the controller once.
    ///
    /// A contact while `activity` is asleep wakes it and is reported as a
    /// release at the previous point.
    pub fn poll<T: TouchController>(
        &mut self,
        touch: &mut T,
        activity: &mut ActivityTracker,
        now_ms: u64,
    ) -> TouchReading {
        if !touch.is_touched() {
            self.swallow_until_release = false;
            return self.released(false);
        }

        if !activity.is_awake() {
            activity.wake(now_ms);
            self.swallow_until_release = true;
            return self.released(true);
        }

        if self.swallow_until_release {
            return self.released(false);
        }

        let raw = touch.read_raw();
        self.last_raw = Some(raw);
        self.last_point = map_to_screen(raw, &self.bounds);

        TouchReading {
            sample: TouchSample {
                x: self.last_point.x,
                y: self.last_point.y,
                pressed: true,
            },
            woke: false,
        }
    }

    fn released(
        &self,
        woke: bool,
    ) -> TouchReading {
        TouchReading {
            sample: TouchSample {
                x: self.last_point.x,
                y: self.last_point.y,
                pressed: false,
            },
            woke,
        }
    }
}
