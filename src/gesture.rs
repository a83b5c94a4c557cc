//! Vertical swipe detection from the touch sample stream.
//!
//! A press is tracked from its first sample. Once the vertical travel from
//! that origin reaches [`GESTURE_LIMIT`] and is larger than the horizontal
//! travel, one gesture is emitted. Further movement in the same press is
//! ignored until release.

use embedded_graphics::prelude::Point;

use crate::config::GESTURE_LIMIT;
use crate::touch::TouchSample;

/// Swipe direction, in screen terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Finger moved toward the top edge.
    Up,
    /// Finger moved toward the bottom edge.
    Down,
}

#[derive(Clone, Copy, Debug)]
enum Tracking {
    Idle,
    Pressed { origin: Point },
    /// Gesture already reported, or the press was claimed by a widget.
    Done,
}

/// Per-press swipe detector.
pub struct GestureDetector {
    tracking: Tracking,
    limit: i32,
}

impl GestureDetector {
    pub const fn new() -> Self {
        Self {
            tracking: Tracking::Idle,
            limit: GESTURE_LIMIT,
        }
    }

    /// Feed one sample. Returns a gesture at most once per press.
    pub fn update(
        &mut self,
        sample: &TouchSample,
    ) -> Option<Gesture> {
        if !sample.pressed {
            self.tracking = Tracking::Idle;
            return None;
        }

        match self.tracking {
            Tracking::Idle => {
                self.tracking = Tracking::Pressed { origin: sample.point() };
                None
            }
            Tracking::Pressed { origin } => {
                let delta = sample.point() - origin;
                if delta.y.abs() >= self.limit && delta.y.abs() > delta.x.abs() {
                    self.tracking = Tracking::Done;
                    Some(if delta.y > 0 { Gesture::Down } else { Gesture::Up })
                } else {
                    None
                }
            }
            Tracking::Done => None,
        }
    }

    /// Stop looking for a gesture in the current press (a widget owns it).
    pub fn claim_press(&mut self) {
        if !matches!(self.tracking, Tracking::Idle) {
            self.tracking = Tracking::Done;
        }
    }
}

impl Default for GestureDetector {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(
        x: i32,
        y: i32,
    ) -> TouchSample {
        TouchSample { x, y, pressed: true }
    }

    fn released() -> TouchSample {
        TouchSample {
            x: 0,
            y: 0,
            pressed: false,
        }
    }

    #[test]
    fn test_swipe_down() {
        let mut detector = GestureDetector::new();
        assert_eq!(detector.update(&pressed(120, 10)), None);
        assert_eq!(detector.update(&pressed(122, 40)), None);
        assert_eq!(detector.update(&pressed(125, 60)), Some(Gesture::Down));
    }

    #[test]
    fn test_swipe_up() {
        let mut detector = GestureDetector::new();
        detector.update(&pressed(120, 200));
        assert_eq!(detector.update(&pressed(118, 140)), Some(Gesture::Up));
    }

    #[test]
    fn test_reported_once_per_press() {
        let mut detector = GestureDetector::new();
        detector.update(&pressed(120, 10));
        assert_eq!(detector.update(&pressed(120, 80)), Some(Gesture::Down));
        assert_eq!(detector.update(&pressed(120, 200)), None);

        detector.update(&released());
        detector.update(&pressed(120, 10));
        assert_eq!(detector.update(&pressed(120, 80)), Some(Gesture::Down));
    }

    #[test]
    fn test_horizontal_drag_ignored() {
        let mut detector = GestureDetector::new();
        detector.update(&pressed(10, 100));
        assert_eq!(detector.update(&pressed(200, 160)), None);
    }

    #[test]
    fn test_short_drag_ignored() {
        let mut detector = GestureDetector::new();
        detector.update(&pressed(120, 100));
        assert_eq!(detector.update(&pressed(120, 149)), None);
    }

    #[test]
    fn test_claimed_press_never_gestures() {
        let mut detector = GestureDetector::new();
        detector.update(&pressed(100, 25));
        detector.claim_press();
        assert_eq!(detector.update(&pressed(100, 150)), None);
    }
}
