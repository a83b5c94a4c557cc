//! Two-target touch calibration, driven one tick at a time.
//!
//! # Sequence
//!
//! ```text
//! AwaitingTopLeftTouch ──hold 50ms──▶ AwaitingTopLeftRelease ──lift──▶ (settle 500ms)
//!   ──▶ AwaitingBottomRightTouch ──hold 50ms──▶ AwaitingBottomRightRelease ──lift──▶ Done
//! ```
//!
//! Every step has its own timeout; running out of time ends in
//! `Failed(Timeout)`. The wizard never blocks: the main loop keeps ticking,
//! rendering and feeding the watchdog while the user finds the targets.
//!
//! The raw sample is taken once the contact has been held for the debounce
//! time, so the first, noisy edge of a press is not used.

use embedded_graphics::prelude::Point;

use super::{CalibrationBounds, CalibrationError};
use crate::config::{CALIBRATION_TARGET_INSET, Config, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::touch::{RawPoint, TouchController};

/// Screen position of the first target.
pub const TOP_LEFT_TARGET: Point = Point::new(CALIBRATION_TARGET_INSET, CALIBRATION_TARGET_INSET);

/// Screen position of the second target.
pub const BOTTOM_RIGHT_TARGET: Point = Point::new(
    SCREEN_WIDTH as i32 - CALIBRATION_TARGET_INSET,
    SCREEN_HEIGHT as i32 - CALIBRATION_TARGET_INSET,
);

/// Wizard state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WizardStep {
    AwaitingTopLeftTouch,
    AwaitingTopLeftRelease,
    AwaitingBottomRightTouch,
    AwaitingBottomRightRelease,
    Done(CalibrationBounds),
    Failed(CalibrationError),
}

/// Tick-driven calibration state machine.
pub struct CalibrationWizard {
    step: WizardStep,
    /// Start of the timeout window for the current step.
    step_started_ms: u64,
    /// When the current contact began, while waiting for a touch.
    contact_since: Option<u64>,
    /// Touches are ignored until this time.
    settle_until_ms: u64,
    top_left: RawPoint,
    bottom_right: RawPoint,
    debounce_ms: u64,
    settle_ms: u64,
    step_timeout_ms: u64,
}

impl CalibrationWizard {
    pub const fn new(
        config: &Config,
        now_ms: u64,
    ) -> Self {
        Self {
            step: WizardStep::AwaitingTopLeftTouch,
            step_started_ms: now_ms,
            contact_since: None,
            settle_until_ms: now_ms,
            top_left: RawPoint::new(0, 0),
            bottom_right: RawPoint::new(0, 0),
            debounce_ms: config.calibration_debounce_ms,
            settle_ms: config.calibration_settle_ms,
            step_timeout_ms: config.calibration_step_timeout_ms,
        }
    }

    #[inline]
    pub const fn step(&self) -> WizardStep { self.step }

    #[inline]
    pub const fn is_finished(&self) -> bool { matches!(self.step, WizardStep::Done(_) | WizardStep::Failed(_)) }

    /// Target to draw at `now_ms`, if any. Hidden while settling between targets.
    pub fn target(
        &self,
        now_ms: u64,
    ) -> Option<Point> {
        if now_ms < self.settle_until_ms {
            return None;
        }
        match self.step {
            WizardStep::AwaitingTopLeftTouch | WizardStep::AwaitingTopLeftRelease => Some(TOP_LEFT_TARGET),
            WizardStep::AwaitingBottomRightTouch | WizardStep::AwaitingBottomRightRelease => {
                Some(BOTTOM_RIGHT_TARGET)
            }
            WizardStep::Done(_) | WizardStep::Failed(_) => None,
        }
    }

    /// Advance one tick.
    ///
    /// Returns the outcome on the tick the wizard finishes, `None` otherwise.
    pub fn tick<T: TouchController>(
        &mut self,
        now_ms: u64,
        touch: &mut T,
    ) -> Option<Result<CalibrationBounds, CalibrationError>> {
        if self.is_finished() || now_ms < self.settle_until_ms {
            return None;
        }

        if now_ms.saturating_sub(self.step_started_ms) > self.step_timeout_ms {
            return Some(self.finish(Err(CalibrationError::Timeout)));
        }

        let touched = touch.is_touched();
        match self.step {
            WizardStep::AwaitingTopLeftTouch => {
                if let Some(raw) = self.debounced_sample(touched, now_ms, touch) {
                    self.top_left = raw;
                    self.enter(WizardStep::AwaitingTopLeftRelease, now_ms);
                }
                None
            }
            WizardStep::AwaitingTopLeftRelease => {
                if !touched {
                    self.settle_until_ms = now_ms + self.settle_ms;
                    self.enter(WizardStep::AwaitingBottomRightTouch, self.settle_until_ms);
                }
                None
            }
            WizardStep::AwaitingBottomRightTouch => {
                if let Some(raw) = self.debounced_sample(touched, now_ms, touch) {
                    self.bottom_right = raw;
                    self.enter(WizardStep::AwaitingBottomRightRelease, now_ms);
                }
                None
            }
            WizardStep::AwaitingBottomRightRelease => {
                if touched {
                    return None;
                }
                let bounds = CalibrationBounds::new(
                    self.top_left.x,
                    self.bottom_right.x,
                    self.top_left.y,
                    self.bottom_right.y,
                );
                Some(self.finish(bounds.validated()))
            }
            WizardStep::Done(_) | WizardStep::Failed(_) => None,
        }
    }

    fn debounced_sample<T: TouchController>(
        &mut self,
        touched: bool,
        now_ms: u64,
        touch: &mut T,
    ) -> Option<RawPoint> {
        if !touched {
            self.contact_since = None;
            return None;
        }
        let since = *self.contact_since.get_or_insert(now_ms);
        if now_ms.saturating_sub(since) < self.debounce_ms {
            return None;
        }
        self.contact_since = None;
        Some(touch.read_raw())
    }

    fn enter(
        &mut self,
        step: WizardStep,
        started_ms: u64,
    ) {
        self.step = step;
        self.step_started_ms = started_ms;
        self.contact_since = None;
    }

    fn finish(
        &mut self,
        result: Result<CalibrationBounds, CalibrationError>,
    ) -> Result<CalibrationBounds, CalibrationError> {
        self.step = match result {
            Ok(bounds) => WizardStep::Done(bounds),
            Err(e) => WizardStep::Failed(e),
        };
        result
    }
}
