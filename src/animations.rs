//! Panel slide animation.
//!
//! The pull-down panel moves between [`PANEL_HIDDEN_Y`] and [`PANEL_SHOWN_Y`]
//! by linear interpolation over a fixed duration. Progress is computed from
//! wall-clock milliseconds, so the slide takes the same time whatever the
//! tick or frame rate.
//!
//! A new slide started mid-animation begins at the current position, so a
//! quick down-then-up swipe reverses smoothly instead of jumping.

use crate::config::{PANEL_HIDDEN_Y, PANEL_SHOWN_Y};

/// What an [`PanelAnimation::update`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationStep {
    /// Not animating.
    Idle,
    /// Position changed, more to come.
    Moved,
    /// Reached the end position on this update.
    Finished,
}

/// Vertical position animation for the panel.
pub struct PanelAnimation {
    from: i32,
    to: i32,
    start_ms: u64,
    duration_ms: u64,
    position: i32,
    running: bool,
}

impl PanelAnimation {
    /// At rest at `position`.
    pub const fn at(position: i32) -> Self {
        Self {
            from: position,
            to: position,
            start_ms: 0,
            duration_ms: 0,
            position,
            running: false,
        }
    }

    /// At rest in the hidden position.
    pub const fn hidden() -> Self { Self::at(PANEL_HIDDEN_Y) }

    #[inline]
    pub const fn position(&self) -> i32 { self.position }

    #[inline]
    pub const fn is_running(&self) -> bool { self.running }

    /// Slide from the current position to `to`.
    pub fn start(
        &mut self,
        to: i32,
        now_ms: u64,
        duration_ms: u64,
    ) {
        self.from = self.position;
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms;
        self.running = true;
    }

    /// Slide to the shown position.
    pub fn show(
        &mut self,
        now_ms: u64,
        duration_ms: u64,
    ) {
        self.start(PANEL_SHOWN_Y, now_ms, duration_ms);
    }

    /// Slide to the hidden position.
    pub fn hide(
        &mut self,
        now_ms: u64,
        duration_ms: u64,
    ) {
        self.start(PANEL_HIDDEN_Y, now_ms, duration_ms);
    }

    /// Advance to `now_ms`.
    pub fn update(
        &mut self,
        now_ms: u64,
    ) -> AnimationStep {
        if !self.running {
            return AnimationStep::Idle;
        }

        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= self.duration_ms {
            self.position = self.to;
            self.running = false;
            return AnimationStep::Finished;
        }

        let span = i64::from(self.to - self.from);
        let offset = span * elapsed as i64 / self.duration_ms as i64;
        let next = self.from + offset as i32;
        if next == self.position {
            return AnimationStep::Idle;
        }
        self.position = next;
        AnimationStep::Moved
    }
}

impl Default for PanelAnimation {
    fn default() -> Self { Self::hidden() }
}
