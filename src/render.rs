//! Render state tracking for partial display updates.
//!
//! Only two regions ever change:
//!
//! | Region        | When                                        |
//! |---------------|---------------------------------------------|
//! | Full screen   | First frame, mode switch (calibration)      |
//! | Panel band    | Panel moved, slider/label/voltage changed   |
//!
//! The panel never extends below [`PANEL_HEIGHT`], so everything it can touch
//! lies in the band `0..PANEL_HEIGHT`. Redrawing and flushing just that band
//! keeps a slide frame at 240x100 pixels instead of the whole 240x320 screen.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::config::{PANEL_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Whole screen.
pub const FULL_SCREEN: Rectangle = Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));

/// Rows the pull-down panel can cover.
pub const PANEL_BAND: Rectangle = Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, PANEL_HEIGHT));

/// Area to redraw this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    Full,
    PanelBand,
}

impl Region {
    #[inline]
    pub const fn rect(self) -> Rectangle {
        match self {
            Self::Full => FULL_SCREEN,
            Self::PanelBand => PANEL_BAND,
        }
    }
}

/// Tracks whether the next frame needs a full redraw.
pub struct RenderState {
    /// Whether this is the first frame (need full redraw).
    first_frame: bool,
    /// Whether the screen content was invalidated (mode switch).
    display_cleared: bool,
}

impl RenderState {
    pub const fn new() -> Self {
        Self {
            first_frame: true,
            display_cleared: false,
        }
    }

    /// Request a full redraw on the next frame.
    #[inline]
    pub const fn mark_display_cleared(&mut self) { self.display_cleared = true; }

    #[inline]
    pub const fn needs_full_redraw(&self) -> bool { self.first_frame || self.display_cleared }

    /// Decide the region for this frame and reset the full-redraw flags.
    ///
    /// `panel_dirty` is the panel's own change flag.
    pub const fn take_region(
        &mut self,
        panel_dirty: bool,
    ) -> Option<Region> {
        if self.needs_full_redraw() {
            self.first_frame = false;
            self.display_cleared = false;
            Some(Region::Full)
        } else if panel_dirty {
            Some(Region::PanelBand)
        } else {
            None
        }
    }
}

impl Default for RenderState {
    fn default() -> Self { Self::new() }
}
