//! Home screen: dark background with the pull-down panel on top.
//!
//! # Visual Layout
//!
//! ```text
//! ┌────────────────────────────────┐ ─┐
//! │                          3.71V │  │
//! │  *  ━━━━━━━━━━━●──────    70%  │  │ panel (100px), slides in
//! │                                │  │ from y = -100
//! │  o  ●───────────────────    0%  │  │
//! └────────────────────────────────┘ ─┘
//! │                                │
//! │      Swipe down for controls   │
//! │                                │
//! └────────────────────────────────┘
//! ```

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};

use crate::colors::{ACCENT, BACKGROUND, PANEL_BG};
use crate::config::{
    CENTER_X, CENTER_Y, LED_SLIDER_Y, PANEL_HEIGHT, SCREEN_SLIDER_Y, SCREEN_WIDTH, SLIDER_HEIGHT,
};
use crate::panel::{PanelController, is_on_screen};
use crate::render::FULL_SCREEN;
use crate::styles::{HINT_STYLE, LABEL_STYLE_WHITE, RIGHT_MIDDLE, RIGHT_TOP};
use crate::widgets::icons::{draw_led, draw_sun};

// =============================================================================
// Layout Constants
// =============================================================================

/// Inner padding of the panel.
const PANEL_PADDING: i32 = 2;

/// Icon center column.
const ICON_X: i32 = 14;

/// Right edge for right-aligned labels.
const LABEL_RIGHT_X: i32 = SCREEN_WIDTH as i32 - 1 - PANEL_PADDING;

const SCREEN_ROW_Y: i32 = SCREEN_SLIDER_Y + SLIDER_HEIGHT as i32 / 2;
const LED_ROW_Y: i32 = LED_SLIDER_Y + SLIDER_HEIGHT as i32 / 2;
const VOLTAGE_Y: i32 = PANEL_PADDING + 1;

const HINT_TEXT: &str = "Swipe down for controls";
const HINT_POS: Point = Point::new(CENTER_X, CENTER_Y);

const BACKGROUND_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(BACKGROUND);
const PANEL_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(PANEL_BG);

/// Clear the whole screen and draw the static hint.
pub fn draw_background<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    FULL_SCREEN.into_styled(BACKGROUND_FILL).draw(display).ok();

    Text::with_alignment(HINT_TEXT, HINT_POS, HINT_STYLE, Alignment::Center)
        .draw(display)
        .ok();
}

/// Redraw the band the panel can cover, with the panel at its current offset.
pub fn draw_panel<D>(
    display: &mut D,
    panel: &PanelController,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let panel_y = panel.panel_y();
    let panel_bottom = panel_y + PANEL_HEIGHT as i32;

    // Background exposed below a partially hidden panel
    if panel_bottom < PANEL_HEIGHT as i32 {
        let top = panel_bottom.max(0);
        Rectangle::new(
            Point::new(0, top),
            Size::new(SCREEN_WIDTH, (PANEL_HEIGHT as i32 - top) as u32),
        )
        .into_styled(BACKGROUND_FILL)
        .draw(display)
        .ok();
    }

    if !is_on_screen(panel_y) {
        return;
    }

    Rectangle::new(Point::new(0, panel_y), Size::new(SCREEN_WIDTH, PANEL_HEIGHT))
        .into_styled(PANEL_FILL)
        .draw(display)
        .ok();

    Text::with_text_style(
        panel.voltage_label(),
        Point::new(LABEL_RIGHT_X, panel_y + VOLTAGE_Y),
        LABEL_STYLE_WHITE,
        RIGHT_TOP,
    )
    .draw(display)
    .ok();

    draw_sun(display, Point::new(ICON_X, panel_y + SCREEN_ROW_Y), ACCENT);
    panel.screen_slider().draw(display, panel_y);
    Text::with_text_style(
        panel.screen_label(),
        Point::new(LABEL_RIGHT_X, panel_y + SCREEN_ROW_Y),
        LABEL_STYLE_WHITE,
        RIGHT_MIDDLE,
    )
    .draw(display)
    .ok();

    draw_led(display, Point::new(ICON_X, panel_y + LED_ROW_Y), ACCENT);
    panel.led_slider().draw(display, panel_y);
    Text::with_text_style(
        panel.led_label(),
        Point::new(LABEL_RIGHT_X, panel_y + LED_ROW_Y),
        LABEL_STYLE_WHITE,
        RIGHT_MIDDLE,
    )
    .draw(display)
    .ok();
}
