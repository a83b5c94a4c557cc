//! Calibration screen: instructions plus the current red target, then the
//! result message.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::calibration::CalibrationError;
use crate::colors::{BLACK, RED};
use crate::config::CALIBRATION_TARGET_RADIUS;
use crate::render::FULL_SCREEN;
use crate::styles::{LEFT_TOP, MESSAGE_STYLE_GREEN, MESSAGE_STYLE_RED, MESSAGE_STYLE_WHITE};

const MESSAGE_POS: Point = Point::new(10, 10);
const DETAIL_POS: Point = Point::new(10, 30);

const BLACK_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(BLACK);
const TARGET_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(RED);

/// What the calibration screen shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationView {
    /// Waiting for a touch; `None` between targets.
    Target(Option<Point>),
    Succeeded,
    Failed(CalibrationError),
}

pub fn draw_calibration<D>(
    display: &mut D,
    view: CalibrationView,
) where
    D: DrawTarget<Color = Rgb565>,
{
    FULL_SCREEN.into_styled(BLACK_FILL).draw(display).ok();

    match view {
        CalibrationView::Target(target) => {
            Text::with_text_style("Touch the RED dots", MESSAGE_POS, MESSAGE_STYLE_WHITE, LEFT_TOP)
                .draw(display)
                .ok();
            if let Some(center) = target {
                Circle::with_center(center, CALIBRATION_TARGET_RADIUS * 2)
                    .into_styled(TARGET_FILL)
                    .draw(display)
                    .ok();
            }
        }
        CalibrationView::Succeeded => {
            Text::with_text_style("Calibration Complete!", MESSAGE_POS, MESSAGE_STYLE_GREEN, LEFT_TOP)
                .draw(display)
                .ok();
        }
        CalibrationView::Failed(error) => {
            Text::with_text_style("Calibration failed", MESSAGE_POS, MESSAGE_STYLE_RED, LEFT_TOP)
                .draw(display)
                .ok();
            let mut detail: String<40> = String::new();
            write!(detail, "{error}").ok();
            Text::with_text_style(&detail, DETAIL_POS, MESSAGE_STYLE_WHITE, LEFT_TOP)
                .draw(display)
                .ok();
        }
    }
}
