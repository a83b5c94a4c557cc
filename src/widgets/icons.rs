//! Small vector icons drawn next to the sliders.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};

const SUN_CORE_DIAMETER: u32 = 9;
const SUN_RAY_INNER: f32 = 7.0;
const SUN_RAY_OUTER: f32 = 10.0;
const SUN_RAYS: u32 = 8;

/// Brightness icon: filled disc with eight rays.
pub fn draw_sun<D>(
    display: &mut D,
    center: Point,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Circle::with_center(center, SUN_CORE_DIAMETER)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();

    let ray_style = PrimitiveStyle::with_stroke(color, 1);
    for i in 0..SUN_RAYS {
        let angle = i as f32 * core::f32::consts::TAU / SUN_RAYS as f32;
        let (sin, cos) = (micromath::F32(angle).sin().0, micromath::F32(angle).cos().0);
        let inner = center + Point::new((cos * SUN_RAY_INNER) as i32, (sin * SUN_RAY_INNER) as i32);
        let outer = center + Point::new((cos * SUN_RAY_OUTER) as i32, (sin * SUN_RAY_OUTER) as i32);
        Line::new(inner, outer).into_styled(ray_style).draw(display).ok();
    }
}

/// LED icon: round bulb on a two-leg base.
pub fn draw_led<D>(
    display: &mut D,
    center: Point,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let fill = PrimitiveStyle::with_fill(color);
    let stroke = PrimitiveStyle::with_stroke(color, 1);

    Circle::with_center(center - Point::new(0, 3), 11)
        .into_styled(fill)
        .draw(display)
        .ok();
    Rectangle::new(center + Point::new(-5, 2), Size::new(11, 2))
        .into_styled(fill)
        .draw(display)
        .ok();
    Line::new(center + Point::new(-2, 4), center + Point::new(-2, 9))
        .into_styled(stroke)
        .draw(display)
        .ok();
    Line::new(center + Point::new(2, 4), center + Point::new(2, 7))
        .into_styled(stroke)
        .draw(display)
        .ok();
}
