//! Widget components for the control panel.
//!
//! - [`slider`]: horizontal slider with hit testing and value mapping
//! - [`icons`]: brightness and LED icons beside the sliders
//!
//! Widgets draw into any `DrawTarget<Color = Rgb565>` and take the panel's
//! current vertical offset, so the same code renders the panel at rest and
//! mid-slide.

pub mod icons;
pub mod slider;

pub use slider::Slider;
