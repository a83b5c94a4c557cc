//! Full-screen views.
//!
//! - **Home** ([`home`]): background plus the pull-down control panel
//! - **Calibration** ([`calibration`]): red targets and the result message
//!
//! Both draw into any `DrawTarget<Color = Rgb565>`; the application shell
//! decides which one is current and which region to flush.

pub mod calibration;
pub mod home;

pub use calibration::{CalibrationView, draw_calibration};
pub use home::{draw_background, draw_panel};
