//! Touch panel core: everything between the touch chip and the pixels.
//!
//! This crate is platform-agnostic and shared by the RP2350 firmware
//! (`pico2/`) and the desktop simulator (`simulator/`):
//!
//! - [`touch`]: raw sample → calibrated, clamped screen point; wake-tap handling
//! - [`xpt2046`]: conversion frame layout of the touch controller
//! - [`calibration`]: bounds, persisted record, store and wizard
//! - [`sleep`]: idle tracking and the two-state screen sleep machine
//! - [`gesture`]: vertical swipe detection
//! - [`panel`]: sliders, device outputs and the voltage readout
//! - [`animations`]: panel slide animation
//! - [`render`]: dirty-region tracking
//! - [`screens`], [`widgets`], [`styles`], [`colors`]: drawing
//! - [`app`]: the shell that ties it all together
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), while the firmware builds
//! the crate as `no_std`. Enable the `defmt` feature to derive
//! `defmt::Format` on the public types.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Configuration
pub mod config;

// Input pipeline
pub mod calibration;
pub mod gesture;
pub mod sleep;
pub mod touch;
pub mod xpt2046;

// UI state
pub mod animations;
pub mod app;
pub mod panel;

// Rendering
pub mod colors;
pub mod render;
pub mod screens;
pub mod styles;
pub mod widgets;

// Re-export commonly used items
pub use app::{App, Event, Events};
pub use calibration::{CalibrationBounds, CalibrationStorage, CalibrationStore};
pub use config::Config;
pub use panel::{DeviceIo, DeviceState};
pub use touch::{RawPoint, TouchController, TouchSample};
