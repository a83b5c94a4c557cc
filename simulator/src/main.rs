//! Touch panel simulator for Windows/Desktop.
//!
//! Runs the same application shell as the firmware against an
//! embedded-graphics-simulator window.
//!
//! # Controls
//!
//! - **Left mouse button**: finger (tap, drag sliders, swipe)
//! - **C**: start touch calibration
//! - **Escape**: quit
//!
//! Calibration results are kept in RAM only and are lost on exit.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod input;
mod outputs;
mod timing;

use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::{Keycode, MouseButton};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use touch_panel::calibration::RamStorage;
use touch_panel::colors::BLACK;
use touch_panel::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use touch_panel::{App, CalibrationStore, Config, Event};

use crate::input::MouseTouch;
use crate::outputs::SimIo;
use crate::timing::TICK_TIME;

fn main() {
    let size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(size);
    // Shown instead of `display` while the backlight is off
    let mut dark: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(size);
    dark.clear(BLACK).ok();

    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Touch Panel Sim", &output_settings);

    let mut store = CalibrationStore::new(RamStorage::new());
    let bounds = store.load();

    let mut app = App::new(Config::new(), bounds);
    let mut touch = MouseTouch::new();
    let mut io = SimIo::new();
    app.apply_outputs(&mut io);

    // The window must be shown once before it can deliver events
    app.render(&mut display);
    window.update(&display);

    let boot = Instant::now();
    let mut lit = true;

    loop {
        let tick_start = Instant::now();
        let now_ms = boot.elapsed().as_millis() as u64;

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Escape => return,
                        Keycode::C => {
                            println!("[app] calibration started");
                            app.start_calibration(now_ms, &mut io);
                        }
                        _ => {}
                    }
                }
                SimulatorEvent::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    point,
                } => touch.press(point),
                SimulatorEvent::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    ..
                } => touch.release(),
                SimulatorEvent::MouseMove { point } => touch.drag(point),
                _ => {}
            }
        }

        for event in app.tick(now_ms, &mut touch, &mut io) {
            match event {
                Event::CalibrationFinished(bounds) => {
                    println!("[app] calibration finished: {bounds:?}");
                    if let Err(e) = store.save(&bounds) {
                        println!("[app] calibration not saved: {e}");
                    }
                }
                Event::VoltageUpdated(volts) => println!("[app] battery {volts:.2} V"),
                Event::TouchTrace { raw, mapped } => {
                    println!("[touch] Raw: X={}, Y={} | Mapped: X={}, Y={}", raw.x, raw.y, mapped.x, mapped.y);
                }
                other => println!("[app] {other:?}"),
            }
        }

        let redrawn = app.render(&mut display).is_some();
        let now_lit = io.backlight() > 0;
        if redrawn || now_lit != lit {
            window.update(if now_lit { &display } else { &dark });
            lit = now_lit;
        }

        let elapsed = tick_start.elapsed();
        if let Some(remaining) = TICK_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}
