//! Application shell: owns every component and runs one iteration per tick.
//!
//! # Tick Order (running mode)
//!
//! 1. Poll the touch sampler (may wake the screen; the wake tap is swallowed)
//! 2. Feed the gesture detector and the panel's sliders
//! 3. Apply a gesture unless a slider owns the press
//! 4. Advance the panel animation and the voltage timer
//! 5. Evaluate the idle timeout
//!
//! # Modes
//!
//! ```text
//! Running ──start_calibration──▶ Calibrating ──done/failed──▶ ShowingResult ──1s──▶ Running
//! ```
//!
//! The shell never logs. Everything worth reporting comes back from
//! [`App::tick`] as an [`Event`], which the firmware prints over defmt and
//! the simulator prints to stdout.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::calibration::{CalibrationBounds, CalibrationError, CalibrationWizard};
use crate::config::Config;
use crate::gesture::GestureDetector;
use crate::panel::{DeviceIo, DeviceState, PanelController};
use crate::render::{Region, RenderState};
use crate::screens::{CalibrationView, draw_background, draw_calibration, draw_panel};
use crate::sleep::ActivityTracker;
use crate::touch::{RawPoint, TouchController, TouchSample, TouchSampler};

/// Something that happened during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Idle timeout reached, backlight off.
    Slept,
    /// Wake tap, backlight restored.
    Woke,
    /// Accepted press: raw reading and where it landed on screen. Emitted
    /// every tick while pressed, for checking calibration on hardware.
    TouchTrace {
        raw: RawPoint,
        mapped: TouchSample,
    },
    PanelShown,
    PanelHidden,
    /// LED slider moved to this brightness.
    LedChanged(u8),
    /// Screen slider moved to this brightness.
    ScreenBrightnessChanged(u8),
    /// New battery reading, in volts.
    VoltageUpdated(f32),
    /// Calibration succeeded; the bounds are already in use and should be saved.
    CalibrationFinished(CalibrationBounds),
    CalibrationFailed(CalibrationError),
}

/// Maximum number of events a single tick can produce.
pub const MAX_EVENTS: usize = 8;

/// Events from one tick.
pub type Events = Vec<Event, MAX_EVENTS>;

enum Mode {
    Running,
    Calibrating(CalibrationWizard),
    ShowingResult {
        outcome: Result<CalibrationBounds, CalibrationError>,
        until_ms: u64,
    },
}

/// The whole device behind its capability traits.
pub struct App {
    config: Config,
    sampler: TouchSampler,
    activity: ActivityTracker,
    gestures: GestureDetector,
    panel: PanelController,
    mode: Mode,
    render: RenderState,
    /// Calibration view currently on screen.
    drawn_view: Option<CalibrationView>,
    was_pressed: bool,
    now_ms: u64,
}

impl App {
    /// Build the shell with the loaded calibration. The idle clock starts at 0 ms.
    pub fn new(
        config: Config,
        bounds: CalibrationBounds,
    ) -> Self {
        Self {
            sampler: TouchSampler::new(bounds),
            activity: ActivityTracker::new(0, config.screen_timeout_ms),
            gestures: GestureDetector::new(),
            panel: PanelController::new(&config),
            mode: Mode::Running,
            render: RenderState::new(),
            drawn_view: None,
            was_pressed: false,
            now_ms: 0,
            config,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub const fn state(&self) -> &DeviceState { self.panel.state() }

    #[inline]
    pub const fn panel(&self) -> &PanelController { &self.panel }

    #[inline]
    pub const fn bounds(&self) -> &CalibrationBounds { self.sampler.bounds() }

    #[inline]
    pub const fn is_awake(&self) -> bool { self.activity.is_awake() }

    #[inline]
    pub const fn is_calibrating(&self) -> bool { !matches!(self.mode, Mode::Running) }

    // =========================================================================
    // Control
    // =========================================================================

    /// Drive all outputs from the initial state. Call once at boot.
    pub fn apply_outputs<IO: DeviceIo>(
        &self,
        io: &mut IO,
    ) {
        self.panel.apply_outputs(io);
    }

    /// Switch to the calibration wizard. Wakes the screen if needed.
    pub fn start_calibration<IO: DeviceIo>(
        &mut self,
        now_ms: u64,
        io: &mut IO,
    ) {
        if self.activity.wake(now_ms) {
            self.panel.wake(now_ms, io);
        }
        self.mode = Mode::Calibrating(CalibrationWizard::new(&self.config, now_ms));
        self.drawn_view = None;
        self.now_ms = now_ms;
    }

    /// Run one iteration of the main loop.
    pub fn tick<T: TouchController, IO: DeviceIo>(
        &mut self,
        now_ms: u64,
        touch: &mut T,
        io: &mut IO,
    ) -> Events {
        self.now_ms = now_ms;
        let mut events = Events::new();

        match &mut self.mode {
            Mode::Running => self.tick_running(now_ms, touch, io, &mut events),
            Mode::Calibrating(wizard) => {
                if let Some(outcome) = wizard.tick(now_ms, touch) {
                    self.finish_calibration(outcome, now_ms, &mut events);
                }
            }
            Mode::ShowingResult { until_ms, .. } => {
                if now_ms >= *until_ms {
                    self.mode = Mode::Running;
                    self.drawn_view = None;
                    self.render.mark_display_cleared();
                    self.activity.record_activity(now_ms);
                }
            }
        }

        events
    }

    fn tick_running<T: TouchController, IO: DeviceIo>(
        &mut self,
        now_ms: u64,
        touch: &mut T,
        io: &mut IO,
        events: &mut Events,
    ) {
        let reading = self.sampler.poll(touch, &mut self.activity, now_ms);
        if reading.woke {
            self.panel.wake(now_ms, io);
            events.push(Event::Woke).ok();
        }

        let sample = reading.sample;
        let press_started = sample.pressed && !self.was_pressed;
        self.was_pressed = sample.pressed;
        if sample.pressed {
            self.activity.record_activity(now_ms);
            if let Some(raw) = self.sampler.last_raw() {
                events.push(Event::TouchTrace { raw, mapped: sample }).ok();
            }
        }

        // Gesture detector must see the first sample of a press before a
        // slider can claim it.
        let gesture = self.gestures.update(&sample);
        if let Some(event) = self.panel.handle_touch(&sample, press_started, io) {
            events.push(event).ok();
        }
        if self.panel.is_dragging() {
            self.gestures.claim_press();
        } else if let Some(gesture) = gesture {
            self.activity.record_activity(now_ms);
            if let Some(event) = self.panel.on_gesture(gesture, now_ms) {
                events.push(event).ok();
            }
        }

        self.panel.tick(now_ms, io, events);

        if self.activity.check_timeout(now_ms) {
            self.panel.sleep(io);
            events.push(Event::Slept).ok();
        }
    }

    fn finish_calibration(
        &mut self,
        outcome: Result<CalibrationBounds, CalibrationError>,
        now_ms: u64,
        events: &mut Events,
    ) {
        match outcome {
            Ok(bounds) => {
                self.sampler.set_bounds(bounds);
                events.push(Event::CalibrationFinished(bounds)).ok();
            }
            Err(error) => {
                events.push(Event::CalibrationFailed(error)).ok();
            }
        }
        self.mode = Mode::ShowingResult {
            outcome,
            until_ms: now_ms + self.config.calibration_result_ms,
        };
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Draw whatever changed since the last call.
    ///
    /// Returns the area that must be flushed to the panel, or `None` if
    /// nothing changed or the screen is asleep.
    pub fn render<D>(
        &mut self,
        display: &mut D,
    ) -> Option<Rectangle>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if !self.activity.is_awake() {
            return None;
        }

        let view = match &self.mode {
            Mode::Running => None,
            Mode::Calibrating(wizard) => Some(CalibrationView::Target(wizard.target(self.now_ms))),
            Mode::ShowingResult { outcome, .. } => Some(match outcome {
                Ok(_) => CalibrationView::Succeeded,
                Err(error) => CalibrationView::Failed(*error),
            }),
        };

        if let Some(view) = view {
            if self.drawn_view == Some(view) {
                return None;
            }
            draw_calibration(display, view);
            self.drawn_view = Some(view);
            self.render.mark_display_cleared();
            return Some(Region::Full.rect());
        }

        let region = self.render.take_region(self.panel.take_dirty())?;
        if region == Region::Full {
            draw_background(display);
        }
        draw_panel(display, &self.panel);
        Some(region.rect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CALIBRATION;
    use crate::render::{FULL_SCREEN, PANEL_BAND};

    use embedded_graphics::prelude::{OriginDimensions, Pixel, Point, Size};

    // =========================================================================
    // Fakes
    // =========================================================================

    #[derive(Default)]
    struct FakeTouch {
        current: Option<RawPoint>,
    }

    impl FakeTouch {
        /// Press at a screen point, using the inverse of the default mapping.
        fn press(
            &mut self,
            x: i32,
            y: i32,
        ) {
            let b = DEFAULT_CALIBRATION;
            let raw_x = b.x_max - x * (b.x_max - b.x_min) / 240;
            let raw_y = b.y_max - y * (b.y_max - b.y_min) / 320;
            self.current = Some(RawPoint::new(raw_x, raw_y));
        }

        fn release(&mut self) { self.current = None; }
    }

    impl TouchController for FakeTouch {
        fn is_touched(&mut self) -> bool { self.current.is_some() }

        fn read_raw(&mut self) -> RawPoint { self.current.unwrap_or_default() }
    }

    #[derive(Default)]
    struct FakeIo {
        backlight: Option<u8>,
        led_duty: Option<u8>,
    }

    impl DeviceIo for FakeIo {
        fn set_backlight(
            &mut self,
            duty: u8,
        ) {
            self.backlight = Some(duty);
        }

        fn set_led_duty(
            &mut self,
            duty: u8,
        ) {
            self.led_duty = Some(duty);
        }

        fn read_battery_raw(&mut self) -> u16 { 2048 }
    }

    /// 240x320 frame that only counts drawn pixels.
    struct CountingDisplay {
        pixels: usize,
    }

    impl OriginDimensions for CountingDisplay {
        fn size(&self) -> Size { Size::new(240, 320) }
    }

    impl DrawTarget for CountingDisplay {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(
            &mut self,
            pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.pixels += pixels.into_iter().count();
            Ok(())
        }
    }

    struct Harness {
        app: App,
        touch: FakeTouch,
        io: FakeIo,
        now: u64,
        events: std::vec::Vec<Event>,
    }

    impl Harness {
        fn new() -> Self {
            let app = App::new(Config::new(), DEFAULT_CALIBRATION);
            let mut io = FakeIo::default();
            app.apply_outputs(&mut io);
            Self {
                app,
                touch: FakeTouch::default(),
                io,
                now: 0,
                events: std::vec::Vec::new(),
            }
        }

        /// Tick every 5 ms for `ms` milliseconds.
        fn run(
            &mut self,
            ms: u64,
        ) {
            let end = self.now + ms;
            while self.now < end {
                self.now += 5;
                let events = self.app.tick(self.now, &mut self.touch, &mut self.io);
                self.events.extend(events);
            }
        }

        fn swipe(
            &mut self,
            from_y: i32,
            to_y: i32,
        ) {
            let steps = 10;
            for i in 0..=steps {
                self.touch.press(120, from_y + (to_y - from_y) * i / steps);
                self.run(10);
            }
            self.touch.release();
            self.run(10);
        }
    }

    // =========================================================================
    // Tests
    // =========================================================================

    #[test]
    fn test_press_reports_raw_and_mapped_point() {
        let mut harness = Harness::new();
        harness.touch.current = Some(RawPoint::new(350, 3850));
        harness.run(5);
        let trace = harness.events.iter().find_map(|e| match e {
            Event::TouchTrace { raw, mapped } => Some((*raw, *mapped)),
            _ => None,
        });
        let (raw, mapped) = trace.unwrap();
        assert_eq!(raw, RawPoint::new(350, 3850));
        assert_eq!(mapped.point(), Point::new(240, 0));
        assert!(mapped.pressed);

        harness.touch.release();
        harness.events.clear();
        harness.run(20);
        assert!(!harness.events.iter().any(|e| matches!(e, Event::TouchTrace { .. })));
    }

    #[test]
    fn test_boot_outputs() {
        let harness = Harness::new();
        assert_eq!(harness.io.backlight, Some(180));
        assert_eq!(harness.io.led_duty, Some(255));
        assert!(harness.app.is_awake());
    }

    #[test]
    fn test_idle_timeout_sleeps() {
        let mut harness = Harness::new();
        harness.run(30_000);
        assert!(harness.app.is_awake());
        harness.run(10);
        assert!(!harness.app.is_awake());
        assert_eq!(harness.io.backlight, Some(0));
        assert!(harness.events.contains(&Event::Slept));
    }

    #[test]
    fn test_wake_tap_restores_brightness_without_interaction() {
        let mut harness = Harness::new();
        harness.run(30_100);
        assert!(!harness.app.is_awake());

        // Tap where the LED slider would be; it must not change anything
        harness.touch.press(113, 65);
        harness.run(50);
        assert!(harness.app.is_awake());
        assert_eq!(harness.io.backlight, Some(180));
        assert!(harness.events.contains(&Event::Woke));
        assert_eq!(harness.app.state().led_brightness, 0);
    }

    #[test]
    fn test_swipe_down_shows_panel() {
        let mut harness = Harness::new();
        harness.swipe(150, 250);
        assert!(harness.events.contains(&Event::PanelShown));
        assert!(harness.app.state().panel_visible);
        harness.run(300);
        assert_eq!(harness.app.panel().panel_y(), 0);
        assert!(harness.events.iter().any(|e| matches!(e, Event::VoltageUpdated(_))));
    }

    #[test]
    fn test_swipe_up_hides_panel() {
        let mut harness = Harness::new();
        harness.swipe(150, 250);
        harness.run(300);
        harness.swipe(250, 150);
        assert!(harness.events.contains(&Event::PanelHidden));
        harness.run(300);
        assert_eq!(harness.app.panel().panel_y(), -100);
    }

    #[test]
    fn test_slider_drag_is_not_a_gesture() {
        let mut harness = Harness::new();
        harness.swipe(150, 250);
        harness.run(300);

        // Start on the LED slider, drag far down
        harness.touch.press(113, 65);
        harness.run(20);
        harness.touch.press(113, 200);
        harness.run(20);
        harness.touch.release();
        harness.run(10);

        assert!(harness.events.iter().any(|e| matches!(e, Event::LedChanged(_))));
        assert_eq!(harness.app.state().led_brightness, 128);
        assert_eq!(harness.io.led_duty, Some(127));
        assert!(harness.app.state().panel_visible);
    }

    #[test]
    fn test_interaction_postpones_sleep() {
        let mut harness = Harness::new();
        harness.run(20_000);
        harness.touch.press(120, 200);
        harness.run(10);
        harness.touch.release();
        harness.run(25_000);
        assert!(harness.app.is_awake());
    }

    #[test]
    fn test_render_full_then_band_then_nothing() {
        let mut harness = Harness::new();
        let mut display = CountingDisplay { pixels: 0 };

        assert_eq!(harness.app.render(&mut display), Some(FULL_SCREEN));
        assert!(display.pixels > 0);
        assert_eq!(harness.app.render(&mut display), None);

        harness.swipe(150, 250);
        assert_eq!(harness.app.render(&mut display), Some(PANEL_BAND));
    }

    #[test]
    fn test_render_nothing_while_asleep() {
        let mut harness = Harness::new();
        let mut display = CountingDisplay { pixels: 0 };
        harness.run(30_100);
        assert_eq!(harness.app.render(&mut display), None);
        assert_eq!(display.pixels, 0);
    }

    #[test]
    fn test_calibration_applies_new_bounds() {
        let mut harness = Harness::new();
        let mut display = CountingDisplay { pixels: 0 };
        harness.app.start_calibration(harness.now, &mut harness.io);
        assert!(harness.app.is_calibrating());
        assert_eq!(harness.app.render(&mut display), Some(FULL_SCREEN));

        harness.touch.current = Some(RawPoint::new(3800, 3700));
        harness.run(100);
        harness.touch.release();
        harness.run(600);
        harness.touch.current = Some(RawPoint::new(400, 500));
        harness.run(100);
        harness.touch.release();
        harness.run(10);

        let expected = CalibrationBounds::new(400, 3800, 500, 3700);
        assert!(harness.events.contains(&Event::CalibrationFinished(expected)));
        assert_eq!(harness.app.bounds(), &expected);

        harness.run(1_000);
        assert!(!harness.app.is_calibrating());
        assert_eq!(harness.app.render(&mut display), Some(FULL_SCREEN));
    }

    #[test]
    fn test_calibration_timeout_keeps_old_bounds() {
        let mut harness = Harness::new();
        harness.app.start_calibration(harness.now, &mut harness.io);
        harness.run(15_010);
        assert!(harness.events.contains(&Event::CalibrationFailed(CalibrationError::Timeout)));
        assert_eq!(harness.app.bounds(), &DEFAULT_CALIBRATION);
    }

    #[test]
    fn test_no_sleep_during_calibration() {
        let mut harness = Harness::new();
        harness.run(25_000);
        harness.app.start_calibration(harness.now, &mut harness.io);
        harness.run(10_000);
        assert!(harness.app.is_calibrating());
        assert!(harness.app.is_awake());
        assert_eq!(harness.io.backlight, Some(180));
    }

    #[test]
    fn test_mapping_inverse_used_by_fake() {
        let mut touch = FakeTouch::default();
        touch.press(113, 65);
        let raw = touch.read_raw();
        let point = crate::touch::map_to_screen(raw, &DEFAULT_CALIBRATION);
        assert!((point - Point::new(113, 65)).x.abs() <= 1);
        assert!((point - Point::new(113, 65)).y.abs() <= 1);
    }
}
