//! Pull-down control panel: sliders, labels, slide animation and the
//! voltage readout.
//!
//! The [`PanelController`] owns the [`DeviceState`] and is the only place
//! that drives the outputs behind [`DeviceIo`]. The application shell feeds
//! it touch samples, gestures and ticks; it answers with [`Event`]s and
//! marks itself dirty whenever the panel needs to be redrawn.
//!
//! # Output Mapping
//!
//! | Control        | Range    | Output                        | Label            |
//! |----------------|----------|-------------------------------|------------------|
//! | LED slider     | 0..=255  | duty `255 - v` on R, G and B  | `v * 100 / 255`% |
//! | Screen slider  | 10..=255 | backlight duty `v`            | `v * 100 / 255`% |
//! | Battery ADC    | 0..=4095 | `raw / 4095 * 3.3` V          | `{:.2}V`         |

use core::fmt::Write;

use embedded_graphics::prelude::{Point, Size};
use heapless::String;

use crate::animations::{AnimationStep, PanelAnimation};
use crate::app::{Event, Events};
use crate::config::{
    BATTERY_ADC_MAX, BATTERY_VREF, Config, LED_SLIDER_Y, MIN_SCREEN_BRIGHTNESS, PANEL_HIDDEN_Y, SCREEN_SLIDER_Y,
    SLIDER_HEIGHT, SLIDER_WIDTH, SLIDER_X,
};
use crate::gesture::Gesture;
use crate::touch::TouchSample;
use crate::widgets::Slider;

/// Device outputs the panel drives.
pub trait DeviceIo {
    /// Backlight PWM duty, 0 = off.
    fn set_backlight(
        &mut self,
        duty: u8,
    );

    /// PWM duty applied to all three LED channels (active low).
    fn set_led_duty(
        &mut self,
        duty: u8,
    );

    /// One 12-bit battery ADC sample.
    fn read_battery_raw(&mut self) -> u16;
}

impl<T: DeviceIo + ?Sized> DeviceIo for &mut T {
    fn set_backlight(
        &mut self,
        duty: u8,
    ) {
        (**self).set_backlight(duty);
    }

    fn set_led_duty(
        &mut self,
        duty: u8,
    ) {
        (**self).set_led_duty(duty);
    }

    fn read_battery_raw(&mut self) -> u16 { (**self).read_battery_raw() }
}

/// Everything the panel knows about the device.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    pub led_brightness: u8,
    /// Always within `MIN_SCREEN_BRIGHTNESS..=255`.
    pub screen_brightness: u8,
    pub voltage: f32,
    pub panel_visible: bool,
    pub screen_on: bool,
}

/// LED PWM duty for a brightness (the LEDs are wired active low).
#[inline]
pub const fn led_duty(brightness: u8) -> u8 { 255 - brightness }

/// Percentage shown for a 0..=255 value, truncated.
#[inline]
pub const fn percent(value: u8) -> u8 { (value as u32 * 100 / 255) as u8 }

/// Battery ADC reading to volts. Out-of-range readings are clamped.
pub fn adc_to_volts(raw: u16) -> f32 { f32::from(raw.min(BATTERY_ADC_MAX)) / f32::from(BATTERY_ADC_MAX) * BATTERY_VREF }

/// Fixed-capacity label text.
pub type Label = String<8>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActiveSlider {
    Screen,
    Led,
}

/// Panel state machine plus its widgets.
pub struct PanelController {
    state: DeviceState,
    screen_slider: Slider,
    led_slider: Slider,
    animation: PanelAnimation,
    /// Slider owning the current press.
    active: Option<ActiveSlider>,
    /// Next voltage refresh, `None` while the timer is stopped.
    next_voltage_ms: Option<u64>,
    voltage_refresh_ms: u64,
    anim_ms: u64,
    screen_label: Label,
    led_label: Label,
    voltage_label: Label,
    dirty: bool,
}

impl PanelController {
    pub fn new(config: &Config) -> Self {
        let screen_brightness = config.boot_screen_brightness.max(MIN_SCREEN_BRIGHTNESS);
        let slider_size = Size::new(SLIDER_WIDTH, SLIDER_HEIGHT);

        let mut panel = Self {
            state: DeviceState {
                led_brightness: 0,
                screen_brightness,
                voltage: 0.0,
                panel_visible: false,
                screen_on: true,
            },
            screen_slider: Slider::new(
                Point::new(SLIDER_X, SCREEN_SLIDER_Y),
                slider_size,
                MIN_SCREEN_BRIGHTNESS,
                255,
                screen_brightness,
            ),
            led_slider: Slider::new(Point::new(SLIDER_X, LED_SLIDER_Y), slider_size, 0, 255, 0),
            animation: PanelAnimation::hidden(),
            active: None,
            next_voltage_ms: None,
            voltage_refresh_ms: config.voltage_refresh_ms,
            anim_ms: config.panel_anim_ms,
            screen_label: Label::new(),
            led_label: Label::new(),
            voltage_label: Label::new(),
            dirty: true,
        };
        panel.refresh_values();
        panel.set_voltage_label(0.0);
        panel
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub const fn state(&self) -> &DeviceState { &self.state }

    /// Current top edge of the panel in screen coordinates.
    #[inline]
    pub const fn panel_y(&self) -> i32 { self.animation.position() }

    #[inline]
    pub const fn is_animating(&self) -> bool { self.animation.is_running() }

    /// Whether a slider owns the current press.
    #[inline]
    pub const fn is_dragging(&self) -> bool { self.active.is_some() }

    #[inline]
    pub const fn screen_slider(&self) -> &Slider { &self.screen_slider }

    #[inline]
    pub const fn led_slider(&self) -> &Slider { &self.led_slider }

    pub fn screen_label(&self) -> &str { &self.screen_label }

    pub fn led_label(&self) -> &str { &self.led_label }

    pub fn voltage_label(&self) -> &str { &self.voltage_label }

    /// Whether the panel needs a redraw. Clears the flag.
    pub fn take_dirty(&mut self) -> bool { core::mem::take(&mut self.dirty) }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Drive every output from the current state (boot).
    pub fn apply_outputs<IO: DeviceIo>(
        &self,
        io: &mut IO,
    ) {
        io.set_led_duty(led_duty(self.state.led_brightness));
        io.set_backlight(if self.state.screen_on { self.state.screen_brightness } else { 0 });
    }

    /// Set LED brightness. Returns `true` if it changed.
    pub fn set_led_brightness<IO: DeviceIo>(
        &mut self,
        brightness: u8,
        io: &mut IO,
    ) -> bool {
        if brightness == self.state.led_brightness {
            return false;
        }
        self.state.led_brightness = brightness;
        io.set_led_duty(led_duty(brightness));
        self.led_slider.set_value(brightness);
        set_percent_label(&mut self.led_label, brightness);
        self.dirty = true;
        true
    }

    /// Set screen brightness, clamped to `MIN_SCREEN_BRIGHTNESS..=255`.
    ///
    /// The backlight is only driven while the screen is on. Returns `true` if
    /// the stored brightness changed.
    pub fn set_screen_brightness<IO: DeviceIo>(
        &mut self,
        brightness: u8,
        io: &mut IO,
    ) -> bool {
        let brightness = brightness.max(MIN_SCREEN_BRIGHTNESS);
        if brightness == self.state.screen_brightness {
            return false;
        }
        self.state.screen_brightness = brightness;
        if self.state.screen_on {
            io.set_backlight(brightness);
        }
        self.screen_slider.set_value(brightness);
        set_percent_label(&mut self.screen_label, brightness);
        self.dirty = true;
        true
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Feed one touch sample. `press_started` is true on the first pressed
    /// sample of a press.
    ///
    /// A press that starts on a visible slider is owned by that slider until
    /// release; dragging updates the value live.
    pub fn handle_touch<IO: DeviceIo>(
        &mut self,
        sample: &TouchSample,
        press_started: bool,
        io: &mut IO,
    ) -> Option<Event> {
        if !sample.pressed {
            self.active = None;
            return None;
        }
        if press_started {
            self.active = self.slider_at(sample.point());
        }

        match self.active? {
            ActiveSlider::Screen => {
                let value = self.screen_slider.value_at(sample.x);
                self.set_screen_brightness(value, io)
                    .then_some(Event::ScreenBrightnessChanged(self.state.screen_brightness))
            }
            ActiveSlider::Led => {
                let value = self.led_slider.value_at(sample.x);
                self.set_led_brightness(value, io)
                    .then_some(Event::LedChanged(value))
            }
        }
    }

    fn slider_at(
        &self,
        point: Point,
    ) -> Option<ActiveSlider> {
        if !self.state.panel_visible {
            return None;
        }
        let y = self.panel_y();
        if self.screen_slider.contains(point, y) {
            Some(ActiveSlider::Screen)
        } else if self.led_slider.contains(point, y) {
            Some(ActiveSlider::Led)
        } else {
            None
        }
    }

    /// React to a swipe. Down reveals a hidden panel, up hides a shown one.
    pub fn on_gesture(
        &mut self,
        gesture: Gesture,
        now_ms: u64,
    ) -> Option<Event> {
        match gesture {
            Gesture::Down if !self.state.panel_visible => {
                self.state.panel_visible = true;
                self.animation.show(now_ms, self.anim_ms);
                self.next_voltage_ms = Some(now_ms);
                self.dirty = true;
                Some(Event::PanelShown)
            }
            Gesture::Up if self.state.panel_visible => {
                self.state.panel_visible = false;
                self.animation.hide(now_ms, self.anim_ms);
                self.next_voltage_ms = None;
                self.active = None;
                self.dirty = true;
                Some(Event::PanelHidden)
            }
            _ => None,
        }
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Advance the slide animation and the voltage timer.
    pub fn tick<IO: DeviceIo>(
        &mut self,
        now_ms: u64,
        io: &mut IO,
        events: &mut Events,
    ) {
        match self.animation.update(now_ms) {
            AnimationStep::Idle => {}
            AnimationStep::Moved => self.dirty = true,
            AnimationStep::Finished => {
                self.dirty = true;
                if self.state.panel_visible {
                    self.refresh_values();
                    self.next_voltage_ms = Some(now_ms);
                }
            }
        }

        if let Some(due) = self.next_voltage_ms
            && now_ms >= due
        {
            self.next_voltage_ms = Some(now_ms + self.voltage_refresh_ms);
            if let Some(volts) = self.update_voltage(io) {
                events.push(Event::VoltageUpdated(volts)).ok();
            }
        }
    }

    /// Take one battery reading. Skipped while the panel is hidden or the
    /// screen is off.
    pub fn update_voltage<IO: DeviceIo>(
        &mut self,
        io: &mut IO,
    ) -> Option<f32> {
        if !self.state.panel_visible || !self.state.screen_on {
            return None;
        }
        let volts = adc_to_volts(io.read_battery_raw());
        self.state.voltage = volts;
        self.set_voltage_label(volts);
        self.dirty = true;
        Some(volts)
    }

    // =========================================================================
    // Sleep
    // =========================================================================

    /// Screen off: backlight to zero, voltage timer paused.
    pub fn sleep<IO: DeviceIo>(
        &mut self,
        io: &mut IO,
    ) {
        self.state.screen_on = false;
        self.active = None;
        io.set_backlight(0);
    }

    /// Screen on: restore the backlight, resync widgets and restart the
    /// voltage timer if the panel is shown.
    pub fn wake<IO: DeviceIo>(
        &mut self,
        now_ms: u64,
        io: &mut IO,
    ) {
        self.state.screen_on = true;
        io.set_backlight(self.state.screen_brightness);
        self.refresh_values();
        if self.state.panel_visible {
            self.next_voltage_ms = Some(now_ms);
        }
    }

    /// Push the stored values back into sliders and labels.
    pub fn refresh_values(&mut self) {
        self.screen_slider.set_value(self.state.screen_brightness);
        self.led_slider.set_value(self.state.led_brightness);
        set_percent_label(&mut self.screen_label, self.state.screen_brightness);
        set_percent_label(&mut self.led_label, self.state.led_brightness);
        self.dirty = true;
    }

    fn set_voltage_label(
        &mut self,
        volts: f32,
    ) {
        self.voltage_label.clear();
        write!(self.voltage_label, "{volts:.2}V").ok();
    }
}

fn set_percent_label(
    label: &mut Label,
    value: u8,
) {
    label.clear();
    write!(label, "{}%", percent(value)).ok();
}

/// Whether the panel covers any row at `panel_y`.
#[inline]
pub const fn is_on_screen(panel_y: i32) -> bool { panel_y > PANEL_HIDDEN_Y }

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeIo {
        backlight: Option<u8>,
        led_duty: Option<u8>,
        battery_raw: u16,
        battery_reads: u32,
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

        fn read_battery_raw(&mut self) -> u16 {
            self.battery_reads += 1;
            self.battery_raw
        }
    }

    fn pressed(
        x: i32,
        y: i32,
    ) -> TouchSample {
        TouchSample { x, y, pressed: true }
    }

    fn shown_panel(io: &mut FakeIo) -> PanelController {
        let mut panel = PanelController::new(&Config::new());
        let mut events = Events::new();
        panel.on_gesture(Gesture::Down, 0);
        panel.tick(200, io, &mut events);
        panel
    }

    #[test]
    fn test_boot_state() {
        let panel = PanelController::new(&Config::new());
        let state = panel.state();
        assert_eq!(state.led_brightness, 0);
        assert_eq!(state.screen_brightness, 180);
        assert!(!state.panel_visible);
        assert!(state.screen_on);
        assert_eq!(panel.led_label(), "0%");
        assert_eq!(panel.screen_label(), "70%");
        assert_eq!(panel.voltage_label(), "0.00V");
        assert_eq!(panel.panel_y(), -100);
    }

    #[test]
    fn test_apply_outputs_at_boot() {
        let panel = PanelController::new(&Config::new());
        let mut io = FakeIo::default();
        panel.apply_outputs(&mut io);
        assert_eq!(io.led_duty, Some(255));
        assert_eq!(io.backlight, Some(180));
    }

    #[test]
    fn test_led_half_brightness() {
        let mut panel = PanelController::new(&Config::new());
        let mut io = FakeIo::default();
        assert!(panel.set_led_brightness(128, &mut io));
        assert_eq!(io.led_duty, Some(127));
        assert_eq!(panel.led_label(), "50%");
    }

    #[test]
    fn test_led_full_and_off() {
        let mut panel = PanelController::new(&Config::new());
        let mut io = FakeIo::default();
        panel.set_led_brightness(255, &mut io);
        assert_eq!(io.led_duty, Some(0));
        assert_eq!(panel.led_label(), "100%");
        panel.set_led_brightness(0, &mut io);
        assert_eq!(io.led_duty, Some(255));
        assert_eq!(panel.led_label(), "0%");
    }

    #[test]
    fn test_screen_brightness_clamped_to_minimum() {
        let mut panel = PanelController::new(&Config::new());
        let mut io = FakeIo::default();
        panel.set_screen_brightness(3, &mut io);
        assert_eq!(panel.state().screen_brightness, 10);
        assert_eq!(io.backlight, Some(10));
        assert_eq!(panel.screen_label(), "3%");
    }

    #[test]
    fn test_adc_conversion() {
        assert_eq!(adc_to_volts(0), 0.0);
        assert!((adc_to_volts(4095) - 3.3).abs() < 1e-6);
        assert!((adc_to_volts(2048) - 1.650_4).abs() < 1e-3);
        assert_eq!(adc_to_volts(u16::MAX), adc_to_volts(4095));
    }

    #[test]
    fn test_reveal_starts_voltage_immediately() {
        let mut panel = PanelController::new(&Config::new());
        let mut io = FakeIo {
            battery_raw: 4095,
            ..FakeIo::default()
        };
        let mut events = Events::new();

        assert_eq!(panel.on_gesture(Gesture::Down, 1_000), Some(Event::PanelShown));
        panel.tick(1_000, &mut io, &mut events);
        assert_eq!(io.battery_reads, 1);
        assert_eq!(panel.voltage_label(), "3.30V");
        assert!(matches!(events.as_slice(), [Event::VoltageUpdated(_)]));
    }

    #[test]
    fn test_reveal_animates_to_zero() {
        let mut panel = PanelController::new(&Config::new());
        let mut io = FakeIo::default();
        let mut events = Events::new();
        panel.on_gesture(Gesture::Down, 0);
        panel.tick(100, &mut io, &mut events);
        assert_eq!(panel.panel_y(), -50);
        panel.tick(200, &mut io, &mut events);
        assert_eq!(panel.panel_y(), 0);
        assert!(!panel.is_animating());
    }

    #[test]
    fn test_voltage_refreshes_every_period() {
        let mut io = FakeIo::default();
        let mut panel = shown_panel(&mut io);
        let reads = io.battery_reads;
        let mut events = Events::new();

        panel.tick(500, &mut io, &mut events);
        assert_eq!(io.battery_reads, reads);
        panel.tick(700, &mut io, &mut events);
        assert_eq!(io.battery_reads, reads + 1);
    }

    #[test]
    fn test_hide_stops_voltage_timer() {
        let mut io = FakeIo::default();
        let mut panel = shown_panel(&mut io);
        assert_eq!(panel.on_gesture(Gesture::Up, 300), Some(Event::PanelHidden));
        let reads = io.battery_reads;
        let mut events = Events::new();
        for now in (300..3_000).step_by(5) {
            panel.tick(now, &mut io, &mut events);
        }
        assert_eq!(io.battery_reads, reads);
        assert_eq!(panel.panel_y(), -100);
    }

    #[test]
    fn test_repeated_gestures_ignored() {
        let mut io = FakeIo::default();
        let mut panel = shown_panel(&mut io);
        assert_eq!(panel.on_gesture(Gesture::Down, 300), None);
        panel.on_gesture(Gesture::Up, 400);
        assert_eq!(panel.on_gesture(Gesture::Up, 500), None);
    }

    #[test]
    fn test_no_voltage_while_asleep() {
        let mut io = FakeIo::default();
        let mut panel = shown_panel(&mut io);
        panel.sleep(&mut io);
        assert_eq!(io.backlight, Some(0));
        assert_eq!(panel.update_voltage(&mut io), None);
    }

    #[test]
    fn test_wake_restores_last_brightness() {
        let mut io = FakeIo::default();
        let mut panel = PanelController::new(&Config::new());
        panel.set_screen_brightness(200, &mut io);
        panel.sleep(&mut io);

        // Slider changes while asleep do not light the screen
        panel.set_screen_brightness(220, &mut io);
        assert_eq!(io.backlight, Some(0));

        panel.wake(40_000, &mut io);
        assert_eq!(io.backlight, Some(220));
        assert!(panel.state().screen_on);
    }

    #[test]
    fn test_drag_led_slider() {
        let mut io = FakeIo::default();
        let mut panel = shown_panel(&mut io);

        let event = panel.handle_touch(&pressed(113, 65), true, &mut io);
        assert_eq!(event, Some(Event::LedChanged(128)));
        assert!(panel.is_dragging());
        assert_eq!(io.led_duty, Some(127));

        // Dragging off the track keeps control of the slider
        let event = panel.handle_touch(&pressed(250, 150), false, &mut io);
        assert_eq!(event, Some(Event::LedChanged(255)));

        let released = TouchSample {
            x: 250,
            y: 150,
            pressed: false,
        };
        assert_eq!(panel.handle_touch(&released, false, &mut io), None);
        assert!(!panel.is_dragging());
    }

    #[test]
    fn test_drag_screen_slider() {
        let mut io = FakeIo::default();
        let mut panel = shown_panel(&mut io);
        let event = panel.handle_touch(&pressed(33, 25), true, &mut io);
        assert_eq!(event, Some(Event::ScreenBrightnessChanged(10)));
        assert_eq!(io.backlight, Some(10));
    }

    #[test]
    fn test_hidden_panel_sliders_not_hit() {
        let mut panel = PanelController::new(&Config::new());
        let mut io = FakeIo::default();
        assert_eq!(panel.handle_touch(&pressed(113, 65), true, &mut io), None);
        assert!(!panel.is_dragging());
    }

    #[test]
    fn test_press_elsewhere_is_not_claimed() {
        let mut io = FakeIo::default();
        let mut panel = shown_panel(&mut io);
        assert_eq!(panel.handle_touch(&pressed(120, 200), true, &mut io), None);
        assert!(!panel.is_dragging());

        // Moving onto a slider mid-press does not grab it
        assert_eq!(panel.handle_touch(&pressed(113, 65), false, &mut io), None);
    }

    #[test]
    fn test_dirty_flag() {
        let mut panel = PanelController::new(&Config::new());
        assert!(panel.take_dirty());
        assert!(!panel.take_dirty());
        let mut io = FakeIo::default();
        panel.set_led_brightness(10, &mut io);
        assert!(panel.take_dirty());
    }
}
