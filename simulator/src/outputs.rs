//! Simulated backlight, LED and battery.

use std::time::Instant;

use touch_panel::DeviceIo;
use touch_panel::config::{BATTERY_ADC_MAX, BATTERY_VREF};

use crate::timing::BATTERY_CYCLE;

/// Battery swing of the fake discharge curve, in volts.
const BATTERY_MIN_V: f32 = 2.9;
const BATTERY_MAX_V: f32 = 3.2;

pub struct SimIo {
    backlight: u8,
    led_duty: u8,
    started: Instant,
}

impl SimIo {
    pub fn new() -> Self {
        Self {
            backlight: 0,
            led_duty: u8::MAX,
            started: Instant::now(),
        }
    }

    /// Current backlight duty; 0 means the window shows a dark screen.
    #[inline]
    pub const fn backlight(&self) -> u8 { self.backlight }
}

impl Default for SimIo {
    fn default() -> Self { Self::new() }
}

impl DeviceIo for SimIo {
    fn set_backlight(
        &mut self,
        duty: u8,
    ) {
        if duty != self.backlight {
            println!("[io] backlight duty {duty}");
        }
        self.backlight = duty;
    }

    fn set_led_duty(
        &mut self,
        duty: u8,
    ) {
        if duty != self.led_duty {
            println!("[io] led duty {duty} (active low)");
        }
        self.led_duty = duty;
    }

    fn read_battery_raw(&mut self) -> u16 {
        let t = self.started.elapsed().as_secs_f32() / BATTERY_CYCLE.as_secs_f32();
        let volts = fake_signal(t, BATTERY_MIN_V, BATTERY_MAX_V);
        (volts / BATTERY_VREF * f32::from(BATTERY_ADC_MAX)) as u16
    }
}

/// Sine between `min` and `max`, one period per unit of `t`.
fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
) -> f32 {
    let normalized = (t * std::f32::consts::TAU).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_signal_stays_in_range() {
        for i in 0..100 {
            let v = fake_signal(i as f32 / 37.0, BATTERY_MIN_V, BATTERY_MAX_V);
            assert!((BATTERY_MIN_V - 1e-4..=BATTERY_MAX_V + 1e-4).contains(&v));
        }
    }

    #[test]
    fn test_battery_raw_within_adc_range() {
        let mut io = SimIo::new();
        assert!(io.read_battery_raw() <= BATTERY_ADC_MAX);
    }
}
