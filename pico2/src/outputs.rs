//! Backlight, RGB LED and battery ADC behind [`DeviceIo`].

use defmt::warn;
use embassy_rp::adc::{Adc, Blocking as AdcBlocking, Channel};
use embassy_rp::pwm::Pwm;
use touch_panel::DeviceIo;

use crate::display::pwm_config;

pub struct BoardIo<'d> {
    /// Backlight on channel A.
    backlight: Pwm<'d>,
    /// Red on A, green on B.
    led_rg: Pwm<'d>,
    /// Blue on A.
    led_b: Pwm<'d>,
    adc: Adc<'d, AdcBlocking>,
    battery: Channel<'d>,
    /// Last good ADC sample, reused if a conversion fails.
    last_battery_raw: u16,
}

impl<'d> BoardIo<'d> {
    pub fn new(
        backlight: Pwm<'d>,
        led_rg: Pwm<'d>,
        led_b: Pwm<'d>,
        adc: Adc<'d, AdcBlocking>,
        battery: Channel<'d>,
    ) -> Self {
        Self {
            backlight,
            led_rg,
            led_b,
            adc,
            battery,
            last_battery_raw: 0,
        }
    }
}

impl DeviceIo for BoardIo<'_> {
    fn set_backlight(
        &mut self,
        duty: u8,
    ) {
        self.backlight.set_config(&pwm_config(duty));
    }

    fn set_led_duty(
        &mut self,
        duty: u8,
    ) {
        let config = pwm_config(duty);
        self.led_rg.set_config(&config);
        self.led_b.set_config(&config);
    }

    fn read_battery_raw(&mut self) -> u16 {
        match self.adc.blocking_read(&mut self.battery) {
            Ok(raw) => self.last_battery_raw = raw,
            Err(_) => warn!("Battery ADC read failed"),
        }
        self.last_battery_raw
    }
}
