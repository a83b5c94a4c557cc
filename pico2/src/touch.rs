//! XPT2046 touch controller on blocking SPI1.
//!
//! Contact is reported when the IRQ line is low *and* the pressure estimate
//! is above the threshold; the IRQ line alone chatters at the edges of a
//! press.

use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use touch_panel::xpt2046::{
    CMD_X,
    CMD_Y,
    CMD_Z1,
    CMD_Z2,
    FRAME_LEN,
    PRESSURE_THRESHOLD,
    SAMPLES_PER_POINT,
    average,
    decode,
    frame,
    pressure,
};
use touch_panel::{RawPoint, TouchController};

pub struct Xpt2046<'d> {
    spi: Spi<'d, SPI1, Blocking>,
    cs: Output<'d>,
    irq: Input<'d>,
}

impl<'d> Xpt2046<'d> {
    pub fn new(
        spi: Spi<'d, SPI1, Blocking>,
        cs: Output<'d>,
        irq: Input<'d>,
    ) -> Self {
        Self { spi, cs, irq }
    }

    /// Run one conversion and return the 12-bit result.
    fn convert(
        &mut self,
        command: u8,
    ) -> u16 {
        let tx = frame(command);
        let mut rx = [0u8; FRAME_LEN];
        self.cs.set_low();
        self.spi.blocking_transfer(&mut rx, &tx).ok();
        self.cs.set_high();
        decode(&rx)
    }

    /// Current pressure estimate.
    pub fn pressure(&mut self) -> u16 {
        let z1 = self.convert(CMD_Z1);
        let z2 = self.convert(CMD_Z2);
        pressure(z1, z2)
    }
}

impl TouchController for Xpt2046<'_> {
    fn is_touched(&mut self) -> bool { self.irq.is_low() && self.pressure() > PRESSURE_THRESHOLD }

    fn read_raw(&mut self) -> RawPoint {
        let mut samples = [(0u16, 0u16); SAMPLES_PER_POINT];
        for sample in &mut samples {
            *sample = (self.convert(CMD_X), self.convert(CMD_Y));
        }
        average(&samples).unwrap_or_default()
    }
}
