//! Bus and PWM configuration for the ST7789 panel and the XPT2046 touch chip.
//!
//! Pin mapping:
//!
//! | Function        | GPIO | Peripheral      |
//! |-----------------|------|-----------------|
//! | Display DC      | 16   |                 |
//! | Display CS      | 17   |                 |
//! | Display CLK     | 18   | SPI0 CLK        |
//! | Display MOSI    | 19   | SPI0 TX         |
//! | Backlight       | 20   | PWM2 A          |
//! | Touch CS        | 9    |                 |
//! | Touch CLK       | 10   | SPI1 CLK        |
//! | Touch MOSI      | 11   | SPI1 TX         |
//! | Touch MISO      | 12   | SPI1 RX         |
//! | Touch IRQ       | 15   | active low      |
//! | LED red/green   | 6/7  | PWM3 A/B        |
//! | LED blue        | 8    | PWM4 A          |
//! | Battery sense   | 26   | ADC0            |
//!
//! Display reset is tied to the RUN pin.

use embassy_rp::pwm::Config as PwmConfig;
use embassy_rp::spi::Config as SpiConfig;

/// Display SPI clock. The ST7789 supports up to 62.5 MHz.
const DISPLAY_SPI_HZ: u32 = 62_500_000;

/// Touch SPI clock. The XPT2046 is specified up to 2 MHz.
const TOUCH_SPI_HZ: u32 = 1_000_000;

/// PWM counter wrap; duty values are 8-bit.
const PWM_TOP: u16 = 255;

/// SPI configuration for the ST7789 display.
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = DISPLAY_SPI_HZ;
    config
}

/// SPI configuration for the XPT2046 touch controller.
pub fn touch_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = TOUCH_SPI_HZ;
    config
}

/// PWM configuration with both channels at `duty` out of 255.
pub fn pwm_config(duty: u8) -> PwmConfig {
    let mut config = PwmConfig::default();
    config.top = PWM_TOP;
    config.compare_a = u16::from(duty);
    config.compare_b = u16::from(duty);
    config
}
