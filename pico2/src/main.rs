//! Touch panel firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Drives a 240x320 ST7789 display and an XPT2046 touchscreen. A swipe down
//! reveals a panel with screen and LED brightness sliders and the battery
//! voltage; the backlight goes off after 30 s without a touch.
//!
//! # Architecture
//!
//! - Main task: ticks the application every 5 ms and renders into the framebuffer
//! - Flush task: waits for the changed area, sends it to the display via DMA
//!
//! The main task skips rendering while a flush is in flight, so the
//! framebuffer is never written while DMA reads it. Nothing is lost: the
//! application keeps its dirty state until the next render.
//!
//! # Calibration
//!
//! Hold a finger on the screen while powering up to start the two-point
//! calibration. The result is stored in the last flash sector.

#![no_std]
#![no_main]
// Crate-level lints (match the core crate)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod display;
mod outputs;
mod st7789;
mod storage;
mod touch;

use defmt::{debug, error, info, warn};
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::Pwm;
use embassy_rp::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use embedded_graphics::primitives::Rectangle;
use static_cell::StaticCell;
use touch_panel::config::{DEFAULT_CALIBRATION, TICK_MS};
use touch_panel::{App, CalibrationStore, Config, Event, TouchController};
use {defmt_rtt as _, panic_probe as _};

use crate::display::{display_spi_config, pwm_config, touch_spi_config};
use crate::outputs::BoardIo;
use crate::st7789::{FRAMEBUFFER, St7789Flusher, St7789Renderer};
use crate::storage::FlashStorage;
use crate::touch::Xpt2046;

// =============================================================================
// Render/Flush Synchronization
// =============================================================================

/// Area of the framebuffer the flush task should send.
static FLUSH_SIGNAL: Signal<CriticalSectionRawMutex, Rectangle> = Signal::new();

/// Signal to notify main task that flush is complete.
static FLUSH_DONE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Display flush task - runs in parallel with the main loop.
#[embassy_executor::task]
async fn display_flush_task(flusher: &'static mut St7789Flusher<'static>) {
    info!("Display flush task started");

    loop {
        let area = FLUSH_SIGNAL.wait().await;

        // SAFETY: the main task does not write the framebuffer until FLUSH_DONE
        let buffer = unsafe { &*core::ptr::addr_of!(FRAMEBUFFER) };
        flusher.flush_area(buffer, area).await;

        FLUSH_DONE.signal(());
    }
}

// =============================================================================
// Event Handling
// =============================================================================

fn handle_event(
    event: Event,
    store: &mut CalibrationStore<FlashStorage<'_>>,
) {
    match event {
        Event::CalibrationFinished(bounds) => {
            info!("Calibration finished: {}", bounds);
            match store.save(&bounds) {
                Ok(()) => info!("Calibration saved"),
                Err(e) => error!("Calibration not saved: {}", e),
            }
        }
        Event::CalibrationFailed(e) => warn!("Calibration failed: {}", e),
        Event::VoltageUpdated(volts) => debug!("Battery: {} V", volts),
        Event::TouchTrace { raw, mapped } => {
            debug!("Raw: X={}, Y={} | Mapped: X={}, Y={}", raw.x, raw.y, mapped.x, mapped.y);
        }
        other => info!("{}", other),
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Touch panel starting...");

    #[cfg(feature = "cpu250-spi62-1v10")]
    let p = {
        use embassy_rp::clocks::{ClockConfig, CoreVoltage};
        const FREQ_HZ: u32 = 250_000_000;
        const VOLTAGE: CoreVoltage = CoreVoltage::V1_10;
        let mut config = embassy_rp::config::Config::default();
        config.clocks = ClockConfig::system_freq(FREQ_HZ).expect("Invalid overclock frequency");
        config.clocks.core_voltage = VOLTAGE;
        info!("Overclock: 250 MHz @ 1.10V (SPI 62.5 MHz)");
        embassy_rp::init(config)
    };

    #[cfg(not(feature = "cpu250-spi62-1v10"))]
    let p = embassy_rp::init(Default::default());

    // Outputs first so the backlight does not flash at full duty
    let config = Config::new();
    let backlight = Pwm::new_output_a(p.PWM_SLICE2, p.PIN_20, pwm_config(0));
    let led_rg = Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, pwm_config(u8::MAX));
    let led_b = Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, pwm_config(u8::MAX));
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let battery = Channel::new_pin(p.PIN_26, Pull::None);
    let mut io = BoardIo::new(backlight, led_rg, led_b, adc, battery);

    // Display: CS=17, DC=16, CLK=18, MOSI=19
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);

    // Initialize async SPI with DMA (TX-only, display doesn't need MISO)
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, display_spi_config());

    let mut flusher = St7789Flusher::new(spi, dc, cs);
    flusher.init().await;
    info!("Display initialized");

    // Touch: CS=9, CLK=10, MOSI=11, MISO=12, IRQ=15
    let touch_spi = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, touch_spi_config());
    let touch_cs = Output::new(p.PIN_9, Level::High);
    let touch_irq = Input::new(p.PIN_15, Pull::Up);
    let mut touch = Xpt2046::new(touch_spi, touch_cs, touch_irq);
    info!("Touch initialized");

    let mut store = CalibrationStore::new(FlashStorage::new(Flash::new_blocking(p.FLASH)));
    let bounds = match store.try_load() {
        Ok(bounds) => {
            info!("Calibration loaded: {}", bounds);
            bounds
        }
        Err(e) => {
            warn!("Using default calibration: {}", e);
            DEFAULT_CALIBRATION
        }
    };

    let mut app = App::new(config, bounds);
    app.apply_outputs(&mut io);

    let boot = Instant::now();
    if touch.is_touched() {
        info!("Touch held at boot, starting calibration");
        app.start_calibration(0, &mut io);
    }

    // Move flusher to static for task (Embassy tasks need 'static lifetime)
    static FLUSHER: StaticCell<St7789Flusher<'static>> = StaticCell::new();
    let flusher: &'static mut St7789Flusher<'static> = FLUSHER.init(flusher);
    spawner.spawn(display_flush_task(flusher)).unwrap();

    info!("Main loop starting");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    let mut flush_in_progress = false;

    loop {
        let now_ms = boot.elapsed().as_millis();

        for event in app.tick(now_ms, &mut touch, &mut io) {
            handle_event(event, &mut store);
        }

        if flush_in_progress && FLUSH_DONE.try_take().is_some() {
            flush_in_progress = false;
        }

        if !flush_in_progress {
            // SAFETY: the flush task is idle, so the main task has exclusive access
            let buffer = unsafe { &mut *core::ptr::addr_of_mut!(FRAMEBUFFER) };
            let mut renderer = St7789Renderer::new(buffer);
            if let Some(area) = app.render(&mut renderer) {
                FLUSH_SIGNAL.signal(area);
                flush_in_progress = true;
            }
        }

        ticker.next().await;
    }
}
