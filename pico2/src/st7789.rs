//! Async ST7789 display driver with a single framebuffer and partial flushes.
//!
//! # Architecture
//!
//! The driver is split into two components:
//! - [`St7789Renderer`]: Implements `DrawTarget`, writes to a framebuffer reference
//! - [`St7789Flusher`]: Owns SPI peripheral, handles async DMA transfers
//!
//! Frames are drawn into [`FRAMEBUFFER`] and only the area the application
//! reports as changed is sent to the panel. A panel slide therefore moves
//! 240x100 pixels per frame instead of the full 240x320.
//!
//! # Performance Optimizations
//!
//! - **Pixel-pair fills:** `clear()` copies a 4-byte pattern (2 pixels) per chunk
//! - **Async DMA:** full-width areas are one contiguous DMA transfer
//! - **Max SPI speed:** Configured for 62.5 MHz SPI clock (ST7789 maximum)

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Display dimensions (native portrait orientation).
pub const WIDTH: usize = 240;
pub const HEIGHT: usize = 320;
pub const BUFFER_SIZE: usize = WIDTH * HEIGHT * 2;

/// Static framebuffer (153,600 bytes).
pub static mut FRAMEBUFFER: [u8; BUFFER_SIZE] = [0u8; BUFFER_SIZE];

// ST7789 Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

// MADCTL: no rotation, RGB order
const MADCTL_PORTRAIT: u8 = 0x00;

/// Clip `area` to the screen. Returns `None` if nothing is left.
fn clip(area: &Rectangle) -> Option<Rectangle> {
    let screen = Rectangle::new(Point::zero(), Size::new(WIDTH as u32, HEIGHT as u32));
    let clipped = area.intersection(&screen);
    if clipped.size.width == 0 || clipped.size.height == 0 { None } else { Some(clipped) }
}

/// ST7789 display flusher - owns SPI and handles async DMA transfers.
pub struct St7789Flusher<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
}

impl<'d> St7789Flusher<'d> {
    /// Create a new flusher from SPI and control pins.
    pub fn new(
        spi: Spi<'d, SPI0, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
    ) -> Self {
        Self { spi, dc, cs }
    }

    /// Initialize the display hardware.
    pub async fn init(&mut self) {
        // Software reset
        self.write_command(SWRESET).await;
        Timer::after_millis(150).await;

        // Exit sleep mode
        self.write_command(SLPOUT).await;
        Timer::after_millis(10).await;

        // Set pixel format to RGB565 (16-bit)
        self.write_command(COLMOD).await;
        self.write_data(&[0x55]).await;

        self.write_command(MADCTL).await;
        self.write_data(&[MADCTL_PORTRAIT]).await;

        // Inversion on (required for this panel)
        self.write_command(INVON).await;
        Timer::after_millis(10).await;

        // Normal display mode
        self.write_command(NORON).await;
        Timer::after_millis(10).await;

        // Display on
        self.write_command(DISPON).await;
        Timer::after_millis(10).await;
    }

    /// Send a command byte (DC low, CS low during transfer).
    async fn write_command(
        &mut self,
        cmd: u8,
    ) {
        self.cs.set_low();
        self.dc.set_low();
        self.spi.write(&[cmd]).await.ok();
        self.cs.set_high();
    }

    /// Send data bytes (DC high, CS low during transfer).
    async fn write_data(
        &mut self,
        data: &[u8],
    ) {
        self.cs.set_low();
        self.dc.set_high();
        self.spi.write(data).await.ok();
        self.cs.set_high();
    }

    /// Set the drawing window.
    async fn set_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) {
        let x1 = x + w - 1;
        let y1 = y + h - 1;

        self.write_command(CASET).await;
        self.write_data(&[(x >> 8) as u8, x as u8, (x1 >> 8) as u8, x1 as u8])
            .await;

        self.write_command(RASET).await;
        self.write_data(&[(y >> 8) as u8, y as u8, (y1 >> 8) as u8, y1 as u8])
            .await;
    }

    /// Flush `area` of the framebuffer to the display.
    ///
    /// Full-width areas are contiguous in the buffer and go out as a single
    /// DMA transfer; narrower areas are sent row by row.
    pub async fn flush_area(
        &mut self,
        buffer: &[u8],
        area: Rectangle,
    ) {
        let Some(area) = clip(&area) else {
            return;
        };
        let x = area.top_left.x as usize;
        let y = area.top_left.y as usize;
        let w = area.size.width as usize;
        let h = area.size.height as usize;

        self.set_window(x as u16, y as u16, w as u16, h as u16).await;

        // RAMWR command then pixel data with CS held low
        self.cs.set_low();
        self.dc.set_low();
        // Use blocking write for single-byte command (faster than DMA setup)
        self.spi.blocking_write(&[RAMWR]).ok();
        self.dc.set_high();
        if w == WIDTH {
            let start = y * WIDTH * 2;
            let end = (y + h) * WIDTH * 2;
            self.spi.write(&buffer[start..end]).await.ok();
        } else {
            for row in y..y + h {
                let start = (row * WIDTH + x) * 2;
                self.spi.write(&buffer[start..start + w * 2]).await.ok();
            }
        }
        self.cs.set_high();
    }
}

/// ST7789 renderer - implements DrawTarget, writes to a framebuffer.
///
/// Owns no hardware. Create one per frame around the framebuffer.
pub struct St7789Renderer<'a> {
    framebuffer: &'a mut [u8],
}

impl<'a> St7789Renderer<'a> {
    /// Create a new renderer targeting the given framebuffer.
    pub fn new(framebuffer: &'a mut [u8]) -> Self { Self { framebuffer } }

    /// Clear the framebuffer with a color.
    ///
    /// Fills two pixels per `chunks_exact_mut(4)` chunk.
    pub fn clear_buffer(
        &mut self,
        color: Rgb565,
    ) {
        let raw: RawU16 = color.into();
        let bytes = raw.into_inner().to_be_bytes();
        let word = [bytes[0], bytes[1], bytes[0], bytes[1]];
        for chunk in self.framebuffer.chunks_exact_mut(4) {
            chunk.copy_from_slice(&word);
        }
    }

    /// Set a pixel in the framebuffer.
    #[inline]
    fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb565,
    ) {
        if x >= 0 && x < WIDTH as i32 && y >= 0 && y < HEIGHT as i32 {
            let idx = (y as usize * WIDTH + x as usize) * 2;
            let raw: RawU16 = color.into();
            let bytes = raw.into_inner().to_be_bytes();
            self.framebuffer[idx] = bytes[0];
            self.framebuffer[idx + 1] = bytes[1];
        }
    }
}

impl OriginDimensions for St7789Renderer<'_> {
    fn size(&self) -> Size { Size::new(WIDTH as u32, HEIGHT as u32) }
}

impl DrawTarget for St7789Renderer<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(
        &mut self,
        area: &Rectangle,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Colors are laid out over the unclipped area; skip the ones that fall outside.
        let mut colors = colors.into_iter();
        for point in area.points() {
            let Some(color) = colors.next() else {
                break;
            };
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let Some(area) = clip(area) else {
            return Ok(());
        };

        let raw: RawU16 = color.into();
        let bytes = raw.into_inner().to_be_bytes();
        let x_start = area.top_left.x as usize;
        let width = area.size.width as usize;

        for y in area.rows() {
            let start = (y as usize * WIDTH + x_start) * 2;
            for pixel in self.framebuffer[start..start + width * 2].chunks_exact_mut(2) {
                pixel.copy_from_slice(&bytes);
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.clear_buffer(color);
        Ok(())
    }
}
