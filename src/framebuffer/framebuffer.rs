//! Pixel-level framebuffer access on top of the bootloader-provided mapping.
use bootloader_api::info::PixelFormat;
use bootloader_api::BootInfo;
use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
    Drawable,
};

use crate::framebuffer::color::Color;

pub struct FramebufferWriter {
    buffer: &'static mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    bytes_per_pixel: usize,
    pixel_format: PixelFormat,
}

impl FramebufferWriter {
    pub fn new(boot_info: &'static mut BootInfo) -> Option<Self> {
        let fb = boot_info.framebuffer.as_mut()?;
        let info = fb.info();

        Some(Self {
            buffer: fb.buffer_mut(),
            width: info.width,
            height: info.height,
            stride: info.stride,
            bytes_per_pixel: info.bytes_per_pixel,
            pixel_format: info.pixel_format,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill the whole screen with one color.
    pub fn clear(&mut self, color: Color) {
        self.fill_rect(0, 0, self.width as u32, self.height as u32, color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(color.to_rgb888()))
            .draw(self)
            .ok();
    }

    /// Draw one character with its top-left corner at pixel coordinates.
    pub fn draw_char(&mut self, ch: char, x: i32, y: i32, style: &MonoTextStyle<Rgb888>) {
        let mut buf = [0u8; 4];
        let s = ch.encode_utf8(&mut buf);
        Text::with_baseline(s, Point::new(x, y), *style, Baseline::Top)
            .draw(self)
            .ok();
    }

    fn write_pixel(&mut self, x: usize, y: usize, color: Rgb888) {
        let offset = (y * self.stride + x) * self.bytes_per_pixel;
        if offset + self.bytes_per_pixel > self.buffer.len() {
            return;
        }

        match self.pixel_format {
            PixelFormat::Rgb => {
                self.buffer[offset] = color.r();
                self.buffer[offset + 1] = color.g();
                self.buffer[offset + 2] = color.b();
            }
            // BGR layout, also the sane guess for unknown formats
            _ => {
                self.buffer[offset] = color.b();
                self.buffer[offset + 1] = color.g();
                self.buffer[offset + 2] = color.r();
            }
        }
        if self.bytes_per_pixel == 4 {
            self.buffer[offset + 3] = 255;
        }
    }
}

impl DrawTarget for FramebufferWriter {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
                continue;
            }
            self.write_pixel(x as usize, y as usize, color);
        }
        Ok(())
    }
}

impl OriginDimensions for FramebufferWriter {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}
