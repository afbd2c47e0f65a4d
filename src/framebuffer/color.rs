//! Color constants for the console.
use embedded_graphics::pixelcolor::Rgb888;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(200, 0, 0);
    pub const LIGHT_RED: Color = Color::new(255, 85, 85);
    pub const GREEN: Color = Color::new(0, 200, 0);
    pub const YELLOW: Color = Color::new(255, 255, 85);
    pub const CYAN: Color = Color::new(0, 200, 200);
    pub const GRAY: Color = Color::new(170, 170, 170);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb888(self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }
}
