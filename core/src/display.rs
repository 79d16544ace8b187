use crate::color::Chip8Color;
use crate::error::{Chip8Error, Result};

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

const PIXEL_ON: &str = "██";
const PIXEL_OFF: &str = "░░";

/// Display: 64x32 pixels 1 bit monochrome, stored row-major by y
#[derive(Clone, PartialEq, Eq)]
pub struct Display {
    pixels: Vec<bool>,
}

impl Display {
    pub fn new() -> Display {
        Display {
            pixels: vec![false; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        let idx = Self::index(x, y)?;
        Ok(self.pixels[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, on_off: bool) -> Result<()> {
        let idx = Self::index(x, y)?;
        self.pixels[idx] = on_off;
        Ok(())
    }

    /// Turn every pixel off. Happens through `&mut self`, so nobody can
    /// observe a partly cleared frame.
    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels[..]
    }

    /// Expand the framebuffer into RGBX8888 pixels for a host texture.
    pub fn to_rgbx(&self, foreground: Chip8Color, background: Chip8Color) -> Vec<Chip8Color> {
        self.pixels
            .iter()
            .map(|&on| if on { foreground } else { background })
            .collect()
    }

    /// Text rendering for debugging, two characters per pixel so the
    /// aspect ratio survives a terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity((SCREEN_WIDTH * 2 * 3 + 1) * SCREEN_HEIGHT);

        for row in self.pixels.chunks(SCREEN_WIDTH) {
            for &on in row {
                out.push_str(if on { PIXEL_ON } else { PIXEL_OFF });
            }
            out.push('\n');
        }

        out
    }

    fn index(x: usize, y: usize) -> Result<usize> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return Err(Chip8Error::PixelOutOfRange { x, y });
        }
        Ok(y * SCREEN_WIDTH + x)
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.pixels.iter().filter(|p| **p).count();
        f.debug_struct("Display").field("lit", &lit).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR};

    #[test]
    fn test_new_is_blank() {
        let display = Display::new();
        assert!(display.pixels().iter().all(|p| !p));
        assert_eq!(display.pixels().len(), 2048);
    }

    #[test]
    fn test_set_get() {
        let mut display = Display::new();

        display.set(42, 10, true).unwrap();
        assert_eq!(display.get(42, 10), Ok(true));
        assert_eq!(display.get(10, 10), Ok(false));

        // Overwrite
        display.set(42, 10, false).unwrap();
        assert_eq!(display.get(42, 10), Ok(false));
    }

    #[test]
    fn test_row_major() {
        let mut display = Display::new();
        display.set(63, 0, true).unwrap();
        display.set(0, 1, true).unwrap();

        assert!(display.pixels()[63]);
        assert!(display.pixels()[64]);
        assert_eq!(display.pixels().iter().filter(|p| **p).count(), 2);
    }

    #[test]
    fn test_corners() {
        let mut display = Display::new();
        for (x, y) in [(0, 0), (63, 0), (0, 31), (63, 31)] {
            assert!(display.set(x, y, true).is_ok());
            assert_eq!(display.get(x, y), Ok(true));
        }
    }

    #[test]
    fn test_out_of_range() {
        let mut display = Display::new();

        assert_eq!(
            display.set(64, 32, true),
            Err(Chip8Error::PixelOutOfRange { x: 64, y: 32 })
        );
        assert_eq!(
            display.get(64, 0),
            Err(Chip8Error::PixelOutOfRange { x: 64, y: 0 })
        );
        assert_eq!(
            display.get(0, 32),
            Err(Chip8Error::PixelOutOfRange { x: 0, y: 32 })
        );
    }

    #[test]
    fn test_clear() {
        let mut display = Display::new();
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                display.set(x, y, (x + y) % 3 == 0).unwrap();
            }
        }

        display.clear();

        assert_eq!(display, Display::new());
    }

    #[test]
    fn test_render_text() {
        let mut display = Display::new();
        display.set(0, 0, true).unwrap();
        display.set(1, 31, true).unwrap();

        let text = display.render_text();
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), SCREEN_HEIGHT);
        assert!(rows.iter().all(|r| r.chars().count() == SCREEN_WIDTH * 2));
        assert!(rows[0].starts_with("██░░"));
        assert!(rows[31].starts_with("░░██░░"));
    }

    #[test]
    fn test_to_rgbx() {
        let mut display = Display::new();
        display.set(1, 0, true).unwrap();

        let frame = display.to_rgbx(DEFAULT_FOREGROUND_COLOR, DEFAULT_BACKGROUND_COLOR);
        let bytes = Chip8Color::as_bytes(&frame);

        assert_eq!(bytes.len(), SCREEN_WIDTH * SCREEN_HEIGHT * 4);
        assert_eq!(&bytes[0..8], &[0, 0, 0, 0, 0, 0xFF, 0xFF, 0xFF]);
    }
}
