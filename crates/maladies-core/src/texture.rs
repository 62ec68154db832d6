//! Row-major RGBA8 pixel grids served by art sources.

use crate::WorldError;

/// Immutable-size pixel grid. Pixels are stored row-major, top-left first,
/// as `[r, g, b, a]` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Texture {
    /// Build a texture from an existing pixel buffer.
    ///
    /// Fails when the buffer length does not match `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self, WorldError> {
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(WorldError::TextureShape {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Texture with every pixel set to `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; (width as usize) * (height as usize)],
        }
    }

    /// Texture whose pixels are produced by `f(x, y)` in row-major order.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel slice.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y as usize) * (self.width as usize) + (x as usize)])
    }

    /// Overwrite the pixel at `(x, y)`. Returns false outside the grid.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: [u8; 4]) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[(y as usize) * (self.width as usize) + (x as usize)] = value;
        true
    }
}
