/// Packed `0xRRGGBBAA`.
pub type Rgba = u32;

pub const BLACK: Rgba = 0x000000FF;
pub const WHITE: Rgba = 0xFFFFFFFF;
pub const RED: Rgba = 0xFF0000FF;
pub const GREEN: Rgba = 0x00FF00FF;
pub const BLUE: Rgba = 0x0000FFFF;
pub const YELLOW: Rgba = 0xFFFF00FF;

#[inline]
pub const fn pack_rgba(r: u8, g: u8, b: u8) -> Rgba {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | 0xFF
}

/// Subtracts `amount` from R, G and B, saturating at zero. Alpha is kept.
#[inline]
pub const fn shade(color: Rgba, amount: u8) -> Rgba {
    let r = ((color >> 24) as u8).saturating_sub(amount);
    let g = ((color >> 16) as u8).saturating_sub(amount);
    let b = ((color >> 8) as u8).saturating_sub(amount);
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (color & 0xFF)
}

/// Fixed-size RGBA pixel buffer, row-major.
pub struct Framebuffer {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Writes one pixel; returns false (and writes nothing) when out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.pixels[y as usize * self.width + x as usize] = color;
        true
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Fills rows `[y0, y1)` of column `x`, clipped to the buffer.
    pub fn v_line(&mut self, x: usize, y0: usize, y1: usize, color: Rgba) {
        if x >= self.width {
            return;
        }
        let y1 = y1.min(self.height);
        let mut idx = y0 * self.width + x;
        for _y in y0..y1 {
            self.pixels[idx] = color;
            idx += self.width;
        }
    }
}
