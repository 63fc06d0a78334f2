//! A 2D debug image represented as a flat array of RGBA pixels.

/// Row-major RGBA image used for heightmap and biome previews.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// Create a black, fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Set an opaque pixel.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_rgb(&mut self, x: u32, y: u32, [r, g, b]: [u8; 3]) {
        self.set_pixel(x, y, [r, g, b, 255]);
    }

    /// Set a single pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.offset(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Get a pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.offset(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Count distinct RGB colors, ignoring alpha.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = std::collections::HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_dimensions() {
        let image = DebugImage::new(64, 32);
        assert_eq!(image.dimensions(), (64, 32));
        assert_eq!(image.pixels.len(), 64 * 32 * 4);
    }

    #[test]
    fn test_set_rgb_is_opaque() {
        let mut image = DebugImage::new(4, 4);
        image.set_rgb(1, 2, [9, 8, 7]);
        assert_eq!(image.get_pixel(1, 2), [9, 8, 7, 255]);
        assert_eq!(image.pixels[(2 * 4 + 1) * 4], 9);
    }

    #[test]
    fn test_unique_color_count_ignores_alpha() {
        let mut image = DebugImage::new(3, 1);
        image.set_pixel(0, 0, [255, 0, 0, 255]);
        image.set_pixel(1, 0, [255, 0, 0, 10]);
        image.set_pixel(2, 0, [0, 0, 255, 255]);
        assert_eq!(image.unique_color_count(), 2);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_pixel_panics() {
        let mut image = DebugImage::new(2, 2);
        image.set_rgb(2, 0, [0, 0, 0]);
    }
}
