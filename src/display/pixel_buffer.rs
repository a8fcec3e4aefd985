use std::path::Path;

use crate::assets::Sprite;
use crate::error::{Error, Result};

// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Write an opaque RGBA pixel to slice
#[inline]
fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = r;
    dest[1] = g;
    dest[2] = b;
    dest[3] = 255;
}

/// Source-over blend of one RGBA sample onto an opaque destination pixel
#[inline]
fn blend_sample(dest: &mut [u8], (r, g, b, a): (u8, u8, u8, u8)) {
    match a {
        0 => {},
        255 => write_pixel(dest, r, g, b),
        _ => {
            let alpha = a as u16;
            dest[0] = blend_channel(r, dest[0], alpha);
            dest[1] = blend_channel(g, dest[1], alpha);
            dest[2] = blend_channel(b, dest[2], alpha);
            dest[3] = 255;
        },
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA pixel buffer for software rendering.
///
/// Row-major, 4 bytes per pixel in R, G, B, A order, top-left origin. Source
/// scenes, the kaleidoscope quadrant and the final frame all live in one of
/// these.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Create a new pixel buffer with custom resolution, cleared to transparent black
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    pub(crate) fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Bytes per row
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Clear to a solid opaque color
    /// Optimized: uses u32 fill for maximum speed
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        let pixel = u32::from_ne_bytes([r, g, b, 255]);

        // Safety: pixels.len() is always divisible by 4 (width * height * 4).
        // We use write_unaligned to avoid assuming alignment of Vec<u8>.
        let ptr = self.pixels.as_mut_ptr() as *mut u32;
        let len = self.pixels.len() / 4;

        for i in 0..len {
            // Safety: i < len ensures we stay within bounds
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Set a single opaque pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel(&mut self.pixels[idx..idx + 4], r, g, b);
        }
    }

    /// Set a single pixel with custom alpha (bounds checked)
    #[inline]
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        self.get_pixel_rgba(x, y).map(|(r, g, b, _)| (r, g, b))
    }

    /// Read all 4 channels of a pixel (bounds checked)
    #[inline]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let p = &self.pixels[idx..idx + 4];
            Some((p[0], p[1], p[2], p[3]))
        } else {
            None
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            blend_sample(&mut self.pixels[idx..idx + 4], (r, g, b, a));
        }
    }

    /// Draw a horizontal line with alpha blending
    pub fn hline_blend(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let mut idx = self.pixel_index(start as u32, y as u32);
        for _ in start..=end {
            blend_sample(&mut self.pixels[idx..idx + 4], (r, g, b, a));
            idx += 4;
        }
    }

    /// Fill a rectangle with alpha blending
    pub fn fill_rect_blend(&mut self, x: i32, y: i32, w: u32, h: u32, r: u8, g: u8, b: u8, a: u8) {
        if w == 0 || a == 0 {
            return;
        }
        for row in 0..h as i32 {
            self.hline_blend(x, x + w as i32 - 1, y + row, r, g, b, a);
        }
    }

    // ========================================================================
    // Sprite Drawing
    // ========================================================================

    /// Draw a sprite stretched into the rectangle (x, y, w, h), blending by the
    /// sprite's own alpha. Nearest-neighbor sampling at destination pixel centers.
    pub fn draw_sprite_scaled(&mut self, sprite: &Sprite, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 || sprite.width() == 0 || sprite.height() == 0 {
            return;
        }

        let x0 = (x.floor() as i32).max(0);
        let y0 = (y.floor() as i32).max(0);
        let x1 = ((x + w).ceil() as i32).min(self.width as i32);
        let y1 = ((y + h).ceil() as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let u_scale = sprite.width() as f32 / w;
        let v_scale = sprite.height() as f32 / h;

        for dy in y0..y1 {
            let v = (dy as f32 + 0.5 - y) * v_scale;
            if v < 0.0 || v >= sprite.height() as f32 {
                continue;
            }
            let mut idx = self.pixel_index(x0 as u32, dy as u32);
            for dx in x0..x1 {
                let u = (dx as f32 + 0.5 - x) * u_scale;
                if u >= 0.0 && u < sprite.width() as f32 {
                    let texel = sprite.texel(u as u32, v as u32);
                    blend_sample(&mut self.pixels[idx..idx + 4], texel);
                }
                idx += 4;
            }
        }
    }

    /// Draw a sprite of size (w, h) centered at (cx, cy) and rotated by `angle`
    /// radians. Inverse-maps each destination pixel back into sprite space.
    pub fn draw_sprite_rotated(
        &mut self,
        sprite: &Sprite,
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        angle: f32,
    ) {
        if w <= 0.0 || h <= 0.0 || sprite.width() == 0 || sprite.height() == 0 {
            return;
        }

        // Bounding circle of the rotated rectangle
        let radius = (w * w + h * h).sqrt() * 0.5;
        let x0 = ((cx - radius).floor() as i32).max(0);
        let y0 = ((cy - radius).floor() as i32).max(0);
        let x1 = ((cx + radius).ceil() as i32).min(self.width as i32);
        let y1 = ((cy + radius).ceil() as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let (sin_a, cos_a) = angle.sin_cos();
        let u_scale = sprite.width() as f32 / w;
        let v_scale = sprite.height() as f32 / h;
        let half_w = w * 0.5;
        let half_h = h * 0.5;

        for dy in y0..y1 {
            let py = dy as f32 + 0.5 - cy;
            let mut idx = self.pixel_index(x0 as u32, dy as u32);
            for dx in x0..x1 {
                let px = dx as f32 + 0.5 - cx;
                // Rotate by -angle into the sprite's local frame
                let lx = px * cos_a + py * sin_a + half_w;
                let ly = -px * sin_a + py * cos_a + half_h;
                if lx >= 0.0 && lx < w && ly >= 0.0 && ly < h {
                    let texel = sprite.texel((lx * u_scale) as u32, (ly * v_scale) as u32);
                    blend_sample(&mut self.pixels[idx..idx + 4], texel);
                }
                idx += 4;
            }
        }
    }

    // ========================================================================
    // Buffer Operations
    // ========================================================================

    /// One row of pixels as raw bytes
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride();
        &self.pixels[start..start + self.stride()]
    }

    /// Raw bytes for texture upload or export
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to raw pixels for the remap and replication passes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Write the buffer out as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|source| Error::ImageSave {
            path: path.to_path_buf(),
            source,
        })
    }
}
