//! Sprite assets for the kaleidoscope sub-scenes
//!
//! Sprites are decoded from PNG/GIF files when available. When none of the
//! configured files can be read, a set of procedural sprites stands in so the
//! demo always has something to mirror.

use std::path::Path;
use std::rc::Rc;

use crate::config::DemoConfig;
use crate::error::{Error, Result};
use crate::util::{hsv_to_rgb, lerp_color};

/// An RGBA sprite, 4 bytes per pixel, row-major
#[derive(Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sprite({}x{})", self.width, self.height)
    }
}

impl Sprite {
    /// Create a new fully transparent sprite
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Single-color sprite
    pub fn solid(width: u32, height: u32, (r, g, b, a): (u8, u8, u8, u8)) -> Self {
        let pixels = [r, g, b, a].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode an image file (first frame for animated GIFs)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| Error::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set a pixel in the sprite
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        if x < self.width && y < self.height {
            let idx = (y as usize * self.width as usize + x as usize) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
        }
    }

    /// Nearest texel, coordinates clamped to the sprite edges
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }
}

// ============================================================================
// Procedural Sprite Generators
// ============================================================================

impl Sprite {
    /// Generate a checkerboard pattern
    pub fn checkerboard(size: u32, tile_size: u32, c1: (u8, u8, u8), c2: (u8, u8, u8)) -> Self {
        let tile_size = tile_size.max(1);
        let mut sprite = Self::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let checker = ((x / tile_size) + (y / tile_size)) % 2 == 0;
                let (r, g, b) = if checker { c1 } else { c2 };
                sprite.set_pixel(x, y, r, g, b, 255);
            }
        }
        sprite
    }

    /// Generate an XOR pattern tinted toward `tint`
    pub fn xor_pattern(size: u32, tint: (u8, u8, u8)) -> Self {
        let mut sprite = Self::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let v = ((x ^ y) & 0xFF) as f32 / 255.0;
                let (r, g, b) = lerp_color((0, 0, 0), tint, v);
                sprite.set_pixel(x, y, r, g, b, 255);
            }
        }
        sprite
    }

    /// Six-armed snowflake on a transparent background
    pub fn snowflake(size: u32) -> Self {
        let mut sprite = Self::new(size, size);
        let c = (size as f32 - 1.0) / 2.0;
        let radius = c;
        let arm_width = (size as f32 / 24.0).max(1.0);

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 - c;
                let dy = y as f32 - c;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > radius {
                    continue;
                }
                // Distance to the nearest of six arms through the center
                let angle = dy.atan2(dx).rem_euclid(std::f32::consts::PI / 3.0);
                let off_arm = angle.min(std::f32::consts::PI / 3.0 - angle);
                let perp = dist * off_arm.sin();
                // Side branches two thirds of the way out
                let branch = (dist - radius * 0.6).abs() < arm_width && perp < radius * 0.2;
                if perp < arm_width || branch || dist < arm_width * 2.0 {
                    let shade = 200 + ((1.0 - dist / radius) * 55.0) as u8;
                    sprite.set_pixel(x, y, shade, shade, 255, 255);
                }
            }
        }
        sprite
    }

    /// Shaded ornament ball of the given hue (degrees)
    pub fn ornament(size: u32, hue: f32) -> Self {
        let mut sprite = Self::new(size, size);
        let c = (size as f32 - 1.0) / 2.0;
        let radius = c;
        let base = hsv_to_rgb(hue, 0.85, 0.9);
        // Highlight up and to the left of center
        let hx = c - radius * 0.35;
        let hy = c - radius * 0.35;

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 - c;
                let dy = y as f32 - c;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let hd = ((x as f32 - hx).powi(2) + (y as f32 - hy).powi(2)).sqrt() / radius;
                let (r, g, b) = lerp_color((255, 255, 255), base, hd * 1.6);
                sprite.set_pixel(x, y, r, g, b, 255);
            }
        }
        sprite
    }

    /// Set of stand-in sprites used when no asset files are available
    pub fn procedural_set() -> Vec<Self> {
        vec![
            Self::checkerboard(64, 8, (220, 20, 40), (245, 245, 245)),
            Self::xor_pattern(64, (40, 200, 80)),
            Self::snowflake(64),
            Self::ornament(48, 0.0),
            Self::ornament(48, 120.0),
            Self::ornament(48, 45.0),
        ]
    }
}

/// Load every configured asset, skipping files that can't be decoded.
/// Falls back to the procedural set when nothing loads.
pub fn load_sprites(config: &DemoConfig) -> Vec<Rc<Sprite>> {
    let mut sprites = Vec::new();
    for path in config.asset_paths() {
        match Sprite::load(&path) {
            Ok(sprite) if sprite.width() > 0 && sprite.height() > 0 => {
                tracing::debug!(path = %path.display(), width = sprite.width(), height = sprite.height(), "loaded sprite");
                sprites.push(Rc::new(sprite));
            },
            Ok(_) => tracing::warn!(path = %path.display(), "skipping empty image"),
            Err(e) => tracing::warn!("{e}"),
        }
    }

    if sprites.is_empty() {
        tracing::info!("no sprite assets loaded, using procedural sprites");
        sprites = Sprite::procedural_set().into_iter().map(Rc::new).collect();
    } else {
        tracing::info!(count = sprites.len(), "sprite assets loaded");
    }
    sprites
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texel_clamps() {
        let mut s = Sprite::new(2, 2);
        s.set_pixel(1, 1, 9, 8, 7, 6);
        assert_eq!(s.texel(1, 1), (9, 8, 7, 6));
        assert_eq!(s.texel(50, 50), (9, 8, 7, 6));
    }

    #[test]
    fn test_checkerboard_alternates() {
        let s = Sprite::checkerboard(4, 2, (255, 0, 0), (0, 0, 255));
        assert_eq!(s.texel(0, 0), (255, 0, 0, 255));
        assert_eq!(s.texel(2, 0), (0, 0, 255, 255));
        assert_eq!(s.texel(2, 2), (255, 0, 0, 255));
    }

    #[test]
    fn test_snowflake_has_transparent_corners() {
        let s = Sprite::snowflake(32);
        assert_eq!(s.texel(0, 0).3, 0);
        assert_eq!(s.texel(16, 16).3, 255);
    }

    #[test]
    fn test_procedural_set_non_empty() {
        let set = Sprite::procedural_set();
        assert!(!set.is_empty());
        assert!(set.iter().all(|s| s.width() > 0 && s.height() > 0));
    }

    #[test]
    fn test_missing_assets_fall_back() {
        let config = DemoConfig {
            asset_dir: "/nonexistent".into(),
            ..DemoConfig::default()
        };
        let sprites = load_sprites(&config);
        assert_eq!(sprites.len(), Sprite::procedural_set().len());
    }

    #[test]
    fn test_load_png_round_trip() {
        let path = std::env::temp_dir().join(format!("holidascope-sprite-{}.png", std::process::id()));
        let mut buf = crate::display::PixelBuffer::with_size(3, 2);
        buf.clear(10, 20, 30);
        buf.save_png(&path).unwrap();
        let sprite = Sprite::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!((sprite.width(), sprite.height()), (3, 2));
        assert_eq!(sprite.texel(2, 1), (10, 20, 30, 255));
    }
}
