//! 8x8 bitmap font rendering
//!
//! Glyphs come from the public-domain `font8x8` tables. Characters outside the
//! basic Latin block render as blanks.

use font8x8::{UnicodeFonts, BASIC_FONTS};

use super::PixelBuffer;

pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 8;

/// Glyph rows, top to bottom; bit 0 of each row is the leftmost pixel
#[inline]
fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS.get(ch).unwrap_or([0; 8])
}

/// Draw one character with its top-left corner at (x, y), each font pixel
/// expanded to a `scale` x `scale` block
pub fn draw_char_scaled(
    buffer: &mut PixelBuffer,
    x: i32,
    y: i32,
    ch: char,
    r: u8,
    g: u8,
    b: u8,
    scale: u32,
) {
    let scale = scale.max(1) as i32;
    for (row, bits) in glyph(ch).into_iter().enumerate() {
        if bits == 0 {
            continue;
        }
        for col in 0..8i32 {
            if bits & (1u8 << col) == 0 {
                continue;
            }
            let px = x + col * scale;
            let py = y + row as i32 * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    buffer.set_pixel(px + sx, py + sy, r, g, b);
                }
            }
        }
    }
}

/// Draw a string left to right; returns the x just past the last glyph
pub fn draw_text_scaled(
    buffer: &mut PixelBuffer,
    x: i32,
    y: i32,
    text: &str,
    r: u8,
    g: u8,
    b: u8,
    scale: u32,
) -> i32 {
    let advance = (GLYPH_WIDTH * scale.max(1)) as i32;
    let width = buffer.width() as i32;
    let mut cx = x;
    for ch in text.chars() {
        // Only glyphs that touch the buffer are worth rasterizing
        if cx + advance > 0 && cx < width {
            draw_char_scaled(buffer, cx, y, ch, r, g, b, scale);
        }
        cx += advance;
    }
    cx
}

/// Pixel width of a string at the given scale
pub fn text_width_scaled(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_WIDTH * scale.max(1)
}
