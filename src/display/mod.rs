mod font;
mod pixel_buffer;
mod scroller;
#[cfg(feature = "window")]
mod window;

pub use font::{draw_char_scaled, draw_text_scaled, text_width_scaled, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use pixel_buffer::PixelBuffer;
pub use scroller::{MessageScroller, ScrollerPhase};
#[cfg(feature = "window")]
pub use window::{Display, InputEvent, RenderTarget};

/// Default output frame size; the kaleidoscope works on half of each
pub const DEFAULT_WIDTH: u32 = 960;
pub const DEFAULT_HEIGHT: u32 = 720;
