//! Message Scroller Overlay
//!
//! Classic demoscene message scroller drawn over the kaleidoscope. It waits out a
//! lead-in, fades in a translucent background strip, then scrolls the message
//! leftward across the strip forever.

use super::font::{draw_text_scaled, text_width_scaled, GLYPH_HEIGHT};
use super::PixelBuffer;
use crate::config::ScrollerConfig;

/// Vertical padding above and below the glyphs inside the strip
const STRIP_PADDING: u32 = 6;

/// Scroller display phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollerPhase {
    /// Nothing is drawn yet
    LeadIn,
    /// Background strip fades in, no text
    FadeIn,
    /// Strip at full opacity with scrolling text
    DisplayText,
}

/// Fade-in text scroller
pub struct MessageScroller {
    text: String,
    x: f32,
    speed: f32, // pixels per second
    scale: u32,
    color: (u8, u8, u8),
    phase: ScrollerPhase,
    phase_time_ms: f32,
    lead_in_ms: f32,
    fade_in_ms: f32,
    offset_from_bottom: u32,
    background: u8,
    background_alpha: f32,
    // Screen width the text re-enters from
    screen_width: u32,
}

impl MessageScroller {
    pub fn new(config: &ScrollerConfig, screen_width: u32) -> Self {
        Self {
            text: config.message.clone(),
            x: screen_width as f32, // Start off-screen right
            speed: config.speed.abs(),
            scale: config.scale.max(1),
            color: config.color,
            phase: ScrollerPhase::LeadIn,
            phase_time_ms: 0.0,
            lead_in_ms: config.lead_in_ms,
            fade_in_ms: config.fade_in_ms,
            offset_from_bottom: config.offset_from_bottom,
            background: (config.background_intensity.clamp(0.0, 1.0) * 255.0).round() as u8,
            background_alpha: config.background_alpha.clamp(0.0, 1.0),
            screen_width,
        }
    }

    #[inline]
    pub fn phase(&self) -> ScrollerPhase {
        self.phase
    }

    /// Current X position of the text
    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Height of the background strip
    pub fn text_area_height(&self) -> u32 {
        GLYPH_HEIGHT * self.scale + STRIP_PADDING * 2
    }

    /// Strip opacity for the current phase, 0.0 - 1.0
    pub fn strip_alpha(&self) -> f32 {
        match self.phase {
            ScrollerPhase::LeadIn => 0.0,
            ScrollerPhase::FadeIn => {
                let progress = if self.fade_in_ms > 0.0 {
                    (self.phase_time_ms / self.fade_in_ms).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                self.background_alpha * progress
            },
            ScrollerPhase::DisplayText => self.background_alpha,
        }
    }

    /// Draw the overlay for this frame, then advance scroll position and phase
    pub fn render(&mut self, buffer: &mut PixelBuffer, dt_ms: f32) {
        if self.phase != ScrollerPhase::LeadIn {
            let strip_y = buffer.height() as i32 - self.offset_from_bottom as i32;
            let alpha = (self.strip_alpha() * 255.0).round() as u8;
            let bg = self.background;
            buffer.fill_rect_blend(0, strip_y, buffer.width(), self.text_area_height(), bg, bg, bg, alpha);

            if self.phase == ScrollerPhase::DisplayText {
                let (r, g, b) = self.color;
                let text_y = strip_y + STRIP_PADDING as i32;
                draw_text_scaled(buffer, self.x as i32, text_y, &self.text, r, g, b, self.scale);
                self.advance(dt_ms);
            }
        }

        self.update_phase(dt_ms);
    }

    /// Advance scroll position and phase by `dt_ms` without drawing, for
    /// frames that are dropped
    pub fn skip(&mut self, dt_ms: f32) {
        if self.phase == ScrollerPhase::DisplayText {
            self.advance(dt_ms);
        }
        self.update_phase(dt_ms);
    }

    /// Move the text left; once it has fully left the screen it re-enters on the right
    fn advance(&mut self, dt_ms: f32) {
        let text_w = text_width_scaled(&self.text, self.scale) as f32;
        self.x -= self.speed * dt_ms / 1000.0;
        if self.x < -text_w {
            self.x = self.screen_width as f32;
        }
    }

    fn update_phase(&mut self, dt_ms: f32) {
        self.phase_time_ms += dt_ms;
        match self.phase {
            ScrollerPhase::LeadIn if self.phase_time_ms >= self.lead_in_ms => {
                self.phase = ScrollerPhase::FadeIn;
                self.phase_time_ms = 0.0;
            },
            ScrollerPhase::FadeIn if self.phase_time_ms >= self.fade_in_ms => {
                self.phase = ScrollerPhase::DisplayText;
                self.phase_time_ms = 0.0;
            },
            _ => {},
        }
    }
}
