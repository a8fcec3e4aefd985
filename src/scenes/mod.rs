//! Kaleidoscope source scenes
//!
//! Each sub-scene animates copies of one sprite across the working canvas.
//! The driver picks one at random, initializes it with a random sprite, and
//! lets it draw into the source buffer every frame until its time is up.

mod rotating;
mod scrolling;
mod zooming;

pub use rotating::RotatingImages;
pub use scrolling::ScrollingImages;
pub use zooming::ZoomingImages;

use std::rc::Rc;

use crate::assets::Sprite;
use crate::display::PixelBuffer;
use crate::util::RandomSource;

/// Trait for all kaleidoscope source scenes
pub trait SourceScene {
    /// (Re)start the scene with a new sprite.
    /// - rng: seeds the scene's own generator for spawn positions and speeds
    fn initialize(&mut self, sprite: Rc<Sprite>, rng: &mut dyn RandomSource);

    /// Draw the current state into `target` and advance by `dt_ms` milliseconds
    fn execute_step(&mut self, dt_ms: f32, target: &mut PixelBuffer);

    /// Scene name for logging
    fn name(&self) -> &str;
}

/// The standard rotation of sub-scenes for a working canvas of the given size
pub fn standard_scenes(width: u32, height: u32) -> Vec<Box<dyn SourceScene>> {
    vec![
        Box::new(ScrollingImages::new(width, height)),
        Box::new(ZoomingImages::new(width, height)),
        Box::new(RotatingImages::new(width, height)),
    ]
}
