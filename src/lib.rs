//! holidascope
//!
//! A holiday greeting demo: sprite sub-scenes drawn on a small canvas are
//! resampled through a precomputed kaleidoscope table and mirrored four ways
//! into the output frame, with a message scroller on top.

pub mod assets;
pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod kaleidoscope;
pub mod scenes;
pub mod util;

pub use driver::HolidaScope;
pub use error::{Error, Result};
