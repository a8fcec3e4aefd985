//! Kaleidoscope transform
//!
//! A rendered source canvas is resampled through a precomputed reverse-mapping
//! table into one quadrant, which is then mirrored into all four quadrants of
//! a canvas twice its size.

mod compositor;
mod table;

pub use compositor::{
    check_replication_target, render_quadrant, render_quadrant_into, replicate_quadrants,
};
pub use table::{fold_angle, LookupTable, SourceCoord, SLICE_ANGLE};

use crate::display::PixelBuffer;
use crate::error::Result;

/// Table plus the quadrant scratch buffer it renders into.
///
/// Construction validates the output size once, so per-frame errors from
/// `render` only happen if a caller hands in a differently sized buffer.
pub struct Kaleidoscope {
    table: LookupTable,
    quadrant: PixelBuffer,
    stride: u32,
}

impl Kaleidoscope {
    /// Build the table for a `width` x `height` working canvas and check that
    /// an `output` sized frame can hold the mirrored result
    pub fn new(width: u32, height: u32, output: (u32, u32), stride: u32) -> Result<Self> {
        check_replication_target((width, height), output)?;

        let started = std::time::Instant::now();
        let table = LookupTable::build(width, height)?;
        tracing::info!(
            width,
            height,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "built kaleidoscope lookup table"
        );

        Ok(Self {
            table,
            quadrant: PixelBuffer::with_size(width, height),
            stride: stride.max(1),
        })
    }

    #[inline]
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Most recently remapped quadrant
    #[inline]
    pub fn quadrant(&self) -> &PixelBuffer {
        &self.quadrant
    }

    /// Remap `source` and mirror the result into `output`
    pub fn render(&mut self, source: &PixelBuffer, output: &mut PixelBuffer) -> Result<()> {
        render_quadrant_into(source, &self.table, &mut self.quadrant, self.stride)?;
        replicate_quadrants(&self.quadrant, output)
    }
}
