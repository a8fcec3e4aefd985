//! Per-frame kaleidoscope passes
//!
//! `render_quadrant_into` resamples a rendered source canvas through the
//! lookup table into one quadrant. `replicate_quadrants` then tiles that
//! quadrant 2x2 with axis flips so the seams mirror each other.
//!
//! Both passes work on whole rows of raw RGBA bytes and never allocate.

use super::table::LookupTable;
use crate::display::PixelBuffer;
use crate::error::{Error, Result};

/// Check that `buffer` matches the table's canvas size
fn check_dimensions(table: &LookupTable, buffer: &PixelBuffer) -> Result<()> {
    if table.matches(buffer.width(), buffer.height()) {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            table_width: table.width(),
            table_height: table.height(),
            buffer_width: buffer.width(),
            buffer_height: buffer.height(),
        })
    }
}

/// Check that `target` can hold the 2x2 tiling of `quadrant`
pub fn check_replication_target(quadrant: (u32, u32), target: (u32, u32)) -> Result<()> {
    let (qw, qh) = quadrant;
    let (tw, th) = target;
    if tw >= qw * 2 && th >= qh * 2 {
        Ok(())
    } else {
        Err(Error::TargetTooSmall {
            quadrant_width: qw,
            quadrant_height: qh,
            target_width: tw,
            target_height: th,
        })
    }
}

/// Remap `source` through `table` into a freshly allocated quadrant
pub fn render_quadrant(source: &PixelBuffer, table: &LookupTable) -> Result<PixelBuffer> {
    let mut target = PixelBuffer::with_size(table.width(), table.height());
    render_quadrant_into(source, table, &mut target, 1)?;
    Ok(target)
}

/// Remap `source` through `table` into `target`.
///
/// Copies RGB from each table-indicated source pixel and forces alpha to 255.
/// With `stride > 1` only every `stride`-th column is looked up and its color
/// is repeated into the columns it skips.
pub fn render_quadrant_into(
    source: &PixelBuffer,
    table: &LookupTable,
    target: &mut PixelBuffer,
    stride: u32,
) -> Result<()> {
    check_dimensions(table, source)?;
    check_dimensions(table, target)?;

    let stride = stride.max(1) as usize;
    let src = source.as_bytes();
    let src_stride = source.stride();
    let row_bytes = target.stride();
    let width = table.width() as usize;

    for (y, dst_row) in target.as_bytes_mut().chunks_exact_mut(row_bytes).enumerate() {
        let coords = table.row(y as u32);
        let mut x = 0;
        while x < width {
            let c = coords[x];
            let si = c.y as usize * src_stride + c.x as usize * 4;
            let rgb = [src[si], src[si + 1], src[si + 2], 255];

            let run = stride.min(width - x);
            for px in dst_row[x * 4..(x + run) * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&rgb);
            }
            x += run;
        }
    }

    Ok(())
}

/// Tile `quadrant` into the top-left 2w x 2h area of `target`:
/// top-left as is, top-right flipped horizontally, bottom-left flipped
/// vertically, bottom-right flipped both ways.
///
/// Leaves `target` untouched and returns `TargetTooSmall` if it can't hold the
/// tiling.
pub fn replicate_quadrants(quadrant: &PixelBuffer, target: &mut PixelBuffer) -> Result<()> {
    let (qw, qh) = (quadrant.width(), quadrant.height());
    check_replication_target((qw, qh), (target.width(), target.height()))?;

    let q_stride = quadrant.stride();
    let t_stride = target.stride();
    let qh = qh as usize;
    let dst = target.as_bytes_mut();

    for (y, src_row) in quadrant.as_bytes().chunks_exact(q_stride).enumerate() {
        let top = y * t_stride;
        let bottom = (2 * qh - 1 - y) * t_stride;

        // Top-left
        dst[top..top + q_stride].copy_from_slice(src_row);
        // Top-right
        copy_row_flipped(src_row, &mut dst[top + q_stride..top + 2 * q_stride]);
        // Bottom-left
        dst[bottom..bottom + q_stride].copy_from_slice(src_row);
        // Bottom-right
        copy_row_flipped(src_row, &mut dst[bottom + q_stride..bottom + 2 * q_stride]);
    }

    Ok(())
}

/// Copy a row of RGBA pixels in reverse pixel order
#[inline]
fn copy_row_flipped(src: &[u8], dst: &mut [u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4).rev()) {
        d.copy_from_slice(s);
    }
}
