//! Reverse-mapping lookup table for one kaleidoscope quadrant
//!
//! Every output pixel is assigned the source pixel that supplies its color.
//! Directions are measured as the angle from a fold axis running diagonally
//! from the bottom-right corner to the origin. That angle is folded into a
//! single wedge of `slice_angle` radians with a triangle wave, so neighbouring
//! wedges read the same source pixels mirrored. The table depends only on the
//! canvas size, so it's built once and reused for every frame.

use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::geometry::{Point, Vector};

/// Angular width of one mirrored wedge
pub const SLICE_ANGLE: f64 = PI / 16.0;

/// A source pixel coordinate stored in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceCoord {
    pub x: u32,
    pub y: u32,
}

/// Precomputed source coordinate for each pixel of the working canvas
#[derive(Clone, PartialEq)]
pub struct LookupTable {
    width: u32,
    height: u32,
    slice_angle: f64,
    // Row-major, width * height entries
    entries: Vec<SourceCoord>,
}

impl std::fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTable")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("slice_angle", &self.slice_angle)
            .finish_non_exhaustive()
    }
}

/// Fold `angle` (radians, >= 0) into one wedge with a triangle wave.
///
/// Even periods pass through as `angle mod slice`; odd periods are mirrored to
/// `slice - (angle mod slice)`. The result lies in [0, slice].
pub fn fold_angle(angle: f64, slice: f64) -> f64 {
    let period = (angle / slice).abs().floor();
    let modulus = angle % slice;
    if period % 2.0 == 0.0 {
        modulus
    } else {
        slice - modulus
    }
}

/// Unrounded source point for one candidate vector.
///
/// `corner` anchors both vectors; `reference` is the fold axis. Returns None
/// when either vector has zero length.
pub(crate) fn reverse_map(
    corner: Point,
    reference: Vector,
    candidate: Vector,
    slice: f64,
) -> Option<Point> {
    let angle = reference.angle_to(&candidate)?;
    let derived = fold_angle(angle, slice);

    // Same radius as the candidate, laid along the fold axis
    let on_axis = corner.offset(reference.scaled(candidate.magnitude() / reference.magnitude()));
    Some(on_axis.rotated_about(corner, -derived))
}

impl LookupTable {
    /// Build the table for a `width` x `height` working canvas using `SLICE_ANGLE`
    pub fn build(width: u32, height: u32) -> Result<Self> {
        Self::with_slice_angle(width, height, SLICE_ANGLE)
    }

    /// Build the table with a custom wedge width
    pub fn with_slice_angle(width: u32, height: u32, slice_angle: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyCanvas { width, height });
        }
        if !(slice_angle > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "slice angle must be positive, got {}",
                slice_angle
            )));
        }

        let max_x = (width - 1) as f64;
        let max_y = (height - 1) as f64;
        let corner = Point::new(max_x, max_y);
        let reference = Vector::between(corner, Point::ORIGIN);

        let mut entries = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let candidate = Vector::between(corner, Point::new(x as f64, y as f64));
                let entry = match reverse_map(corner, reference, candidate, slice_angle) {
                    Some(p) => SourceCoord {
                        x: p.x.round().clamp(0.0, max_x) as u32,
                        y: p.y.round().clamp(0.0, max_y) as u32,
                    },
                    // Degenerate corner pixel (or a 1x1 canvas)
                    None => SourceCoord { x: 0, y: 0 },
                };
                entries.push(entry);
            }
        }

        Ok(Self {
            width,
            height,
            slice_angle,
            entries,
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

    #[inline]
    pub fn slice_angle(&self) -> f64 {
        self.slice_angle
    }

    /// Source coordinate for output pixel (x, y)
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<SourceCoord> {
        if x < self.width && y < self.height {
            Some(self.entries[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// One output row of source coordinates
    #[inline]
    pub fn row(&self, y: u32) -> &[SourceCoord] {
        let start = y as usize * self.width as usize;
        &self.entries[start..start + self.width as usize]
    }

    /// All entries, row-major
    pub fn entries(&self) -> &[SourceCoord] {
        &self.entries
    }

    /// True if this table was built for a canvas of the given size
    #[inline]
    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_within_bounds() {
        for &(w, h) in &[(1, 1), (2, 2), (3, 17), (17, 3), (64, 48), (2, 200), (200, 2), (480, 360)] {
            let table = LookupTable::build(w, h).unwrap();
            assert_eq!(table.entries().len(), (w * h) as usize);
            for (i, e) in table.entries().iter().enumerate() {
                assert!(e.x < w && e.y < h, "{}x{} entry {} out of bounds: {:?}", w, h, i, e);
            }
        }
    }

    #[test]
    fn test_degenerate_corner_maps_to_origin() {
        let table = LookupTable::build(2, 2).unwrap();
        assert_eq!(table.get(1, 1), Some(SourceCoord { x: 0, y: 0 }));
    }

    #[test]
    fn test_single_pixel_canvas() {
        let table = LookupTable::build(1, 1).unwrap();
        assert_eq!(table.get(0, 0), Some(SourceCoord { x: 0, y: 0 }));
    }

    #[test]
    fn test_empty_canvas_rejected() {
        assert!(matches!(
            LookupTable::build(0, 10),
            Err(Error::EmptyCanvas { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_points_on_fold_axis_map_to_themselves() {
        // Square canvas: the diagonal is the fold axis, angle 0
        let table = LookupTable::build(64, 64).unwrap();
        for i in 0..63 {
            assert_eq!(table.get(i, i), Some(SourceCoord { x: i, y: i }));
        }
    }

    #[test]
    fn test_fold_angle_triangle_wave() {
        let s = SLICE_ANGLE;
        let eps = 1e-12;
        assert!((fold_angle(0.25 * s, s) - 0.25 * s).abs() < eps);
        assert!((fold_angle(1.25 * s, s) - 0.75 * s).abs() < eps);
        assert!((fold_angle(2.25 * s, s) - 0.25 * s).abs() < eps);
        assert!((fold_angle(3.75 * s, s) - 0.25 * s).abs() < eps);
        for i in 0..1000 {
            let a = i as f64 * PI / 1000.0;
            let d = fold_angle(a, s);
            assert!((-eps..=s + eps).contains(&d), "angle {} folded to {}", a, d);
        }
    }

    #[test]
    fn test_mirrored_angles_share_source() {
        // Two candidates with equal radius, at angles s - d and s + d from the
        // fold axis, sit mirror-image across the wedge boundary.
        let corner = Point::new(479.0, 359.0);
        let reference = Vector::between(corner, Point::ORIGIN);
        let axis = reference.scaled(200.0 / reference.magnitude());
        let s = SLICE_ANGLE;

        for &d in &[0.01, 0.05, 0.1, 0.15] {
            let a = Point::ORIGIN.offset(axis).rotated_about(Point::ORIGIN, s - d);
            let b = Point::ORIGIN.offset(axis).rotated_about(Point::ORIGIN, s + d);
            let va = Vector::new(a.x, a.y);
            let vb = Vector::new(b.x, b.y);

            let pa = reverse_map(corner, reference, va, s).unwrap();
            let pb = reverse_map(corner, reference, vb, s).unwrap();
            assert!(
                (pa.x - pb.x).abs() < 1e-9 && (pa.y - pb.y).abs() < 1e-9,
                "d={} gave {:?} vs {:?}",
                d,
                pa,
                pb
            );
        }
    }

    #[test]
    fn test_mirror_across_fold_axis_shares_source() {
        // The fold measures unsigned angle, so both sides of the axis agree
        let corner = Point::new(100.0, 100.0);
        let reference = Vector::between(corner, Point::ORIGIN);
        let axis = reference.scaled(50.0 / reference.magnitude());
        let d = 0.07;
        let a = Point::ORIGIN.offset(axis).rotated_about(Point::ORIGIN, d);
        let b = Point::ORIGIN.offset(axis).rotated_about(Point::ORIGIN, -d);
        let pa = reverse_map(corner, reference, Vector::new(a.x, a.y), SLICE_ANGLE).unwrap();
        let pb = reverse_map(corner, reference, Vector::new(b.x, b.y), SLICE_ANGLE).unwrap();
        assert!((pa.x - pb.x).abs() < 1e-9 && (pa.y - pb.y).abs() < 1e-9);
    }

    #[test]
    fn test_source_radius_preserved() {
        let corner = Point::new(479.0, 359.0);
        let reference = Vector::between(corner, Point::ORIGIN);
        let candidate = Vector::new(-300.0, -20.0);
        let p = reverse_map(corner, reference, candidate, SLICE_ANGLE).unwrap();
        assert!((corner.distance_to(&p) - candidate.magnitude()).abs() < 1e-9);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = LookupTable::build(48, 36).unwrap();
        let b = LookupTable::build(48, 36).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_get_out_of_range() {
        let table = LookupTable::build(4, 3).unwrap();
        assert_eq!(table.get(4, 0), None);
        assert_eq!(table.get(0, 3), None);
        assert_eq!(table.row(2).len(), 4);
        assert!(table.matches(4, 3));
        assert!(!table.matches(3, 4));
    }
}
