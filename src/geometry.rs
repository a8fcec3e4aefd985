//! Geometry primitives for the kaleidoscope table
//!
//! f64 throughout: table entries are rounded to whole pixels, so the extra
//! precision keeps entries stable near .5 boundaries.

/// A point in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Copy of this point rotated about `center` by `angle` radians
    /// (positive angles turn +x toward +y).
    pub fn rotated_about(&self, center: Point, angle: f64) -> Point {
        let (sin_a, cos_a) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point {
            x: center.x + dx * cos_a - dy * sin_a,
            y: center.y + dx * sin_a + dy * cos_a,
        }
    }

    /// Point reached by walking `v` from here
    #[inline]
    pub fn offset(&self, v: Vector) -> Point {
        Point::new(self.x + v.dx, self.y + v.dy)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        Vector::between(*self, *other).magnitude()
    }
}

/// A directed quantity; only used as a computational helper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Vector from `from` to `to`
    #[inline]
    pub fn between(from: Point, to: Point) -> Self {
        Self::new(to.x - from.x, to.y - from.y)
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.dx * other.dx + self.dy * other.dy
    }

    #[inline]
    pub fn scaled(&self, factor: f64) -> Vector {
        Vector::new(self.dx * factor, self.dy * factor)
    }

    /// Angle between two vectors in [0, PI], or None if either is zero-length
    pub fn angle_to(&self, other: &Vector) -> Option<f64> {
        let denom = self.magnitude() * other.magnitude();
        if denom > 0.0 {
            // Rounding can push the cosine a hair outside [-1, 1]
            Some((self.dot(other) / denom).clamp(-1.0, 1.0).acos())
        } else {
            None
        }
    }
}
