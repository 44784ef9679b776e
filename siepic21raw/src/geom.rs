//!
//! # Geometry Module
//!
//! Defines the core geometric types including [Point], [Shape], and [Transform],
//! and their core operations.
//!

// Crates.io
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

// Local imports
use crate::Int;

/// # Point in two-dimensional layout-space
/// Denominated in database units.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub x: Int,
    pub y: Int,
}
impl Point {
    /// Create a new [Point] from (x,y) coordinates
    pub fn new(x: Int, y: Int) -> Self {
        Self { x, y }
    }
    /// Create a new [Point], transformed from our original location by `transform`.
    /// Coordinate transforms are applied in floating-point format,
    /// largely for rotations, and then rounded to the nearest integer.
    pub fn transform(&self, trans: &Transform) -> Point {
        let [x, y] = trans.apply([self.x as f64, self.y as f64]);
        Self {
            x: x.round() as Int,
            y: y.round() as Int,
        }
    }
}

/// # Path
///
/// Open-ended geometric path, drawn with constant `width`.
/// Zero-width paths are valid, and are the SiEPIC convention for pin markers.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Path {
    pub points: Vec<Point>,
    pub width: usize,
}
impl Path {
    /// Create a new [Path]
    pub fn new(points: Vec<Point>, width: usize) -> Self {
        Self { points, width }
    }
    /// Get the path's two spine end-points, if it has at least two points.
    pub fn ends(&self) -> Option<(Point, Point)> {
        if self.points.len() < 2 {
            return None;
        }
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((*first, *last))
    }
}
/// # Polygon
///
/// Closed n-sided polygon with arbitrary number of vertices.
/// Closure from the last point back to the first is implied;
/// the initial point need not be repeated at the end.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Polygon {
    pub points: Vec<Point>,
}
impl Polygon {
    /// Create a new [Polygon]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}
/// # Rectangle
///
/// Axis-aligned rectangle, specified by two opposite corners.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}
impl Rect {
    /// Create a new [Rect] from two opposite corners
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }
}

/// # Shape
///
/// The primary geometric primitive comprising raw layout.
/// Variants include [Rect], [Polygon], and [Path].
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[enum_dispatch(ShapeTrait)]
pub enum Shape {
    Rect(Rect),
    Polygon(Polygon),
    Path(Path),
}
impl Default for Shape {
    fn default() -> Self {
        Self::Rect(Rect::default())
    }
}
impl Shape {
    /// Get a reference to our inner [Path], if we are one
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Shape::Path(p) => Some(p),
            _ => None,
        }
    }
}

/// # ShapeTrait
///
/// Common shape operations, dispatched from the [Shape] enum to its variants by [enum_dispatch].
///
#[enum_dispatch]
pub trait ShapeTrait {
    /// Convert to a list of vertices
    fn vertices(&self) -> Vec<Point>;
}
impl ShapeTrait for Rect {
    fn vertices(&self) -> Vec<Point> {
        vec![
            self.p0,
            Point::new(self.p1.x, self.p0.y),
            self.p1,
            Point::new(self.p0.x, self.p1.y),
        ]
    }
}
impl ShapeTrait for Polygon {
    fn vertices(&self) -> Vec<Point> {
        self.points.clone()
    }
}
impl ShapeTrait for Path {
    /// Paths report their spine points
    fn vertices(&self) -> Vec<Point> {
        self.points.clone()
    }
}

/// # Matrix-Vector Transformation
///
/// 2x2 rotation-matrix and two-entry translation vector,
/// used for relative movement of [Point]s and [Shape]s.
///
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Rotation / Transformation Matrix
    /// Represented in row-major order
    pub a: [[f64; 2]; 2],
    /// X-Y Translation
    pub b: [f64; 2],
}
impl Transform {
    /// The identity transform, leaving any transformed object unmodified
    pub fn identity() -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [0., 0.],
        }
    }
    /// Translation by (x,y)
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [x, y],
        }
    }
    /// A transform to rotate counter-clockwise by `angle` degrees
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = sincos(angle);
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [0., 0.],
        }
    }
    /// A transform to reflect about the x-axis
    pub fn reflect_vert() -> Self {
        Self {
            a: [[1., 0.], [0., -1.]],
            b: [0., 0.],
        }
    }
    /// Create a transform from instance fields.
    /// Reflection about the x-axis is applied first, then counter-clockwise rotation, then translation to `loc`.
    pub fn from_instance(loc: &Point, reflect_vert: bool, angle: Option<f64>) -> Self {
        let (sin, cos) = sincos(angle.unwrap_or(0.));
        let r = if reflect_vert { -1. } else { 1. };
        Self {
            a: [[cos, -sin * r], [sin, cos * r]],
            b: [loc.x as f64, loc.y as f64],
        }
    }
    /// Create a new [Transform] that is the cascade of `parent` and `child`.
    ///
    /// "Parents" and "children" refer to typical layout-instance hierarchies,
    /// in which each layer of instance has a nested set of transformations relative to its top-level parent.
    /// Note this operation *is not* commutative.
    pub fn cascade(parent: &Transform, child: &Transform) -> Transform {
        let mut b = matvec(&parent.a, &child.b);
        b[0] += parent.b[0];
        b[1] += parent.b[1];
        let a = matmul(&parent.a, &child.a);
        Self { a, b }
    }
    /// Apply to a floating-point (x, y) pair
    pub fn apply(&self, v: [f64; 2]) -> [f64; 2] {
        let mut rv = matvec(&self.a, &v);
        rv[0] += self.b[0];
        rv[1] += self.b[1];
        rv
    }
    /// Apply only the rotation/reflection part, e.g. to a direction vector
    pub fn apply_dir(&self, v: [f64; 2]) -> [f64; 2] {
        matvec(&self.a, &v)
    }
}
/// Sine and cosine of `angle` degrees.
/// Multiples of 90 degrees come out exact, so Manhattan placements stay on-grid.
fn sincos(angle: f64) -> (f64, f64) {
    let norm = angle.rem_euclid(360.);
    if norm == 0. {
        (0., 1.)
    } else if norm == 90. {
        (1., 0.)
    } else if norm == 180. {
        (0., -1.)
    } else if norm == 270. {
        (-1., 0.)
    } else {
        angle.to_radians().sin_cos()
    }
}
/// Multiply 2x2 matrices, returning a new 2x2 matrix
fn matmul(a: &[[f64; 2]; 2], b: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}
/// Multiply a 2x2 matrix by a 2-entry vector, returning a new 2-entry vector
fn matvec(a: &[[f64; 2]; 2], b: &[f64; 2]) -> [f64; 2] {
    [
        a[0][0] * b[0] + a[0][1] * b[1],
        a[1][0] * b[0] + a[1][1] * b[1],
    ]
}

pub trait TransformTrait {
    /// Apply matrix-vector [Transform] `trans`.
    /// Creates a new shape at a location equal to the transformation of our own.
    fn transform(&self, trans: &Transform) -> Self;
}
impl TransformTrait for Shape {
    fn transform(&self, trans: &Transform) -> Self {
        match self {
            Shape::Rect(r) => r.transform(trans),
            Shape::Polygon(p) => Shape::Polygon(p.transform(trans)),
            Shape::Path(p) => Shape::Path(p.transform(trans)),
        }
    }
}
impl Rect {
    /// Rectangles stay rectangles under Manhattan transforms,
    /// and become [Polygon]s under anything else.
    fn transform(&self, trans: &Transform) -> Shape {
        let manhattan = trans.a[0][1] == 0. || trans.a[0][0] == 0.;
        if manhattan {
            let (p0, p1) = (self.p0.transform(trans), self.p1.transform(trans));
            Shape::Rect(Rect {
                p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
                p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
            })
        } else {
            Shape::Polygon(Polygon::new(self.vertices()).transform(trans))
        }
    }
}
impl TransformTrait for Polygon {
    fn transform(&self, trans: &Transform) -> Self {
        Polygon {
            points: self.points.iter().map(|p| p.transform(trans)).collect(),
        }
    }
}
impl TransformTrait for Path {
    fn transform(&self, trans: &Transform) -> Self {
        Path {
            points: self.points.iter().map(|p| p.transform(trans)).collect(),
            width: self.width,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    #[test]
    fn transform_identity() {
        let shape1 = Shape::Rect(Rect::new(Point::new(0, 0), Point::new(1, 1)));
        let shape2 = shape1.transform(&Transform::identity());
        assert_eq!(shape2, shape1);
    }
    #[test]
    fn transform_rotate() {
        let trans = Transform::rotate(90.);
        let p = Point::new(2, 0);
        assert_eq!(p.transform(&trans), Point::new(0, 2));
        assert_eq!(p.transform(&trans).transform(&trans), Point::new(-2, 0));

        // Rectangles stay normalized, lower-left first
        let r = Shape::Rect(Rect::new(Point::new(0, 0), Point::new(2, 1)));
        assert_eq!(
            r.transform(&trans),
            Shape::Rect(Rect::new(Point::new(-1, 0), Point::new(0, 2)))
        );
    }
    #[test]
    fn test_cascade() {
        let trans1 = Transform::reflect_vert();
        let trans2 = Transform::translate(1., 1.);

        let p = Point::new(1, 1);
        let pc1 = p.transform(&Transform::cascade(&trans1, &trans2));
        assert_eq!(pc1, Point::new(2, -2));

        let pc2 = p.transform(&Transform::cascade(&trans2, &trans1));
        assert_eq!(pc2, Point::new(2, 0));
    }
    #[test]
    fn test_reflect_then_rotate() {
        // Reflect about x, then rotate 180: a mirror about the y-axis
        let trans = Transform::from_instance(&Point::new(0, 0), true, Some(180.));
        assert_eq!(Point::new(3, 2).transform(&trans), Point::new(-3, 2));
        // Rotate 90 after reflection
        let trans = Transform::from_instance(&Point::new(10, 0), true, Some(90.));
        assert_eq!(Point::new(1, 0).transform(&trans), Point::new(10, 1));
        assert_eq!(Point::new(0, 1).transform(&trans), Point::new(11, 0));
    }
    #[test]
    fn test_path_ends() {
        let p = Path::new(vec![Point::new(0, 0), Point::new(5, 0), Point::new(5, 5)], 0);
        assert_eq!(p.ends(), Some((Point::new(0, 0), Point::new(5, 5))));
        assert_eq!(Path::new(vec![Point::new(0, 0)], 10).ends(), None);
    }
}
