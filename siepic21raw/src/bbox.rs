//!
//! # Rectangular Bounding Boxes and Associated Trait
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::{
    geom::{Point, Shape, ShapeTrait},
    Int,
};

/// # Rectangular Bounding Box
///
/// `p0` is always the lower-left corner and `p1` the upper-right.
/// An "empty" box has `p0` above and to the right of `p1`,
/// and unions with anything to produce that thing's box.
///
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BoundBox {
    pub p0: Point,
    pub p1: Point,
}
impl BoundBox {
    /// Create a new [BoundBox] from two corner [Point]s, in either order
    pub fn from_points(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }
    /// Create an empty, otherwise invalid [BoundBox]
    pub fn empty() -> Self {
        Self {
            p0: Point::new(Int::MAX, Int::MAX),
            p1: Point::new(Int::MIN, Int::MIN),
        }
    }
    /// Boolean indication of whether a box is empty
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }
    /// Boolean indication of whether [Point] `pt` lies inside our box
    pub fn contains(&self, pt: &Point) -> bool {
        self.p0.x <= pt.x && self.p1.x >= pt.x && self.p0.y <= pt.y && self.p1.y >= pt.y
    }
    /// Expand in all directions by `delta`. Empty boxes stay empty.
    pub fn expand(&mut self, delta: Int) {
        if self.is_empty() {
            return;
        }
        self.p0.x -= delta;
        self.p0.y -= delta;
        self.p1.x += delta;
        self.p1.y += delta;
    }
    /// Get the box's size as an (x,y) tuple
    pub fn size(&self) -> (Int, Int) {
        (self.p1.x - self.p0.x, self.p1.y - self.p0.y)
    }
}

///
/// # Bounding Box Trait
///
/// Implemented for [Point]s, [Shape]s, and [BoundBox]es,
/// and by the cell types, which union over their contents.
///
pub trait BoundBoxTrait {
    /// Compute a rectangular bounding box around the implementing type.
    fn bbox(&self) -> BoundBox;
    /// Compute the union with rectangular bounding box `bbox`.
    fn union(&self, bbox: &BoundBox) -> BoundBox {
        let own = self.bbox();
        if own.is_empty() {
            return bbox.clone();
        }
        if bbox.is_empty() {
            return own;
        }
        BoundBox {
            p0: Point::new(own.p0.x.min(bbox.p0.x), own.p0.y.min(bbox.p0.y)),
            p1: Point::new(own.p1.x.max(bbox.p1.x), own.p1.y.max(bbox.p1.y)),
        }
    }
}

impl BoundBoxTrait for BoundBox {
    fn bbox(&self) -> BoundBox {
        self.clone()
    }
}
impl BoundBoxTrait for Point {
    fn bbox(&self) -> BoundBox {
        BoundBox { p0: *self, p1: *self }
    }
}
impl BoundBoxTrait for Shape {
    fn bbox(&self) -> BoundBox {
        let mut bbox = BoundBox::empty();
        for pt in self.vertices() {
            bbox = pt.union(&bbox);
        }
        if let Shape::Path(p) = self {
            // Half-width on every side. Exact for Manhattan paths, conservative otherwise.
            bbox.expand((p.width / 2) as Int);
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Path, Rect};

    #[test]
    fn test_union_with_empty() {
        let b = Point::new(1, 2).union(&BoundBox::empty());
        assert_eq!(b, BoundBox::from_points(Point::new(1, 2), Point::new(1, 2)));
        let b = BoundBox::empty().union(&BoundBox::empty());
        assert!(b.is_empty());
    }
    #[test]
    fn test_shape_bbox() {
        let r = Shape::Rect(Rect::new(Point::new(5, 5), Point::new(-5, 0)));
        assert_eq!(r.bbox(), BoundBox::from_points(Point::new(-5, 0), Point::new(5, 5)));

        let p = Shape::Path(Path::new(vec![Point::new(0, 0), Point::new(100, 0)], 50));
        let b = p.bbox();
        assert_eq!(b.p0, Point::new(-25, -25));
        assert_eq!(b.p1, Point::new(125, 25));
        assert_eq!(b.size(), (150, 50));
    }
}
