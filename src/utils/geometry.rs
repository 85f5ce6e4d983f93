// src/utils/geometry.rs
use serde::{Deserialize, Serialize};

/// The two layout axes. Vertical snap lines constrain `X`, horizontal ones constrain `Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn orthogonal(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Axis-aligned bounds in a shared reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox { min_x, min_y, max_x, max_y }
    }

    /// Builds bounds from the `{x, y, width, height}` form hosts usually report.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        BoundingBox::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Leading edge along `axis`.
    pub fn min(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.min_x,
            Axis::Y => self.min_y,
        }
    }

    /// Trailing edge along `axis`.
    pub fn max(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.max_x,
            Axis::Y => self.max_y,
        }
    }

    /// A box is degenerate when it cannot produce meaningful anchors: any coordinate is
    /// not finite, an extent is inverted, or it has neither width nor height.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite();
        if !finite {
            return true;
        }
        let (w, h) = (self.width(), self.height());
        w < 0.0 || h < 0.0 || (w == 0.0 && h == 0.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(self.min_x + dx, self.min_y + dy, self.max_x + dx, self.max_y + dy)
    }

    pub fn combine(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Union of all boxes, `None` for an empty input.
    pub fn union_all<'a, I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut iter = boxes.into_iter();
        let mut acc = *iter.next()?;
        for b in iter {
            acc.combine(b);
        }
        Some(acc)
    }

    /// Strict overlap of the two projections onto `axis`. Touching edges do not overlap.
    pub fn overlaps_on(&self, other: &BoundingBox, axis: Axis) -> bool {
        self.min(axis) < other.max(axis) && other.min(axis) < self.max(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rect() {
        let b = BoundingBox::from_rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.max_x, 40.0);
        assert_eq!(b.max_y, 60.0);
        assert_eq!(b.width(), 30.0);
        assert_eq!(b.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn test_degenerate_boxes() {
        assert!(BoundingBox::from_rect(5.0, 5.0, 0.0, 0.0).is_degenerate());
        assert!(BoundingBox::new(10.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_degenerate());
        // A zero-width rule still has a usable vertical extent.
        assert!(!BoundingBox::from_rect(5.0, 0.0, 0.0, 100.0).is_degenerate());
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = BoundingBox::from_rect(0.0, 0.0, 10.0, 10.0);
        let touching = BoundingBox::from_rect(0.0, 10.0, 10.0, 10.0);
        let inside = BoundingBox::from_rect(20.0, 5.0, 10.0, 10.0);
        assert!(!a.overlaps_on(&touching, Axis::Y));
        assert!(a.overlaps_on(&inside, Axis::Y));
        assert!(!a.overlaps_on(&inside, Axis::X));
    }

    #[test]
    fn test_union_all() {
        let boxes = [
            BoundingBox::from_rect(0.0, 0.0, 10.0, 10.0),
            BoundingBox::from_rect(50.0, -5.0, 10.0, 10.0),
        ];
        let u = BoundingBox::union_all(&boxes).unwrap();
        assert_eq!(u, BoundingBox::new(0.0, -5.0, 60.0, 10.0));
        assert!(BoundingBox::union_all(&[]).is_none());
    }
}
