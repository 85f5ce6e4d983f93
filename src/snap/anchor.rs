// src/snap/anchor.rs
//! Anchors: the named reference locations on an element's bounding box.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::geometry::{Axis, BoundingBox, Point};
use crate::utils::util::point_key;

/// Non-owning reference to a scene element. Only ever used for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of the eight bounding-box locations an anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorKind {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "br")]
    BottomRight,
    #[serde(rename = "ml")]
    MiddleLeft,
    #[serde(rename = "mr")]
    MiddleRight,
    #[serde(rename = "mt")]
    MiddleTop,
    #[serde(rename = "mb")]
    MiddleBottom,
}

impl AnchorKind {
    pub fn all() -> &'static [AnchorKind; 8] {
        &[
            AnchorKind::TopLeft,
            AnchorKind::TopRight,
            AnchorKind::BottomLeft,
            AnchorKind::BottomRight,
            AnchorKind::MiddleLeft,
            AnchorKind::MiddleRight,
            AnchorKind::MiddleTop,
            AnchorKind::MiddleBottom,
        ]
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            AnchorKind::TopLeft => "tl",
            AnchorKind::TopRight => "tr",
            AnchorKind::BottomLeft => "bl",
            AnchorKind::BottomRight => "br",
            AnchorKind::MiddleLeft => "ml",
            AnchorKind::MiddleRight => "mr",
            AnchorKind::MiddleTop => "mt",
            AnchorKind::MiddleBottom => "mb",
        }
    }

    /// True for the edge midpoints that sit on the element's centre line along `axis`:
    /// `mt`/`mb` share the horizontal centre (`X`), `ml`/`mr` the vertical one (`Y`).
    pub fn is_mid_on(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => matches!(self, AnchorKind::MiddleTop | AnchorKind::MiddleBottom),
            Axis::Y => matches!(self, AnchorKind::MiddleLeft | AnchorKind::MiddleRight),
        }
    }

    fn locate(&self, b: &BoundingBox) -> Point {
        let mid_x = (b.min_x + b.max_x) / 2.0;
        let mid_y = (b.min_y + b.max_y) / 2.0;
        match self {
            AnchorKind::TopLeft => Point::new(b.min_x, b.min_y),
            AnchorKind::TopRight => Point::new(b.max_x, b.min_y),
            AnchorKind::BottomLeft => Point::new(b.min_x, b.max_y),
            AnchorKind::BottomRight => Point::new(b.max_x, b.max_y),
            AnchorKind::MiddleLeft => Point::new(b.min_x, mid_y),
            AnchorKind::MiddleRight => Point::new(b.max_x, mid_y),
            AnchorKind::MiddleTop => Point::new(mid_x, b.min_y),
            AnchorKind::MiddleBottom => Point::new(mid_x, b.max_y),
        }
    }
}

/// A candidate alignment anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapPoint {
    pub x: f64,
    pub y: f64,
    pub kind: AnchorKind,
    pub element: ElementId,
}

impl SnapPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// The eight anchors of `bounds`, in `AnchorKind::all()` order. Degenerate bounds yield
/// none.
pub fn bounds_to_anchors(bounds: &BoundingBox, element: ElementId) -> Vec<SnapPoint> {
    if bounds.is_degenerate() {
        return Vec::new();
    }
    AnchorKind::all()
        .iter()
        .map(|kind| {
            let p = kind.locate(bounds);
            SnapPoint { x: p.x, y: p.y, kind: *kind, element }
        })
        .collect()
}

/// Looks up one anchor of an already computed anchor set.
pub fn find_anchor(anchors: &[SnapPoint], kind: AnchorKind) -> Option<&SnapPoint> {
    anchors.iter().find(|a| a.kind == kind)
}

/// Removes points sharing an exact `(x, y)`, keeping the first occurrence and the input
/// order.
pub fn dedupe_points<'a, I>(points: I) -> Vec<SnapPoint>
where
    I: IntoIterator<Item = &'a SnapPoint>,
{
    let mut seen = HashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(point_key(&p.point())))
        .copied()
        .collect()
}
