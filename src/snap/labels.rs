// src/snap/labels.rs
//! Distance labels between the target and the nearest anchors on the lines it snapped to.
//!
//! Labels are keyed by collision axis. Collisions on `x` (vertical lines) give
//! `left`/`right` labels, collisions on `y` (horizontal lines) give `top`/`bottom` ones.
//! Either way the distance is measured along the line, from the target's edge midpoint
//! to the nearest anchor before or after it.

use serde::Serialize;

use crate::snap::anchor::{dedupe_points, find_anchor, AnchorKind, ElementId, SnapPoint};
use crate::snap::collision::{AxisCollisions, CollisionResult};
use crate::utils::geometry::{Axis, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelDirection {
    Left,
    Right,
    Top,
    Bottom,
}

impl LabelDirection {
    pub fn axis(self) -> Axis {
        match self {
            LabelDirection::Left | LabelDirection::Right => Axis::X,
            LabelDirection::Top | LabelDirection::Bottom => Axis::Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceLabel {
    /// Collision axis the label belongs to. Always `direction.axis()`.
    pub axis: Axis,
    pub reference_anchor: SnapPoint,
    /// Where the text goes: `mid`, pushed off the snap line.
    pub position: Point,
    /// Target edge midpoint, projected onto the snap line.
    pub start: Point,
    pub end: Point,
    pub mid: Point,
    pub distance: f64,
    pub direction: LabelDirection,
    pub text: String,
}

/// Labels for both collision axes, `x` first.
///
/// `label_offset` is in reference-frame units; callers convert from screen pixels by
/// dividing by the zoom so the gap looks the same at every scale.
pub fn calculate_distance_labels(
    target_anchors: &[SnapPoint],
    collisions: &AxisCollisions,
    label_offset: f64,
) -> Vec<DistanceLabel> {
    let mut labels = labels_for_axis(Axis::X, target_anchors, &collisions.x, label_offset);
    labels.extend(labels_for_axis(Axis::Y, target_anchors, &collisions.y, label_offset));
    labels
}

fn labels_for_axis(
    axis: Axis,
    target_anchors: &[SnapPoint],
    hits: &[CollisionResult],
    label_offset: f64,
) -> Vec<DistanceLabel> {
    if hits.is_empty() {
        return Vec::new();
    }
    let along = axis.orthogonal();
    let (lead_kind, trail_kind, before_dir, after_dir) = match axis {
        Axis::X => (AnchorKind::MiddleTop, AnchorKind::MiddleBottom, LabelDirection::Left, LabelDirection::Right),
        Axis::Y => (AnchorKind::MiddleLeft, AnchorKind::MiddleRight, LabelDirection::Top, LabelDirection::Bottom),
    };
    let (Some(lead), Some(trail)) = (find_anchor(target_anchors, lead_kind), find_anchor(target_anchors, trail_kind)) else {
        return Vec::new();
    };
    let lead_edge = lead.get(along);
    let trail_edge = trail.get(along);
    let owners: Vec<ElementId> = target_anchors.iter().map(|a| a.element).collect();

    let candidates = dedupe_points(hits.iter().flat_map(|h| h.collision_anchors.iter()));
    let mut before: Option<SnapPoint> = None;
    let mut after: Option<SnapPoint> = None;
    for anchor in candidates {
        if anchor.kind.is_mid_on(axis) || owners.contains(&anchor.element) {
            continue;
        }
        let c = anchor.get(along);
        if c < lead_edge && before.map_or(true, |b| c > b.get(along)) {
            before = Some(anchor);
        }
        if c > trail_edge && after.map_or(true, |a| c < a.get(along)) {
            after = Some(anchor);
        }
    }

    let before = before.map(|a| (a, lead_edge - a.get(along), lead_edge, before_dir));
    let after = after.map(|a| (a, a.get(along) - trail_edge, trail_edge, after_dir));
    let chosen = match (before, after) {
        (Some(b), Some(a)) if b.1 == a.1 => vec![b, a],
        (Some(b), Some(a)) => vec![if b.1 < a.1 { b } else { a }],
        (Some(b), None) => vec![b],
        (None, Some(a)) => vec![a],
        (None, None) => Vec::new(),
    };

    chosen
        .into_iter()
        .map(|(anchor, distance, edge, direction)| build_label(axis, anchor, distance, edge, direction, label_offset))
        .collect()
}

fn build_label(
    axis: Axis,
    anchor: SnapPoint,
    distance: f64,
    edge: f64,
    direction: LabelDirection,
    label_offset: f64,
) -> DistanceLabel {
    let end = anchor.point();
    // `edge` runs along the line, so `start` sits on it.
    let start = match axis {
        Axis::X => Point::new(anchor.x, edge),
        Axis::Y => Point::new(edge, anchor.y),
    };
    let mid = start.midpoint(&end);
    let position = match axis {
        Axis::X => Point::new(mid.x + label_offset, mid.y),
        Axis::Y => Point::new(mid.x, mid.y - label_offset),
    };
    DistanceLabel {
        axis,
        reference_anchor: anchor,
        position,
        start,
        end,
        mid,
        distance,
        direction,
        text: format!("{}", distance.round() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::anchor::bounds_to_anchors;
    use crate::snap::collision::calculate_snap;
    use crate::snap::lines::SnapIndex;
    use crate::utils::geometry::BoundingBox;
    use assert_approx_eq::assert_approx_eq;

    const TARGET: ElementId = ElementId(99);

    fn labels_for(others: &[(f64, f64, f64, f64)], target: (f64, f64, f64, f64), offset: f64) -> Vec<DistanceLabel> {
        let index = SnapIndex::build(
            others
                .iter()
                .enumerate()
                .map(|(i, &(x, y, w, h))| (ElementId(i as u64), BoundingBox::from_rect(x, y, w, h))),
        );
        let (x, y, w, h) = target;
        let anchors = bounds_to_anchors(&BoundingBox::from_rect(x, y, w, h), TARGET);
        let hits = calculate_snap(&anchors, index.lines(), 5.0);
        calculate_distance_labels(&anchors, &hits, offset)
    }

    #[test]
    fn test_vertical_line_gives_left_right_labels() {
        let reference = [(0.0, 0.0, 40.0, 20.0)];
        let target = (1.0, 70.5, 20.0, 20.0);
        let labels = labels_for(&reference, target, 4.0);
        assert_eq!(labels.len(), 1);
        for label in &labels {
            assert_eq!(label.axis, Axis::X);
            assert_eq!(label.direction.axis(), Axis::X);
            assert!(matches!(label.direction, LabelDirection::Left | LabelDirection::Right));
        }
        let label = &labels[0];
        assert_eq!(label.direction, LabelDirection::Left);
        assert_eq!(label.reference_anchor.kind, AnchorKind::BottomLeft);
        assert_eq!(label.start, Point::new(0.0, 70.5));
        assert_eq!(label.end, Point::new(0.0, 20.0));
        assert_eq!(label.distance, 50.5);
        assert_eq!(label.text, "51");
        assert_approx_eq!(label.mid.y, 45.25);
        assert_approx_eq!(label.position.x, label.mid.x + 4.0);
    }

    #[test]
    fn test_horizontal_line_gives_top_bottom_labels() {
        let labels = labels_for(&[(0.0, 0.0, 50.0, 50.0)], (100.0, 2.0, 30.0, 30.0), 10.0);
        assert_eq!(labels.len(), 1);
        let label = &labels[0];
        assert_eq!(label.axis, Axis::Y);
        assert_eq!(label.direction, LabelDirection::Top);
        assert_eq!(label.direction.axis(), label.axis);
        assert_eq!(label.reference_anchor.kind, AnchorKind::TopRight);
        assert_eq!(label.start, Point::new(100.0, 0.0));
        assert_eq!(label.end, Point::new(50.0, 0.0));
        assert_eq!(label.mid, Point::new(75.0, 0.0));
        assert_approx_eq!(label.position.y, -10.0);
        assert_eq!(label.distance, 50.0);
        assert_eq!(label.text, "50");
    }

    #[test]
    fn test_equal_distances_keep_both_directions() {
        let labels = labels_for(
            &[(0.0, 0.0, 10.0, 10.0), (50.0, 0.0, 10.0, 10.0)],
            (20.0, 1.0, 20.0, 10.0),
            10.0,
        );
        let directions: Vec<LabelDirection> = labels.iter().map(|l| l.direction).collect();
        assert_eq!(directions, vec![LabelDirection::Top, LabelDirection::Bottom]);
        assert!(labels.iter().all(|l| l.distance == 10.0));
    }

    #[test]
    fn test_only_the_nearer_direction_otherwise() {
        let labels = labels_for(
            &[(0.0, 0.0, 10.0, 10.0), (55.0, 0.0, 10.0, 10.0)],
            (20.0, 1.0, 20.0, 10.0),
            10.0,
        );
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].direction, LabelDirection::Top);
        assert_eq!(labels[0].distance, 10.0);
    }

    #[test]
    fn test_middle_anchors_on_the_line_are_ignored() {
        // The vertical line at x=0 only holds the wide element's mt/mb.
        let labels = labels_for(&[(-50.0, 0.0, 100.0, 10.0)], (0.0, 200.0, 10.0, 10.0), 10.0);
        assert!(labels.is_empty());

        // The horizontal line at y=0 only holds the tall element's ml/mr.
        let labels = labels_for(&[(0.0, -50.0, 10.0, 100.0)], (200.0, 0.0, 10.0, 10.0), 10.0);
        assert!(labels.is_empty());
    }

    #[test]
    fn test_no_collisions_no_labels() {
        let labels = labels_for(&[(0.0, 0.0, 10.0, 10.0)], (300.0, 300.0, 10.0, 10.0), 10.0);
        assert!(labels.is_empty());
    }
}
