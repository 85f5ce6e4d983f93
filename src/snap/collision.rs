// src/snap/collision.rs
//! Per-axis collision tests between a moving target's anchors and the indexed lines.

use std::sync::Arc;

use serde::Serialize;

use crate::snap::anchor::{dedupe_points, SnapPoint};
use crate::snap::lines::SnapLine;
use crate::utils::geometry::Axis;
use crate::utils::util::within_tolerance;

/// A target anchor landing within tolerance of a snap line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionResult {
    pub line: Arc<SnapLine>,
    /// The line's points followed by the matched target anchors, deduplicated.
    pub collision_anchors: Vec<SnapPoint>,
    /// Target anchors that sit exactly `offset` away from the line, i.e. the ones the
    /// correction brings onto it.
    pub target_anchors: Vec<SnapPoint>,
    /// `target - line`. Subtract it from the target to align.
    pub offset: f64,
    pub distance: f64,
}

/// Collisions found on each axis during one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisCollisions {
    pub x: Vec<CollisionResult>,
    pub y: Vec<CollisionResult>,
}

impl AxisCollisions {
    pub fn get(&self, axis: Axis) -> &[CollisionResult] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn push(&mut self, axis: Axis, result: CollisionResult) {
        match axis {
            Axis::X => self.x.push(result),
            Axis::Y => self.y.push(result),
        }
    }

    /// Closest collision on `axis`.
    pub fn best(&self, axis: Axis) -> Option<&CollisionResult> {
        select_best_line_collision(self.get(axis))
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }
}

/// Tests every target anchor against `line` along `axis`.
///
/// Returns `None`, without allocating, when no anchor is within `tolerance`. Otherwise
/// the result carries the smallest offset found; among equally close anchors the first
/// one wins.
pub fn check_line_collision(
    line: &Arc<SnapLine>,
    target_anchors: &[SnapPoint],
    axis: Axis,
    tolerance: f64,
) -> Option<CollisionResult> {
    let mut best: Option<f64> = None;
    for anchor in target_anchors {
        let offset = anchor.get(axis) - line.value;
        if !within_tolerance(offset, tolerance) {
            continue;
        }
        match best {
            Some(current) if current.abs() <= offset.abs() => {}
            _ => best = Some(offset),
        }
    }
    let offset = best?;

    let matched: Vec<SnapPoint> = target_anchors
        .iter()
        .filter(|a| a.get(axis) - line.value == offset)
        .copied()
        .collect();
    let collision_anchors = dedupe_points(line.points.iter().chain(matched.iter()));

    Some(CollisionResult {
        line: Arc::clone(line),
        collision_anchors,
        target_anchors: matched,
        offset,
        distance: offset.abs(),
    })
}

/// Runs vertical lines against `x` and horizontal lines against `y`, independently.
pub fn calculate_snap<'a, I>(target_anchors: &[SnapPoint], lines: I, tolerance: f64) -> AxisCollisions
where
    I: IntoIterator<Item = &'a Arc<SnapLine>>,
{
    let mut results = AxisCollisions::default();
    if target_anchors.is_empty() {
        return results;
    }
    for line in lines {
        let axis = line.orientation.axis();
        if let Some(hit) = check_line_collision(line, target_anchors, axis, tolerance) {
            results.push(axis, hit);
        }
    }
    results
}

/// The globally closest collision. Exact ties go to the first one seen.
pub fn select_best_line_collision(results: &[CollisionResult]) -> Option<&CollisionResult> {
    results.iter().fold(None, |best, candidate| match best {
        Some(b) if b.distance <= candidate.distance => Some(b),
        _ => Some(candidate),
    })
}
