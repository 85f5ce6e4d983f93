// src/snap/spacing.rs
//! Equal-spacing detection.
//!
//! Along one axis, the elements sharing a "row" with the target (their projection onto
//! the other axis overlaps the target's) are sorted by leading edge. Consecutive gaps
//! that repeat *exactly* form a pattern. Unlike point snapping there is no tolerance
//! here: 10 and 10.5 are different gaps.

use std::collections::HashMap;

use serde::Serialize;

use crate::snap::anchor::ElementId;
use crate::snap::lines::IndexedElement;
use crate::utils::geometry::{Axis, BoundingBox, Point};
use crate::utils::util::coord_key;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EqualSpacingResult {
    pub axis: Axis,
    pub prev_element: ElementId,
    pub next_element: ElementId,
    pub equal_spacing: f64,
    /// The gap itself along `axis`, and the overlap of both neighbours across it.
    pub visualization_rect: BoundingBox,
    pub label_position: Point,
}

/// Runs [`detect_equal_spacing`] on both axes, `x` first.
pub fn detect_equal_spacing_all(target: &IndexedElement, elements: &[IndexedElement]) -> Vec<EqualSpacingResult> {
    let mut results = detect_equal_spacing(target, elements, Axis::X);
    results.extend(detect_equal_spacing(target, elements, Axis::Y));
    results
}

pub fn detect_equal_spacing(target: &IndexedElement, elements: &[IndexedElement], axis: Axis) -> Vec<EqualSpacingResult> {
    let across = axis.orthogonal();
    let mut row: Vec<&IndexedElement> = elements
        .iter()
        .filter(|e| e.id != target.id && e.bounds.overlaps_on(&target.bounds, across))
        .collect();
    row.push(target);
    if row.len() < 2 {
        return Vec::new();
    }
    row.sort_by(|a, b| a.bounds.min(axis).total_cmp(&b.bounds.min(axis)));
    let Some(t) = row.iter().position(|e| std::ptr::eq(*e, target)) else {
        return Vec::new();
    };

    // Gap `i` sits between row[i] and row[i + 1].
    let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
    let mut slot_of: HashMap<u64, usize> = HashMap::new();
    for i in 0..row.len() - 1 {
        let gap = row[i + 1].bounds.min(axis) - row[i].bounds.max(axis);
        if gap <= 0.0 {
            continue;
        }
        let slot = *slot_of.entry(coord_key(gap)).or_insert_with(|| {
            groups.push((gap, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(i);
    }

    let mut results = Vec::new();
    for (gap, members) in &groups {
        if !pattern_qualifies(members, t) {
            continue;
        }
        for &i in members {
            results.push(spacing_result(axis, row[i], row[i + 1], *gap));
        }
    }
    results
}

/// A run of equal gaps counts when one of its gaps touches the target and it either has
/// gaps on both sides of the target or at least two on one side.
fn pattern_qualifies(members: &[usize], target_slot: usize) -> bool {
    if members.len() < 2 {
        return false;
    }
    let touches_before = target_slot > 0 && members.contains(&(target_slot - 1));
    let touches_after = members.contains(&target_slot);
    if !(touches_before || touches_after) {
        return false;
    }
    let before = members.iter().filter(|&&i| i < target_slot).count();
    let after = members.iter().filter(|&&i| i >= target_slot).count();

    (before >= 1 && after >= 1) || before >= 2 || after >= 2
}

fn spacing_result(axis: Axis, prev: &IndexedElement, next: &IndexedElement, gap: f64) -> EqualSpacingResult {
    let across = axis.orthogonal();
    let mut lo = prev.bounds.min(across).max(next.bounds.min(across));
    let mut hi = prev.bounds.max(across).min(next.bounds.max(across));
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }
    let start = prev.bounds.max(axis);
    let end = next.bounds.min(axis);
    let visualization_rect = match axis {
        Axis::X => BoundingBox::new(start, lo, end, hi),
        Axis::Y => BoundingBox::new(lo, start, hi, end),
    };
    EqualSpacingResult {
        axis,
        prev_element: prev.id,
        next_element: next.id,
        equal_spacing: gap,
        visualization_rect,
        label_position: visualization_rect.center(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(id: u64, x: f64, y: f64, w: f64, h: f64) -> IndexedElement {
        IndexedElement { id: ElementId(id), bounds: BoundingBox::from_rect(x, y, w, h) }
    }

    #[test]
    fn test_middle_target_between_equal_gaps() {
        let target = el(2, 20.0, 0.0, 10.0, 10.0);
        let others = [el(1, 0.0, 0.0, 10.0, 10.0), el(3, 40.0, 0.0, 10.0, 10.0)];
        let results = detect_equal_spacing(&target, &others, Axis::X);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.equal_spacing == 10.0 && r.axis == Axis::X));
        assert_eq!((results[0].prev_element, results[0].next_element), (ElementId(1), ElementId(2)));
        assert_eq!((results[1].prev_element, results[1].next_element), (ElementId(2), ElementId(3)));
        assert_eq!(results[0].visualization_rect, BoundingBox::new(10.0, 0.0, 20.0, 10.0));
        assert_eq!(results[0].label_position, Point::new(15.0, 5.0));
    }

    #[test]
    fn test_near_equal_gaps_are_not_grouped() {
        let target = el(2, 20.0, 0.0, 10.0, 10.0);
        let others = [el(1, 0.0, 0.0, 10.0, 10.0), el(3, 41.0, 0.0, 10.0, 10.0)];
        assert!(detect_equal_spacing(&target, &others, Axis::X).is_empty());
    }

    #[test]
    fn test_two_equal_gaps_on_one_side() {
        let target = el(3, 40.0, 0.0, 10.0, 10.0);
        let others = [el(1, 0.0, 0.0, 10.0, 10.0), el(2, 20.0, 0.0, 10.0, 10.0)];
        let results = detect_equal_spacing(&target, &others, Axis::X);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].next_element, ElementId(3));
    }

    #[test]
    fn test_pattern_must_touch_the_target() {
        // Equal gaps far from the target do not count.
        let target = el(9, 100.0, 0.0, 10.0, 10.0);
        let others = [
            el(1, 0.0, 0.0, 10.0, 10.0),
            el(2, 20.0, 0.0, 10.0, 10.0),
            el(3, 40.0, 0.0, 10.0, 10.0),
        ];
        assert!(detect_equal_spacing(&target, &others, Axis::X).is_empty());
    }

    #[test]
    fn test_equal_gaps_on_both_sides_need_not_be_adjacent() {
        // Gaps: 10 (touching target), 5, 7, 10.
        let target = el(9, 20.0, 0.0, 10.0, 10.0);
        let others = [
            el(1, 0.0, 0.0, 10.0, 10.0),
            el(2, 35.0, 0.0, 10.0, 10.0),
            el(3, 52.0, 0.0, 10.0, 10.0),
            el(4, 72.0, 0.0, 10.0, 10.0),
        ];
        let results = detect_equal_spacing(&target, &others, Axis::X);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.equal_spacing == 10.0));
        assert_eq!((results[0].prev_element, results[0].next_element), (ElementId(1), ElementId(9)));
        assert_eq!((results[1].prev_element, results[1].next_element), (ElementId(3), ElementId(4)));

        // Gaps: 10, 5 (touching target), 10 (touching target).
        let target = el(9, 35.0, 0.0, 10.0, 10.0);
        let others = [
            el(1, 0.0, 0.0, 10.0, 10.0),
            el(2, 20.0, 0.0, 10.0, 10.0),
            el(3, 55.0, 0.0, 10.0, 10.0),
        ];
        let results = detect_equal_spacing(&target, &others, Axis::X);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].prev_element, ElementId(9));
    }

    #[test]
    fn test_two_equal_gaps_beyond_the_touching_side() {
        // Gaps: 10 (touching target), 3, 10, 10.
        let target = el(9, 20.0, 0.0, 10.0, 10.0);
        let others = [
            el(1, 0.0, 0.0, 10.0, 10.0),
            el(2, 33.0, 0.0, 10.0, 10.0),
            el(3, 53.0, 0.0, 10.0, 10.0),
            el(4, 73.0, 0.0, 10.0, 10.0),
        ];
        let results = detect_equal_spacing(&target, &others, Axis::X);
        assert_eq!(results.len(), 3);
        let pairs: Vec<(ElementId, ElementId)> = results.iter().map(|r| (r.prev_element, r.next_element)).collect();
        assert_eq!(
            pairs,
            vec![
                (ElementId(1), ElementId(9)),
                (ElementId(2), ElementId(3)),
                (ElementId(3), ElementId(4)),
            ]
        );
    }

    #[test]
    fn test_rows_are_filtered_on_the_other_axis() {
        let target = el(2, 20.0, 0.0, 10.0, 10.0);
        let others = [el(1, 0.0, 0.0, 10.0, 10.0), el(3, 40.0, 500.0, 10.0, 10.0)];
        assert!(detect_equal_spacing(&target, &others, Axis::X).is_empty());
        assert!(detect_equal_spacing(&target, &[], Axis::X).is_empty());
    }

    #[test]
    fn test_vertical_column() {
        let target = el(2, 5.0, 30.0, 10.0, 10.0);
        let others = [el(1, 0.0, 0.0, 20.0, 20.0), el(3, 0.0, 50.0, 12.0, 10.0)];
        let results = detect_equal_spacing_all(&target, &others);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.axis == Axis::Y && r.equal_spacing == 10.0));
        // Overlap across the gap between the target and element 3.
        assert_eq!(results[1].visualization_rect, BoundingBox::new(5.0, 40.0, 12.0, 50.0));
    }
}
