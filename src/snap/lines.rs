// src/snap/lines.rs
//! The per-gesture anchor/line index.
//!
//! Every eligible element contributes its eight anchors. Anchors sharing an exact `x`
//! form a vertical [`SnapLine`], anchors sharing an exact `y` a horizontal one. The index
//! is built once when a gesture starts and never patched afterwards; the next gesture
//! builds a fresh one.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::snap::anchor::{bounds_to_anchors, ElementId, SnapPoint};
use crate::snap::source::GeometrySource;
use crate::utils::geometry::{Axis, BoundingBox};
use crate::utils::util::coord_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// The axis whose coordinate is constant along the line.
    pub fn axis(self) -> Axis {
        match self {
            Orientation::Vertical => Axis::X,
            Orientation::Horizontal => Axis::Y,
        }
    }
}

/// All anchors sharing one exact coordinate, ordered along the line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapLine {
    pub orientation: Orientation,
    pub value: f64,
    pub points: Vec<SnapPoint>,
}

impl SnapLine {
    /// Extent of the line's points along its own direction.
    pub fn span(&self) -> Option<(f64, f64)> {
        let along = self.orientation.axis().orthogonal();
        let first = self.points.first()?.get(along);
        let last = self.points.last()?.get(along);
        Some((first, last))
    }
}

/// Bounds of an element that took part in building the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedElement {
    pub id: ElementId,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, Default)]
pub struct SnapIndex {
    vertical: Vec<Arc<SnapLine>>,
    horizontal: Vec<Arc<SnapLine>>,
    elements: Vec<IndexedElement>,
}

impl SnapIndex {
    /// Builds the index from elements already expressed in one reference frame.
    pub fn build<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = (ElementId, BoundingBox)>,
    {
        let mut by_x: HashMap<u64, (f64, Vec<SnapPoint>)> = HashMap::new();
        let mut by_y: HashMap<u64, (f64, Vec<SnapPoint>)> = HashMap::new();
        let mut indexed = Vec::new();

        for (id, bounds) in elements {
            let anchors = bounds_to_anchors(&bounds, id);
            if anchors.is_empty() {
                continue;
            }
            for anchor in anchors {
                by_x.entry(coord_key(anchor.x))
                    .or_insert_with(|| (anchor.x, Vec::new()))
                    .1
                    .push(anchor);
                by_y.entry(coord_key(anchor.y))
                    .or_insert_with(|| (anchor.y, Vec::new()))
                    .1
                    .push(anchor);
            }
            indexed.push(IndexedElement { id, bounds });
        }

        Self {
            vertical: materialize(by_x, Orientation::Vertical),
            horizontal: materialize(by_y, Orientation::Horizontal),
            elements: indexed,
        }
    }

    /// Collects every eligible element under `root`, minus `exclude`, and indexes it.
    ///
    /// Elements the host reports no bounds for, and elements rejected by `filter`, are
    /// skipped silently.
    pub fn from_source<S, F>(source: &S, root: ElementId, exclude: &[ElementId], filter: F) -> Self
    where
        S: GeometrySource + ?Sized,
        F: Fn(ElementId) -> bool,
    {
        let candidates = source
            .eligible_elements(root)
            .into_iter()
            .filter(|id| !exclude.contains(id))
            .filter(|id| source.is_eligible(*id) && filter(*id))
            .filter_map(|id| source.bounds_in_frame(id, root).map(|b| (id, b)));
        let index = Self::build(candidates);
        debug!(
            "Built snap index: {} elements, {} vertical / {} horizontal lines",
            index.elements.len(),
            index.vertical.len(),
            index.horizontal.len()
        );
        index
    }

    pub fn vertical_lines(&self) -> &[Arc<SnapLine>] {
        &self.vertical
    }

    pub fn horizontal_lines(&self) -> &[Arc<SnapLine>] {
        &self.horizontal
    }

    /// Vertical lines first, then horizontal, each in ascending value order.
    pub fn lines(&self) -> impl Iterator<Item = &Arc<SnapLine>> {
        self.vertical.iter().chain(self.horizontal.iter())
    }

    pub fn elements(&self) -> &[IndexedElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn materialize(groups: HashMap<u64, (f64, Vec<SnapPoint>)>, orientation: Orientation) -> Vec<Arc<SnapLine>> {
    let along = orientation.axis().orthogonal();
    let mut lines: Vec<SnapLine> = groups
        .into_values()
        .map(|(value, mut points)| {
            points.sort_by(|a, b| a.get(along).total_cmp(&b.get(along)));
            SnapLine { orientation, value, points }
        })
        .collect();
    lines.sort_by(|a, b| a.value.total_cmp(&b.value));
    lines.into_iter().map(Arc::new).collect()
}
