// src/snap/source.rs

use crate::snap::anchor::ElementId;
use crate::utils::geometry::{Axis, BoundingBox};

/// The narrow view of a scene graph the snapping engine needs.
///
/// Hosts implement this over their real scene graph. The engine never holds on to
/// element handles beyond an [`ElementId`], and never mutates anything except through
/// [`GeometrySource::apply_axis_offset`].
pub trait GeometrySource {
    /// The document root, which also serves as the common reference frame.
    fn root(&self) -> Option<ElementId>;

    /// Whether the host can report and track an active selection.
    fn has_selection_interface(&self) -> bool;

    /// `container` plus its participating descendants, excluding the active selection.
    fn eligible_elements(&self, container: ElementId) -> Vec<ElementId>;

    /// Bounds of `element` expressed in `frame`'s coordinate space, accounting for
    /// nested transforms. `None` when the element has no measurable bounds.
    fn bounds_in_frame(&self, element: ElementId, frame: ElementId) -> Option<BoundingBox>;

    /// Per-element participation flag.
    fn is_eligible(&self, element: ElementId) -> bool;

    /// Moves `element` by `delta` along `axis`, in reference-frame units. Must be a
    /// no-op for `delta == 0`.
    fn apply_axis_offset(&mut self, element: ElementId, axis: Axis, delta: f64);

    /// Current view scale. Pixel tolerances are divided by it.
    fn zoom(&self) -> f64 {
        1.0
    }
}
