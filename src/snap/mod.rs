// src/snap/mod.rs

pub mod anchor;
pub mod collision;
pub mod labels;
pub mod lines;
pub mod session;
pub mod source;
pub mod spacing;

pub use anchor::{bounds_to_anchors, AnchorKind, ElementId, SnapPoint};
pub use collision::{calculate_snap, select_best_line_collision, AxisCollisions, CollisionResult};
pub use labels::{calculate_distance_labels, DistanceLabel, LabelDirection};
pub use lines::{IndexedElement, Orientation, SnapIndex, SnapLine};
pub use session::{SessionState, SnapFrame, SnapSession};
pub use source::GeometrySource;
pub use spacing::{detect_equal_spacing, detect_equal_spacing_all, EqualSpacingResult};
