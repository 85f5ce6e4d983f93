// src/snap/session.rs
//! Gesture lifecycle.
//!
//! ```text
//! Idle --gesture start--> Collecting --first move--> Active --gesture end--> Idle
//! ```
//!
//! The line index is built on gesture start and dropped on gesture end or disable.
//! Every move tick recomputes a fresh [`SnapFrame`] from the current geometry; nothing
//! from a previous tick is reused.

use log::{debug, info, trace, warn};
use serde::Serialize;

use crate::config::SnapConfig;
use crate::error::{Result, SnapError};
use crate::snap::anchor::{bounds_to_anchors, ElementId};
use crate::snap::collision::{calculate_snap, AxisCollisions};
use crate::snap::labels::{calculate_distance_labels, DistanceLabel};
use crate::snap::lines::{IndexedElement, SnapIndex};
use crate::snap::source::GeometrySource;
use crate::snap::spacing::{detect_equal_spacing_all, EqualSpacingResult};
use crate::utils::geometry::{Axis, BoundingBox, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Collecting,
    Active,
}

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapFrame {
    pub collisions: AxisCollisions,
    pub equal_spacings: Vec<EqualSpacingResult>,
    pub labels: Vec<DistanceLabel>,
    /// Correction applied to the selection this tick. Always zero for resize ticks.
    pub applied_offset: Point,
    /// Selection bounds once the correction is taken into account.
    pub target_bounds: BoundingBox,
}

struct Gesture {
    target: Vec<ElementId>,
    index: SnapIndex,
    frame: Option<SnapFrame>,
}

pub struct SnapSession<S: GeometrySource> {
    source: S,
    config: SnapConfig,
    enabled: bool,
    state: SessionState,
    gesture: Option<Gesture>,
}

impl<S: GeometrySource> SnapSession<S> {
    /// Creates an enabled session. Fails if the host lacks a required capability or the
    /// config is invalid.
    pub fn new(source: S, config: SnapConfig) -> Result<Self> {
        config.validate()?;
        check_host(&source)?;
        info!(
            "Snap session ready (tolerance {}px)",
            config.snap_tolerance_in_pixels
        );
        Ok(Self {
            source,
            config,
            enabled: true,
            state: SessionState::Idle,
            gesture: None,
        })
    }

    pub fn enable(&mut self) -> Result<()> {
        if let Err(err) = check_host(&self.source) {
            warn!("Refusing to enable snapping: {}", err);
            return Err(err);
        }
        self.enabled = true;
        Ok(())
    }

    /// Turns snapping off, abandoning any gesture in progress.
    pub fn disable(&mut self) {
        if self.state != SessionState::Idle {
            info!("Snapping disabled mid-gesture");
        }
        self.teardown();
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Replaces the config. Takes effect from the next gesture start.
    pub fn set_config(&mut self, config: SnapConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Results of the latest tick, if a gesture is running and has moved.
    pub fn frame(&self) -> Option<&SnapFrame> {
        self.gesture.as_ref().and_then(|g| g.frame.as_ref())
    }

    pub fn index(&self) -> Option<&SnapIndex> {
        self.gesture.as_ref().map(|g| &g.index)
    }

    pub fn on_gesture_start(&mut self, target: &[ElementId]) -> Result<()> {
        if !self.enabled {
            return Err(SnapError::Disabled);
        }
        let root = check_host(&self.source)?;
        self.teardown();
        if target.is_empty() {
            debug!("Gesture started without a target; staying idle");
            return Ok(());
        }
        if let Some(missing) = target.iter().find(|id| self.source.bounds_in_frame(**id, root).is_none()) {
            return Err(SnapError::UnknownElement(*missing));
        }

        let config = &self.config;
        let index = SnapIndex::from_source(&self.source, root, target, |id| config.accepts(id));
        info!(
            "Gesture started on {} element(s), {} snap references",
            target.len(),
            index.elements().len()
        );
        self.gesture = Some(Gesture {
            target: target.to_vec(),
            index,
            frame: None,
        });
        self.state = SessionState::Collecting;
        Ok(())
    }

    /// Moves the selection by `(dx, dy)`, then snaps it. A no-op while idle.
    pub fn on_gesture_move(&mut self, target: &[ElementId], dx: f64, dy: f64) -> Option<&SnapFrame> {
        self.tick(target, Some((dx, dy)))
    }

    /// Resize tick: the same analysis as a move, but nothing is moved.
    pub fn on_scale_gesture_move(&mut self, target: &[ElementId]) -> Option<&SnapFrame> {
        self.tick(target, None)
    }

    pub fn on_gesture_end(&mut self) {
        if self.state != SessionState::Idle {
            info!("Gesture ended");
        }
        self.teardown();
    }

    fn teardown(&mut self) {
        self.gesture = None;
        self.state = SessionState::Idle;
    }

    fn tick(&mut self, target: &[ElementId], delta: Option<(f64, f64)>) -> Option<&SnapFrame> {
        if self.state == SessionState::Idle {
            trace!("Ignoring move while idle");
            return None;
        }
        let root = self.source.root()?;
        let gesture = self.gesture.as_ref()?;
        if gesture.target != target {
            debug!("Ignoring move for a target other than the active gesture's");
            return None;
        }

        // Resolve every element first so the selection moves as a whole or not at all.
        let mut boxes = Vec::with_capacity(target.len());
        for id in target {
            match self.source.bounds_in_frame(*id, root) {
                Some(b) => boxes.push(b),
                None => {
                    debug!("Element {} lost its bounds; skipping tick", id);
                    return None;
                }
            }
        }
        let mut bounds = BoundingBox::union_all(&boxes)?;

        if let Some((dx, dy)) = delta {
            for id in target {
                self.source.apply_axis_offset(*id, Axis::X, dx);
                self.source.apply_axis_offset(*id, Axis::Y, dy);
            }
            bounds = bounds.translate(dx, dy);
        }

        let zoom = self.source.zoom();
        let frame = {
            let gesture = self.gesture.as_ref()?;
            compute_frame(
                &gesture.index,
                &self.config,
                target[0],
                bounds,
                self.config.tolerance_for_zoom(zoom),
                self.config.label_offset_for_zoom(zoom),
                delta.is_some(),
            )
        };

        if delta.is_some() {
            let Point { x: ox, y: oy } = frame.applied_offset;
            for id in target {
                self.source.apply_axis_offset(*id, Axis::X, ox);
                self.source.apply_axis_offset(*id, Axis::Y, oy);
            }
        }
        trace!(
            "Tick: {} x / {} y collisions, {} spacings, {} labels, correction ({}, {})",
            frame.collisions.x.len(),
            frame.collisions.y.len(),
            frame.equal_spacings.len(),
            frame.labels.len(),
            frame.applied_offset.x,
            frame.applied_offset.y
        );

        self.state = SessionState::Active;
        let gesture = self.gesture.as_mut()?;
        gesture.frame = Some(frame);
        gesture.frame.as_ref()
    }
}

fn check_host<S: GeometrySource + ?Sized>(source: &S) -> Result<ElementId> {
    let root = source.root().ok_or(SnapError::MissingRoot)?;
    if !source.has_selection_interface() {
        return Err(SnapError::MissingSelectionInterface);
    }
    Ok(root)
}

/// One tick's worth of analysis for a target at `bounds`.
fn compute_frame(
    index: &SnapIndex,
    config: &SnapConfig,
    target: ElementId,
    bounds: BoundingBox,
    tolerance: f64,
    label_offset: f64,
    apply: bool,
) -> SnapFrame {
    let anchors = bounds_to_anchors(&bounds, target);
    let collisions = calculate_snap(&anchors, index.lines(), tolerance);

    let correction = if apply {
        Point::new(
            collisions.best(Axis::X).map_or(0.0, |c| -c.offset),
            collisions.best(Axis::Y).map_or(0.0, |c| -c.offset),
        )
    } else {
        Point::default()
    };
    let settled = bounds.translate(correction.x, correction.y);

    let equal_spacings = if config.show_equal_spacing_guides {
        let me = IndexedElement { id: target, bounds: settled };
        detect_equal_spacing_all(&me, index.elements())
    } else {
        Vec::new()
    };
    let labels = if config.show_distance_labels {
        calculate_distance_labels(&bounds_to_anchors(&settled, target), &collisions, label_offset)
    } else {
        Vec::new()
    };

    SnapFrame {
        collisions,
        equal_spacings,
        labels,
        applied_offset: correction,
        target_bounds: settled,
    }
}
