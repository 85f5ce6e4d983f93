// src/document/document.rs

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};
use crate::snap::{ElementId, GeometrySource};
use crate::utils::geometry::{Axis, BoundingBox, Point};

/// Ancestor chains longer than this are treated as cycles.
const MAX_DEPTH: usize = 256;

fn default_true() -> bool {
    true
}

fn default_zoom() -> f64 {
    1.0
}

/// One node of the scene tree. `x`/`y` are relative to the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(default)]
    pub parent: Option<ElementId>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Hidden elements and their subtrees never take part in snapping.
    #[serde(default)]
    pub hidden: bool,
    /// Editor-owned helpers (guides, handles) that are never snap references.
    #[serde(default)]
    pub system: bool,
    #[serde(default = "default_true")]
    pub snappable: bool,
}

impl Element {
    pub fn new(id: ElementId, parent: Option<ElementId>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            parent,
            x,
            y,
            width,
            height,
            hidden: false,
            system: false,
            snappable: true,
        }
    }
}

/// Serialized form of a [`Document`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub root: Option<ElementId>,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub selection: Vec<ElementId>,
    pub elements: Vec<Element>,
}

/// An in-memory scene tree implementing [`GeometrySource`].
pub struct Document {
    pub elements: Arc<RwLock<Vec<Arc<Element>>>>,
    pub selection: Arc<RwLock<Vec<ElementId>>>,
    pub root: Option<ElementId>,
    pub zoom: f64,
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty Document, without a root.
    pub fn new() -> Self {
        Self {
            elements: Arc::new(RwLock::new(Vec::new())),
            selection: Arc::new(RwLock::new(Vec::new())),
            root: None,
            zoom: 1.0,
            next_id: 0,
        }
    }

    /// A document whose root is a `width` x `height` page at the origin.
    pub fn with_root(width: f64, height: f64) -> Self {
        let mut doc = Self::new();
        let root = doc.push(None, 0.0, 0.0, width, height);
        doc.root = Some(root);
        doc
    }

    pub fn from_scene(scene: Scene) -> Result<Self> {
        let mut ids = HashSet::new();
        for element in &scene.elements {
            if !ids.insert(element.id) {
                return Err(SnapError::InvalidConfig(format!("duplicate element id {}", element.id)));
            }
        }
        for element in &scene.elements {
            if let Some(parent) = element.parent {
                if !ids.contains(&parent) {
                    return Err(SnapError::UnknownElement(parent));
                }
            }
        }
        if let Some(root) = scene.root {
            if !ids.contains(&root) {
                return Err(SnapError::UnknownElement(root));
            }
        }
        let next_id = scene.elements.iter().map(|e| e.id.0 + 1).max().unwrap_or(0);
        let selection: Vec<ElementId> = scene
            .selection
            .into_iter()
            .filter(|id| {
                let known = ids.contains(id);
                if !known {
                    warn!("Dropping unknown element {} from the scene selection", id);
                }
                known
            })
            .collect();

        Ok(Self {
            elements: Arc::new(RwLock::new(scene.elements.into_iter().map(Arc::new).collect())),
            selection: Arc::new(RwLock::new(selection)),
            root: scene.root,
            zoom: scene.zoom,
            next_id,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(json)?;
        Self::from_scene(scene)
    }

    pub fn to_scene(&self) -> Scene {
        Scene {
            root: self.root,
            zoom: self.zoom,
            selection: self.selection.read().clone(),
            elements: self.elements.read().iter().map(|e| (**e).clone()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_scene())?)
    }

    fn push(&mut self, parent: Option<ElementId>, x: f64, y: f64, width: f64, height: f64) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements
            .write()
            .push(Arc::new(Element::new(id, parent, x, y, width, height)));
        id
    }

    /// Adds an element under `parent` and returns its id.
    pub fn add_element(&mut self, parent: ElementId, x: f64, y: f64, width: f64, height: f64) -> Result<ElementId> {
        if self.element(parent).is_none() {
            return Err(SnapError::UnknownElement(parent));
        }
        Ok(self.push(Some(parent), x, y, width, height))
    }

    /// Removes an element and its whole subtree.
    pub fn remove_element(&mut self, id: ElementId) {
        let doomed: HashSet<ElementId> = {
            let elements = self.elements.read();
            let mut doomed = HashSet::from([id]);
            let mut grew = true;
            while grew {
                grew = false;
                for e in elements.iter() {
                    if let Some(parent) = e.parent {
                        if doomed.contains(&parent) && doomed.insert(e.id) {
                            grew = true;
                        }
                    }
                }
            }
            doomed
        };
        self.elements.write().retain(|e| !doomed.contains(&e.id));
        self.selection.write().retain(|e| !doomed.contains(e));
        if self.root.is_some_and(|r| doomed.contains(&r)) {
            self.root = None;
        }
    }

    pub fn element(&self, id: ElementId) -> Option<Arc<Element>> {
        self.elements.read().iter().find(|e| e.id == id).cloned()
    }

    fn update<F: FnOnce(&mut Element)>(&self, id: ElementId, f: F) -> bool {
        let mut elements = self.elements.write();
        match elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                f(Arc::make_mut(element));
                true
            }
            None => false,
        }
    }

    pub fn set_hidden(&self, id: ElementId, hidden: bool) -> bool {
        self.update(id, |e| e.hidden = hidden)
    }

    pub fn set_system(&self, id: ElementId, system: bool) -> bool {
        self.update(id, |e| e.system = system)
    }

    pub fn set_snappable(&self, id: ElementId, snappable: bool) -> bool {
        self.update(id, |e| e.snappable = snappable)
    }

    pub fn set_position(&self, id: ElementId, x: f64, y: f64) -> bool {
        self.update(id, |e| {
            e.x = x;
            e.y = y;
        })
    }

    pub fn select(&self, ids: &[ElementId]) {
        *self.selection.write() = ids.to_vec();
    }

    pub fn clear_selection(&self) {
        self.selection.write().clear();
    }

    pub fn selected(&self) -> Vec<ElementId> {
        self.selection.read().clone()
    }

    /// Ancestors of `id` from its parent upwards. `None` for unknown ids or cycles.
    fn ancestors(&self, elements: &[Arc<Element>], id: ElementId) -> Option<Vec<Arc<Element>>> {
        let mut chain = Vec::new();
        let mut current = elements.iter().find(|e| e.id == id)?.parent;
        while let Some(parent_id) = current {
            if chain.len() >= MAX_DEPTH {
                warn!("Element {} sits in a cyclic or too deep hierarchy", id);
                return None;
            }
            let parent = elements.iter().find(|e| e.id == parent_id)?;
            current = parent.parent;
            chain.push(Arc::clone(parent));
        }
        Some(chain)
    }

    /// Origin of `id`'s own box in world space.
    pub fn world_origin(&self, id: ElementId) -> Option<Point> {
        let elements = self.elements.read();
        let element = elements.iter().find(|e| e.id == id)?;
        let chain = self.ancestors(&elements, id)?;
        let (x, y) = chain
            .iter()
            .fold((element.x, element.y), |(x, y), a| (x + a.x, y + a.y));
        Some(Point::new(x, y))
    }

    /// Whether the element or any ancestor is hidden.
    fn is_hidden_in_tree(&self, elements: &[Arc<Element>], element: &Element) -> bool {
        if element.hidden {
            return true;
        }
        self.ancestors(elements, element.id)
            .map_or(true, |chain| chain.iter().any(|a| a.hidden))
    }

    fn is_descendant_of(&self, elements: &[Arc<Element>], id: ElementId, container: ElementId) -> bool {
        id == container
            || self
                .ancestors(elements, id)
                .is_some_and(|chain| chain.iter().any(|a| a.id == container))
    }
}

impl GeometrySource for Document {
    fn root(&self) -> Option<ElementId> {
        self.root
    }

    fn has_selection_interface(&self) -> bool {
        true
    }

    fn eligible_elements(&self, container: ElementId) -> Vec<ElementId> {
        let elements = self.elements.read();
        let selection = self.selection.read();
        let eligible: Vec<ElementId> = elements
            .iter()
            .filter(|e| self.is_descendant_of(&elements, e.id, container))
            .filter(|e| e.snappable && !e.system && !selection.contains(&e.id))
            .filter(|e| !self.is_hidden_in_tree(&elements, e))
            .map(|e| e.id)
            .collect();
        debug!("{} eligible elements under {}", eligible.len(), container);
        eligible
    }

    fn bounds_in_frame(&self, element: ElementId, frame: ElementId) -> Option<BoundingBox> {
        let origin = self.world_origin(element)?;
        let frame_origin = self.world_origin(frame)?;
        let e = self.element(element)?;
        Some(BoundingBox::from_rect(
            origin.x - frame_origin.x,
            origin.y - frame_origin.y,
            e.width,
            e.height,
        ))
    }

    fn is_eligible(&self, element: ElementId) -> bool {
        self.element(element)
            .is_some_and(|e| e.snappable && !e.system && !e.hidden)
    }

    fn apply_axis_offset(&mut self, element: ElementId, axis: Axis, delta: f64) {
        if delta == 0.0 {
            return;
        }
        let moved = self.update(element, |e| match axis {
            Axis::X => e.x += delta,
            Axis::Y => e.y += delta,
        });
        if !moved {
            warn!("Cannot move unknown element {}", element);
        }
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}
