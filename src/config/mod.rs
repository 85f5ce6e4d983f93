// src/config/mod.rs
//! Snapping options, loadable from JSON.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};
use crate::snap::ElementId;

/// Predicate deciding whether an element may act as a snap reference.
pub type ElementFilter = Arc<dyn Fn(ElementId) -> bool + Send + Sync>;

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Snap distance in screen pixels. Divided by the view zoom before use.
    pub snap_tolerance_in_pixels: f64,
    /// Renderer option, carried through unchanged.
    pub show_alignment_lines: bool,
    /// Renderer option, carried through unchanged.
    pub show_anchor_markers: bool,
    /// Turns off distance label computation when false.
    pub show_distance_labels: bool,
    /// Turns off equal-spacing detection when false.
    pub show_equal_spacing_guides: bool,
    /// Screen-pixel gap between a distance label's text and its snap line.
    pub label_offset_in_pixels: f64,
    #[serde(skip)]
    pub element_filter: Option<ElementFilter>,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_tolerance_in_pixels: 5.0,
            show_alignment_lines: true,
            show_anchor_markers: true,
            show_distance_labels: true,
            show_equal_spacing_guides: true,
            label_offset_in_pixels: 10.0,
            element_filter: None,
        }
    }
}

impl fmt::Debug for SnapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapConfig")
            .field("snap_tolerance_in_pixels", &self.snap_tolerance_in_pixels)
            .field("show_alignment_lines", &self.show_alignment_lines)
            .field("show_anchor_markers", &self.show_anchor_markers)
            .field("show_distance_labels", &self.show_distance_labels)
            .field("show_equal_spacing_guides", &self.show_equal_spacing_guides)
            .field("label_offset_in_pixels", &self.label_offset_in_pixels)
            .field("element_filter", &self.element_filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl SnapConfig {
    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SnapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let tolerance = self.snap_tolerance_in_pixels;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(SnapError::InvalidTolerance(tolerance));
        }
        let offset = self.label_offset_in_pixels;
        if !offset.is_finite() || offset < 0.0 {
            return Err(SnapError::InvalidConfig(format!(
                "label_offset_in_pixels must be finite and non-negative (got {offset})"
            )));
        }
        Ok(())
    }

    pub fn with_element_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(ElementId) -> bool + Send + Sync + 'static,
    {
        self.element_filter = Some(Arc::new(filter));
        self
    }

    /// Whether `element` passes the configured filter. No filter accepts everything.
    pub fn accepts(&self, element: ElementId) -> bool {
        self.element_filter.as_ref().map_or(true, |f| f(element))
    }

    /// Tolerance in document units for the given view zoom.
    pub fn tolerance_for_zoom(&self, zoom: f64) -> f64 {
        unscale(self.snap_tolerance_in_pixels, zoom)
    }

    /// Label offset in document units for the given view zoom.
    pub fn label_offset_for_zoom(&self, zoom: f64) -> f64 {
        unscale(self.label_offset_in_pixels, zoom)
    }
}

fn unscale(pixels: f64, zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 {
        pixels / zoom
    } else {
        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SnapConfig::default();
        assert_eq!(config.snap_tolerance_in_pixels, 5.0);
        assert!(config.show_distance_labels);
        assert!(config.accepts(ElementId(3)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SnapConfig::from_json_str(r#"{ "snap_tolerance_in_pixels": 8, "show_anchor_markers": false }"#).unwrap();
        assert_eq!(config.snap_tolerance_in_pixels, 8.0);
        assert!(!config.show_anchor_markers);
        assert!(config.show_alignment_lines);
        assert_eq!(config.label_offset_in_pixels, 10.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            SnapConfig::from_json_str(r#"{ "snap_tolerance_in_pixels": -1 }"#),
            Err(SnapError::InvalidTolerance(_))
        ));
        assert!(matches!(
            SnapConfig::from_json_str(r#"{ "label_offset_in_pixels": -3 }"#),
            Err(SnapError::InvalidConfig(_))
        ));
        assert!(matches!(SnapConfig::from_json_str("{ nope"), Err(SnapError::Json(_))));
    }

    #[test]
    fn test_zoom_unscaling() {
        let config = SnapConfig::default();
        assert_eq!(config.tolerance_for_zoom(2.0), 2.5);
        assert_eq!(config.tolerance_for_zoom(0.5), 10.0);
        assert_eq!(config.tolerance_for_zoom(0.0), 5.0);
        assert_eq!(config.label_offset_for_zoom(4.0), 2.5);
    }

    #[test]
    fn test_element_filter() {
        let config = SnapConfig::default().with_element_filter(|id| id.0 % 2 == 0);
        assert!(config.accepts(ElementId(4)));
        assert!(!config.accepts(ElementId(5)));
        assert!(format!("{config:?}").contains("<fn>"));
    }
}
