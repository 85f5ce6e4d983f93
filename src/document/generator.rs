// src/document/generator.rs

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::document::Document;
use crate::error::{Result, SnapError};
use crate::snap::ElementId;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub page_width: i64,
    pub page_height: i64,
    pub element_count: usize,
    pub min_size: i64,
    pub max_size: i64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            page_width: 1920,
            page_height: 1080,
            element_count: 40,
            min_size: 20,
            max_size: 200,
            seed: 0x5eed,
        }
    }
}

/// Builds test scenes: random scatters on integer coordinates, or regular rows.
pub struct LayoutGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl LayoutGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Random rectangles directly under the root. The same seed gives the same scene.
    pub fn generate(&mut self) -> Result<Document> {
        let c = self.config.clone();
        if c.min_size <= 0 || c.max_size < c.min_size || c.page_width <= c.max_size || c.page_height <= c.max_size {
            return Err(SnapError::InvalidConfig(format!(
                "cannot place {}..={} sized elements on a {}x{} page",
                c.min_size, c.max_size, c.page_width, c.page_height
            )));
        }

        let mut doc = Document::with_root(c.page_width as f64, c.page_height as f64);
        let root = doc.root.ok_or(SnapError::MissingRoot)?;
        for _ in 0..c.element_count {
            let w = self.rng.random_range(c.min_size..=c.max_size);
            let h = self.rng.random_range(c.min_size..=c.max_size);
            let x = self.rng.random_range(0..=c.page_width - w);
            let y = self.rng.random_range(0..=c.page_height - h);
            doc.add_element(root, x as f64, y as f64, w as f64, h as f64)?;
        }
        info!("Generated scene with {} elements (seed {})", c.element_count, c.seed);
        Ok(doc)
    }

    /// `count` equally sized squares on one row, `gap` apart, starting at the origin.
    pub fn evenly_spaced_row(count: usize, size: f64, gap: f64) -> Result<(Document, Vec<ElementId>)> {
        let width = count as f64 * (size + gap) + size;
        let mut doc = Document::with_root(width.max(size), size * 4.0);
        let root = doc.root.ok_or(SnapError::MissingRoot)?;
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            ids.push(doc.add_element(root, i as f64 * (size + gap), size, size, size)?);
        }
        Ok((doc, ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::GeometrySource;

    #[test]
    fn test_generation_is_reproducible() {
        let config = GeneratorConfig { element_count: 12, ..GeneratorConfig::default() };
        let a = LayoutGenerator::new(config.clone()).generate().unwrap();
        let b = LayoutGenerator::new(config).generate().unwrap();
        assert_eq!(a.to_scene().elements, b.to_scene().elements);
        assert_eq!(a.elements.read().len(), 13);
    }

    #[test]
    fn test_elements_stay_on_the_page() {
        let mut generator = LayoutGenerator::new(GeneratorConfig::default());
        let doc = generator.generate().unwrap();
        let root = doc.root().unwrap();
        for id in doc.eligible_elements(root).into_iter().filter(|id| *id != root) {
            let b = doc.bounds_in_frame(id, root).unwrap();
            assert!(b.min_x >= 0.0 && b.max_x <= 1920.0);
            assert!(b.min_y >= 0.0 && b.max_y <= 1080.0);
            assert_eq!(b.min_x.fract(), 0.0);
        }
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let config = GeneratorConfig { min_size: 50, max_size: 10, ..GeneratorConfig::default() };
        assert!(LayoutGenerator::new(config).generate().is_err());
    }

    #[test]
    fn test_evenly_spaced_row() {
        let (doc, ids) = LayoutGenerator::evenly_spaced_row(3, 10.0, 10.0).unwrap();
        let root = doc.root().unwrap();
        let xs: Vec<f64> = ids.iter().map(|id| doc.bounds_in_frame(*id, root).unwrap().min_x).collect();
        assert_eq!(xs, vec![0.0, 20.0, 40.0]);
    }
}
