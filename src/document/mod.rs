// src/document/mod.rs
mod document;
pub mod generator;

pub use self::document::{Document, Element, Scene};
pub use self::generator::{GeneratorConfig, LayoutGenerator};
