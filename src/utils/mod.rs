// src/utils/mod.rs
pub mod geometry;
pub mod util;

pub use geometry::{Axis, BoundingBox, Point};
pub use util::within_tolerance;
