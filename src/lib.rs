// src/lib.rs

pub mod config;
pub mod document;
pub mod error;
pub mod snap;
pub mod utils;

pub use config::SnapConfig;
pub use document::Document;
pub use error::{Result, SnapError};
pub use snap::{GeometrySource, SnapFrame, SnapSession};
