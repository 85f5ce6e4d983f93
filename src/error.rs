// src/error.rs

use crate::snap::ElementId;
use thiserror::Error;

/// Errors surfaced by the snapping engine.
///
/// Only configuration problems are reported. Degenerate geometry and numeric edge cases
/// are absorbed as "no snap" and never reach the caller.
#[derive(Debug, Error)]
pub enum SnapError {
    #[error("host does not expose a root container")]
    MissingRoot,

    #[error("host does not expose a selection interface")]
    MissingSelectionInterface,

    #[error("snap tolerance must be a finite, non-negative number (got {0})")]
    InvalidTolerance(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    #[error("snapping is disabled")]
    Disabled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SnapError>;
