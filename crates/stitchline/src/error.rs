//! Error types for stitchline.
//!
//! Geometric degeneracies (zero-length segments, disjoint collinear segments)
//! are not errors - they resolve to "no intersection". Only invalid input and
//! unparsable documents surface here.

use thiserror::Error;

/// Invalid planning input, reported before any stitch is placed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("stitch pitch must be a positive finite number, got {0}")]
    InvalidPitch(f64),

    #[error("path {path} has {points} point(s); at least 2 are required")]
    TooFewPoints { path: usize, points: usize },

    #[error("path index {index} out of range ({len} paths)")]
    PathOutOfRange { index: usize, len: usize },
}

/// Failure to interpret a document size string such as `"10mm"`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitError {
    #[error("failed to parse size '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("unsupported unit in size '{0}'")]
    UnsupportedUnit(String),

    #[error("unknown target unit '{0}' (use mm, cm or in)")]
    UnknownTarget(String),

    #[error("size '{0}' must be positive")]
    NonPositive(String),
}

/// Error type for SVG import.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("no paths found in SVG")]
    NoPaths,

    #[error("invalid document size: {0}")]
    Size(#[from] UnitError),
}
