//! Clean-up passes applied to imported artwork before planning.
//!
//! Each pass works in place on a [`PathSet`]. The SVG importer chains them,
//! but they are public so callers building paths by hand can reuse them.

use tracing::{debug, warn};

use crate::geometry::{Path, PathSet};

/// Scale factor mapping the artwork's extent onto a physical document size.
///
/// Each axis gives `size / point_range`; the mean of the axes that have a
/// non-zero range is returned. `None` when neither axis does (a single dot,
/// or an empty set).
pub fn document_scale_factor(paths: &PathSet, width: f64, height: f64) -> Option<f64> {
    let (min_x, min_y, max_x, max_y) = paths.bounding_box()?;
    let factors: Vec<f64> = [(width, max_x - min_x), (height, max_y - min_y)]
        .into_iter()
        .filter(|&(_, range)| range.abs() > 0.0)
        .map(|(size, range)| size / range.abs())
        .collect();

    if factors.is_empty() {
        return None;
    }

    let factor = factors.iter().sum::<f64>() / factors.len() as f64;
    debug!(width, height, factor, "document scale factor");
    Some(factor)
}

/// Multiply every coordinate by `factor`.
pub fn scale(paths: &mut PathSet, factor: f64) {
    for path in paths.paths_mut() {
        for p in &mut path.points {
            *p = *p * factor;
        }
    }
}

/// Negate every y so SVG's y-down artwork becomes y-up.
pub fn flip_y(paths: &mut PathSet) {
    for path in paths.paths_mut() {
        for p in &mut path.points {
            p.y = -p.y;
        }
    }
}

/// Remove points identical to their predecessor.
///
/// Exact comparison; tiny moves are real stitches.
pub fn dedupe_consecutive(paths: &mut PathSet) {
    for path in paths.paths_mut() {
        path.points.dedup();
    }
}

/// Drop paths that cannot form a segment, returning how many were dropped.
pub fn drop_short_paths(paths: &mut PathSet) -> usize {
    let before = paths.len();
    paths.retain(|p: &Path| {
        if p.is_valid() {
            true
        } else {
            warn!(id = ?p.id, points = p.points.len(), "skipping path with fewer than 2 points");
            false
        }
    });
    before - paths.len()
}
