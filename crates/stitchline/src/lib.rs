//! # stitchline
//!
//! Plan running-stitch embroidery from vector line art.
//!
//! Paths are stitched at a target pitch, with an extra stitch placed wherever
//! one path crosses another so overlapping lines pin each other down.
//!
//! ```text
//! SVG ──svg──▶ PathSet ──join──▶ PathSet ──plan──▶ StitchPlan ──sequence──▶ PatternWriter
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod error;
pub mod geometry;
pub mod index;
pub mod intersect;
pub mod join;
pub mod order;
pub mod plan;
pub mod prepare;
pub mod sequence;
pub mod svg;
pub mod units;

// Re-export common types at crate root for convenience.
pub use error::{PlanError, SvgError, UnitError};
pub use geometry::{Path, PathSet, Point, Rgb, Segment, bounding_box_of_points};
pub use index::{IntersectionSearch, SegmentIndex};
pub use intersect::{IntersectionKind, SegmentIntersection, intersect_segments, segment_intersection};
pub use join::{JoinConfig, JoinStats, join_connected_paths};
pub use order::WaypointOrdering;
pub use plan::{
    OverlapMode, PathStitches, PlanConfig, Stitch, StitchKind, StitchPlan, StitchPlanner,
    plan_path_stitches, plan_single_path, plan_stitches,
};
pub use sequence::{PatternWriter, StitchRun, StitchSequence, StitchSequenceBuilder, sequence_from_plan};
pub use svg::{ImportOptions, extract_paths_from_svg, read_document_size};
pub use units::{TargetUnit, parse_size};
