//! Plan settings files.
//!
//! Settings are YAML files holding every knob of the `plan` command. Every
//! field is optional; command-line flags override values from the file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use stitchline::{
    ImportOptions, IntersectionSearch, JoinConfig, OverlapMode, PlanConfig, TargetUnit,
    WaypointOrdering,
};

/// Everything `plan` can be told, in one serialisable struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanSettings {
    /// Target stitch spacing, in output units
    pub pitch: f64,

    /// Minimum stitches between two waypoints
    pub min_stitches_per_gap: usize,

    /// Waypoint ordering: projection or axes
    pub ordering: String,

    /// Collinear overlap handling: midpoint or endpoints
    pub overlap: String,

    /// Place a stitch on every crossing
    pub stitch_at_crossings: bool,

    /// Test every segment pair instead of using the grid index
    pub brute_force: bool,

    /// Scale to the document's physical size in mm, cm or in
    pub units: Option<String>,

    /// Extra scale applied after unit conversion
    pub scale: f64,

    /// Remove successive duplicate points on import
    pub remove_duplicates: bool,

    /// Make the artwork y-up
    pub flip_y: bool,

    /// Curve flattening tolerance, in SVG user units
    pub curve_tolerance: f32,

    /// Merge consecutive touching paths before planning
    pub join: bool,

    /// Per-axis distance for `join`
    pub join_tolerance: f64,
}

impl Default for PlanSettings {
    fn default() -> Self {
        let plan = PlanConfig::default();
        let import = ImportOptions::default();
        Self {
            pitch: plan.pitch,
            min_stitches_per_gap: plan.min_stitches_per_gap,
            ordering: plan.ordering.name().to_string(),
            overlap: plan.overlap.name().to_string(),
            stitch_at_crossings: plan.stitch_at_crossings,
            brute_force: plan.search == IntersectionSearch::BruteForce,
            units: None,
            scale: import.scale,
            remove_duplicates: import.remove_duplicates,
            flip_y: import.flip_y,
            curve_tolerance: import.curve_tolerance,
            join: false,
            join_tolerance: JoinConfig::default().tolerance,
        }
    }
}

impl PlanSettings {
    /// Load settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn target_units(&self) -> Result<Option<TargetUnit>> {
        self.units
            .as_deref()
            .map(|u| u.parse::<TargetUnit>())
            .transpose()
            .map_err(Into::into)
    }

    pub fn plan_config(&self) -> Result<PlanConfig> {
        let ordering = WaypointOrdering::from_name(&self.ordering)
            .ok_or_else(|| anyhow!("unknown ordering '{}'. Use 'projection' or 'axes'.", self.ordering))?;
        let overlap = OverlapMode::from_name(&self.overlap)
            .ok_or_else(|| anyhow!("unknown overlap mode '{}'. Use 'midpoint' or 'endpoints'.", self.overlap))?;

        let config = PlanConfig {
            pitch: self.pitch,
            min_stitches_per_gap: self.min_stitches_per_gap,
            ordering,
            overlap,
            stitch_at_crossings: self.stitch_at_crossings,
            search: if self.brute_force {
                IntersectionSearch::BruteForce
            } else {
                IntersectionSearch::Grid
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn import_options(&self) -> Result<ImportOptions> {
        Ok(ImportOptions {
            flip_y: self.flip_y,
            target_units: self.target_units()?,
            scale: self.scale,
            remove_duplicates: self.remove_duplicates,
            curve_tolerance: self.curve_tolerance,
        })
    }

    pub fn join_config(&self) -> Option<JoinConfig> {
        self.join.then(|| JoinConfig::with_tolerance(self.join_tolerance))
    }
}

/// Execute the config command.
pub fn cmd_config(args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("--example") | Some("-e") => {
            print_example();
            Ok(())
        }
        Some("--defaults") => {
            print!("{}", serde_yaml::to_string(&PlanSettings::default())?);
            Ok(())
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_example() {
    println!(r##"# Example stitchline settings
# Use with: stitchline plan art.svg --config settings.yaml

# Spacing between stitches, in output units
pitch: 2.5

# At least this many stitches between two crossings
min_stitches_per_gap: 1

# Scale artwork to the SVG's width/height in mm, cm or in
units: mm

# Extra scale factor after unit conversion
scale: 1.0

# projection (exact for any slope) or axes (legacy sort)
ordering: projection

# Collinear overlaps: midpoint (one stitch) or endpoints (two)
overlap: midpoint

# Put a stitch on every crossing with another path
stitch_at_crossings: true

# Merge paths that start where the previous one ended
join: true
join_tolerance: 0.00001
"##);
}

fn print_usage() {
    eprintln!("Usage: stitchline config [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e, --example    Print a commented example settings file");
    eprintln!("  --defaults       Print every setting with its default value");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let settings = PlanSettings::from_yaml("{}").unwrap();
        assert_eq!(settings, PlanSettings::default());
        assert_eq!(settings.plan_config().unwrap(), PlanConfig::default());
        assert_eq!(settings.import_options().unwrap(), ImportOptions::default());
        assert_eq!(settings.join_config(), None);
    }

    #[test]
    fn partial_file() {
        let settings = PlanSettings::from_yaml("pitch: 1.5\nunits: in\njoin: true\n").unwrap();
        assert_eq!(settings.plan_config().unwrap().pitch, 1.5);
        assert_eq!(settings.target_units().unwrap(), Some(TargetUnit::Inches));
        assert!(settings.join_config().is_some());
    }

    #[test]
    fn example_parses() {
        let yaml = r##"
pitch: 2.5
min_stitches_per_gap: 1
units: mm
ordering: projection
overlap: midpoint
stitch_at_crossings: true
join: true
join_tolerance: 0.00001
"##;
        let settings = PlanSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.join_config(), Some(JoinConfig::with_tolerance(0.00001)));
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(PlanSettings::from_yaml("pich: 2.0").is_err());
    }

    #[test]
    fn bad_values_rejected() {
        let mut settings = PlanSettings::default();
        settings.ordering = "sideways".to_string();
        assert!(settings.plan_config().is_err());

        let mut settings = PlanSettings::default();
        settings.pitch = 0.0;
        assert!(settings.plan_config().is_err());

        let mut settings = PlanSettings::default();
        settings.units = Some("furlong".to_string());
        assert!(settings.import_options().is_err());
    }

    #[test]
    fn defaults_round_trip_through_yaml() {
        let yaml = serde_yaml::to_string(&PlanSettings::default()).unwrap();
        assert_eq!(PlanSettings::from_yaml(&yaml).unwrap(), PlanSettings::default());
    }
}
