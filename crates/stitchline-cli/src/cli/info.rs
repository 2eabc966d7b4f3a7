//! Info command implementation.
//!
//! Summarises what `plan` would see: paths after import, segments, crossings
//! and the stitch count at a given pitch.

use anyhow::{Context, Result, bail};
use serde::Serialize;

use stitchline::{
    ImportOptions, PlanConfig, TargetUnit, extract_paths_from_svg, plan_stitches,
    sequence_from_plan,
};

use super::common::{parse_flag, read_svg, set_input, write_output};

/// Statistics for one document.
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub paths: usize,
    pub points: usize,
    pub segments: usize,
    pub bounds: Option<[f64; 4]>,
    pub units: Option<String>,
    pub pitch: f64,
    /// Crossing stitches; a crossing is usually stitched once on each path.
    pub crossing_stitches: usize,
    pub stitches: usize,
    pub longest_stitch: f64,
    pub thread_length: f64,
}

impl InfoReport {
    fn to_text(&self) -> String {
        let units = self.units.as_deref().unwrap_or("user units");
        let mut lines = vec![
            format!("Paths:          {}", self.paths),
            format!("Points:         {}", self.points),
            format!("Segments:       {}", self.segments),
        ];
        if let Some([min_x, min_y, max_x, max_y]) = self.bounds {
            lines.push(format!(
                "Size:           {:.2} x {:.2} {} (from {:.2},{:.2})",
                max_x - min_x,
                max_y - min_y,
                units,
                min_x,
                min_y
            ));
        }
        lines.push(format!("Crossing stitches: {}", self.crossing_stitches));
        lines.push(format!("Stitches:       {} at pitch {}", self.stitches, self.pitch));
        lines.push(format!("Longest stitch: {:.3}", self.longest_stitch));
        lines.push(format!("Thread length:  {:.1} {}", self.thread_length, units));
        lines.join("\n") + "\n"
    }
}

/// Execute the info command.
pub fn cmd_info(args: &[String]) -> Result<()> {
    let mut input: Option<&str> = None;
    let mut import = ImportOptions::default();
    let mut config = PlanConfig::default();
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--units" => import.target_units = Some(parse_flag::<TargetUnit>(args, &mut i)?),
            "--scale" => import.scale = parse_flag(args, &mut i)?,
            "-p" | "--pitch" => config.pitch = parse_flag(args, &mut i)?,
            "--json" => json = true,
            "-v" | "-vv" | "--verbose" => {}
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-" => set_input(&mut input, "-")?,
            path if !path.starts_with('-') => set_input(&mut input, path)?,
            unknown => bail!("unknown option '{}' for info", unknown),
        }
        i += 1;
    }

    let Some(input) = input else {
        print_usage();
        bail!("SVG file required (use '-' for stdin)");
    };

    let svg_content = read_svg(input)?;
    let paths = extract_paths_from_svg(&svg_content, &import)
        .with_context(|| format!("failed to import '{}'", input))?;
    let plan = plan_stitches(&paths, &config)?;
    let sequence = sequence_from_plan(&plan);

    let report = InfoReport {
        paths: paths.len(),
        points: paths.point_count(),
        segments: paths.segment_count(),
        bounds: paths.bounding_box().map(|(a, b, c, d)| [a, b, c, d]),
        units: import.target_units.map(|u| u.name().to_string()),
        pitch: config.pitch,
        crossing_stitches: plan.crossing_count(),
        stitches: plan.stitch_count(),
        longest_stitch: sequence.longest_stitch(),
        thread_length: sequence.thread_length(),
    };

    let output = if json {
        serde_json::to_string_pretty(&report)? + "\n"
    } else {
        report.to_text()
    };
    write_output(None, &output)
}

fn print_usage() {
    eprintln!("Usage: stitchline info <input.svg|-> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --units <mm|cm|in>   Scale to the SVG's physical width/height");
    eprintln!("  --scale <f>          Extra scale factor (default: 1)");
    eprintln!("  -p, --pitch <n>      Pitch used for the stitch estimate (default: 2.5)");
    eprintln!("  --json               Machine-readable output");
}
