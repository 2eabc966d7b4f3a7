//! Plan command implementation.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;

use stitchline::{
    JoinStats, OverlapMode, TargetUnit, WaypointOrdering, extract_paths_from_svg,
    join_connected_paths, plan_stitches, sequence_from_plan,
};

use super::common::{OutputFormat, flag_value, parse_flag, read_svg, set_input, write_output};
use super::settings::PlanSettings;
use super::writers::{CsvWriter, SvgWriter, plan_to_json};

/// Execute the plan command.
pub fn cmd_plan(args: &[String]) -> Result<()> {
    // Settings file first so flags can override it, wherever they appear.
    let mut settings = match find_config(args)? {
        Some(path) => {
            info!(path, "loading settings");
            PlanSettings::load(path)?
        }
        None => PlanSettings::default(),
    };

    let mut input: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut format = OutputFormat::Json;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i)?),
            "-p" | "--pitch" => settings.pitch = parse_flag(args, &mut i)?,
            "-m" | "--min-stitches" => settings.min_stitches_per_gap = parse_flag(args, &mut i)?,
            "--units" => {
                let units: TargetUnit = parse_flag(args, &mut i)?;
                settings.units = Some(units.name().to_string());
            }
            "--scale" => settings.scale = parse_flag(args, &mut i)?,
            "-f" | "--format" => {
                let name = flag_value(args, &mut i)?;
                format = match OutputFormat::from_name(name) {
                    Some(f) => f,
                    None => bail!("unknown format '{}'. Use 'json', 'csv' or 'svg'.", name),
                };
            }
            "--ordering" => {
                let name = flag_value(args, &mut i)?;
                let Some(ordering) = WaypointOrdering::from_name(name) else {
                    bail!("unknown ordering '{}'. Use 'projection' or 'axes'.", name);
                };
                settings.ordering = ordering.name().to_string();
            }
            "--overlap" => {
                let name = flag_value(args, &mut i)?;
                let Some(overlap) = OverlapMode::from_name(name) else {
                    bail!("unknown overlap mode '{}'. Use 'midpoint' or 'endpoints'.", name);
                };
                settings.overlap = overlap.name().to_string();
            }
            "--avoid-crossings" => settings.stitch_at_crossings = false,
            "--brute-force" => settings.brute_force = true,
            "--keep-duplicates" => settings.remove_duplicates = false,
            "--no-flip" => settings.flip_y = false,
            "--join" => settings.join = true,
            "--join-tolerance" => {
                settings.join_tolerance = parse_flag(args, &mut i)?;
                settings.join = true;
            }
            "--curve-tolerance" => settings.curve_tolerance = parse_flag(args, &mut i)?,
            "-c" | "--config" => i += 1,
            "-v" | "-vv" | "--verbose" => {}
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-" => set_input(&mut input, "-")?,
            path if !path.starts_with('-') => set_input(&mut input, path)?,
            unknown => bail!("unknown option '{}' for plan", unknown),
        }
        i += 1;
    }

    let Some(input) = input else {
        print_usage();
        bail!("SVG file required (use '-' for stdin)");
    };

    let config = settings.plan_config()?;
    let import = settings.import_options()?;

    let svg_content = read_svg(input)?;
    let mut paths = extract_paths_from_svg(&svg_content, &import)
        .with_context(|| format!("failed to import '{}'", input))?;
    info!(paths = paths.len(), points = paths.point_count(), "loaded paths");

    if let Some(join) = settings.join_config() {
        let joined = join_connected_paths(&paths, &join);
        let stats = JoinStats::from_sets(&paths, &joined);
        info!(joins = stats.joins(), paths = stats.output_paths, "joined paths");
        paths = joined;
    }

    let start = Instant::now();
    let plan = plan_stitches(&paths, &config)?;
    info!(
        stitches = plan.stitch_count(),
        crossings = plan.crossing_count(),
        elapsed = ?start.elapsed(),
        "planned stitches"
    );

    let output = match format {
        OutputFormat::Json => plan_to_json(&plan, config.pitch, settings.units.as_deref())?,
        OutputFormat::Csv => {
            let mut writer = CsvWriter::new();
            sequence_from_plan(&plan).write_to(&mut writer);
            writer.finish()
        }
        OutputFormat::Svg => {
            let mut writer = SvgWriter::new(config.pitch / 10.0, import.flip_y);
            sequence_from_plan(&plan).write_to(&mut writer);
            writer.finish()
        }
    };

    write_output(output_path, &output)
}

/// Locate `--config <file>` before the main pass.
fn find_config(args: &[String]) -> Result<Option<&str>> {
    match args.iter().position(|a| a == "-c" || a == "--config") {
        Some(mut i) => flag_value(args, &mut i).map(Some),
        None => Ok(None),
    }
}

fn print_usage() {
    eprintln!("Usage: stitchline plan <input.svg|-> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>       Output file (default: stdout)");
    eprintln!("  -p, --pitch <n>           Stitch spacing (default: 2.5)");
    eprintln!("  -m, --min-stitches <n>    Min stitches between waypoints (default: 1)");
    eprintln!("  -f, --format <fmt>        json, csv or svg (default: json)");
    eprintln!("  --units <mm|cm|in>        Scale to the SVG's physical width/height");
    eprintln!("  --scale <f>               Extra scale factor (default: 1)");
    eprintln!("  --ordering <strategy>     projection or axes (default: projection)");
    eprintln!("  --overlap <mode>          midpoint or endpoints (default: midpoint)");
    eprintln!("  --avoid-crossings         Do not stitch on crossings, only around them");
    eprintln!("  --brute-force             Test every segment pair (no spatial index)");
    eprintln!("  --keep-duplicates         Keep successive duplicate points");
    eprintln!("  --no-flip                 Keep SVG y-down coordinates");
    eprintln!("  --join                    Merge paths that continue one another");
    eprintln!("  --join-tolerance <t>      Join distance per axis (default: 1e-5, implies --join)");
    eprintln!("  --curve-tolerance <t>     Curve flattening tolerance (default: 0.1)");
    eprintln!("  -c, --config <file>       YAML settings (see 'stitchline config --example')");
    eprintln!("  -v, -vv                   More logging");
}
