//! Join command implementation.

use anyhow::{Context, Result, bail};
use tracing::info;

use stitchline::{ImportOptions, JoinConfig, JoinStats, extract_paths_from_svg, join_connected_paths};

use super::common::{flag_value, parse_flag, read_svg, set_input, write_output};
use super::writers::paths_to_svg;

/// Execute the join command.
///
/// Output stays in SVG user units, y-down, so it can replace the input file.
pub fn cmd_join(args: &[String]) -> Result<()> {
    let mut input: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut config = JoinConfig::default();
    let mut import = ImportOptions {
        flip_y: false,
        ..ImportOptions::default()
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i)?),
            "-t" | "--join-tolerance" => config.tolerance = parse_flag(args, &mut i)?,
            "--keep-duplicates" => import.remove_duplicates = false,
            "-v" | "-vv" | "--verbose" => {}
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-" => set_input(&mut input, "-")?,
            path if !path.starts_with('-') => set_input(&mut input, path)?,
            unknown => bail!("unknown option '{}' for join", unknown),
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

    let joined = join_connected_paths(&paths, &config);
    let stats = JoinStats::from_sets(&paths, &joined);
    info!(
        input_paths = stats.input_paths,
        output_paths = stats.output_paths,
        joins = stats.joins(),
        "joined paths"
    );

    write_output(output_path, &paths_to_svg(&joined))
}

fn print_usage() {
    eprintln!("Usage: stitchline join <input.svg|-> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>          Output SVG (default: stdout)");
    eprintln!("  -t, --join-tolerance <t>     Max per-axis gap to join (default: 1e-5)");
    eprintln!("  --keep-duplicates            Keep successive duplicate points");
}
