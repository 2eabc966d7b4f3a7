//! stitchline - plan running-stitch embroidery from SVG line art
//!
//! Usage:
//!   stitchline plan <svg|->  [options]   Plan stitches
//!   stitchline join <svg|->  [options]   Merge touching paths
//!   stitchline info <svg|->  [options]   Path and crossing statistics
//!   stitchline config --example          Print example settings

mod cli;

use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use cli::{cmd_config, cmd_info, cmd_join, cmd_plan};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    init_logging(verbosity(&args));

    if args.len() < 2 {
        print_usage(&args[0]);
        return ExitCode::FAILURE;
    }

    let result = match args[1].as_str() {
        "plan" => cmd_plan(&args[2..]),
        "join" => cmd_join(&args[2..]),
        "info" => cmd_info(&args[2..]),
        "config" => cmd_config(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            return ExitCode::SUCCESS;
        }
        other => Err(anyhow::anyhow!(
            "unknown command '{}'. Run '{} help' for usage.",
            other,
            args[0]
        )),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Count `-v` flags; `-vv` counts twice.
fn verbosity(args: &[String]) -> usize {
    args.iter()
        .map(|a| match a.as_str() {
            "-v" | "--verbose" => 1,
            "-vv" => 2,
            _ => 0,
        })
        .sum()
}

/// Log to stderr so stdout stays clean for piped output.
///
/// `RUST_LOG` (e.g. `RUST_LOG=stitchline::plan=trace`) takes precedence;
/// the level picked by `-v` applies only when it sets no default.
fn init_logging(verbosity: usize) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let env_filter = log_filter(level, env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Filter from `RUST_LOG` directives, falling back to `level`.
fn log_filter(level: LevelFilter, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn print_usage(prog: &str) {
    eprintln!("stitchline - running-stitch planning for SVG line art");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} plan <svg> [options]     Plan stitches", prog);
    eprintln!("  {} join <svg> [options]     Merge paths that continue one another", prog);
    eprintln!("  {} info <svg> [options]     Show path and crossing statistics", prog);
    eprintln!("  {} config --example         Print an example settings file", prog);
    eprintln!();
    eprintln!("Common options:");
    eprintln!("  -v, -vv               More logging (or set RUST_LOG)");
    eprintln!("  -h, --help            Command help");
    eprintln!();
    eprintln!("Stdin support:");
    eprintln!("  Use '-' as input file to read SVG from stdin:");
    eprintln!("  cat art.svg | {} plan - -p 2.5 --format csv", prog);
}
