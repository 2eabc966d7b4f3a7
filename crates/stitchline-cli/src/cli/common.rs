//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use tracing::info;

/// Output format for planned stitches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Json,
    Csv,
    Svg,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            "svg" => Some(OutputFormat::Svg),
            _ => None,
        }
    }
}

/// Read SVG from a file, or from stdin when `path` is `-`.
pub fn read_svg(path: &str) -> Result<String> {
    if path == "-" {
        info!("reading SVG from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read SVG from stdin")?;
        Ok(buffer)
    } else {
        info!(path, "loading SVG");
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path))
    }
}

/// Write to a file, or stdout when `path` is `None` or `-`.
pub fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some("-") | None => {
            print!("{}", content);
            Ok(())
        }
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write '{}'", path))?;
            info!(path, "wrote output");
            Ok(())
        }
    }
}

/// Take the value following the flag at `args[*i]`, advancing `i`.
pub fn flag_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

/// Take and parse the value following the flag at `args[*i]`.
pub fn parse_flag<T>(args: &[String], i: &mut usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let flag = args[*i].clone();
    let raw = flag_value(args, i)?;
    raw.parse()
        .map_err(|e| anyhow!("invalid value '{}' for {}: {}", raw, flag, e))
}

/// Record the positional input path, rejecting a second one.
pub fn set_input<'a>(input: &mut Option<&'a str>, arg: &'a str) -> Result<()> {
    if let Some(existing) = input {
        bail!("unexpected argument '{}' (input already set to '{}')", arg, existing);
    }
    *input = Some(arg);
    Ok(())
}
