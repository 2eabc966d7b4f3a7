//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `plan` - Plan stitches for SVG line art
//! - `join` - Merge consecutive paths whose ends touch
//! - `info` - Path, segment and crossing statistics
//! - `config` - Print an example settings file

pub mod common;
pub mod info;
pub mod join;
pub mod plan;
pub mod settings;
pub mod writers;

pub use info::cmd_info;
pub use join::cmd_join;
pub use plan::cmd_plan;
pub use settings::cmd_config;
