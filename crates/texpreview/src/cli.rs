use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Largest accepted `--cell`, in pixels.
pub const MAX_CELL: u32 = 4096;

#[derive(Parser, Debug)]
#[command(
    name = "texpreview",
    author,
    version,
    about = "Render a canvas texture pattern and export it to PNG"
)]
pub struct Cli {
    /// TOML file with `width`, `height`, `visible` and `label` keys.
    #[arg(long, value_name = "FILE", env = "TEXPREVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Surface size as `WIDTHxHEIGHT`; overrides the config file.
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Mirror the surface to the snapshot directory while running.
    #[arg(long)]
    pub visible: bool,

    /// Name used for logs, snapshots and the GPU texture label.
    #[arg(long)]
    pub label: Option<String>,

    /// Pattern painted on every update.
    #[arg(long, value_enum, default_value_t = PatternKind::Checker)]
    pub pattern: PatternKind,

    /// Cell size in pixels (1 to 4096) for the checker and stripes patterns.
    #[arg(long, default_value_t = 8, value_parser = parse_cell)]
    pub cell: u32,

    /// Extra updates to run after the initial render.
    #[arg(long, default_value_t = 0)]
    pub updates: u32,

    /// Upload the final surface through a headless wgpu device.
    #[arg(long)]
    pub gpu: bool,

    /// Directory receiving debug snapshots when `--visible` is set.
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// PNG file the final surface is written to.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternKind {
    /// Solid white, the same as a canvas without a draw callback.
    White,
    Checker,
    Gradient,
    Stripes,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_cell(value: &str) -> Result<u32, String> {
    let cell: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid cell size '{value}'"))?;
    if !(1..=MAX_CELL).contains(&cell) {
        return Err(format!("cell size must be between 1 and {MAX_CELL}"));
    }
    Ok(cell)
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("size '{trimmed}' must look like WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size '{trimmed}' must be non-zero"));
    }
    Ok((width, height))
}
