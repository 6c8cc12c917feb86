use clap::{Parser, Subcommand};
use image_resizer::config;
use image_resizer::imaging::{MAX_DIMENSION, MIN_DIMENSION, Quality, RustBackend, TargetFormat};
use image_resizer::session::{ResizeOptions, Session};
use image_resizer::{logging, output};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

/// Width/height flags accept the same range the engine enforces.
fn dimension_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(MIN_DIMENSION as i64..=MAX_DIMENSION as i64)
}

fn quality_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(Quality::MIN as i64..=Quality::MAX as i64)
}

#[derive(Parser)]
#[command(name = "image-resizer")]
#[command(about = "Inspect, resize and convert images")]
#[command(long_about = "\
Inspect, resize and convert images

Raster images (png, jpg, jpeg, bmp, gif, tiff, webp) are resampled to exactly
the requested width and height and re-encoded to the chosen format. The output
is written as resized_<original file name>.

SVG images are rasterized to PNG at their own size; width, height and format
are ignored. The output is written as resized_<stem>.png.

Defaults come from resizer.toml in the config directory, if present.
Run 'image-resizer gen-config' to generate a documented resizer.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing resizer.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log level (off, error, warn, info, debug, trace); overrides the config
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the metadata of an image
    Metadata {
        path: PathBuf,
        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resize and re-encode an image (SVG is rasterized to PNG)
    Resize(ResizeArgs),
    /// List accepted input extensions and output formats
    Formats,
    /// Print a stock resizer.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ResizeArgs {
    path: PathBuf,
    /// Target width in pixels
    #[arg(long, value_parser = dimension_parser())]
    width: Option<u32>,
    /// Target height in pixels
    #[arg(long, value_parser = dimension_parser())]
    height: Option<u32>,
    /// Output encoding
    #[arg(long, value_enum, ignore_case = true)]
    format: Option<TargetFormat>,
    /// Lossy encoding quality
    #[arg(long, value_parser = quality_parser())]
    quality: Option<u32>,
    /// Use the slowest, smallest PNG compression
    #[arg(long)]
    optimize: bool,
    /// Note that upscaling is intended (never blocked either way)
    #[arg(long)]
    allow_upscale: bool,
    /// Directory to write the output into
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl ResizeArgs {
    /// Flags left off fall back to the config; boolean flags only ever switch on.
    fn options(&self) -> ResizeOptions {
        ResizeOptions {
            width: self.width,
            height: self.height,
            format: self.format,
            quality: self.quality,
            optimize: self.optimize.then_some(true),
            allow_upscale: self.allow_upscale.then_some(true),
            output_dir: self.output_dir.clone(),
        }
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Metadata { path, json } => {
            let session = open_session(&cli.config_dir, cli.log_level, &path)?;
            let metadata = session
                .metadata()
                .map_err(|_| "failed to read image metadata")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                output::print_metadata(&path, &metadata);
            }
        }
        Command::Resize(args) => {
            let session = open_session(&cli.config_dir, cli.log_level, &args.path)?;
            let written = session
                .resize(&args.options())
                .map_err(|_| "failed to resize image")?;
            output::print_saved(&args.path, &written);
        }
        Command::Formats => output::print_formats(),
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Load the config, build the logger, and select `path`.
fn open_session(
    config_dir: &Path,
    level: Option<LevelFilter>,
    path: &Path,
) -> Result<Session<RustBackend>, Box<dyn std::error::Error>> {
    let config = config::load_config(config_dir)?;
    let level = match level {
        Some(level) => level,
        None => config.logging.level_filter()?,
    };
    let logger = logging::build_logger(level);
    let mut session = Session::new(RustBackend::new(), logger, config);
    session.select(path)?;
    Ok(session)
}
