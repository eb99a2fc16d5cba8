use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tinyimg::config::{self, TinyimgConfig};
use tinyimg::imaging::{
    CropRequest, EncodeOptions, Image, ImageError, ResizeSpec, Rgb, RustEngine, detect_from_bytes,
};
use tinyimg::output::{self, ImageInfo};
use tracing_subscriber::EnvFilter;

/// Destination flag shared by every command that writes an image.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output file; the extension (.jpg, .jpeg, .png) picks the format
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Parser)]
#[command(name = "tinyimg")]
#[command(about = "Resize, crop and convert JPEG and PNG images")]
#[command(long_about = "\
Resize, crop and convert JPEG and PNG images

Input format is detected from the file contents; output format from the
output file's extension (.jpg, .jpeg or .png, case-insensitive).

Size arguments:
  WxH     exact size, aspect ratio ignored      (resize 640x480)
  Wx      width only, height follows the image  (resize 640x)
  xH      height only, width follows the image  (resize x480)
  JSON    keyed request                         (resize '{\"width\": 640}')

Encoder settings come from tinyimg.toml in the working directory, or the
file named by --config. Run 'tinyimg gen-config' for a documented template.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./tinyimg.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JPEG quality 0-100, overriding the config
    #[arg(long, global = true)]
    quality: Option<u8>,

    /// PNG compression level 0-9, overriding the config
    #[arg(long, global = true)]
    compression: Option<u8>,

    /// Log every engine call to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print format, dimensions and size of an image
    Info {
        input: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resize to an exact or proportional size
    Resize {
        input: PathBuf,
        /// WxH, Wx, xH or a JSON object
        size: ResizeSpec,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Shrink or grow to fit inside a box, keeping aspect ratio
    Fit {
        input: PathBuf,
        /// Bounding box as WxH
        size: BoxSize,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Shrink or grow to cover a box, keeping aspect ratio
    Fill {
        input: PathBuf,
        /// Box to cover as WxH
        size: BoxSize,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Cut out a region; omitted edges default to the full image
    Crop {
        input: PathBuf,
        #[arg(long)]
        x: Option<u32>,
        #[arg(long)]
        y: Option<u32>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Re-encode to the format named by the output extension
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Flatten transparency onto this color (RRGGBB)
        #[arg(long)]
        background: Option<Rgb>,
    },
    /// Print a stock tinyimg.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Info { input, json } => {
            let (engine, _) = setup(&cli)?;
            let data = std::fs::read(input)?;
            let format = detect_from_bytes(&data)?;
            let image = Image::load_bytes_with(engine, &data)?;
            let info = ImageInfo::new(input, format, image.dimensions(), data.len() as u64);
            if *json {
                println!("{}", output::format_info_json(&info)?);
            } else {
                output::print_info(&info);
            }
        }
        Command::Resize { input, size, out } => {
            let size = *size;
            transform(&cli, input, &out.output, "resize", |image| {
                image.resize_in_place(size).map(|_| ())
            })?;
        }
        Command::Fit { input, size, out } => {
            let BoxSize { width, height } = *size;
            transform(&cli, input, &out.output, "fit", |image| {
                image.resize_to_fit_in_place(width, height).map(|_| ())
            })?;
        }
        Command::Fill { input, size, out } => {
            let BoxSize { width, height } = *size;
            transform(&cli, input, &out.output, "fill", |image| {
                image.resize_to_fill_in_place(width, height).map(|_| ())
            })?;
        }
        Command::Crop {
            input,
            x,
            y,
            width,
            height,
            out,
        } => {
            let request = CropRequest {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            };
            transform(&cli, input, &out.output, "crop", |image| {
                image.crop_in_place(&request).map(|_| ())
            })?;
        }
        Command::Convert {
            input,
            output,
            background,
        } => {
            let background = *background;
            transform(&cli, input, output, "convert", |image| match background {
                Some(color) => image.fill_transparent_color_in_place(color).map(|_| ()),
                None => Ok(()),
            })?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "tinyimg=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (explicit or discovered) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<TinyimgConfig, config::ConfigError> {
    let mut site = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_config_in(Path::new("."))?,
    };
    if let Some(quality) = cli.quality {
        site.jpeg.quality = quality;
    }
    if let Some(compression) = cli.compression {
        site.png.compression = Some(compression);
    }
    site.validate()?;
    tracing::debug!(?site, "resolved config");
    Ok(site)
}

/// Engine and encoder settings for commands that touch pixels.
fn setup(cli: &Cli) -> Result<(RustEngine, EncodeOptions), config::ConfigError> {
    let site = resolve_config(cli)?;
    Ok((site.engine(), site.encode_options()?))
}

/// Load `input`, apply `op`, save to `dest`, and report the size change.
fn transform(
    cli: &Cli,
    input: &Path,
    dest: &Path,
    name: &str,
    op: impl FnOnce(&mut Image) -> Result<(), ImageError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, options) = setup(cli)?;
    let mut image = Image::load_file_with(engine, input)?;
    let before = image.dimensions();
    op(&mut image)?;
    image.save_with(dest, &options)?;
    tracing::info!(operation = name, output = %dest.display(), "wrote image");
    output::print_transform(name, input, before, dest, image.dimensions());
    Ok(())
}

/// A `WxH` box where both sides are required.
#[derive(Debug, Clone, Copy)]
struct BoxSize {
    width: u32,
    height: u32,
}

impl FromStr for BoxSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<ResizeSpec>() {
            Ok(ResizeSpec::Exact { width, height }) => Ok(Self { width, height }),
            Ok(_) => Err(format!("expected WxH with both sides, got {s:?}")),
            Err(e) => Err(e.to_string()),
        }
    }
}
