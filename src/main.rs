use clap::{Parser, Subcommand};
use imgpipe::imaging::operations::{open_async, save_async, watermark_from_async};
use imgpipe::imaging::{OpenOptions, Placement, ResizeOptions, RustCodec, resolve_format};
use imgpipe::{Saved, Source, Target, config, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imgpipe")]
#[command(about = "Resize, crop, watermark and convert JPEG/PNG/GIF images")]
#[command(long_about = "\
Resize, crop, watermark and convert JPEG/PNG/GIF images

Sources and targets are file paths, file:// URLs, or '-' for stdin/stdout.
Target paths may contain {ext}, replaced with the written format's
extension (jpg, png, gif).

Output format (first available wins):
  --format flag → target file extension → input format

Examples:
  imgpipe convert photo.jpg thumb.png --resize 400x300
  imgpipe convert photo.jpg 'out/photo.{ext}' --crop 200x200 --format gif
  imgpipe convert photo.jpg marked.jpg --watermark logo.png --at '0,0;1,0;0,1;1,1'
  cat photo.jpg | imgpipe convert - - --resize x600 --format png > small.png

Run 'imgpipe gen-config' to generate a documented imgpipe.toml.")]
#[command(version)]
struct Cli {
    /// Config file with per-operation defaults (missing file = stock defaults)
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Input image path, or '-' for stdin
    input: String,

    /// Output path, or '-' for stdout
    #[arg(default_value = "-")]
    output: String,

    /// Fit inside WxH (either side may be omitted: 800x, x600)
    #[arg(long, value_name = "WxH")]
    resize: Option<ResizeOptions>,

    /// Centre-crop to exactly WxH (capped at the source size)
    #[arg(long, value_name = "WxH")]
    crop: Option<ResizeOptions>,

    /// Watermark image path
    #[arg(long)]
    watermark: Option<String>,

    /// Watermark position x,y in 0..1, or several x,y;x,y to pick the
    /// highest-contrast one
    #[arg(long, value_name = "X,Y[;X,Y...]", requires = "watermark")]
    at: Option<Placement>,

    /// Output format (jpeg, png, gif)
    #[arg(long)]
    format: Option<String>,

    /// JPEG quality 1-100 (0 = codec default)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: Option<u8>,

    /// PNG compression 1-9 (0 = codec default)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=9))]
    compression: Option<u8>,

    /// Nearest-neighbour scaling instead of interpolated resampling
    #[arg(long)]
    nearest: bool,

    /// Keep the stored pixel layout, ignoring the EXIF orientation tag
    #[arg(long)]
    no_auto_orient: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Open an image, apply transforms, and save it
    Convert(ConvertArgs),
    /// Print format, size and metadata of an image
    Info {
        /// Input image path, or '-' for stdin
        input: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a stock imgpipe.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert(args) => {
            let config = config::load_config(&cli.config)?;
            convert(&config, args).await?;
        }
        Command::Info { input, json } => {
            let source: Source = input.parse()?;
            // Report the stored orientation rather than correcting it
            let options = OpenOptions { auto_orient: false };
            let image = open_async(&RustCodec::new(), source, &options).await?;
            let info = output::ImageInfo::new(input, &image);
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                output::print_info(&info);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

async fn convert(config: &config::Config, args: ConvertArgs) -> imgpipe::Result<()> {
    let codec = RustCodec::new();
    let source: Source = args.input.parse()?;
    let target: Target = args.output.parse()?;

    let mut open_options = config.open_options();
    if args.no_auto_orient {
        open_options.auto_orient = false;
    }
    let resample = config.resize.resample && !args.nearest;
    let mut save_options = config.save_options();
    save_options.format = args.format.or(save_options.format);
    if let Some(quality) = args.quality {
        save_options = save_options.with_quality(quality);
    }
    if let Some(compression) = args.compression {
        save_options = save_options.with_compression(compression);
    }

    let mut image = open_async(&codec, source, &open_options).await?;
    let before = output::Summary::of(&image);
    if let Some(resize) = args.resize {
        image = image.resize(&resize.with_resample(resample))?;
    }
    if let Some(crop) = args.crop {
        image = image.crop(&crop.with_resample(resample))?;
    }
    if let Some(mark) = args.watermark {
        let mark: Source = mark.parse()?;
        let placement = args.at.unwrap_or_default();
        image = watermark_from_async(&codec, &image, mark, &placement).await?;
    }

    let format = resolve_format(&image, target.file_name(), &save_options)?;
    let saved = save_async(&codec, &image, target, &save_options).await?;
    if saved != Saved::Sink {
        let after = output::Summary::of(&image);
        println!(
            "{}",
            output::format_convert(&args.input, before, after, format, &saved)
        );
    }
    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}
