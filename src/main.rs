use clap::{Parser, Subcommand};
use pixsmith::{
    Axis, Background, Canvas, CropSpec, Dimension, Flip, Placement, Quality, ResizeMode,
    ResizeRequest, Rotation,
};
use std::path::PathBuf;

/// Shared flags for commands that write an image.
#[derive(clap::Args, Clone)]
struct SaveArgs {
    /// JPEG quality (1-100, ignored for PNG/GIF output)
    #[arg(long, default_value_t = 90)]
    quality: u8,
}

impl SaveArgs {
    fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

#[derive(Parser)]
#[command(name = "pixsmith")]
#[command(about = "Resize, crop, flip, rotate, and watermark images")]
#[command(long_about = "\
Resize, crop, flip, rotate, and watermark images

Input formats: JPEG, PNG, GIF (via the image crate) and BMP at bit depths
1/4/8/16/24 (decoded in-house). Output format follows the destination
file extension: .jpg/.jpeg, .png, or .gif.

Dimensions accept pixel counts or percentages of the current dimension
(\"640\", \"50%\"). Give only one of --width/--height and the other is
derived from the aspect ratio.

Resize modes:
  stretch       fill the exact target, distorting if needed (default)
  pad           fit inside the target, borders filled with --background
  proportional  fit inside the target, output shrinks to the fitted size
  crop          fill the exact target by cropping the overflowing axis

Crop and watermark positions accept anchors (left|center|right,
top|center|bottom) or literal pixel offsets.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print image dimensions
    Info {
        file: PathBuf,
    },
    /// Create a blank image filled with a background color
    Blank {
        output: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Fill color as hex (#rgb or #rrggbb)
        #[arg(long, default_value = "#ffffff")]
        background: String,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Resize an image under one of the four modes
    Resize {
        input: PathBuf,
        output: PathBuf,
        /// Target width in pixels or percent ("640", "50%"); 0 = derive
        #[arg(long, default_value = "0", value_parser = parse_dimension)]
        width: Dimension,
        /// Target height in pixels or percent; 0 = derive
        #[arg(long, default_value = "0", value_parser = parse_dimension)]
        height: Dimension,
        /// stretch | pad | proportional | crop
        #[arg(long, default_value = "stretch", value_parser = parse_mode)]
        mode: ResizeMode,
        /// Background hex color for pad borders
        #[arg(long)]
        background: Option<String>,
        /// Crop window x: left|center|right or a pixel offset
        #[arg(long, value_parser = parse_horizontal)]
        crop_x: Option<Placement>,
        /// Crop window y: top|center|bottom or a pixel offset
        #[arg(long, value_parser = parse_vertical)]
        crop_y: Option<Placement>,
        /// Crop window width (defaults to the full source width)
        #[arg(long)]
        crop_width: Option<u32>,
        /// Crop window height (defaults to the full source height)
        #[arg(long)]
        crop_height: Option<u32>,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Mirror an image horizontally or vertically
    Flip {
        input: PathBuf,
        output: PathBuf,
        /// horizontal | vertical
        #[arg(long, default_value = "horizontal", value_parser = parse_flip)]
        direction: Flip,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Rotate an image clockwise by 90, 180, or 270 degrees
    Rotate {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        degrees: u32,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Overlay a watermark image at an anchored or literal position
    Watermark {
        input: PathBuf,
        mark: PathBuf,
        output: PathBuf,
        /// left|center|right or a pixel offset
        #[arg(long, default_value = "right", value_parser = parse_horizontal)]
        x: Placement,
        /// top|center|bottom or a pixel offset
        #[arg(long, default_value = "bottom", value_parser = parse_vertical)]
        y: Placement,
        #[command(flatten)]
        save: SaveArgs,
    },
}

fn parse_dimension(s: &str) -> Result<Dimension, String> {
    Dimension::parse(s).map_err(|e| e.to_string())
}

fn parse_mode(s: &str) -> Result<ResizeMode, String> {
    s.parse().map_err(|e: pixsmith::CanvasError| e.to_string())
}

fn parse_horizontal(s: &str) -> Result<Placement, String> {
    Placement::parse(s, Axis::Horizontal).map_err(|e| e.to_string())
}

fn parse_vertical(s: &str) -> Result<Placement, String> {
    Placement::parse(s, Axis::Vertical).map_err(|e| e.to_string())
}

fn parse_flip(s: &str) -> Result<Flip, String> {
    match s {
        "horizontal" | "h" => Ok(Flip::Horizontal),
        "vertical" | "v" => Ok(Flip::Vertical),
        other => Err(format!("expected horizontal or vertical, got {other:?}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Info { file } => {
            let canvas = Canvas::open(&file)?;
            println!("{} {}x{}", file.display(), canvas.width(), canvas.height());
        }
        Command::Blank {
            output,
            width,
            height,
            background,
            save,
        } => {
            let canvas = Canvas::blank(width, height, Background::from_hex(&background)?)?;
            canvas.save(&output, save.quality())?;
            println!("{} {}x{}", output.display(), width, height);
        }
        Command::Resize {
            input,
            output,
            width,
            height,
            mode,
            background,
            crop_x,
            crop_y,
            crop_width,
            crop_height,
            save,
        } => {
            let mut canvas = Canvas::open(&input)?;
            if let Some(hex) = background {
                canvas.set_background_hex(&hex)?;
            }
            if crop_x.is_some() || crop_y.is_some() || crop_width.is_some() || crop_height.is_some()
            {
                canvas.set_crop(CropSpec {
                    x: crop_x.unwrap_or(Placement::Offset(0)),
                    y: crop_y.unwrap_or(Placement::Offset(0)),
                    width: crop_width,
                    height: crop_height,
                });
            }
            canvas.resize(&ResizeRequest {
                width,
                height,
                mode,
            })?;
            canvas.save(&output, save.quality())?;
            println!(
                "{} {}x{}",
                output.display(),
                canvas.width(),
                canvas.height()
            );
        }
        Command::Flip {
            input,
            output,
            direction,
            save,
        } => {
            let mut canvas = Canvas::open(&input)?;
            canvas.flip(direction);
            canvas.save(&output, save.quality())?;
            println!("{}", output.display());
        }
        Command::Rotate {
            input,
            output,
            degrees,
            save,
        } => {
            let mut canvas = Canvas::open(&input)?;
            canvas.rotate(Rotation::from_degrees(degrees)?);
            canvas.save(&output, save.quality())?;
            println!(
                "{} {}x{}",
                output.display(),
                canvas.width(),
                canvas.height()
            );
        }
        Command::Watermark {
            input,
            mark,
            output,
            x,
            y,
            save,
        } => {
            let mut canvas = Canvas::open(&input)?;
            let mark = Canvas::open(&mark)?.into_image();
            canvas.watermark(&mark, x, y);
            canvas.save(&output, save.quality())?;
            println!("{}", output.display());
        }
    }

    Ok(())
}
