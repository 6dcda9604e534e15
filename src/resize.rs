//! The resize engine: four strategies over one resampling primitive.
//!
//! All target geometry is computed in [`geometry`](crate::geometry); the
//! only pixel work delegated to the raster collaborator is
//! `imageops::resize` (bilinear), `crop_imm`, and `overlay`. No
//! library-provided "fit" shortcut is used.

use crate::color::Background;
use crate::error::{CanvasError, Result};
use crate::geometry::{self, CropSpec, Dimension};
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Bilinear resampling, matching the area-averaging quality the engine
/// assumes of its resampler.
const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// Resize strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMode {
    /// Resample the full source into the full target rectangle. Aspect
    /// ratio is not preserved; distortion is allowed by design.
    #[default]
    Stretch,
    /// Letterbox: aspect-preserving fit centered on a background-filled
    /// target-sized buffer.
    Pad,
    /// Aspect-preserving fit with the buffer shrunk to the fitted
    /// rectangle itself — no padding.
    Proportional,
    /// Crop-fill: sample an aspect-matching source window (automatic and
    /// centered, or caller-placed) into the full target.
    Crop,
}

impl std::str::FromStr for ResizeMode {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stretch" => Ok(ResizeMode::Stretch),
            "pad" => Ok(ResizeMode::Pad),
            "proportional" => Ok(ResizeMode::Proportional),
            "crop" => Ok(ResizeMode::Crop),
            other => Err(CanvasError::Configuration(format!(
                "unknown resize mode {other:?} (expected stretch, pad, proportional, or crop)"
            ))),
        }
    }
}

/// A resize to perform: target extents (pixels or percentages, one may be
/// zero to derive it from the aspect ratio) and the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResizeRequest {
    pub width: Dimension,
    pub height: Dimension,
    pub mode: ResizeMode,
}

/// Execute a resize request against a pixel buffer.
///
/// `crop` supplies a manual window for [`ResizeMode::Crop`]; when absent
/// the window is computed automatically. The other modes ignore it.
pub fn resize(
    image: &RgbImage,
    request: &ResizeRequest,
    background: Background,
    crop: Option<&CropSpec>,
) -> Result<RgbImage> {
    let source = image.dimensions();
    let target = geometry::resolve_target(source, request.width, request.height)?;
    let (target_w, target_h) = target;

    let out = match request.mode {
        ResizeMode::Stretch => imageops::resize(image, target_w, target_h, RESAMPLE_FILTER),
        ResizeMode::Pad => {
            let (fit_w, fit_h) = geometry::fit_dimensions(source, target);
            let fitted = imageops::resize(image, fit_w, fit_h, RESAMPLE_FILTER);
            let mut padded = RgbImage::from_pixel(target_w, target_h, background.to_rgb());
            let x = i64::from(target_w - fit_w) / 2;
            let y = i64::from(target_h - fit_h) / 2;
            imageops::overlay(&mut padded, &fitted, x, y);
            padded
        }
        ResizeMode::Proportional => {
            let (fit_w, fit_h) = geometry::fit_dimensions(source, target);
            imageops::resize(image, fit_w, fit_h, RESAMPLE_FILTER)
        }
        ResizeMode::Crop => {
            let window = match crop {
                Some(spec) => spec.resolve(source, target)?,
                None => geometry::crop_window(source, target),
            };
            let view = imageops::crop_imm(image, window.x, window.y, window.width, window.height)
                .to_image();
            imageops::resize(&view, target_w, target_h, RESAMPLE_FILTER)
        }
    };

    Ok(out)
}
