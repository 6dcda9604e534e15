//! Mutable image session: load, transform, save.
//!
//! A [`Canvas`] owns the live pixel buffer plus the bits of pending state
//! the transforms consume (background color, crop window). It is
//! single-owner, mutable, and synchronous: callers that work concurrently
//! use one `Canvas` per task, never a shared instance. Width and height
//! are always read off the live buffer, so they cannot drift from it.
//!
//! Codec routing mirrors the backend split: JPEG/PNG/GIF go through the
//! `image` crate, BMP through our own [`bmp`](crate::bmp) decoder.

use crate::bmp;
use crate::color::Background;
use crate::error::{CanvasError, Result};
use crate::geometry::{CropSpec, Placement};
use crate::resize::{self, ResizeRequest};
use image::codecs::jpeg::JpegEncoder;
use image::imageops;
use image::{ImageFormat, ImageReader, RgbImage};
use std::io::BufWriter;
use std::path::Path;

/// Quality setting for lossy (JPEG) encoding, 1-100, clamped on
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Mirror axis for [`Canvas::flip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    Horizontal,
    Vertical,
}

/// Clockwise quarter-turn rotation for [`Canvas::rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    pub fn from_degrees(degrees: u32) -> Result<Self> {
        match degrees {
            90 => Ok(Rotation::Cw90),
            180 => Ok(Rotation::Cw180),
            270 => Ok(Rotation::Cw270),
            other => Err(CanvasError::Configuration(format!(
                "rotation must be 90, 180, or 270 degrees, got {other}"
            ))),
        }
    }
}

/// Image manipulation session state.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
    background: Background,
    crop: Option<CropSpec>,
}

impl Canvas {
    /// Load an image file. BMP is decoded by this crate; other formats go
    /// through the codec collaborator.
    pub fn open(path: &Path) -> Result<Self> {
        let is_bmp = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("bmp"));

        let image = if is_bmp {
            bmp::decode(&std::fs::read(path)?)?
        } else {
            ImageReader::open(path)?.decode()?.to_rgb8()
        };
        Ok(Self::from_image(image))
    }

    /// Decode from an in-memory byte stream, sniffing BMP by signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = if bytes.starts_with(b"BM") {
            bmp::decode(bytes)?
        } else {
            image::load_from_memory(bytes)?.to_rgb8()
        };
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self {
            image,
            background: Background::default(),
            crop: None,
        }
    }

    /// Allocate a blank canvas filled with the given background color.
    pub fn blank(width: u32, height: u32, background: Background) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidGeometry(format!(
                "blank canvas dimensions {width}x{height} must be positive"
            )));
        }
        Ok(Self {
            image: RgbImage::from_pixel(width, height, background.to_rgb()),
            background,
            crop: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Set the fill color used by pad borders and blank regions.
    pub fn set_background(&mut self, background: Background) -> &mut Self {
        self.background = background;
        self
    }

    /// Set the fill color from a hex string (`#rgb` or `#rrggbb`).
    pub fn set_background_hex(&mut self, hex: &str) -> Result<&mut Self> {
        self.background = Background::from_hex(hex)?;
        Ok(self)
    }

    /// Stage a crop window for the next crop-mode resize. Consumed by that
    /// resize; later resizes fall back to the automatic centered window.
    pub fn set_crop(&mut self, spec: CropSpec) -> &mut Self {
        self.crop = Some(spec);
        self
    }

    /// Execute a resize request, replacing the pixel buffer.
    pub fn resize(&mut self, request: &ResizeRequest) -> Result<&mut Self> {
        let crop = self.crop.take();
        self.image = resize::resize(&self.image, request, self.background, crop.as_ref())?;
        Ok(self)
    }

    /// Mirror the image along one axis.
    pub fn flip(&mut self, direction: Flip) -> &mut Self {
        self.image = match direction {
            Flip::Horizontal => imageops::flip_horizontal(&self.image),
            Flip::Vertical => imageops::flip_vertical(&self.image),
        };
        self
    }

    /// Rotate clockwise by a quarter turn multiple.
    pub fn rotate(&mut self, rotation: Rotation) -> &mut Self {
        self.image = match rotation {
            Rotation::Cw90 => imageops::rotate90(&self.image),
            Rotation::Cw180 => imageops::rotate180(&self.image),
            Rotation::Cw270 => imageops::rotate270(&self.image),
        };
        self
    }

    /// Overlay a watermark at the anchored or literal position. Anchors
    /// resolve against the canvas and watermark extents, so `right`/
    /// `bottom` sits flush with the edge and `center`/`center` is dead
    /// center; offsets may run past the edge and are clipped.
    pub fn watermark(&mut self, mark: &RgbImage, x: Placement, y: Placement) -> &mut Self {
        let x = x.resolve(self.width(), mark.width());
        let y = y.resolve(self.height(), mark.height());
        imageops::overlay(&mut self.image, mark, x, y);
        self
    }

    /// Write the buffer to disk, format chosen by the destination
    /// extension (jpg/jpeg, png, gif). `quality` applies to JPEG only.
    pub fn save(&self, path: &Path, quality: Quality) -> Result<()> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "jpg" | "jpeg" => {
                let file = std::fs::File::create(path)?;
                let writer = BufWriter::new(file);
                let encoder = JpegEncoder::new_with_quality(writer, quality.value());
                self.image.write_with_encoder(encoder)?;
                Ok(())
            }
            "png" => Ok(self.image.save_with_format(path, ImageFormat::Png)?),
            "gif" => Ok(self.image.save_with_format(path, ImageFormat::Gif)?),
            other => Err(CanvasError::Configuration(format!(
                "unsupported output format {other:?} (expected jpg, png, or gif)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Anchor, Dimension};
    use crate::resize::ResizeMode;
    use image::Rgb;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn blank_canvas_is_background_filled() {
        let canvas = Canvas::blank(4, 3, Background::new(1, 2, 3)).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (4, 3));
        assert_eq!(canvas.image().get_pixel(2, 1), &Rgb([1, 2, 3]));
    }

    #[test]
    fn blank_rejects_zero_dimensions() {
        assert!(matches!(
            Canvas::blank(0, 10, Background::default()),
            Err(CanvasError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn dimensions_track_the_buffer_through_resize() {
        let mut canvas = Canvas::from_image(RgbImage::from_pixel(100, 50, RED));
        canvas
            .resize(&ResizeRequest {
                width: Dimension::Px(60),
                height: Dimension::Px(60),
                mode: ResizeMode::Proportional,
            })
            .unwrap();
        // Proportional shrinks the buffer to the fitted rectangle; the
        // reported dimensions must follow the buffer.
        assert_eq!((canvas.width(), canvas.height()), (60, 30));
    }

    #[test]
    fn staged_crop_is_consumed_by_one_resize() {
        let src = RgbImage::from_fn(200, 100, |x, _| {
            if x < 100 { RED } else { Rgb([0, 0, 255]) }
        });
        let mut canvas = Canvas::from_image(src);
        canvas.set_crop(CropSpec {
            x: Placement::Anchor(Anchor::Start),
            y: Placement::Anchor(Anchor::Start),
            width: Some(50),
            height: Some(50),
        });
        let req = ResizeRequest {
            width: Dimension::Px(50),
            height: Dimension::Px(50),
            mode: ResizeMode::Crop,
        };
        canvas.resize(&req).unwrap();
        assert_eq!(canvas.image().get_pixel(45, 25), &RED);
        assert!(canvas.crop.is_none());
    }

    #[test]
    fn flip_horizontal_mirrors_columns() {
        let src = RgbImage::from_fn(2, 1, |x, _| if x == 0 { RED } else { Rgb([0, 0, 255]) });
        let mut canvas = Canvas::from_image(src);
        canvas.flip(Flip::Horizontal);
        assert_eq!(canvas.image().get_pixel(1, 0), &RED);
    }

    #[test]
    fn rotate_quarter_turn_swaps_dimensions() {
        let mut canvas = Canvas::from_image(RgbImage::new(4, 2));
        canvas.rotate(Rotation::Cw90);
        assert_eq!((canvas.width(), canvas.height()), (2, 4));
    }

    #[test]
    fn rotation_rejects_arbitrary_angles() {
        assert!(matches!(
            Rotation::from_degrees(45),
            Err(CanvasError::Configuration(_))
        ));
        assert!(Rotation::from_degrees(180).is_ok());
    }

    #[test]
    fn watermark_bottom_right_sits_flush() {
        let mut canvas = Canvas::blank(10, 10, Background::default()).unwrap();
        let mark = RgbImage::from_pixel(3, 3, RED);
        canvas.watermark(
            &mark,
            Placement::Anchor(Anchor::End),
            Placement::Anchor(Anchor::End),
        );
        assert_eq!(canvas.image().get_pixel(9, 9), &RED);
        assert_eq!(canvas.image().get_pixel(6, 6), &Rgb([255, 255, 255]));
        assert_eq!(canvas.image().get_pixel(7, 7), &RED);
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(200).value(), 100);
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn from_bytes_sniffs_bmp_signature() {
        // Minimal 1x1 24-bit BMP: headers + one padded scanline.
        let mut bmp = Vec::new();
        bmp.extend_from_slice(&0x4D42u16.to_le_bytes());
        bmp.extend_from_slice(&58u32.to_le_bytes()); // file size
        bmp.extend_from_slice(&0u32.to_le_bytes());
        bmp.extend_from_slice(&54u32.to_le_bytes()); // pixel offset
        bmp.extend_from_slice(&40u32.to_le_bytes());
        bmp.extend_from_slice(&1u32.to_le_bytes()); // width
        bmp.extend_from_slice(&1u32.to_le_bytes()); // height
        bmp.extend_from_slice(&1u16.to_le_bytes());
        bmp.extend_from_slice(&24u16.to_le_bytes());
        bmp.extend_from_slice(&[0u8; 24]); // compression .. colors important
        bmp.extend_from_slice(&[0, 0, 255, 0]); // BGR red + padding

        let canvas = Canvas::from_bytes(&bmp).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (1, 1));
        assert_eq!(canvas.image().get_pixel(0, 0), &RED);
    }
}
