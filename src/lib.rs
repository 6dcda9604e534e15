//! # Pixsmith
//!
//! An image-manipulation toolkit: load an image, resize it under one of
//! four strategies, crop with named anchors, flip, rotate, overlay a
//! watermark, and write the result back out.
//!
//! JPEG, PNG, and GIF decode-encode and the resampling primitive are
//! delegated to the `image` crate. What this crate owns is the geometry —
//! every resize strategy computes its own target rectangles and crop
//! windows rather than calling a library "fit" shortcut — and a
//! self-contained BMP decoder covering bit depths 1/4/8/16/24.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`canvas`] | Session state: the live pixel buffer plus pending background/crop, and the load/transform/save façade |
//! | [`resize`] | The four resize strategies: stretch, pad (letterbox), proportional fit, crop-fill |
//! | [`geometry`] | Pure placement and extent math: anchor resolution, percent dimensions, fit and crop-window calculators |
//! | [`bmp`] | Hand-rolled BMP decoder: little-endian headers, color table, bottom-up padded scanlines |
//! | [`color`] | Background fill color, hex parsing included |
//! | [`error`] | `CanvasError`, the one error type every operation returns |
//!
//! # Design Decisions
//!
//! ## Owned Canvas Values, No Singleton
//!
//! A [`canvas::Canvas`] is a plain owned value mutated through `&mut`.
//! Call sites that work concurrently construct one per task; nothing in
//! the crate holds process-wide state, and independent BMP decodes can
//! run in parallel freely.
//!
//! ## Geometry Is Pure and Separately Tested
//!
//! All dimension math lives in [`geometry`] as functions over integers,
//! with no pixel buffers in sight. The resize engine is then a thin
//! dispatcher that feeds those results to the resampler, which keeps the
//! interesting arithmetic unit-testable without encoding a single image.
//!
//! ## BMP In-House, Everything Else Delegated
//!
//! The shipped `image` build enables exactly the codecs we route to it
//! (jpeg, png, gif). BMP's layout is simple enough — two fixed headers,
//! an optional palette, padded bottom-up scanlines — that owning the
//! decoder is cheaper than carrying another codec feature, and it keeps
//! the one bit-exact wire format this crate must honor under our tests.

pub mod bmp;
pub mod canvas;
pub mod color;
pub mod error;
pub mod geometry;
pub mod resize;

pub use canvas::{Canvas, Flip, Quality, Rotation};
pub use color::Background;
pub use error::{CanvasError, Result};
pub use geometry::{Anchor, Axis, CropSpec, Dimension, Placement};
pub use resize::{ResizeMode, ResizeRequest};
