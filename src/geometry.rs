//! Pure calculation functions for placement and resize geometry.
//!
//! Everything here is arithmetic over extents — no pixels, no I/O — so the
//! whole module is unit testable in isolation. The resize engine
//! ([`resize`](crate::resize)) combines these results with the resampler.

use crate::error::{CanvasError, Result};

/// Which image axis a placement token applies to. The horizontal axis
/// accepts `left`/`center`/`right`, the vertical axis `top`/`center`/
/// `bottom`; the caller combines one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Named relative placement along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `left` / `top`: offset 0.
    Start,
    /// Centered within the source extent.
    Center,
    /// `right` / `bottom`: flush against the far edge.
    End,
}

/// One coordinate of a placement: either a named anchor resolved at use
/// time, or a literal pixel offset passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Anchor(Anchor),
    Offset(i64),
}

impl Placement {
    /// Parse a placement token for the given axis. Named tokens are
    /// axis-specific; any numeric literal is a manual offset. Unknown
    /// non-numeric tokens are a configuration error.
    pub fn parse(token: &str, axis: Axis) -> Result<Self> {
        let named = match (token, axis) {
            ("left", Axis::Horizontal) | ("top", Axis::Vertical) => Some(Anchor::Start),
            ("center", _) => Some(Anchor::Center),
            ("right", Axis::Horizontal) | ("bottom", Axis::Vertical) => Some(Anchor::End),
            _ => None,
        };
        if let Some(anchor) = named {
            return Ok(Placement::Anchor(anchor));
        }
        token
            .parse::<i64>()
            .map(Placement::Offset)
            .map_err(|_| {
                CanvasError::Configuration(format!(
                    "unrecognized {} placement token {token:?}",
                    match axis {
                        Axis::Horizontal => "horizontal",
                        Axis::Vertical => "vertical",
                    }
                ))
            })
    }

    /// Resolve to an absolute offset: where content of `content_extent`
    /// pixels lands within `source_extent` pixels. Literal offsets pass
    /// through unchanged; `End` may go negative when the content is larger
    /// than the source.
    pub fn resolve(self, source_extent: u32, content_extent: u32) -> i64 {
        let source = i64::from(source_extent);
        let content = i64::from(content_extent);
        match self {
            Placement::Anchor(Anchor::Start) => 0,
            Placement::Anchor(Anchor::Center) => (source - content) / 2,
            Placement::Anchor(Anchor::End) => source - content,
            Placement::Offset(n) => n,
        }
    }
}

/// A target dimension, either absolute pixels or a percentage of the
/// current dimension. Zero pixels means "derive from the other axis".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Px(u32),
    Percent(f64),
}

impl Dimension {
    /// Parse `"640"` or `"50%"`.
    pub fn parse(s: &str) -> Result<Self> {
        let parsed = match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok().map(Dimension::Percent),
            None => s.parse::<u32>().ok().map(Dimension::Px),
        };
        parsed.ok_or_else(|| {
            CanvasError::Configuration(format!(
                "dimension must be a pixel count or percentage, got {s:?}"
            ))
        })
    }

    /// Resolve against the current dimension. Percentages round to the
    /// nearest pixel.
    pub fn resolve(self, current: u32) -> u32 {
        match self {
            Dimension::Px(px) => px,
            Dimension::Percent(pct) => (f64::from(current) * pct / 100.0).round() as u32,
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Px(0)
    }
}

/// Resolve a requested (width, height) pair against the source dimensions.
///
/// Percentages resolve first. If exactly one dimension then resolves to
/// zero it is derived to preserve the source aspect ratio; if both are
/// zero the request is rejected.
pub fn resolve_target(
    source: (u32, u32),
    width: Dimension,
    height: Dimension,
) -> Result<(u32, u32)> {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return Err(CanvasError::InvalidGeometry(format!(
            "source dimensions {src_w}x{src_h} are degenerate"
        )));
    }

    let w = width.resolve(src_w);
    let h = height.resolve(src_h);

    match (w, h) {
        (0, 0) => Err(CanvasError::InvalidGeometry(
            "target width and height both resolve to zero".to_string(),
        )),
        (0, h) => {
            let w = (f64::from(src_w) / (f64::from(src_h) / f64::from(h))).round() as u32;
            Ok((w.max(1), h))
        }
        (w, 0) => {
            let h = (f64::from(src_h) / (f64::from(src_w) / f64::from(w))).round() as u32;
            Ok((w, h.max(1)))
        }
        (w, h) => Ok((w, h)),
    }
}

/// Calculate the largest dimensions that fit inside a target area while
/// preserving the source aspect ratio.
///
/// The shrink factor is the larger of the two per-axis ratios, so at
/// least one output dimension matches the target and neither exceeds it.
/// Fractional results round to nearest, never below 1.
pub fn fit_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = (f64::from(source.0), f64::from(source.1));
    let (tgt_w, tgt_h) = (f64::from(target.0), f64::from(target.1));

    let factor = (src_w / tgt_w).max(src_h / tgt_h);

    let w = (src_w / factor).round() as u32;
    let h = (src_h / factor).round() as u32;
    (w.max(1), h.max(1))
}

/// Axis-aligned window of the source, in source-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the source window for an aspect-preserving crop-fill.
///
/// The window has the target's aspect ratio and is as large as the source
/// allows, centered on the axis with excess; resampling it into the
/// target fills it completely with no letterbox, cropping only the
/// overflow on one axis.
pub fn crop_window(source: (u32, u32), target: (u32, u32)) -> Window {
    let (src_w, src_h) = (f64::from(source.0), f64::from(source.1));
    let (tgt_w, tgt_h) = (f64::from(target.0), f64::from(target.1));

    // The smaller ratio is the axis that fits entirely; the other axis
    // gets cropped.
    let ratio = (src_w / tgt_w).min(src_h / tgt_h);

    let width = ((tgt_w * ratio).round() as u32).clamp(1, source.0);
    let height = ((tgt_h * ratio).round() as u32).clamp(1, source.1);

    Window {
        x: (source.0 - width) / 2,
        y: (source.1 - height) / 2,
        width,
        height,
    }
}

/// Caller-supplied crop window: anchored or literal position, with the
/// extents defaulting to the full source dimensions when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSpec {
    pub x: Placement,
    pub y: Placement,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl CropSpec {
    /// Resolve against the source and target extents into a concrete
    /// window, clamped to the source bounds. Anchors position a
    /// target-sized region (e.g. `right` puts the window flush with the
    /// source's right edge).
    pub fn resolve(&self, source: (u32, u32), target: (u32, u32)) -> Result<Window> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err(CanvasError::InvalidGeometry(
                "crop window has a zero extent".to_string(),
            ));
        }

        let x = self.x.resolve(source.0, target.0).clamp(0, i64::from(source.0) - 1) as u32;
        let y = self.y.resolve(source.1, target.1).clamp(0, i64::from(source.1) - 1) as u32;

        let width = self.width.unwrap_or(source.0).min(source.0 - x);
        let height = self.height.unwrap_or(source.1).min(source.1 - y);

        Ok(Window {
            x,
            y,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Placement tests
    // =========================================================================

    #[test]
    fn center_splits_the_slack() {
        let p = Placement::Anchor(Anchor::Center);
        assert_eq!(p.resolve(100, 40), 30);
    }

    #[test]
    fn end_is_flush_with_far_edge() {
        let p = Placement::Anchor(Anchor::End);
        assert_eq!(p.resolve(100, 40), 60);
    }

    #[test]
    fn start_is_zero() {
        let p = Placement::Anchor(Anchor::Start);
        assert_eq!(p.resolve(100, 40), 0);
    }

    #[test]
    fn end_goes_negative_for_oversized_content() {
        let p = Placement::Anchor(Anchor::End);
        assert_eq!(p.resolve(40, 100), -60);
    }

    #[test]
    fn literal_offset_passes_through() {
        assert_eq!(Placement::Offset(17).resolve(100, 40), 17);
        assert_eq!(Placement::Offset(-5).resolve(100, 40), -5);
    }

    #[test]
    fn parse_named_tokens_per_axis() {
        assert_eq!(
            Placement::parse("left", Axis::Horizontal).unwrap(),
            Placement::Anchor(Anchor::Start)
        );
        assert_eq!(
            Placement::parse("bottom", Axis::Vertical).unwrap(),
            Placement::Anchor(Anchor::End)
        );
        assert_eq!(
            Placement::parse("center", Axis::Vertical).unwrap(),
            Placement::Anchor(Anchor::Center)
        );
    }

    #[test]
    fn parse_rejects_token_from_wrong_axis() {
        assert!(Placement::parse("top", Axis::Horizontal).is_err());
        assert!(Placement::parse("right", Axis::Vertical).is_err());
    }

    #[test]
    fn parse_numeric_literal_as_offset() {
        assert_eq!(
            Placement::parse("42", Axis::Horizontal).unwrap(),
            Placement::Offset(42)
        );
        assert_eq!(
            Placement::parse("-10", Axis::Vertical).unwrap(),
            Placement::Offset(-10)
        );
    }

    #[test]
    fn parse_unknown_token_is_configuration_error() {
        let err = Placement::parse("middle", Axis::Horizontal).unwrap_err();
        assert!(matches!(err, CanvasError::Configuration(_)));
    }

    // =========================================================================
    // Dimension tests
    // =========================================================================

    #[test]
    fn percent_resolves_against_current_dimension() {
        // "50%" of 200 → 100, before any strategy dispatch.
        let d = Dimension::parse("50%").unwrap();
        assert_eq!(d.resolve(200), 100);
    }

    #[test]
    fn pixels_resolve_to_themselves() {
        assert_eq!(Dimension::parse("640").unwrap().resolve(200), 640);
    }

    #[test]
    fn fractional_percent_rounds() {
        assert_eq!(Dimension::Percent(33.0).resolve(100), 33);
        assert_eq!(Dimension::Percent(0.4).resolve(100), 0);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Dimension::parse("wide").is_err());
        assert!(Dimension::parse("%").is_err());
    }

    // =========================================================================
    // resolve_target tests
    // =========================================================================

    #[test]
    fn both_zero_is_rejected() {
        let err = resolve_target((200, 100), Dimension::Px(0), Dimension::Px(0)).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidGeometry(_)));
    }

    #[test]
    fn missing_height_derived_from_aspect() {
        // 200x100 at width 50 → height 25.
        let dims = resolve_target((200, 100), Dimension::Px(50), Dimension::Px(0)).unwrap();
        assert_eq!(dims, (50, 25));
    }

    #[test]
    fn missing_width_derived_from_aspect() {
        let dims = resolve_target((200, 100), Dimension::Px(0), Dimension::Px(50)).unwrap();
        assert_eq!(dims, (100, 50));
    }

    #[test]
    fn percent_resolves_before_derivation() {
        // Width "50%" of 200 → 100; height derived → 50.
        let dims =
            resolve_target((200, 100), Dimension::Percent(50.0), Dimension::Px(0)).unwrap();
        assert_eq!(dims, (100, 50));
    }

    #[test]
    fn derived_dimension_never_drops_below_one() {
        // Extreme aspect: 1000x2 at width 1 would derive height 0.002.
        let dims = resolve_target((1000, 2), Dimension::Px(1), Dimension::Px(0)).unwrap();
        assert_eq!(dims, (1, 1));
    }

    // =========================================================================
    // fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_height_bound_shrink() {
        // 2:1 source into a square: width is the constraint.
        assert_eq!(fit_dimensions((100, 50), (60, 60)), (60, 30));
    }

    #[test]
    fn fit_width_bound_shrink() {
        assert_eq!(fit_dimensions((50, 100), (60, 60)), (30, 60));
    }

    #[test]
    fn fit_same_aspect_is_exact() {
        assert_eq!(fit_dimensions((800, 600), (400, 300)), (400, 300));
    }

    #[test]
    fn fit_never_returns_zero() {
        assert_eq!(fit_dimensions((1000, 1), (10, 10)), (10, 1));
    }

    // =========================================================================
    // crop_window tests
    // =========================================================================

    #[test]
    fn crop_window_centers_on_wider_axis() {
        // 200x100 into 50x50: height ratio (2) wins, window is the full
        // height and horizontally centered.
        let win = crop_window((200, 100), (50, 50));
        assert_eq!(
            win,
            Window {
                x: 50,
                y: 0,
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn crop_window_centers_on_taller_axis() {
        let win = crop_window((100, 200), (50, 50));
        assert_eq!(
            win,
            Window {
                x: 0,
                y: 50,
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn crop_window_same_aspect_is_full_source() {
        let win = crop_window((200, 100), (100, 50));
        assert_eq!(
            win,
            Window {
                x: 0,
                y: 0,
                width: 200,
                height: 100
            }
        );
    }

    // =========================================================================
    // CropSpec tests
    // =========================================================================

    #[test]
    fn anchored_spec_positions_target_sized_window() {
        // "right"/"top" on 200x100 with a 50x50 target: flush right, and
        // the default full-source extents clamp down to what remains.
        let spec = CropSpec {
            x: Placement::Anchor(Anchor::End),
            y: Placement::Anchor(Anchor::Start),
            width: None,
            height: None,
        };
        let win = spec.resolve((200, 100), (50, 50)).unwrap();
        assert_eq!(
            win,
            Window {
                x: 150,
                y: 0,
                width: 50,
                height: 100
            }
        );
    }

    #[test]
    fn literal_spec_clamps_to_source_bounds() {
        let spec = CropSpec {
            x: Placement::Offset(180),
            y: Placement::Offset(-20),
            width: Some(100),
            height: Some(30),
        };
        let win = spec.resolve((200, 100), (50, 50)).unwrap();
        assert_eq!(
            win,
            Window {
                x: 180,
                y: 0,
                width: 20,
                height: 30
            }
        );
    }

    #[test]
    fn zero_extent_spec_is_invalid() {
        let spec = CropSpec {
            x: Placement::Offset(0),
            y: Placement::Offset(0),
            width: Some(0),
            height: Some(10),
        };
        let err = spec.resolve((200, 100), (50, 50)).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidGeometry(_)));
    }
}
