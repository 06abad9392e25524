//! Blend parameters and the parsers for each configuration answer.
//!
//! A [`BlendConfig`] is only obtainable through [`BlendConfigBuilder::build`],
//! which enforces every cross-field invariant against the two loaded images.
//! Once built it is never mutated.

use std::ops::Range;
use std::path::{Path, PathBuf};

use image::Rgb;

use crate::error::{Error, Result};
use crate::image_io::{self, ImageRole, SourceImage};

const INVALID_TRANSPARENCY_COLOR: &str = "The transparency color input is invalid.";
const WEIGHT_NOT_INTEGER: &str = "The transparency percentage isn't an integer number.";
const WEIGHT_OUT_OF_RANGE: &str = "The transparency percentage is out of range.";
const INVALID_POSITION_METHOD: &str = "The position method input is invalid.";
const INVALID_POSITION: &str = "The position input is invalid.";
const POSITION_OUT_OF_RANGE: &str = "The position input is out of range.";

/// Largest accepted blend weight.
pub const MAX_BLEND_WEIGHT: u8 = 100;

/// The answer to "single or grid", before a single placement has been chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMethod {
    /// One placement at a user-chosen origin.
    Single,
    /// Tile the watermark over the whole base image.
    Grid,
}

/// How the watermark is laid over the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMode {
    /// One placement with its top-left corner at `(x, y)`.
    Single {
        /// Horizontal offset of the placement origin.
        x: u32,
        /// Vertical offset of the placement origin.
        y: u32,
    },
    /// Tiled from the base image origin across the whole image.
    Grid,
}

/// Rectangular region of the base image where blending may happen.
///
/// Both ranges are half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectRange {
    /// Columns inside the region.
    pub x: Range<u32>,
    /// Rows inside the region.
    pub y: Range<u32>,
}

impl EffectRange {
    /// Derive the region for a placement mode.
    ///
    /// A single placement covers exactly the watermark footprint; a grid
    /// covers the whole base image.
    #[must_use]
    pub fn for_mode(mode: PositionMode, base: (u32, u32), watermark: (u32, u32)) -> Self {
        match mode {
            PositionMode::Single { x, y } => Self {
                x: x..x + watermark.0,
                y: y..y + watermark.1,
            },
            PositionMode::Grid => Self {
                x: 0..base.0,
                y: 0..base.1,
            },
        }
    }

    /// Whether `(x, y)` lies inside the region.
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.x.contains(&x) && self.y.contains(&y)
    }
}

/// Fully resolved, immutable blending parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendConfig {
    use_watermark_alpha: bool,
    transparency_color: Option<Rgb<u8>>,
    blend_weight: u8,
    position_mode: PositionMode,
    effect_range: EffectRange,
    output_path: PathBuf,
}

impl BlendConfig {
    /// Start building a configuration for this pair of images.
    #[must_use]
    pub fn builder(base: &SourceImage, watermark: &SourceImage) -> BlendConfigBuilder {
        BlendConfigBuilder::new(base, watermark)
    }

    /// Whether the watermark's alpha channel masks the blend.
    #[must_use]
    pub fn use_watermark_alpha(&self) -> bool {
        self.use_watermark_alpha
    }

    /// Whether a transparency color is keyed out of the watermark.
    #[must_use]
    pub fn use_transparency_color(&self) -> bool {
        self.transparency_color.is_some()
    }

    /// The keyed-out color, if any.
    #[must_use]
    pub fn transparency_color(&self) -> Option<Rgb<u8>> {
        self.transparency_color
    }

    /// Watermark share of each blended channel, `0..=100`.
    #[must_use]
    pub fn blend_weight(&self) -> u8 {
        self.blend_weight
    }

    /// Placement mode.
    #[must_use]
    pub fn position_mode(&self) -> PositionMode {
        self.position_mode
    }

    /// Region where blending may happen.
    #[must_use]
    pub fn effect_range(&self) -> &EffectRange {
        &self.effect_range
    }

    /// Where the output image is written.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Sequential builder for [`BlendConfig`].
///
/// Defaults: no alpha, no transparency color, weight 0, grid placement and an
/// empty output path.
#[derive(Debug, Clone)]
pub struct BlendConfigBuilder {
    base: (u32, u32),
    watermark: (u32, u32),
    watermark_has_alpha: bool,
    use_watermark_alpha: bool,
    transparency_color: Option<Rgb<u8>>,
    blend_weight: u8,
    position_mode: PositionMode,
    output_path: PathBuf,
}

impl BlendConfigBuilder {
    fn new(base: &SourceImage, watermark: &SourceImage) -> Self {
        Self {
            base: base.dimensions(),
            watermark: watermark.dimensions(),
            watermark_has_alpha: watermark.has_alpha(),
            use_watermark_alpha: false,
            transparency_color: None,
            blend_weight: 0,
            position_mode: PositionMode::Grid,
            output_path: PathBuf::new(),
        }
    }

    /// Mask the blend with the watermark's alpha channel.
    #[must_use]
    pub fn use_watermark_alpha(mut self, enabled: bool) -> Self {
        self.use_watermark_alpha = enabled;
        self
    }

    /// Key out one watermark color.
    #[must_use]
    pub fn transparency_color(mut self, color: Option<Rgb<u8>>) -> Self {
        self.transparency_color = color;
        self
    }

    /// Watermark share of each blended channel.
    #[must_use]
    pub fn blend_weight(mut self, weight: u8) -> Self {
        self.blend_weight = weight;
        self
    }

    /// Placement mode.
    #[must_use]
    pub fn position_mode(mut self, mode: PositionMode) -> Self {
        self.position_mode = mode;
        self
    }

    /// Output file path.
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Check every invariant and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if either image is empty, the watermark does not fit the base,
    /// alpha usage or color keying disagree with the watermark format, the
    /// weight exceeds 100, or a single placement falls outside the legal window.
    pub fn build(self) -> Result<BlendConfig> {
        image_io::check_not_empty(self.base.0, self.base.1, ImageRole::Base)?;
        image_io::check_not_empty(self.watermark.0, self.watermark.1, ImageRole::Watermark)?;
        if self.base.0 < self.watermark.0 || self.base.1 < self.watermark.1 {
            return Err(Error::validation("The watermark's dimensions are larger."));
        }
        if self.use_watermark_alpha && !self.watermark_has_alpha {
            return Err(Error::validation(
                "The watermark has no alpha channel to use.",
            ));
        }
        if self.transparency_color.is_some() && self.watermark_has_alpha {
            return Err(Error::validation(
                "A transparency color cannot be set on a watermark with an alpha channel.",
            ));
        }
        if self.blend_weight > MAX_BLEND_WEIGHT {
            return Err(Error::validation(WEIGHT_OUT_OF_RANGE));
        }
        if let PositionMode::Single { x, y } = self.position_mode {
            let (max_x, max_y) = position_window(self.base, self.watermark);
            if x > max_x || y > max_y {
                return Err(Error::validation(POSITION_OUT_OF_RANGE));
            }
        }

        let effect_range = EffectRange::for_mode(self.position_mode, self.base, self.watermark);
        Ok(BlendConfig {
            use_watermark_alpha: self.use_watermark_alpha,
            transparency_color: self.transparency_color,
            blend_weight: self.blend_weight,
            position_mode: self.position_mode,
            effect_range,
            output_path: self.output_path,
        })
    }
}

/// Largest legal placement origin `(max_x, max_y)` for a single placement.
#[must_use]
pub fn position_window(base: (u32, u32), watermark: (u32, u32)) -> (u32, u32) {
    (
        base.0.saturating_sub(watermark.0),
        base.1.saturating_sub(watermark.1),
    )
}

/// Same as [`position_window`] for loaded images, after checking they fit.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the watermark is larger than the base.
pub fn position_window_for(base: &SourceImage, watermark: &SourceImage) -> Result<(u32, u32)> {
    image_io::ensure_fits(base, watermark)?;
    Ok(position_window(base.dimensions(), watermark.dimensions()))
}

/// Interpret a yes/no answer. Only `yes` in any letter case counts as yes.
#[must_use]
pub fn parse_yes(answer: &str) -> bool {
    answer.to_uppercase() == "YES"
}

/// Parse `"R G B"` into a color.
///
/// # Errors
///
/// Any malformed or out-of-range input yields the same validation error.
pub fn parse_transparency_color(answer: &str) -> Result<Rgb<u8>> {
    let channels = answer
        .split(' ')
        .map(|token| token.parse::<i32>().ok().and_then(|v| u8::try_from(v).ok()))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| Error::validation(INVALID_TRANSPARENCY_COLOR))?;

    match channels.as_slice() {
        &[r, g, b] => Ok(Rgb([r, g, b])),
        _ => Err(Error::validation(INVALID_TRANSPARENCY_COLOR)),
    }
}

/// Parse the blend weight, an integer in `0..=100`.
///
/// # Errors
///
/// Non-integers and out-of-range integers produce distinct validation errors.
pub fn parse_blend_weight(answer: &str) -> Result<u8> {
    let weight = answer
        .parse::<i32>()
        .map_err(|_| Error::validation(WEIGHT_NOT_INTEGER))?;
    u8::try_from(weight)
        .ok()
        .filter(|w| *w <= MAX_BLEND_WEIGHT)
        .ok_or_else(|| Error::validation(WEIGHT_OUT_OF_RANGE))
}

/// Parse `single` or `grid`, ignoring letter case.
///
/// # Errors
///
/// Anything else is a validation error.
pub fn parse_position_method(answer: &str) -> Result<PositionMethod> {
    match answer.to_uppercase().as_str() {
        "SINGLE" => Ok(PositionMethod::Single),
        "GRID" => Ok(PositionMethod::Grid),
        _ => Err(Error::validation(INVALID_POSITION_METHOD)),
    }
}

/// Parse `"x y"` and check it against the inclusive window `(max_x, max_y)`.
///
/// # Errors
///
/// A malformed pair and an out-of-window pair produce distinct validation errors.
pub fn parse_position(answer: &str, window: (u32, u32)) -> Result<PositionMode> {
    let coords = answer
        .split(' ')
        .map(str::parse::<i32>)
        .collect::<std::result::Result<Vec<i32>, _>>()
        .map_err(|_| Error::validation(INVALID_POSITION))?;

    let &[x, y] = coords.as_slice() else {
        return Err(Error::validation(INVALID_POSITION));
    };

    let in_window = |v: i32, max: u32| u32::try_from(v).ok().filter(|v| *v <= max);
    match (in_window(x, window.0), in_window(y, window.1)) {
        (Some(x), Some(y)) => Ok(PositionMode::Single { x, y }),
        _ => Err(Error::validation(POSITION_OUT_OF_RANGE)),
    }
}

/// Whether the output name ends in `.jpg` or `.png`.
#[must_use]
pub fn has_expected_extension(name: &str) -> bool {
    name.ends_with(".jpg") || name.ends_with(".png")
}
