//! Per-pixel compositing of a watermark onto a base image.
//!
//! Every output pixel is a pure function of its coordinates, the two source
//! images and the frozen [`BlendConfig`]:
//!
//! 1. a fully transparent watermark sample (when alpha is in use) keeps the base pixel,
//! 2. a watermark sample equal to the transparency color keeps the base pixel,
//! 3. a pixel outside the effect range keeps the base pixel,
//! 4. anything else is `blend(base, watermark, weight)`.

use image::{Rgb, RgbImage, Rgba};

use crate::config::{BlendConfig, PositionMode};
use crate::error::Result;
use crate::image_io::{self, SourceImage};

/// Linear interpolation of one channel with integer weight `w` in `0..=100`.
///
/// `((100 - w) * a + w * b) / 100`, truncating.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // a convex combination of two u8 values stays within u8
pub fn linear(a: u8, b: u8, w: u8) -> u8 {
    let w = u32::from(w.min(100));
    (((100 - w) * u32::from(a) + w * u32::from(b)) / 100) as u8
}

/// Blend two colors channel by channel. `w = 0` yields `a`, `w = 100` yields `b`.
#[must_use]
pub fn blend(a: Rgb<u8>, b: Rgb<u8>, w: u8) -> Rgb<u8> {
    Rgb([linear(a[0], b[0], w), linear(a[1], b[1], w), linear(a[2], b[2], w)])
}

/// Watermark coordinate sampled for base pixel `(x, y)`.
///
/// Single placement uses a non-negative modulus of the offset from the origin,
/// so positions left of or above the origin wrap around as well.
#[must_use]
pub fn sample_position(
    x: u32,
    y: u32,
    mode: PositionMode,
    wm_width: u32,
    wm_height: u32,
) -> (u32, u32) {
    match mode {
        PositionMode::Single { x: pos_x, y: pos_y } => (
            wrap(i64::from(x) - i64::from(pos_x), wm_width),
            wrap(i64::from(y) - i64::from(pos_y), wm_height),
        ),
        PositionMode::Grid => (x % wm_width, y % wm_height),
    }
}

/// Non-negative remainder of `offset` by `size`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wrap(offset: i64, size: u32) -> u32 {
    offset.rem_euclid(i64::from(size)) as u32
}

/// Watermark color at the sampled coordinate. Alpha reads as 255 unless the
/// configuration uses the watermark's alpha channel.
fn watermark_sample(watermark: &SourceImage, x: u32, y: u32, config: &BlendConfig) -> Rgba<u8> {
    let (wx, wy) = sample_position(
        x,
        y,
        config.position_mode(),
        watermark.width(),
        watermark.height(),
    );
    let mut sample = watermark.pixel(wx, wy);
    if !config.use_watermark_alpha() {
        sample[3] = u8::MAX;
    }
    sample
}

/// Output color for one base pixel.
#[must_use]
pub fn composite_pixel(
    base: &SourceImage,
    watermark: &SourceImage,
    config: &BlendConfig,
    x: u32,
    y: u32,
) -> Rgb<u8> {
    let base_color = base.rgb(x, y);
    let sample = watermark_sample(watermark, x, y, config);
    let [r, g, b, alpha] = sample.0;
    let wm_color = Rgb([r, g, b]);

    if config.use_watermark_alpha() && alpha == 0 {
        return base_color;
    }
    if config.transparency_color() == Some(wm_color) {
        return base_color;
    }
    if !config.effect_range().contains(x, y) {
        return base_color;
    }
    blend(base_color, wm_color, config.blend_weight())
}

fn composite_row(
    base: &SourceImage,
    watermark: &SourceImage,
    config: &BlendConfig,
    y: u32,
    row: &mut [u8],
) {
    for (x, px) in (0..base.width()).zip(row.chunks_exact_mut(3)) {
        px.copy_from_slice(&composite_pixel(base, watermark, config, x, y).0);
    }
}

/// Composite the watermark over the whole base image, producing a 24-bit output.
///
/// Rows are computed in parallel when the `parallel` feature is enabled; the
/// result is the same either way.
///
/// # Errors
///
/// Returns a validation error if the watermark is larger than the base.
pub fn composite(
    base: &SourceImage,
    watermark: &SourceImage,
    config: &BlendConfig,
) -> Result<RgbImage> {
    image_io::ensure_fits(base, watermark)?;

    let (width, height) = base.dimensions();
    let mut output = RgbImage::new(width, height);
    if width == 0 || height == 0 {
        return Ok(output);
    }
    let stride = width as usize * 3;

    log::debug!(
        "compositing {width}x{height} base with {}x{} watermark, mode={:?}, weight={}",
        watermark.width(),
        watermark.height(),
        config.position_mode(),
        config.blend_weight()
    );

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_exact_mut(stride)
            .zip(0..height)
            .for_each(|(row, y)| composite_row(base, watermark, config, y, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (row, y) in output.chunks_exact_mut(stride).zip(0..height) {
            composite_row(base, watermark, config, y, row);
        }
    }

    Ok(output)
}
