//! Image codec boundary: validated loading and 24-bit saving.

use std::io::Cursor;
use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Which of the two inputs an image plays. Used to word validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The image being watermarked.
    Base,
    /// The image laid over the base.
    Watermark,
}

impl ImageRole {
    /// Name used in user-facing messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ImageRole::Base => "image",
            ImageRole::Watermark => "watermark",
        }
    }
}

/// A decoded 8-bit RGB(A) image, read-only after loading.
///
/// Pixels are held as RGBA. Sources without an alpha channel are stored fully
/// opaque and report [`SourceImage::has_alpha`] as `false`.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
    has_alpha: bool,
}

impl SourceImage {
    /// Wrap an opaque 24-bit image.
    #[must_use]
    pub fn from_rgb(img: RgbImage) -> Self {
        Self {
            pixels: DynamicImage::ImageRgb8(img).into_rgba8(),
            has_alpha: false,
        }
    }

    /// Wrap a 32-bit image carrying an alpha channel.
    #[must_use]
    pub fn from_rgba(img: RgbaImage) -> Self {
        Self {
            pixels: img,
            has_alpha: true,
        }
    }

    /// Validate a decoded image and convert it to the internal layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the image does not have three color
    /// components, is not 24 or 32 bits per pixel, or has no pixels.
    pub fn from_dynamic(img: DynamicImage, role: ImageRole) -> Result<Self> {
        let color = img.color();
        check_layout(color, role)?;
        check_not_empty(img.width(), img.height(), role)?;
        let has_alpha = color.has_alpha();
        log::debug!(
            "{} layout {color:?}, {}x{}, alpha={has_alpha}",
            role.name(),
            img.width(),
            img.height()
        );
        Ok(Self {
            pixels: img.into_rgba8(),
            has_alpha,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Whether the source format carried an alpha channel.
    #[must_use]
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Pixel at `(x, y)`. Opaque sources always report alpha 255.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// RGB part of the pixel at `(x, y)`.
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> Rgb<u8> {
        let [r, g, b, _] = self.pixel(x, y).0;
        Rgb([r, g, b])
    }
}

pub(crate) fn check_not_empty(width: u32, height: u32, role: ImageRole) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::validation(format!("The {} is empty.", role.name())));
    }
    Ok(())
}

fn check_layout(color: ColorType, role: ImageRole) -> Result<()> {
    let alpha = u8::from(color.has_alpha());
    if color.channel_count() - alpha != 3 {
        return Err(Error::validation(format!(
            "The number of {} color components isn't 3.",
            role.name()
        )));
    }
    if !matches!(color.bits_per_pixel(), 24 | 32) {
        return Err(Error::validation(format!(
            "The {} isn't 24 or 32-bit.",
            role.name()
        )));
    }
    Ok(())
}

/// Load and validate an image file. The decoder is picked from the file content.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the file is missing or has an unsupported
/// layout, and [`Error::Image`] if it cannot be decoded.
pub fn load_image(path: &Path, role: ImageRole) -> Result<SourceImage> {
    if !path.exists() {
        return Err(Error::validation(format!(
            "The file {} doesn't exist.",
            path.display()
        )));
    }
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    log::info!("loaded {} from {}", role.name(), path.display());
    SourceImage::from_dynamic(img, role)
}

/// Fail unless the watermark is non-empty and fits inside the base image in both dimensions.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the watermark is empty, or wider or taller than the base.
pub fn ensure_fits(base: &SourceImage, watermark: &SourceImage) -> Result<()> {
    check_not_empty(watermark.width(), watermark.height(), ImageRole::Watermark)?;
    if base.width() < watermark.width() || base.height() < watermark.height() {
        return Err(Error::validation("The watermark's dimensions are larger."));
    }
    Ok(())
}

/// Save a 24-bit RGB image, picking the encoder from the path extension.
///
/// JPEG is written at quality 100. Paths with an extension the codec does not
/// recognize are still written, encoded as PNG. The image is encoded in memory
/// first, so a failed encode leaves no file behind.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).unwrap_or_else(|_| {
        log::debug!("unrecognized extension on {}, encoding as PNG", path.display());
        ImageFormat::Png
    });

    let mut encoded = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut encoded, 100);
            encoder.encode_image(img)?;
        }
        _ => {
            img.write_to(&mut Cursor::new(&mut encoded), format)?;
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &encoded)?;

    log::info!("saved {}x{} image to {}", img.width(), img.height(), path.display());
    Ok(())
}
