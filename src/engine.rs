//! Core blend engine: a resolved job, rendered and persisted.

use std::path::PathBuf;

use image::RgbImage;

use crate::blending;
use crate::config::BlendConfig;
use crate::error::Result;
use crate::image_io::{self, SourceImage};
use crate::input::ConfigInput;
use crate::resolver::ConfigResolver;

/// Both source images together with the configuration resolved for them.
///
/// Created by [`ConfigResolver::resolve`], or directly with [`BlendJob::new`]
/// when the configuration is built in code.
#[derive(Debug, Clone)]
pub struct BlendJob {
    base: SourceImage,
    watermark: SourceImage,
    config: BlendConfig,
}

impl BlendJob {
    /// Bundle two images with a configuration built for them.
    #[must_use]
    pub fn new(base: SourceImage, watermark: SourceImage, config: BlendConfig) -> Self {
        Self {
            base,
            watermark,
            config,
        }
    }

    /// The image being watermarked.
    #[must_use]
    pub fn base(&self) -> &SourceImage {
        &self.base
    }

    /// The watermark image.
    #[must_use]
    pub fn watermark(&self) -> &SourceImage {
        &self.watermark
    }

    /// The frozen blend parameters.
    #[must_use]
    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    /// Composite the watermark over the base image.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the watermark no longer fits the base.
    pub fn render(&self) -> Result<RgbImage> {
        blending::composite(&self.base, &self.watermark, &self.config)
    }

    /// Render and write the result to the configured output path.
    ///
    /// Nothing is written if rendering fails.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn run(&self) -> Result<PathBuf> {
        let output = self.render()?;
        let path = self.config.output_path().to_path_buf();
        image_io::save_image(&output, &path)?;
        Ok(path)
    }
}

/// Resolve a job from `input`, write the output image and confirm it on `input`.
///
/// # Errors
///
/// Returns the first error from resolution, rendering or saving.
pub fn run_interactive<I: ConfigInput>(input: I) -> Result<PathBuf> {
    let mut resolver = ConfigResolver::new(input);
    let job = resolver.resolve()?;
    let path = job.run()?;

    let mut input = resolver.into_inner();
    input.notify(&format!(
        "The watermarked image {} has been created.",
        path.display()
    ))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PositionMode;
    use image::Rgb;

    #[test]
    fn run_writes_configured_output() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("result.png");
        let base = SourceImage::from_rgb(RgbImage::from_pixel(3, 3, Rgb([0, 0, 0])));
        let wm = SourceImage::from_rgb(RgbImage::from_pixel(1, 1, Rgb([200, 100, 50])));
        let config = BlendConfig::builder(&base, &wm)
            .blend_weight(50)
            .position_mode(PositionMode::Single { x: 2, y: 0 })
            .output_path(&out_path)
            .build()
            .unwrap();

        let job = BlendJob::new(base, wm, config);
        assert_eq!(job.run().unwrap(), out_path);

        let written = image::open(&out_path).unwrap().to_rgb8();
        assert_eq!(*written.get_pixel(2, 0), Rgb([100, 50, 25]));
        assert_eq!(*written.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn mismatched_job_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("result.png");
        let small = SourceImage::from_rgb(RgbImage::new(2, 2));
        let big = SourceImage::from_rgb(RgbImage::new(3, 3));
        let config = BlendConfig::builder(&big, &small)
            .output_path(&out_path)
            .build()
            .unwrap();

        let job = BlendJob::new(small, big, config);
        assert!(job.run().is_err());
        assert!(!out_path.exists());
    }
}
