//! Question-by-question resolution of a [`BlendJob`].

use std::path::Path;

use crate::config::{self, BlendConfig, PositionMethod, PositionMode};
use crate::engine::BlendJob;
use crate::error::Result;
use crate::image_io::{self, ImageRole, SourceImage};
use crate::input::ConfigInput;

const PROMPT_IMAGE: &str = "Input the image filename:";
const PROMPT_WATERMARK: &str = "Input the watermark image filename:";
const PROMPT_USE_ALPHA: &str = "Do you want to use the watermark's Alpha channel?";
const PROMPT_SET_COLOR: &str = "Do you want to set a transparency color?";
const PROMPT_COLOR: &str = "Input a transparency color ([Red] [Green] [Blue]):";
const PROMPT_WEIGHT: &str = "Input the watermark transparency percentage (Integer 0-100):";
const PROMPT_METHOD: &str = "Choose the position method (single, grid):";
const PROMPT_OUTPUT: &str = "Input the output image filename (jpg or png extension):";
const EXTENSION_WARNING: &str = "The output file extension isn't \"jpg\" or \"png\".";

/// Asks each configuration question in dependency order and stops at the first invalid answer.
pub struct ConfigResolver<I> {
    input: I,
}

impl<I: ConfigInput> ConfigResolver<I> {
    /// Resolve answers from `input`.
    pub fn new(input: I) -> Self {
        Self { input }
    }

    /// Give back the input, e.g. to inspect a scripted session.
    pub fn into_inner(self) -> I {
        self.input
    }

    /// Load both images and resolve every blend parameter.
    ///
    /// # Errors
    ///
    /// Returns the first validation, decode or input error encountered. No
    /// further questions are asked after an error.
    pub fn resolve(&mut self) -> Result<BlendJob> {
        let base = self.load(PROMPT_IMAGE, ImageRole::Base)?;
        let watermark = self.load(PROMPT_WATERMARK, ImageRole::Watermark)?;
        let window = config::position_window_for(&base, &watermark)?;

        let (use_alpha, wants_color) = if watermark.has_alpha() {
            (config::parse_yes(&self.input.ask(PROMPT_USE_ALPHA)?), false)
        } else {
            (false, config::parse_yes(&self.input.ask(PROMPT_SET_COLOR)?))
        };

        let transparency_color = if wants_color {
            Some(config::parse_transparency_color(&self.input.ask(PROMPT_COLOR)?)?)
        } else {
            None
        };

        let weight = config::parse_blend_weight(&self.input.ask(PROMPT_WEIGHT)?)?;

        let mode = match config::parse_position_method(&self.input.ask(PROMPT_METHOD)?)? {
            PositionMethod::Single => {
                let prompt = format!(
                    "Input the watermark position ([x 0-{}] [y 0-{}]):",
                    window.0, window.1
                );
                config::parse_position(&self.input.ask(&prompt)?, window)?
            }
            PositionMethod::Grid => PositionMode::Grid,
        };

        let output = self.input.ask(PROMPT_OUTPUT)?;
        if !config::has_expected_extension(&output) {
            log::debug!("output path {output:?} has neither a .jpg nor a .png extension");
            self.input.notify(EXTENSION_WARNING)?;
        }

        let config = BlendConfig::builder(&base, &watermark)
            .use_watermark_alpha(use_alpha)
            .transparency_color(transparency_color)
            .blend_weight(weight)
            .position_mode(mode)
            .output_path(output)
            .build()?;
        log::debug!("resolved {config:?}");

        Ok(BlendJob::new(base, watermark, config))
    }

    fn load(&mut self, prompt: &str, role: ImageRole) -> Result<SourceImage> {
        let path = self.input.ask(prompt)?;
        image_io::load_image(Path::new(&path), role)
    }
}
