//! Blend a watermark image onto a base image.
//!
//! Each output pixel is either the base pixel or a linear blend of base and
//! watermark colors, weighted by an integer percentage. The watermark can be
//! masked by its own alpha channel or by a single transparency color, and can
//! be placed once or tiled across the whole image.
//!
//! # Quick Start
//!
//! ```no_run
//! use watermark_blend::{BlendConfig, BlendJob, ImageRole, PositionMode, load_image};
//! use std::path::Path;
//!
//! let base = load_image(Path::new("photo.png"), ImageRole::Base).unwrap();
//! let watermark = load_image(Path::new("logo.png"), ImageRole::Watermark).unwrap();
//! let config = BlendConfig::builder(&base, &watermark)
//!     .use_watermark_alpha(watermark.has_alpha())
//!     .blend_weight(40)
//!     .position_mode(PositionMode::Single { x: 10, y: 10 })
//!     .output_path("marked.png")
//!     .build()
//!     .unwrap();
//! BlendJob::new(base, watermark, config).run().unwrap();
//! ```
//!
//! # Interactive resolution
//!
//! [`ConfigResolver`] asks the configuration questions one by one over any
//! [`ConfigInput`] and fails on the first invalid answer.
//!
//! ```no_run
//! use watermark_blend::{run_interactive, LineInput};
//!
//! match run_interactive(LineInput::stdio()) {
//!     Ok(_) => {}
//!     Err(e) => println!("{e}"),
//! }
//! ```

#![deny(missing_docs)]

pub mod blending;
pub mod config;
mod engine;
pub mod error;
pub mod image_io;
pub mod input;
mod resolver;

pub use config::{BlendConfig, BlendConfigBuilder, EffectRange, PositionMethod, PositionMode};
pub use engine::{run_interactive, BlendJob};
pub use error::{Error, Result};
pub use image_io::{load_image, save_image, ImageRole, SourceImage};
pub use input::{ConfigInput, LineInput, ScriptedInput};
pub use resolver::ConfigResolver;
