//! Error types for the watermark-blend crate.

/// Errors that can occur while resolving a blend configuration or producing the output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input failed validation. The message is meant to be shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    /// An I/O error occurred while reading answers or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image codec failed to decode or encode an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Build a [`Error::Validation`] from any message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_displays_bare_message() {
        let err = Error::validation("The position method input is invalid.");
        assert_eq!(err.to_string(), "The position method input is invalid.");
    }

    #[test]
    fn io_error_display_includes_source() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));
    }
}
