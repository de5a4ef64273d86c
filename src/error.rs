//! Error type shared by every palette operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The bytes could not be decoded as an image.
    #[error("unable to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The container was recognised but this build cannot decode it.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image contains no pixels")]
    EmptyImage,

    #[error("color count must be between 1 and 255, got {0}")]
    InvalidColorCount(usize),

    /// Fewer distinct pixel values than requested clusters.
    #[error("requested {requested} colors but the image only has {distinct} distinct colors")]
    TooFewColors { requested: usize, distinct: usize },

    #[error("invalid hex color {0:?}")]
    InvalidHex(String),

    #[error("PNG encode error: {0}")]
    Encode(#[source] image::ImageError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Short message suitable for showing next to the upload control.
    pub fn user_message(&self) -> String {
        match self {
            Error::Decode(_) | Error::UnsupportedFormat(_) => {
                "Could not read the image. Please upload a JPEG, PNG or AVIF file.".to_string()
            }
            Error::EmptyImage => "The image is empty.".to_string(),
            Error::TooFewColors { distinct, .. } => format!(
                "This image only has {distinct} distinct colors. Choose a smaller number of colors."
            ),
            other => other.to_string(),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(e) => Error::UnsupportedFormat(e.to_string()),
            other => Error::Decode(other),
        }
    }
}
