use thiserror::Error;

/// Recoverable failures surfaced by the core. None of them is fatal to the
/// frame loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Uploaded bytes could not be rasterized (unsupported format, corrupt
    /// data, zero dimensions). The current palette is left untouched.
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    /// The platform refused or failed to resume audio output.
    #[error("audio resume failed: {0}")]
    AudioResume(String),

    /// A model or environment asset could not be loaded.
    #[error("asset load failed: {0}")]
    AssetLoad(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}
