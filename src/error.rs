//! Error type and result alias for the crate.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("couldn't load image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("window error: {0}")]
    Window(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("image has no pixels")]
    EmptyImage,
}

impl From<minifb::Error> for Error {
    fn from(value: minifb::Error) -> Self {
        Error::Window(value.to_string())
    }
}
