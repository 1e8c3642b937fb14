// src/error.rs
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing date-shaped in the recognized text; there are no columns to fill.
    #[error("no dates found in recognized text")]
    NoDates,

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template: {0}")]
    Template(String),

    #[error("text recognizer: {0}")]
    Recognizer(String),

    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),

    #[error("image: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
