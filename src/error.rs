//! Error type shared by the whole crate.

use std::path::PathBuf;

/// Errors raised while setting up or driving a glowfield application.
///
/// Frame-level misses (a restore lookup for an absent node, a raycast with no
/// intersection) are not errors and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No output surface was available at startup. This aborts initialization.
    #[error("output surface not found")]
    SurfaceNotFound,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("failed to parse configuration {path}: {message}")]
    ConfigParse {
        /// The offending file.
        path: PathBuf,
        /// The parser message.
        message: String,
    },

    /// A configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(String),

    /// Configuration files must be `.toml`.
    #[error("unsupported configuration format: {0}")]
    UnsupportedConfigFormat(PathBuf),

    /// Image encoding failed (screenshots).
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The window system refused to create the window or event loop.
    #[error("window error: {0}")]
    Window(String),

    /// The GPU adapter, device or surface could not be created.
    #[error("GPU error: {0}")]
    Gpu(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
