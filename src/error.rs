use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by the strict layout entry points.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// An image reported a zero, negative or non-finite intrinsic size.
    #[error("image {id:?} has invalid dimensions {width}x{height}")]
    InvalidImage { id: String, width: f64, height: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
