//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
    /// The geometry type is not one of the supported feature geometry types.
    #[error("unsupported geometry type {0}")]
    UnsupportedGeometry(String),
}
