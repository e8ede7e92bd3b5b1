//! Error types used by the crate.

use geometric_features_types::GeometryError;
use thiserror::Error;

/// Geometric features error type.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A required key is absent from a feature read from GeoJSON.
    #[error("Feature {feature} missing {path} key")]
    MissingKey {
        /// Name of the feature, or `unknown` if the name itself is missing.
        feature: String,
        /// Path of the missing key, e.g. `[properties][component]`.
        path: String,
    },
    /// The declared `object` type does not correspond to the geometry type.
    #[error("Object type {object} and geometry type {geometry} are incompatible")]
    TypeMismatch {
        /// Declared object type.
        object: String,
        /// GeoJSON geometry type.
        geometry: String,
    },
    /// The document is not a feature collection.
    #[error("invalid feature collection: {0}")]
    InvalidCollection(String),
    /// Union of the features cannot be stored as a single feature.
    #[error(
        "combined geometry is of unsupported type {geometry_type}. Most likely cause is that multiple feature types \
         (regions, points and transects) are being combined."
    )]
    Combine {
        /// Geometry type the union resulted in.
        geometry_type: String,
    },
    /// The operation needs at least one feature.
    #[error("cannot {0} an empty feature collection")]
    EmptyCollection(&'static str),
    /// Catalog or cache lookup failed.
    #[error("{0}")]
    Lookup(String),
    /// Geometry error.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Error parsing or writing JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Error reading/writing data to the FS.
    #[error("failed to access file: {0}")]
    FsIo(#[from] std::io::Error),
}
