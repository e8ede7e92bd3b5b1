//! Tools for curating a catalog of named geographic features: regions, transects and points stored as GeoJSON.
//!
//! The main type of the crate is [`FeatureCollection`], an ordered set of uniquely named [`Feature`]s with operations
//! to merge, combine, mask and fix collections. Catalog features are read from a local cache with
//! [`GeometricFeatures`].
//!
//! ```no_run
//! use geometric_features::{read_feature_collection, FeatureCollection, WriteOptions};
//!
//! let mut collection = FeatureCollection::new();
//! collection.merge(&read_feature_collection("north.geojson")?);
//! collection.merge(&read_feature_collection("south.geojson")?);
//!
//! let combined = collection.combine("North and South")?;
//! combined.to_geojson("combined.geojson", &WriteOptions::default())?;
//! # Ok::<(), geometric_features::error::FeatureError>(())
//! ```

pub mod cache;
pub mod catalog;
pub mod collection;
pub mod error;
pub mod feature;
pub mod provenance;

pub use cache::{DirectorySource, FeatureSource, GeometricFeatures};
pub use catalog::Catalog;
pub use collection::{read_feature_collection, FeatureCollection, WriteOptions};
pub use feature::{Feature, Tags};
pub use geometric_features_types as types;
