//! Geometry layer of the geometric features catalog.
//!
//! Feature shapes are stored as [`geo_types::Geometry`] in longitude/latitude degrees. This crate classifies them
//! ([`GeometryKind`], [`ObjectType`]), runs boolean operations on them ([`ops`]), splits them at the antimeridian
//! ([`antimeridian`]) or the prime meridian ([`prime_meridian`]) and converts them to and from GeoJSON ([`geojson`]).

pub mod antimeridian;
pub mod error;
pub mod geojson;
mod geometry_type;
pub mod ops;
pub mod prime_meridian;
pub mod projection;
pub mod subdivide;

pub use error::GeometryError;
pub use geometry_type::{GeometryKind, ObjectType};
