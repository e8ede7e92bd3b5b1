//! Splitting of shapes that cross the 0° meridian.
//!
//! The western part of a split shape is moved by 360° to the east, so the result lies in the `[0, 360]` longitude
//! range. Shapes must not cross the antimeridian; split them with [`crate::antimeridian`] first.

use geo::{Intersects, Translate};
use geo_types::{line_string, polygon, Geometry};

use crate::error::GeometryError;
use crate::geometry_type::GeometryKind;
use crate::ops;

/// Splits the shape at the prime meridian and shifts the western part by 360° of longitude.
///
/// Returns `Ok(None)` if the shape does not touch the prime meridian or is a point shape, in which case it should be
/// used as it is.
pub fn split_at_prime_meridian(
    geometry: &Geometry<f64>,
) -> Result<Option<Geometry<f64>>, GeometryError> {
    let kind = GeometryKind::of(geometry);
    if matches!(kind, GeometryKind::Point | GeometryKind::MultiPoint) {
        return Ok(None);
    }

    let meridian: Geometry<f64> = line_string![(x: 0.0, y: -90.0), (x: 0.0, y: 90.0)].into();
    if !geometry.intersects(&meridian) {
        return Ok(None);
    }

    let east_mask: Geometry<f64> = polygon![
        (x: 0.0, y: -90.0),
        (x: 180.0, y: -90.0),
        (x: 180.0, y: 90.0),
        (x: 0.0, y: 90.0),
        (x: 0.0, y: -90.0),
    ]
    .into();
    let west_mask: Geometry<f64> = polygon![
        (x: -180.0, y: -90.0),
        (x: 0.0, y: -90.0),
        (x: 0.0, y: 90.0),
        (x: -180.0, y: 90.0),
        (x: -180.0, y: -90.0),
    ]
    .into();

    let west = ops::difference(geometry, &east_mask)?.translate(360.0, 0.0);
    let east = ops::difference(geometry, &west_mask)?;

    ops::join([&west, &east], kind).map(Some)
}
