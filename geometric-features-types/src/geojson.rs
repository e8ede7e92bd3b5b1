//! Conversion of shapes to and from GeoJSON geometry objects.

use geo::MapCoords;
use geo_types::{Coord, Geometry};
use serde_json::{Map, Value};

use crate::error::GeometryError;
use crate::geometry_type::GeometryKind;
use crate::ops::normalize;

/// Number of decimal digits coordinates are rounded to when written.
pub const DEFAULT_DIGITS: u32 = 6;

/// Parses a GeoJSON geometry object (`{"type": ..., "coordinates": ...}`).
pub fn geometry_from_json(value: &Value) -> Result<Geometry<f64>, GeometryError> {
    let geometry = ::geojson::Geometry::from_json_value(value.clone())
        .map_err(|err| GeometryError::Conversion(err.to_string()))?;
    let geometry: Geometry<f64> = geometry
        .try_into()
        .map_err(|err: ::geojson::Error| GeometryError::Conversion(err.to_string()))?;
    normalize(geometry)
}

/// Rounds all coordinates of the shape to the given number of decimal digits.
pub fn round_coordinates(geometry: &Geometry<f64>, digits: u32) -> Geometry<f64> {
    let scale = 10f64.powi(digits as i32);
    geometry.map_coords(|coord| Coord {
        x: (coord.x * scale).round() / scale,
        y: (coord.y * scale).round() / scale,
    })
}

/// Writes the shape as a GeoJSON geometry object with `type` followed by `coordinates`. If `digits` is given, the
/// coordinates are rounded first.
///
/// Geometry collections cannot be stored as feature geometries and result in an error.
pub fn geometry_to_json(
    geometry: &Geometry<f64>,
    digits: Option<u32>,
) -> Result<Value, GeometryError> {
    let geometry = normalize(geometry.clone())?;
    let geometry = match digits {
        Some(digits) => round_coordinates(&geometry, digits),
        None => geometry,
    };

    let coordinates = match ::geojson::Value::from(&geometry) {
        ::geojson::Value::Point(position) => serde_json::to_value(position),
        ::geojson::Value::MultiPoint(positions) => serde_json::to_value(positions),
        ::geojson::Value::LineString(line) => serde_json::to_value(line),
        ::geojson::Value::MultiLineString(lines) => serde_json::to_value(lines),
        ::geojson::Value::Polygon(polygon) => serde_json::to_value(polygon),
        ::geojson::Value::MultiPolygon(polygons) => serde_json::to_value(polygons),
        ::geojson::Value::GeometryCollection(_) => {
            return Err(GeometryError::UnsupportedGeometry(
                GeometryKind::GeometryCollection.to_string(),
            ))
        }
    }
    .map_err(|err| GeometryError::Conversion(err.to_string()))?;

    let mut object = Map::new();
    object.insert(
        "type".to_string(),
        Value::String(GeometryKind::of(&geometry).to_string()),
    );
    object.insert("coordinates".to_string(), coordinates);
    Ok(Value::Object(object))
}
