//! See documentation for [`ObjectType`] and [`GeometryKind`].
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use geo_types::Geometry;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Kind of the geometric object a feature describes.
///
/// Each object type corresponds to the dimension of the feature geometry:
/// * [`ObjectType::Region`] - 2d (polygons)
/// * [`ObjectType::Transect`] - 1d (line strings)
/// * [`ObjectType::Point`] - 0d (points)
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// Polygon-like object.
    Region,
    /// Line-like object.
    Transect,
    /// Point-like object.
    Point,
}

impl ObjectType {
    /// Name of the object type as it is stored in the `object` property.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Region => "region",
            ObjectType::Transect => "transect",
            ObjectType::Point => "point",
        }
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" => Ok(ObjectType::Region),
            "transect" => Ok(ObjectType::Transect),
            "point" => Ok(ObjectType::Point),
            other => Err(GeometryError::Conversion(format!(
                "unknown object type {other}"
            ))),
        }
    }
}

/// GeoJSON geometry type of a shape.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash, Deserialize, Serialize)]
pub enum GeometryKind {
    /// `Point`
    Point,
    /// `MultiPoint`
    MultiPoint,
    /// `LineString`
    LineString,
    /// `MultiLineString`
    MultiLineString,
    /// `Polygon`
    Polygon,
    /// `MultiPolygon`
    MultiPolygon,
    /// `GeometryCollection`. Never valid as a feature geometry.
    GeometryCollection,
}

impl GeometryKind {
    /// Returns the kind of the given geometry. Lines, rectangles and triangles are reported as the GeoJSON types they
    /// are written as.
    pub fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::Line(_) | Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
                GeometryKind::Polygon
            }
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Name of the type as used in the GeoJSON `type` member.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }

    /// Object type a feature with this geometry must declare. Returns an error for geometry collections.
    pub fn object_type(&self) -> Result<ObjectType, GeometryError> {
        match self {
            GeometryKind::Polygon | GeometryKind::MultiPolygon => Ok(ObjectType::Region),
            GeometryKind::LineString | GeometryKind::MultiLineString => Ok(ObjectType::Transect),
            GeometryKind::Point | GeometryKind::MultiPoint => Ok(ObjectType::Point),
            GeometryKind::GeometryCollection => Err(GeometryError::UnsupportedGeometry(
                self.as_str().to_string(),
            )),
        }
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(GeometryKind::Point),
            "MultiPoint" => Ok(GeometryKind::MultiPoint),
            "LineString" => Ok(GeometryKind::LineString),
            "MultiLineString" => Ok(GeometryKind::MultiLineString),
            "Polygon" => Ok(GeometryKind::Polygon),
            "MultiPolygon" => Ok(GeometryKind::MultiPolygon),
            "GeometryCollection" => Ok(GeometryKind::GeometryCollection),
            other => Err(GeometryError::UnsupportedGeometry(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geo_types::{line_string, point, polygon};

    #[test]
    fn object_type_of_geometry() {
        let region: Geometry<f64> =
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        let transect: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        let point: Geometry<f64> = point!(x: 1.0, y: 2.0).into();

        assert_eq!(
            GeometryKind::of(&region).object_type().unwrap(),
            ObjectType::Region
        );
        assert_eq!(
            GeometryKind::of(&transect).object_type().unwrap(),
            ObjectType::Transect
        );
        assert_eq!(
            GeometryKind::of(&point).object_type().unwrap(),
            ObjectType::Point
        );
    }

    #[test]
    fn geometry_collection_has_no_object_type() {
        assert_matches!(
            GeometryKind::GeometryCollection.object_type(),
            Err(GeometryError::UnsupportedGeometry(name)) if name == "GeometryCollection"
        );
    }

    #[test]
    fn parse_names() {
        assert_eq!(
            "MultiLineString".parse::<GeometryKind>().unwrap(),
            GeometryKind::MultiLineString
        );
        assert_eq!("region".parse::<ObjectType>().unwrap(), ObjectType::Region);
        assert!("area".parse::<ObjectType>().is_err());
        assert!("Circle".parse::<GeometryKind>().is_err());
    }
}
