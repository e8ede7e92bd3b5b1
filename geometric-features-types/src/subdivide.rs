//! Subdivision of long segments of lines and polygon rings.

use geo_types::{Coord, Geometry, LineString, MultiLineString, MultiPolygon, Polygon};

/// Largest number of pieces a single segment is split into, whatever `max_length` is.
pub const MAX_SEGMENT_PIECES: usize = 10_000;

/// Splits every segment with length of at least `max_length` into `ceil(length / max_length)` segments of equal
/// length, but into no more than [`MAX_SEGMENT_PIECES`]. Lengths are measured in the plane of the coordinates
/// (degrees for lon/lat shapes).
///
/// Points are returned unchanged, as is everything else if `max_length` is not positive.
pub fn subdivide(geometry: &Geometry<f64>, max_length: f64) -> Geometry<f64> {
    if !(max_length > 0.0) {
        return geometry.clone();
    }

    match geometry {
        Geometry::Line(line) => subdivide_line_string(&LineString::from(*line), max_length).into(),
        Geometry::LineString(ls) => subdivide_line_string(ls, max_length).into(),
        Geometry::MultiLineString(mls) => MultiLineString::new(
            mls.0
                .iter()
                .map(|ls| subdivide_line_string(ls, max_length))
                .collect(),
        )
        .into(),
        Geometry::Polygon(polygon) => subdivide_polygon(polygon, max_length).into(),
        Geometry::Rect(rect) => subdivide_polygon(&rect.to_polygon(), max_length).into(),
        Geometry::Triangle(triangle) => {
            subdivide_polygon(&triangle.to_polygon(), max_length).into()
        }
        Geometry::MultiPolygon(mp) => MultiPolygon::new(
            mp.0.iter()
                .map(|polygon| subdivide_polygon(polygon, max_length))
                .collect(),
        )
        .into(),
        Geometry::GeometryCollection(collection) => Geometry::GeometryCollection(
            collection
                .0
                .iter()
                .map(|geometry| subdivide(geometry, max_length))
                .collect(),
        ),
        Geometry::Point(_) | Geometry::MultiPoint(_) => geometry.clone(),
    }
}

fn subdivide_polygon(polygon: &Polygon<f64>, max_length: f64) -> Polygon<f64> {
    Polygon::new(
        subdivide_line_string(polygon.exterior(), max_length),
        polygon
            .interiors()
            .iter()
            .map(|ring| subdivide_line_string(ring, max_length))
            .collect(),
    )
}

fn subdivide_line_string(line_string: &LineString<f64>, max_length: f64) -> LineString<f64> {
    let Some(first) = line_string.0.first() else {
        return line_string.clone();
    };

    let mut coords: Vec<Coord<f64>> = vec![*first];
    for segment in line_string.lines() {
        let length = segment.dx().hypot(segment.dy());
        if length >= max_length {
            let count = (length / max_length)
                .ceil()
                .min(MAX_SEGMENT_PIECES as f64) as usize;
            for index in 1..count {
                let fraction = index as f64 / count as f64;
                coords.push(segment.start + segment.delta() * fraction);
            }
        }
        coords.push(segment.end);
    }

    LineString::new(coords)
}
