//! Set operations on feature shapes.
//!
//! Shapes are [`geo_types::Geometry`] values holding parts of a single dimension: polygons for regions, line strings
//! for transects and points for points. The boolean operations themselves are delegated to [`geo`]. Results are
//! collapsed the way GeoJSON writers expect them: a single part is returned as a simple geometry (`Polygon`,
//! `LineString`, `Point`), several parts as the corresponding multi-geometry, and no parts as an empty
//! multi-geometry of the input dimension.

use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo::{Area, BooleanOps, Intersects, RemoveRepeatedPoints, Simplify};
use geo_types::{
    Coord, Geometry, Line, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

use crate::error::GeometryError;
use crate::geometry_type::{GeometryKind, ObjectType};

/// Parts of a shape grouped by dimension.
#[derive(Debug, Clone, Default)]
struct Parts {
    polygons: Vec<Polygon<f64>>,
    lines: Vec<LineString<f64>>,
    points: Vec<Point<f64>>,
}

impl Parts {
    fn of(geometry: &Geometry<f64>) -> Self {
        let mut parts = Self::default();
        parts.push(geometry);
        parts
    }

    fn push(&mut self, geometry: &Geometry<f64>) {
        match geometry {
            Geometry::Point(p) => self.points.push(*p),
            Geometry::MultiPoint(mp) => self.points.extend(mp.0.iter().copied()),
            Geometry::Line(line) => self.lines.push(LineString::from(*line)),
            Geometry::LineString(ls) => self.lines.push(ls.clone()),
            Geometry::MultiLineString(mls) => self.lines.extend(mls.0.iter().cloned()),
            Geometry::Polygon(p) => self.polygons.push(p.clone()),
            Geometry::Rect(rect) => self.polygons.push(rect.to_polygon()),
            Geometry::Triangle(triangle) => self.polygons.push(triangle.to_polygon()),
            Geometry::MultiPolygon(mp) => self.polygons.extend(mp.0.iter().cloned()),
            Geometry::GeometryCollection(collection) => {
                for geometry in &collection.0 {
                    self.push(geometry);
                }
            }
        }
    }

    fn multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons.clone())
    }

    fn multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.lines.clone())
    }

    /// Builds a single-dimension geometry out of the parts. `fallback` determines the type of the empty geometry
    /// returned when there are no parts at all.
    fn into_geometry(self, fallback: GeometryKind) -> Result<Geometry<f64>, GeometryError> {
        let dimensions = [
            !self.polygons.is_empty(),
            !self.lines.is_empty(),
            !self.points.is_empty(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        if dimensions > 1 {
            return Err(GeometryError::UnsupportedGeometry(
                GeometryKind::GeometryCollection.to_string(),
            ));
        }

        if !self.polygons.is_empty() {
            return Ok(collapse_polygons(self.polygons));
        }
        if !self.lines.is_empty() {
            return Ok(collapse_lines(self.lines));
        }
        if !self.points.is_empty() {
            return Ok(collapse_points(self.points));
        }

        match fallback.object_type()? {
            ObjectType::Region => Ok(MultiPolygon::<f64>::new(vec![]).into()),
            ObjectType::Transect => Ok(MultiLineString::<f64>::new(vec![]).into()),
            ObjectType::Point => Ok(MultiPoint::<f64>::new(vec![]).into()),
        }
    }
}

fn collapse_polygons(mut polygons: Vec<Polygon<f64>>) -> Geometry<f64> {
    if polygons.len() == 1 {
        polygons.remove(0).into()
    } else {
        MultiPolygon::new(polygons).into()
    }
}

fn collapse_lines(mut lines: Vec<LineString<f64>>) -> Geometry<f64> {
    if lines.len() == 1 {
        lines.remove(0).into()
    } else {
        MultiLineString::new(lines).into()
    }
}

fn collapse_points(mut points: Vec<Point<f64>>) -> Geometry<f64> {
    if points.len() == 1 {
        points.remove(0).into()
    } else {
        MultiPoint::new(points).into()
    }
}

/// Converts geometry types that GeoJSON cannot represent directly (`Line`, `Rect`, `Triangle`) into their GeoJSON
/// counterparts. Fails for geometry collections.
pub fn normalize(geometry: Geometry<f64>) -> Result<Geometry<f64>, GeometryError> {
    match geometry {
        Geometry::Line(line) => Ok(LineString::from(line).into()),
        Geometry::Rect(rect) => Ok(rect.to_polygon().into()),
        Geometry::Triangle(triangle) => Ok(triangle.to_polygon().into()),
        Geometry::GeometryCollection(_) => Err(GeometryError::UnsupportedGeometry(
            GeometryKind::GeometryCollection.to_string(),
        )),
        other => Ok(other),
    }
}

/// Returns true if the shape has no coordinates.
pub fn is_empty(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Point(_) | Geometry::Line(_) | Geometry::Rect(_) | Geometry::Triangle(_) => false,
        Geometry::MultiPoint(mp) => mp.0.is_empty(),
        Geometry::LineString(ls) => ls.0.is_empty(),
        Geometry::MultiLineString(mls) => mls.0.iter().all(|ls| ls.0.is_empty()),
        Geometry::Polygon(p) => p.exterior().0.is_empty(),
        Geometry::MultiPolygon(mp) => mp.0.iter().all(|p| p.exterior().0.is_empty()),
        Geometry::GeometryCollection(collection) => collection.0.iter().all(is_empty),
    }
}

/// Returns true if the two shapes share at least one point.
pub fn intersects(a: &Geometry<f64>, b: &Geometry<f64>) -> bool {
    a.intersects(b)
}

/// Planar area of the shape in squared coordinate units (square degrees for lon/lat shapes).
pub fn area(geometry: &Geometry<f64>) -> f64 {
    geometry.unsigned_area()
}

/// Unites all the shapes into one.
///
/// Polygons are merged with a boolean union, identical lines and points are deduplicated. Lines are not noded:
/// transects that overlap or share segments stay separate parts of the result. If the shapes are of
/// different dimensions, their union cannot be represented by a single feature geometry and an
/// [`GeometryError::UnsupportedGeometry`] error naming `GeometryCollection` is returned.
pub fn union_all<'a>(
    shapes: impl IntoIterator<Item = &'a Geometry<f64>>,
) -> Result<Geometry<f64>, GeometryError> {
    let mut parts = Parts::default();
    for shape in shapes {
        parts.push(shape);
    }

    if parts.polygons.is_empty() && parts.lines.is_empty() && parts.points.is_empty() {
        return Err(GeometryError::Conversion(
            "no shapes to unite".to_string(),
        ));
    }

    let mut polygons = parts.polygons.into_iter();
    let united = match polygons.next() {
        Some(first) => polygons
            .fold(MultiPolygon::new(vec![first]), |acc, polygon| {
                acc.union(&MultiPolygon::new(vec![polygon]))
            })
            .0,
        None => vec![],
    };

    let mut lines: Vec<LineString<f64>> = Vec::with_capacity(parts.lines.len());
    for line in parts.lines {
        if !lines.contains(&line) {
            lines.push(line);
        }
    }

    let mut points: Vec<Point<f64>> = Vec::with_capacity(parts.points.len());
    for point in parts.points {
        if !points.contains(&point) {
            points.push(point);
        }
    }

    Parts {
        polygons: united,
        lines,
        points,
    }
    .into_geometry(GeometryKind::GeometryCollection)
}

/// Removes the part of `shape` covered by `mask`.
///
/// Regions are cut by the polygons of the mask and transects are clipped by them. Points are removed if they
/// intersect the mask in any way. Masks of lower dimension than the shape leave it unchanged.
pub fn difference(
    shape: &Geometry<f64>,
    mask: &Geometry<f64>,
) -> Result<Geometry<f64>, GeometryError> {
    let kind = GeometryKind::of(shape);
    let shape_parts = Parts::of(shape);
    let mask_polygons = Parts::of(mask).multi_polygon();

    let polygons = if shape_parts.polygons.is_empty() || mask_polygons.0.is_empty() {
        shape_parts.polygons.clone()
    } else {
        shape_parts.multi_polygon().difference(&mask_polygons).0
    };

    let lines = if shape_parts.lines.is_empty() || mask_polygons.0.is_empty() {
        shape_parts.lines.clone()
    } else {
        mask_polygons.clip(&shape_parts.multi_line_string(), true).0
    };

    let points = shape_parts
        .points
        .into_iter()
        .filter(|point| !Geometry::Point(*point).intersects(mask))
        .collect();

    Parts {
        polygons,
        lines,
        points,
    }
    .into_geometry(kind)
}

/// Returns the part of `shape` that is also covered by `other`.
///
/// The result has the lower of the two dimensions: regions intersected with regions give regions, transects
/// intersected with regions give the clipped transects, and points give the points lying on the other shape.
/// Intersecting two transects is not supported.
pub fn intersection(
    shape: &Geometry<f64>,
    other: &Geometry<f64>,
) -> Result<Geometry<f64>, GeometryError> {
    let kind = GeometryKind::of(shape);
    let a = Parts::of(shape);
    let b = Parts::of(other);

    if !a.lines.is_empty() && !b.lines.is_empty() {
        return Err(GeometryError::UnsupportedGeometry(
            "intersection of two transects".to_string(),
        ));
    }

    let a_polygons = a.multi_polygon();
    let b_polygons = b.multi_polygon();
    let mut result = Parts::default();

    if !a_polygons.0.is_empty() && !b_polygons.0.is_empty() {
        result.polygons = a_polygons.intersection(&b_polygons).0;
    }
    if !a.lines.is_empty() && !b_polygons.0.is_empty() {
        result
            .lines
            .extend(b_polygons.clip(&a.multi_line_string(), false).0);
    }
    if !b.lines.is_empty() && !a_polygons.0.is_empty() {
        result
            .lines
            .extend(a_polygons.clip(&b.multi_line_string(), false).0);
    }

    result.points.extend(
        a.points
            .iter()
            .filter(|point| Geometry::Point(**point).intersects(other)),
    );
    result.points.extend(
        b.points
            .iter()
            .filter(|point| Geometry::Point(**point).intersects(shape)),
    );

    result.into_geometry(kind)
}

/// Gathers the parts of all shapes into one geometry without merging them.
///
/// `fallback` gives the type of the empty geometry returned if the shapes have no parts. Shapes of different
/// dimensions cannot be joined.
pub fn join<'a>(
    shapes: impl IntoIterator<Item = &'a Geometry<f64>>,
    fallback: GeometryKind,
) -> Result<Geometry<f64>, GeometryError> {
    let mut parts = Parts::default();
    for shape in shapes {
        parts.push(shape);
    }

    parts.into_geometry(fallback)
}

/// Number of times the tolerance is halved when simplification of a polygon makes its rings cross.
const MAX_SIMPLIFY_ATTEMPTS: usize = 8;

/// Reduces the number of points of lines and polygon rings.
///
/// With a positive `tolerance` the Ramer–Douglas–Peucker algorithm is used, so no point of the simplified shape is
/// further than `tolerance` from the input. Polygons keep their topology: if the simplified rings cross themselves or
/// each other, the tolerance is halved until they don't, and the ring cleanup below is used as the last resort.
///
/// With zero or negative tolerance only repeated points and vertices lying on a straight segment between their
/// neighbours are removed. End points of lines and rings are always kept. Points are returned unchanged.
pub fn simplify(geometry: &Geometry<f64>, tolerance: f64) -> Geometry<f64> {
    match geometry {
        Geometry::LineString(ls) => simplify_line_string(ls, tolerance).into(),
        Geometry::MultiLineString(mls) => MultiLineString::new(
            mls.0
                .iter()
                .map(|ls| simplify_line_string(ls, tolerance))
                .collect(),
        )
        .into(),
        Geometry::Polygon(p) => simplify_polygon(p, tolerance).into(),
        Geometry::MultiPolygon(mp) => MultiPolygon::new(
            mp.0.iter()
                .map(|p| simplify_polygon(p, tolerance))
                .collect(),
        )
        .into(),
        other => other.clone(),
    }
}

fn simplify_line_string(line_string: &LineString<f64>, tolerance: f64) -> LineString<f64> {
    if tolerance > 0.0 {
        line_string.simplify(&tolerance)
    } else {
        remove_redundant_points(line_string)
    }
}

fn simplify_polygon(polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64> {
    let mut tolerance = tolerance;
    for _ in 0..MAX_SIMPLIFY_ATTEMPTS {
        if tolerance <= 0.0 {
            break;
        }

        let candidate = polygon.simplify(&tolerance);
        if is_simple_polygon(&candidate) {
            return candidate;
        }

        tolerance /= 2.0;
    }

    Polygon::new(
        clean_ring(polygon.exterior()),
        polygon.interiors().iter().map(clean_ring).collect(),
    )
}

fn clean_ring(ring: &LineString<f64>) -> LineString<f64> {
    let cleaned = remove_redundant_points(ring);
    if cleaned.0.len() < 4 {
        ring.clone()
    } else {
        cleaned
    }
}

/// Removes repeated points and vertices lying on the straight segment between the previous kept point and the next
/// one.
fn remove_redundant_points(line_string: &LineString<f64>) -> LineString<f64> {
    let deduplicated = line_string.remove_repeated_points();
    let coords = &deduplicated.0;
    if coords.len() < 3 {
        return deduplicated;
    }

    let mut kept: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    kept.push(coords[0]);
    for window in coords[1..].windows(2) {
        let previous = kept[kept.len() - 1];
        if !is_passing_vertex(previous, window[0], window[1]) {
            kept.push(window[0]);
        }
    }
    kept.push(coords[coords.len() - 1]);

    LineString::new(kept)
}

/// True if `current` lies on the segment from `previous` to `next` and the path keeps its direction there.
fn is_passing_vertex(previous: Coord<f64>, current: Coord<f64>, next: Coord<f64>) -> bool {
    if RobustKernel::orient2d(previous, current, next) != Orientation::Collinear {
        return false;
    }

    let incoming = current - previous;
    let outgoing = next - current;
    incoming.x * outgoing.x + incoming.y * outgoing.y > 0.0
}

/// Checks that every ring is closed with at least three distinct vertices and that no two edges of the polygon
/// touch, except for consecutive edges of the same ring.
fn is_simple_polygon(polygon: &Polygon<f64>) -> bool {
    let rings: Vec<&LineString<f64>> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .collect();
    if rings.iter().any(|ring| ring.0.len() < 4 || !ring.is_closed()) {
        return false;
    }

    let edges: Vec<(usize, usize, Line<f64>)> = rings
        .iter()
        .enumerate()
        .flat_map(|(ring_index, ring)| {
            ring.lines()
                .enumerate()
                .map(move |(edge_index, line)| (ring_index, edge_index, line))
        })
        .collect();

    for (i, (ring_a, index_a, edge_a)) in edges.iter().enumerate() {
        for (ring_b, index_b, edge_b) in &edges[i + 1..] {
            if ring_a == ring_b {
                let edge_count = rings[*ring_a].0.len() - 1;
                let consecutive =
                    *index_b == index_a + 1 || (*index_a == 0 && *index_b == edge_count - 1);
                if consecutive {
                    continue;
                }
            }

            if edge_a.intersects(edge_b) {
                return false;
            }
        }
    }

    true
}
