//! Splitting of shapes that cross the ±180° meridian.
//!
//! Shapes are projected with a [`PolarProjection`] centered on the pole of their hemisphere. The antimeridian then
//! becomes a ray from the origin along the negative `y` axis, and a thin wedge around that ray is cut out of the
//! projected shape before it is projected back. Edges of the shape must not span more than 180° of longitude;
//! longer edges have to be subdivided first (see [`crate::subdivide`]).

use std::f64::consts::PI;

use geo::{BoundingRect, Intersects};
use geo_types::{Geometry, Polygon};

use crate::ops;
use crate::projection::{project_geometry, InvertedProjection, PolarProjection};

/// Half-width of the wedge cut at the antimeridian, in radians of the polar plane.
pub const EPSILON: f64 = 1e-14;

fn antimeridian_wedge(epsilon: f64) -> Polygon<f64> {
    Polygon::new(
        vec![
            (epsilon, -PI),
            (epsilon * epsilon, -epsilon),
            (0.0, epsilon),
            (-epsilon * epsilon, -epsilon),
            (-epsilon, -PI),
            (epsilon, -PI),
        ]
        .into(),
        vec![],
    )
}

/// Splits the shape into pieces lying entirely on one side of the antimeridian.
///
/// Returns `None` if the shape does not cross the antimeridian, in which case it should be used as it is. The
/// returned geometry may have a different type than the input, e.g. a `Polygon` crossing the antimeridian becomes a
/// `MultiPolygon` of the pieces on both sides. Vertices of the cut are placed at exactly `-180` or `180` degrees.
pub fn split_at_antimeridian(geometry: &Geometry<f64>) -> Option<Geometry<f64>> {
    let bounds = geometry.bounding_rect()?;
    let mid_latitude = 0.5 * (bounds.min().y + bounds.max().y);
    let projection = PolarProjection::nearest(mid_latitude, EPSILON);

    let polar = project_geometry(geometry, &projection)?;
    let wedge: Geometry<f64> = antimeridian_wedge(EPSILON).into();
    if !polar.intersects(&wedge) {
        return None;
    }

    let cut = ops::difference(&polar, &wedge).ok()?;
    project_geometry(&cut, &InvertedProjection::new(projection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo_types::{line_string, point, polygon};

    use crate::geometry_type::GeometryKind;

    fn crossing_polygon() -> Geometry<f64> {
        polygon![
            (x: 170.0, y: 10.0),
            (x: 180.0, y: 10.0),
            (x: 190.0, y: 10.0),
            (x: 190.0, y: 20.0),
            (x: 180.0, y: 20.0),
            (x: 170.0, y: 20.0),
            (x: 170.0, y: 10.0),
        ]
        .into()
    }

    #[test]
    fn splits_polygon_preserving_area() {
        let original = crossing_polygon();
        let split = split_at_antimeridian(&original).unwrap();

        assert_eq!(GeometryKind::of(&split), GeometryKind::MultiPolygon);
        let bounds = split.bounding_rect().unwrap();
        assert!(bounds.min().x >= -180.0);
        assert!(bounds.max().x <= 180.0);
        assert_abs_diff_eq!(ops::area(&split), ops::area(&original), epsilon = 1e-6);
    }

    #[test]
    fn splits_southern_polygon() {
        let original: Geometry<f64> = polygon![
            (x: 175.0, y: -70.0),
            (x: 180.0, y: -70.0),
            (x: -175.0, y: -70.0),
            (x: -175.0, y: -60.0),
            (x: 180.0, y: -60.0),
            (x: 175.0, y: -60.0),
            (x: 175.0, y: -70.0),
        ]
        .into();

        let split = split_at_antimeridian(&original).unwrap();
        let Geometry::MultiPolygon(pieces) = split else {
            panic!("expected multipolygon");
        };
        assert_eq!(pieces.0.len(), 2);
        assert_abs_diff_eq!(
            ops::area(&pieces.into()),
            ops::area(&polygon![
                (x: 175.0, y: -70.0),
                (x: 185.0, y: -70.0),
                (x: 185.0, y: -60.0),
                (x: 175.0, y: -60.0),
                (x: 175.0, y: -70.0),
            ]
            .into()),
            epsilon = 1e-6
        );
    }

    #[test]
    fn splits_transect() {
        let transect: Geometry<f64> = line_string![(x: 175.0, y: 0.0), (x: -175.0, y: 0.0)].into();
        let split = split_at_antimeridian(&transect).unwrap();

        let Geometry::MultiLineString(lines) = split else {
            panic!("expected multilinestring");
        };
        assert_eq!(lines.0.len(), 2);
        for line in &lines.0 {
            for segment in line.lines() {
                assert!((segment.end.x - segment.start.x).abs() <= 180.0);
            }
        }
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let once = split_at_antimeridian(&crossing_polygon()).unwrap();
        assert!(split_at_antimeridian(&once).is_none());

        let transect: Geometry<f64> = line_string![(x: 175.0, y: 0.0), (x: -175.0, y: 0.0)].into();
        let once = split_at_antimeridian(&transect).unwrap();
        assert!(split_at_antimeridian(&once).is_none());
    }

    #[test]
    fn shapes_away_from_antimeridian_are_left_alone() {
        let region: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ]
        .into();
        assert!(split_at_antimeridian(&region).is_none());

        let touching: Geometry<f64> = polygon![
            (x: 170.0, y: 0.0),
            (x: 180.0, y: 0.0),
            (x: 180.0, y: 10.0),
            (x: 170.0, y: 10.0),
            (x: 170.0, y: 0.0),
        ]
        .into();
        assert!(split_at_antimeridian(&touching).is_none());

        let point: Geometry<f64> = point!(x: 180.0, y: 45.0).into();
        assert!(split_at_antimeridian(&point).is_none());
    }
}
