use std::f64::consts::PI;

use geo_types::Coord;

use crate::projection::Projection;

/// Azimuthal equidistant projection centered on one of the poles, used to cut shapes at the antimeridian.
///
/// A point with longitude `lon` and latitude `lat` is mapped to the plane as
///
/// ```text
/// phi    = to_radians(lon)
/// radius = to_radians(90 - sign * lat)
/// x = radius * sin(phi)
/// y = radius * cos(phi)
/// ```
///
/// where `sign` is `1` for the north pole and `-1` for the south pole. With either pole the ±180° meridian becomes
/// the ray from the origin along the negative `y` axis.
///
/// Points lying closer than `1.5 * epsilon` radians to that ray are nudged off it, and unprojected points closer
/// than `2 * epsilon` to the ray or to the pole are snapped back onto it exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarProjection {
    sign: f64,
    epsilon: f64,
}

impl PolarProjection {
    /// Projection centered at the north pole.
    pub fn north(epsilon: f64) -> Self {
        Self {
            sign: 1.0,
            epsilon,
        }
    }

    /// Projection centered at the south pole.
    pub fn south(epsilon: f64) -> Self {
        Self {
            sign: -1.0,
            epsilon,
        }
    }

    /// Projection centered at the pole of the hemisphere containing `latitude`. The equator belongs to the north.
    pub fn nearest(latitude: f64, epsilon: f64) -> Self {
        if latitude >= 0.0 {
            Self::north(epsilon)
        } else {
            Self::south(epsilon)
        }
    }

    /// `1` for the north pole, `-1` for the south pole.
    pub fn sign(&self) -> f64 {
        self.sign
    }
}

/// Wraps longitudes outside of `[-180, 180]` back into that range. Both `-180` and `180` are kept as they are so
/// that a shape touching the antimeridian from one side stays on that side.
fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

impl Projection for PolarProjection {
    type InPoint = Coord<f64>;
    type OutPoint = Coord<f64>;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let mut phi = wrap_longitude(input.x).to_radians();
        let radius = (90.0 - self.sign * input.y).to_radians();

        let limit = PI - 1.5 * self.epsilon;
        if phi.abs() > limit {
            phi = limit.copysign(phi);
        }

        let x = radius * phi.sin();
        let y = radius * phi.cos();

        if x.is_finite() && y.is_finite() {
            Some(Coord { x, y })
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let mut radius = input.x.hypot(input.y);
        let phi = input.x.atan2(input.y);

        if radius < 2.0 * self.epsilon {
            radius = 0.0;
        }

        let lon = if phi.abs() > PI - 2.0 * self.epsilon {
            180.0_f64.copysign(phi)
        } else {
            phi.to_degrees()
        };
        let lat = self.sign * (90.0 - radius.to_degrees());

        if lon.is_finite() && lat.is_finite() {
            Some(Coord { x: lon, y: lat })
        } else {
            None
        }
    }
}
