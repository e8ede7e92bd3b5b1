//! Conversion of shapes between geographic coordinates and other planes (see [`Projection`]).

use geo::MapCoords;
use geo_types::{Coord, Geometry};

mod polar;

pub use polar::PolarProjection;

/// Converts points between two coordinate systems.
pub trait Projection {
    /// Point type of the source coordinate system.
    type InPoint;
    /// Point type of the target coordinate system.
    type OutPoint;

    /// Projects a point. Returns `None` if the point cannot be represented in the target system.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Inverse of [`Projection::project`].
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Projection that works in the opposite direction of the wrapped one.
#[derive(Debug, Clone, Copy)]
pub struct InvertedProjection<P> {
    inner: P,
}

impl<P> InvertedProjection<P> {
    /// Wraps the given projection.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Projection> Projection for InvertedProjection<P> {
    type InPoint = P::OutPoint;
    type OutPoint = P::InPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.inner.unproject(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.inner.project(input)
    }
}

/// Applies the projection to every coordinate of the geometry. Returns `None` if any of the coordinates cannot be
/// projected.
pub fn project_geometry<Proj>(geometry: &Geometry<f64>, projection: &Proj) -> Option<Geometry<f64>>
where
    Proj: Projection<InPoint = Coord<f64>, OutPoint = Coord<f64>> + ?Sized,
{
    geometry
        .try_map_coords(|coord| projection.project(&coord).ok_or(()))
        .ok()
}
