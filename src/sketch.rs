//! 2D profile shapes as `Sketch`s, backed by `geo` geometry in the XY plane.

use crate::float_types::{PI, Real};
use geo::{Geometry, GeometryCollection, LineString, Polygon as GeoPolygon};
use std::fmt::Debug;

/// A 2D sketch in the XY plane: the cross-section swept along a path.
#[derive(Clone, Debug)]
pub struct Sketch<S: Clone + Send + Sync + Debug> {
    /// 2D geometry (polygons, with holes where present).
    pub geometry: GeometryCollection<Real>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Sketch<S> {
    /// Returns a new empty Sketch.
    pub fn new() -> Self {
        Sketch {
            geometry: GeometryCollection::default(),
            metadata: None,
        }
    }

    /// Build a Sketch from an existing `geo` GeometryCollection.
    pub const fn from_geo(geometry: GeometryCollection<Real>, metadata: Option<S>) -> Self {
        Sketch { geometry, metadata }
    }

    /// Creates a 2D circle centered at the origin, approximated by a closed
    /// `segments`-gon wound counter-clockwise. Fewer than 3 segments yields
    /// an empty sketch.
    pub fn circle(radius: Real, segments: usize, metadata: Option<S>) -> Self {
        if segments < 3 {
            return Sketch::new();
        }
        let mut coords: Vec<(Real, Real)> = (0..segments)
            .map(|i| {
                let theta = 2.0 * PI * (i as Real) / (segments as Real);
                (radius * theta.cos(), radius * theta.sin())
            })
            .collect();
        // close it
        coords.push((coords[0].0, coords[0].1));
        let polygon_2d = GeoPolygon::new(LineString::from(coords), vec![]);

        Sketch::from_geo(
            GeometryCollection(vec![Geometry::Polygon(polygon_2d)]),
            metadata,
        )
    }

    /// Creates a 2D polygon in the XY plane from a list of `[x, y]` points
    /// describing the boundary in order. The ring is closed implicitly.
    pub fn polygon(points: &[[Real; 2]], metadata: Option<S>) -> Self {
        if points.len() < 3 {
            return Sketch::new();
        }
        let mut coords: Vec<(Real, Real)> = points.iter().map(|p| (p[0], p[1])).collect();
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }
        let polygon_2d = GeoPolygon::new(LineString::from(coords), vec![]);

        Sketch::from_geo(
            GeometryCollection(vec![Geometry::Polygon(polygon_2d)]),
            metadata,
        )
    }

    /// All polygons in this sketch, flattening MultiPolygons.
    pub(crate) fn polygons_2d(&self) -> Vec<&GeoPolygon<Real>> {
        let mut out = Vec::new();
        for geom in &self.geometry {
            match geom {
                Geometry::Polygon(poly) => out.push(poly),
                Geometry::MultiPolygon(mp) => out.extend(&mp.0),
                _ => {},
            }
        }
        out
    }
}

impl<S: Clone + Send + Sync + Debug> Default for Sketch<S> {
    fn default() -> Self {
        Self::new()
    }
}
