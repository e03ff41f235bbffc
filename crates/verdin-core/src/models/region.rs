//! Clip region for layer construction.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::contains::Contains;
use geo::{point, Coord, LineString, Polygon, Rect};

use crate::error::{Result, VerdinError};

/// Geographic boundary every derived layer is clipped to.
///
/// Built once from a list of (lng, lat) vertices and read-only afterwards.
/// The outer ring is closed automatically.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    vertices: Vec<(f64, f64)>,
}

impl Region {
    /// Create a region from (lng, lat) vertices.
    ///
    /// Requires at least three distinct vertices with finite coordinates; a
    /// trailing vertex equal to the first is accepted and dropped.
    pub fn new(mut vertices: Vec<(f64, f64)>) -> Result<Self> {
        if vertices.len() > 3 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(VerdinError::InvalidRegion {
                reason: format!("need at least 3 vertices, got {}", vertices.len()),
            });
        }
        if let Some((lng, lat)) =
            vertices.iter().find(|(lng, lat)| !lng.is_finite() || !lat.is_finite())
        {
            return Err(VerdinError::InvalidRegion {
                reason: format!("non-finite vertex ({}, {})", lng, lat),
            });
        }
        Ok(Self { vertices })
    }

    /// The region's vertices, without the closing vertex
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Build the closed polygon for geometric tests
    pub fn to_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> =
            self.vertices.iter().map(|&(lng, lat)| Coord { x: lng, y: lat }).collect();
        Polygon::new(LineString::new(coords), vec![])
    }

    /// Whether the point lies inside the region
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        self.to_polygon().contains(&point!(x: lng, y: lat))
    }

    /// Axis-aligned bounding rectangle of the region
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.to_polygon().bounding_rect()
    }
}
