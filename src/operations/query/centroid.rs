use crate::error::Result;
use crate::math::Point3;
use crate::topology::{MeshStore, PolygonId};

/// Computes the arithmetic mean of a polygon's vertex positions.
///
/// This is the vertex centroid, not the area centroid: every corner
/// contributes equally regardless of edge lengths.
pub struct PolygonCentroid {
    polygon: PolygonId,
}

impl PolygonCentroid {
    /// Creates a new `PolygonCentroid` query.
    #[must_use]
    pub fn new(polygon: PolygonId) -> Self {
        Self { polygon }
    }

    /// Executes the query, returning the centroid.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon or one of its vertices is missing.
    pub fn execute(&self, store: &MeshStore) -> Result<Point3> {
        let polygon = store.polygon(self.polygon)?;
        let mut sum = Point3::origin().coords;
        for &id in &polygon.vertices {
            sum += store.vertex(id)?.point.coords;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = polygon.vertices.len() as f64;
        Ok(Point3::from(sum / n))
    }
}
