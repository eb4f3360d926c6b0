use crate::error::TopologyError;

use super::material::MaterialId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a polygon in the mesh store.
    pub struct PolygonId;
}

/// Data associated with a mesh polygon.
///
/// A polygon is an ordered loop of at least three vertices. Winding order
/// is preserved through every operation.
#[derive(Debug, Clone)]
pub struct PolygonData {
    /// The ordered vertex loop.
    pub vertices: Vec<VertexId>,
    /// Surface material of this polygon.
    pub material: Option<MaterialId>,
}

impl PolygonData {
    /// Creates a polygon from an ordered vertex loop.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than three vertices are given.
    pub fn new(vertices: Vec<VertexId>) -> Result<Self, TopologyError> {
        if vertices.len() < 3 {
            return Err(TopologyError::InvalidPolygon {
                vertices: vertices.len(),
            });
        }
        Ok(Self {
            vertices,
            material: None,
        })
    }

    /// Assigns a material.
    #[must_use]
    pub fn with_material(mut self, material: Option<MaterialId>) -> Self {
        self.material = material;
        self
    }
}
