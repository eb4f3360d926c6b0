use crate::math::{Rotation, Vector3};

use super::polygon::PolygonId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a mesh object in the mesh store.
    pub struct MeshId;
}

/// Object-level placement of a mesh in its scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Rotation,
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: Rotation::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Returns `true` if this transform leaves points unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Data associated with a named mesh object.
///
/// A mesh does not own its vertices and polygons; it lists the IDs of the
/// store entities that belong to it. Several meshes may list the same
/// vertex.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Object name, used as node and mesh name on export.
    pub name: String,
    /// Member vertices.
    pub vertices: Vec<VertexId>,
    /// Member polygons, each carrying its own material.
    pub polygons: Vec<PolygonId>,
    /// Object transform.
    pub transform: Transform,
}

impl MeshData {
    /// Creates an empty mesh with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
