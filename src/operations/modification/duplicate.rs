use std::collections::HashMap;

use crate::error::{Result, TopologyError};
use crate::topology::{MeshData, MeshId, MeshStore, PolygonData, VertexId};

/// Deep-copies a mesh.
///
/// The copy gets its own vertices and polygons in the store, so trimming
/// one never affects the other. Polygon materials and the transform are
/// shared.
pub struct Duplicate {
    mesh: MeshId,
    name: Option<String>,
}

impl Duplicate {
    /// Creates a new `Duplicate` operation.
    #[must_use]
    pub fn new(mesh: MeshId) -> Self {
        Self { mesh, name: None }
    }

    /// Names the copy. Without a name the copy gets the source name with a
    /// `.001` suffix.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Executes the duplication, returning the ID of the copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh or any of its entities is missing, or
    /// if a polygon references a vertex that is not a member of the mesh.
    pub fn execute(&self, store: &mut MeshStore) -> Result<MeshId> {
        let source = store.mesh(self.mesh)?.clone();

        let mut remap: HashMap<VertexId, VertexId> = HashMap::with_capacity(source.vertices.len());
        let mut copy = MeshData::new(
            self.name
                .clone()
                .unwrap_or_else(|| format!("{}.001", source.name)),
        );
        copy.transform = source.transform;

        for &old in &source.vertices {
            let data = store.vertex(old)?.clone();
            let new = store.add_vertex(data);
            remap.insert(old, new);
            copy.vertices.push(new);
        }

        for &pid in &source.polygons {
            let polygon = store.polygon(pid)?;
            let vertices = polygon
                .vertices
                .iter()
                .map(|v| {
                    remap.get(v).copied().ok_or_else(|| {
                        TopologyError::InvalidTopology(format!(
                            "polygon of '{}' uses a vertex outside the mesh",
                            source.name
                        ))
                    })
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let material = polygon.material;
            copy.polygons
                .push(store.add_polygon(PolygonData { vertices, material }));
        }

        tracing::debug!(
            source = %source.name,
            copy = %copy.name,
            vertices = copy.vertices.len(),
            polygons = copy.polygons.len(),
            "duplicated mesh"
        );
        Ok(store.add_mesh(copy))
    }
}
