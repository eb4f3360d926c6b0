use crate::error::{OperationError, Result, TopologyError};
use crate::math::{Point2, Point3, Vector3};
use crate::topology::{
    MaterialId, MeshData, MeshId, MeshStore, PolygonData, Transform, VertexData, VertexId,
};

/// Creates a mesh from flat vertex attribute arrays and index lists.
///
/// Each position becomes a new vertex in the store. Normals and UVs are
/// optional but, when given, must match the position count. Polygons are
/// given as indices into the position array. A polygon without its own
/// material takes the mesh-wide default set by [`MakeMesh::material`].
#[derive(Default)]
pub struct MakeMesh {
    name: String,
    positions: Vec<[f64; 3]>,
    normals: Option<Vec<[f64; 3]>>,
    uvs: Option<Vec<[f64; 2]>>,
    polygons: Vec<(Vec<u32>, Option<MaterialId>)>,
    material: Option<MaterialId>,
    transform: Transform,
}

impl MakeMesh {
    /// Creates a new `MakeMesh` operation for an empty, named mesh.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the vertex positions.
    #[must_use]
    pub fn positions(mut self, positions: &[[f64; 3]]) -> Self {
        self.positions = positions.to_vec();
        self
    }

    /// Sets per-vertex normals.
    #[must_use]
    pub fn normals(mut self, normals: &[[f64; 3]]) -> Self {
        self.normals = Some(normals.to_vec());
        self
    }

    /// Sets per-vertex texture coordinates.
    #[must_use]
    pub fn uvs(mut self, uvs: &[[f64; 2]]) -> Self {
        self.uvs = Some(uvs.to_vec());
        self
    }

    /// Appends triangles.
    #[must_use]
    pub fn triangles(mut self, triangles: &[[u32; 3]]) -> Self {
        self.polygons.extend(triangles.iter().map(|t| (t.to_vec(), None)));
        self
    }

    /// Appends triangles that use `material` regardless of the default.
    #[must_use]
    pub fn triangles_with_material(
        mut self,
        triangles: &[[u32; 3]],
        material: MaterialId,
    ) -> Self {
        self.polygons
            .extend(triangles.iter().map(|t| (t.to_vec(), Some(material))));
        self
    }

    /// Appends a single polygon of any size.
    #[must_use]
    pub fn polygon(mut self, indices: &[u32]) -> Self {
        self.polygons.push((indices.to_vec(), None));
        self
    }

    /// Sets the default material.
    #[must_use]
    pub fn material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// Sets the object transform.
    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Executes the operation, creating the mesh in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute array length does not match the
    /// position count, an index is out of range, or a polygon has fewer
    /// than three vertices.
    pub fn execute(&self, store: &mut MeshStore) -> Result<MeshId> {
        let count = self.positions.len();
        check_len("normal", self.normals.as_deref().map(<[_]>::len), count)?;
        check_len("uv", self.uvs.as_deref().map(<[_]>::len), count)?;

        // Validate everything before touching the store.
        for (indices, _) in &self.polygons {
            if indices.len() < 3 {
                return Err(TopologyError::InvalidPolygon {
                    vertices: indices.len(),
                }
                .into());
            }
            if let Some(i) = indices.iter().find(|&&i| i as usize >= count) {
                return Err(OperationError::InvalidInput(format!(
                    "index {i} out of range for {count} vertices"
                ))
                .into());
            }
        }

        let mut vertex_ids: Vec<VertexId> = Vec::with_capacity(count);
        for (i, p) in self.positions.iter().enumerate() {
            let mut vertex = VertexData::new(Point3::from(*p));
            if let Some(normals) = &self.normals {
                vertex = vertex.with_normal(Vector3::from(normals[i]));
            }
            if let Some(uvs) = &self.uvs {
                vertex = vertex.with_uv(Point2::from(uvs[i]));
            }
            vertex_ids.push(store.add_vertex(vertex));
        }

        let mut mesh = MeshData::new(self.name.clone());
        mesh.transform = self.transform;
        mesh.vertices.clone_from(&vertex_ids);

        for (indices, material) in &self.polygons {
            let vertices = indices.iter().map(|&i| vertex_ids[i as usize]).collect();
            let polygon = PolygonData::new(vertices)?.with_material(material.or(self.material));
            mesh.polygons.push(store.add_polygon(polygon));
        }

        Ok(store.add_mesh(mesh))
    }
}

fn check_len(attribute: &str, len: Option<usize>, expected: usize) -> Result<()> {
    match len {
        Some(n) if n != expected => Err(OperationError::InvalidInput(format!(
            "{attribute} count {n} does not match {expected} positions"
        ))
        .into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ZonesError;
    use crate::topology::MaterialData;

    #[test]
    fn creates_vertices_and_polygons() {
        let mut store = MeshStore::new();
        let mesh = MakeMesh::new("quad")
            .positions(&[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ])
            .uvs(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
            .triangles(&[[0, 1, 2], [0, 2, 3]])
            .execute(&mut store)
            .unwrap();

        let data = store.mesh(mesh).unwrap();
        assert_eq!(data.name, "quad");
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.polygons.len(), 2);
        let v = store.vertex(data.vertices[2]).unwrap();
        assert_eq!(v.uv, Some(Point2::new(1.0, 1.0)));
        assert!(v.normal.is_none());
    }

    #[test]
    fn explicit_material_overrides_default() {
        let mut store = MeshStore::new();
        let cotton = store.add_material(MaterialData::default());
        let lining = store.add_material(MaterialData::default());
        let mesh = MakeMesh::new("two")
            .positions(&[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ])
            .triangles(&[[0, 1, 2]])
            .triangles_with_material(&[[0, 2, 3]], lining)
            .material(cotton)
            .execute(&mut store)
            .unwrap();

        let materials: Vec<_> = store
            .mesh(mesh)
            .unwrap()
            .polygons
            .iter()
            .map(|&pid| store.polygon(pid).unwrap().material)
            .collect();
        assert_eq!(materials, [Some(cotton), Some(lining)]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut store = MeshStore::new();
        let err = MakeMesh::new("bad")
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .triangles(&[[0, 1, 3]])
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(err, ZonesError::Operation(OperationError::InvalidInput(_))));
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let mut store = MeshStore::new();
        let err = MakeMesh::new("bad")
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]])
            .polygon(&[0, 1])
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            ZonesError::Topology(TopologyError::InvalidPolygon { vertices: 2 })
        ));
    }

    #[test]
    fn mismatched_normals_are_rejected() {
        let mut store = MeshStore::new();
        let err = MakeMesh::new("bad")
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .normals(&[[0.0, 0.0, 1.0]])
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(err, ZonesError::Operation(OperationError::InvalidInput(_))));
    }
}
