use std::collections::HashSet;

use crate::error::Result;
use crate::topology::{MeshId, MeshStore, VertexId};

/// Removes vertices that no polygon of the mesh references.
///
/// Running it twice is a no-op the second time.
pub struct RemoveLooseVertices {
    mesh: MeshId,
}

impl RemoveLooseVertices {
    /// Creates a new `RemoveLooseVertices` operation.
    #[must_use]
    pub fn new(mesh: MeshId) -> Self {
        Self { mesh }
    }

    /// Executes the cleanup, returning the number of vertices removed from
    /// the mesh.
    ///
    /// A removed vertex is also freed from the store unless another mesh
    /// still lists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh or one of its polygons is missing.
    pub fn execute(&self, store: &mut MeshStore) -> Result<usize> {
        let mesh = store.mesh(self.mesh)?;

        let mut referenced: HashSet<VertexId> = HashSet::with_capacity(mesh.vertices.len());
        for &pid in &mesh.polygons {
            referenced.extend(store.polygon(pid)?.vertices.iter().copied());
        }

        let loose: Vec<VertexId> = mesh
            .vertices
            .iter()
            .copied()
            .filter(|v| !referenced.contains(v))
            .collect();
        if loose.is_empty() {
            return Ok(0);
        }

        let elsewhere: HashSet<VertexId> = store
            .meshes()
            .filter(|(id, _)| *id != self.mesh)
            .flat_map(|(_, m)| m.vertices.iter().copied())
            .collect();

        store
            .mesh_mut(self.mesh)?
            .vertices
            .retain(|v| referenced.contains(v));
        for v in &loose {
            if !elsewhere.contains(v) {
                store.remove_vertex(*v);
            }
        }

        tracing::debug!(removed = loose.len(), "removed loose vertices");
        Ok(loose.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::MakeMesh;
    use crate::operations::modification::DeletePolygons;
    use crate::operations::query::IsValid;
    use crate::topology::{MeshData, VertexData};

    fn two_triangles(store: &mut MeshStore) -> MeshId {
        MakeMesh::new("pair")
            .positions(&[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [5.0, 0.0, 0.0],
                [6.0, 0.0, 0.0],
                [5.0, 1.0, 0.0],
            ])
            .triangles(&[[0, 1, 2], [3, 4, 5]])
            .execute(store)
            .unwrap()
    }

    #[test]
    fn removes_vertices_of_deleted_polygons() {
        let mut store = MeshStore::new();
        let mesh = two_triangles(&mut store);
        DeletePolygons::new(mesh)
            .execute(&mut store, |c| c.x > 2.0)
            .unwrap();

        let removed = RemoveLooseVertices::new(mesh).execute(&mut store).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.mesh(mesh).unwrap().vertices.len(), 3);
        assert_eq!(store.vertex_count(), 3);
        assert!(IsValid::new(mesh).execute(&store));
    }

    #[test]
    fn second_run_changes_nothing() {
        let mut store = MeshStore::new();
        let mesh = two_triangles(&mut store);
        DeletePolygons::new(mesh)
            .execute(&mut store, |c| c.x < 2.0)
            .unwrap();
        RemoveLooseVertices::new(mesh).execute(&mut store).unwrap();
        let after_first = store.mesh(mesh).unwrap().vertices.clone();

        let removed = RemoveLooseVertices::new(mesh).execute(&mut store).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(store.mesh(mesh).unwrap().vertices, after_first);
    }

    #[test]
    fn vertex_listed_by_another_mesh_survives_in_store() {
        let mut store = MeshStore::new();
        let mesh = two_triangles(&mut store);
        let stray = store.add_vertex(VertexData::new(Point3::new(9.0, 9.0, 9.0)));
        store.mesh_mut(mesh).unwrap().vertices.push(stray);

        let mut other = MeshData::new("other");
        other.vertices.push(stray);
        store.add_mesh(other);

        let removed = RemoveLooseVertices::new(mesh).execute(&mut store).unwrap();
        assert_eq!(removed, 1);
        assert!(store.contains_vertex(stray));
        assert!(!store.mesh(mesh).unwrap().vertices.contains(&stray));
    }
}
