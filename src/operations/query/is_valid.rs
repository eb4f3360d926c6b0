use std::collections::HashSet;

use crate::topology::{MeshId, MeshStore};

/// Validates the connectivity of a mesh.
///
/// A mesh is valid when every polygon exists and has at least three
/// vertices, and every polygon vertex exists and is listed as a member of
/// the mesh.
pub struct IsValid {
    mesh: MeshId,
}

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(mesh: MeshId) -> Self {
        Self { mesh }
    }

    /// Executes the validation, returning `true` if the mesh is valid.
    #[must_use]
    pub fn execute(&self, store: &MeshStore) -> bool {
        let Ok(mesh) = store.mesh(self.mesh) else {
            return false;
        };
        let members: HashSet<_> = mesh.vertices.iter().copied().collect();

        mesh.polygons.iter().all(|&pid| {
            store.polygon(pid).is_ok_and(|polygon| {
                polygon.vertices.len() >= 3
                    && polygon
                        .vertices
                        .iter()
                        .all(|v| members.contains(v) && store.contains_vertex(*v))
            })
        })
    }
}
