use std::collections::HashSet;

use crate::error::Result;
use crate::math::Point3;
use crate::operations::query::PolygonCentroid;
use crate::topology::{MeshId, MeshStore, PolygonId};

/// Deletes every polygon of a mesh whose centroid satisfies a predicate.
///
/// Vertices are left in place; run
/// [`RemoveLooseVertices`](super::RemoveLooseVertices) afterwards to drop
/// the ones no longer used.
pub struct DeletePolygons {
    mesh: MeshId,
}

impl DeletePolygons {
    /// Creates a new `DeletePolygons` operation.
    #[must_use]
    pub fn new(mesh: MeshId) -> Self {
        Self { mesh }
    }

    /// Executes the deletion, returning the number of polygons removed.
    ///
    /// Polygons still listed by another mesh stay in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh, one of its polygons or one of their
    /// vertices is missing.
    pub fn execute<F>(&self, store: &mut MeshStore, mut delete: F) -> Result<usize>
    where
        F: FnMut(&Point3) -> bool,
    {
        let polygons = store.mesh(self.mesh)?.polygons.clone();

        let mut doomed = HashSet::new();
        for &pid in &polygons {
            let centroid = PolygonCentroid::new(pid).execute(store)?;
            if delete(&centroid) {
                doomed.insert(pid);
            }
        }

        store
            .mesh_mut(self.mesh)?
            .polygons
            .retain(|pid| !doomed.contains(pid));

        let elsewhere: HashSet<PolygonId> = store
            .meshes()
            .filter(|(id, _)| *id != self.mesh)
            .flat_map(|(_, m)| m.polygons.iter().copied())
            .filter(|pid| doomed.contains(pid))
            .collect();
        for pid in doomed.difference(&elsewhere) {
            store.remove_polygon(*pid);
        }

        tracing::debug!(
            deleted = doomed.len(),
            kept = polygons.len() - doomed.len(),
            "deleted polygons"
        );
        Ok(doomed.len())
    }
}
