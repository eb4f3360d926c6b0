use std::collections::HashSet;

use crate::error::Result;
use crate::operations::classify::{Zone, ZoneClassifier};
use crate::operations::query::PolygonCentroid;
use crate::topology::{MeshData, MeshId, MeshStore, PolygonId};

/// The three zone meshes produced from one source mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonePartition {
    pub sleeves: MeshId,
    pub front: MeshId,
    pub back: MeshId,
    /// Source polygons that fell into no zone.
    pub discarded: usize,
}

impl ZonePartition {
    /// Returns the mesh holding the given zone.
    #[must_use]
    pub fn get(&self, zone: Zone) -> MeshId {
        match zone {
            Zone::Sleeves => self.sleeves,
            Zone::Front => self.front,
            Zone::Back => self.back,
        }
    }

    /// Iterates zones and their meshes in export order.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, MeshId)> + '_ {
        Zone::ALL.into_iter().map(move |zone| (zone, self.get(zone)))
    }
}

/// Splits a mesh into sleeve, front and back meshes in a single pass.
///
/// Each source polygon is classified once by its centroid. The zone meshes
/// are index sets over the store: they list the source's polygons and the
/// vertices those polygons use, without copying any vertex data. The
/// source mesh is left untouched.
pub struct PartitionByZone {
    mesh: MeshId,
    classifier: ZoneClassifier,
}

impl PartitionByZone {
    /// Creates a new `PartitionByZone` operation.
    #[must_use]
    pub fn new(mesh: MeshId, classifier: ZoneClassifier) -> Self {
        Self { mesh, classifier }
    }

    /// Executes the partition, creating one mesh per zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh, one of its polygons or one of their
    /// vertices is missing.
    pub fn execute(&self, store: &mut MeshStore) -> Result<ZonePartition> {
        let source = store.mesh(self.mesh)?.clone();

        let mut buckets: [Vec<PolygonId>; 3] = Default::default();
        let mut discarded = 0;
        for &pid in &source.polygons {
            let centroid = PolygonCentroid::new(pid).execute(store)?;
            match self.classifier.classify(&centroid) {
                Some(zone) => buckets[slot(zone)].push(pid),
                None => discarded += 1,
            }
        }

        let mut ids = [MeshId::default(); 3];
        for zone in Zone::ALL {
            let polygons = std::mem::take(&mut buckets[slot(zone)]);

            // Member vertices in first-use order, so nothing is loose.
            let mut seen = HashSet::new();
            let mut vertices = Vec::new();
            for &pid in &polygons {
                for &v in &store.polygon(pid)?.vertices {
                    if seen.insert(v) {
                        vertices.push(v);
                    }
                }
            }

            tracing::debug!(
                %zone,
                polygons = polygons.len(),
                vertices = vertices.len(),
                "partitioned zone"
            );

            let mut mesh = MeshData::new(zone.object_name());
            mesh.transform = source.transform;
            mesh.vertices = vertices;
            mesh.polygons = polygons;
            ids[slot(zone)] = store.add_mesh(mesh);
        }

        Ok(ZonePartition {
            sleeves: ids[slot(Zone::Sleeves)],
            front: ids[slot(Zone::Front)],
            back: ids[slot(Zone::Back)],
            discarded,
        })
    }
}

fn slot(zone: Zone) -> usize {
    match zone {
        Zone::Sleeves => 0,
        Zone::Front => 1,
        Zone::Back => 2,
    }
}
