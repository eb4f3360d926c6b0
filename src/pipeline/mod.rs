//! End-to-end zone separation: import, classify, trim, clean, export.

mod config;

pub use config::{SeparateConfig, Strategy, DEFAULT_INPUT, DEFAULT_OUTPUT};

use crate::error::{Result, TopologyError};
use crate::io::{ExportGlb, ImportGlb};
use crate::operations::classify::{Zone, ZoneClassifier};
use crate::operations::modification::{
    DeletePolygons, Duplicate, PartitionByZone, RemoveLooseVertices, ZonePartition,
};
use crate::operations::query::{Aabb, BoundingBox, IsValid};
use crate::topology::{MeshId, MeshStore};

/// Polygon and vertex counts of one exported zone mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneStats {
    pub zone: Zone,
    pub polygons: usize,
    pub vertices: usize,
}

/// Summary of a completed separation.
#[derive(Debug, Clone)]
pub struct SeparationReport {
    /// Bounds of the source mesh used for every classification.
    pub bounds: Aabb,
    /// Per-zone counts, in export order.
    pub zones: [ZoneStats; 3],
    /// Source polygons that fell into no zone.
    pub discarded: usize,
    /// Vertices dropped by loose-vertex cleanup, summed over all zones.
    pub loose_removed: usize,
}

impl SeparationReport {
    /// Returns the counts for one zone.
    #[must_use]
    pub fn zone(&self, zone: Zone) -> &ZoneStats {
        match zone {
            Zone::Sleeves => &self.zones[0],
            Zone::Front => &self.zones[1],
            Zone::Back => &self.zones[2],
        }
    }
}

/// Splits the first mesh of a scene file into sleeve, front and back
/// meshes and writes them to a new scene file.
///
/// Nothing is written unless every step succeeds.
pub struct SeparateZones {
    config: SeparateConfig,
}

impl SeparateZones {
    /// Creates a new `SeparateZones` pipeline.
    #[must_use]
    pub fn new(config: SeparateConfig) -> Self {
        Self { config }
    }

    /// Runs the whole pipeline from input file to output file.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NoMeshFound`](crate::error::OperationError::NoMeshFound)
    /// if the input has no mesh, a geometry error if its bounds are
    /// degenerate, or any I/O error from reading or writing.
    pub fn execute(&self) -> Result<SeparationReport> {
        tracing::info!(
            input = %self.config.input.display(),
            output = %self.config.output.display(),
            strategy = ?self.config.strategy,
            "separating garment zones"
        );

        let mut store = MeshStore::new();
        let imported = ImportGlb::new(&self.config.input)
            .with_axes(self.config.axes)
            .execute(&mut store)?;
        if imported.mesh_objects > 1 {
            tracing::info!(
                mesh_objects = imported.mesh_objects,
                "scene has several mesh objects, using the first"
            );
        }

        let (zones, report) = self.separate(&mut store, imported.mesh)?;

        let mut export = ExportGlb::new(&self.config.output).with_axes(self.config.axes);
        for (_, id) in zones.iter() {
            export = export.with_mesh(id);
        }
        export.execute(&store)?;

        tracing::info!(
            output = %self.config.output.display(),
            "meshes created: sleeves, front_torso, back_torso"
        );
        Ok(report)
    }

    /// Derives, cleans and validates the three zone meshes of `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source bounds are degenerate, the threshold
    /// ratio is out of range, or a resulting mesh fails validation.
    pub fn separate(
        &self,
        store: &mut MeshStore,
        source: MeshId,
    ) -> Result<(ZonePartition, SeparationReport)> {
        let bounds = BoundingBox::new(source).execute(store)?;
        tracing::info!(
            "Mesh bounds - X: [{:.2}, {:.2}], Y: [{:.2}, {:.2}]",
            bounds.min.x,
            bounds.max.x,
            bounds.min.y,
            bounds.max.y
        );
        let classifier = ZoneClassifier::with_ratio(&bounds, self.config.threshold_ratio)?;
        tracing::debug!(threshold = classifier.threshold(), "sleeve threshold");

        let zones = match self.config.strategy {
            Strategy::Partition => PartitionByZone::new(source, classifier).execute(store)?,
            Strategy::DuplicateAndTrim => duplicate_and_trim(store, source, &classifier)?,
        };

        let mut loose_removed = 0;
        let mut stats = Vec::with_capacity(3);
        for (zone, id) in zones.iter() {
            loose_removed += RemoveLooseVertices::new(id).execute(store)?;
            if !IsValid::new(id).execute(store) {
                return Err(TopologyError::InvalidTopology(format!(
                    "zone mesh '{zone}' is inconsistent after cleanup"
                ))
                .into());
            }
            let mesh = store.mesh(id)?;
            tracing::info!(
                %zone,
                polygons = mesh.polygons.len(),
                vertices = mesh.vertices.len(),
                "zone ready"
            );
            stats.push(ZoneStats {
                zone,
                polygons: mesh.polygons.len(),
                vertices: mesh.vertices.len(),
            });
        }
        if zones.discarded > 0 {
            tracing::info!(
                discarded = zones.discarded,
                "polygons outside every zone were dropped"
            );
        }

        let report = SeparationReport {
            bounds,
            zones: [stats[0], stats[1], stats[2]],
            discarded: zones.discarded,
            loose_removed,
        };
        Ok((zones, report))
    }
}

/// Duplicates the source twice and trims each of the three meshes to its
/// zone. The source itself becomes the back torso.
fn duplicate_and_trim(
    store: &mut MeshStore,
    source: MeshId,
    classifier: &ZoneClassifier,
) -> Result<ZonePartition> {
    let total = store.mesh(source)?.polygons.len();

    let sleeves = Duplicate::new(source)
        .with_name(Zone::Sleeves.object_name())
        .execute(store)?;
    let front = Duplicate::new(source)
        .with_name(Zone::Front.object_name())
        .execute(store)?;
    store.mesh_mut(source)?.name = Zone::Back.object_name().to_string();
    let back = source;

    let mut kept = 0;
    for (zone, id) in [(Zone::Sleeves, sleeves), (Zone::Front, front), (Zone::Back, back)] {
        tracing::info!(%zone, "separating zone");
        DeletePolygons::new(id).execute(store, |c| !classifier.contains(zone, c))?;
        kept += store.mesh(id)?.polygons.len();
    }

    Ok(ZonePartition {
        sleeves,
        front,
        back,
        discarded: total - kept,
    })
}
