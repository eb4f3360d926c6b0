use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3};
use crate::topology::{MeshId, MeshStore};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Size of the box along each axis.
    #[must_use]
    pub fn extent(&self) -> Vector3 {
        self.max - self.min
    }

    fn grow(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }
}

/// Computes the axis-aligned bounding box of a mesh's member vertices.
pub struct BoundingBox {
    mesh: MeshId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(mesh: MeshId) -> Self {
        Self { mesh }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh has no vertices or references a
    /// vertex that is not in the store.
    pub fn execute(&self, store: &MeshStore) -> Result<Aabb> {
        let mesh = store.mesh(self.mesh)?;
        let mut ids = mesh.vertices.iter();
        let Some(&first) = ids.next() else {
            return Err(
                GeometryError::Degenerate(format!("mesh '{}' has no vertices", mesh.name)).into(),
            );
        };

        let start = store.vertex(first)?.point;
        let mut aabb = Aabb {
            min: start,
            max: start,
        };
        for &id in ids {
            aabb.grow(&store.vertex(id)?.point);
        }
        Ok(aabb)
    }
}
