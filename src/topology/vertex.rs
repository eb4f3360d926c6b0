use crate::math::{Point2, Point3, Vector3};

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the mesh store.
    pub struct VertexId;
}

/// Data associated with a mesh vertex.
///
/// Normal and UV are carried through the pipeline untouched; only the
/// position takes part in zone classification.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
    /// Shading normal, if the source provided one.
    pub normal: Option<Vector3>,
    /// First texture coordinate set, if the source provided one.
    pub uv: Option<Point2>,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            normal: None,
            uv: None,
        }
    }

    /// Attaches a shading normal.
    #[must_use]
    pub fn with_normal(mut self, normal: Vector3) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Attaches a texture coordinate.
    #[must_use]
    pub fn with_uv(mut self, uv: Point2) -> Self {
        self.uv = Some(uv);
        self
    }
}
