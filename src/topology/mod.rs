pub mod image;
pub mod material;
pub mod mesh;
pub mod polygon;
pub mod vertex;

pub use image::{ImageData, ImageId, ImageSource};
pub use material::{MaterialData, MaterialId};
pub use mesh::{MeshData, MeshId, Transform};
pub use polygon::{PolygonData, PolygonId};
pub use vertex::{VertexData, VertexId};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Central arena that owns all mesh entities.
///
/// Entities reference each other via typed IDs (generational indices).
/// Meshes are index sets over the shared vertex and polygon arenas, so a
/// mesh can be derived from another without copying vertex data.
#[derive(Debug, Default)]
pub struct MeshStore {
    vertices: SlotMap<VertexId, VertexData>,
    polygons: SlotMap<PolygonId, PolygonData>,
    meshes: SlotMap<MeshId, MeshData>,
    materials: SlotMap<MaterialId, MaterialData>,
    images: SlotMap<ImageId, ImageData>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Removes a vertex from the arena.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<VertexData> {
        self.vertices.remove(id)
    }

    /// Returns `true` if the vertex still exists.
    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    /// Number of vertices in the arena, across all meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Polygon operations ---

    /// Inserts a polygon and returns its ID.
    pub fn add_polygon(&mut self, data: PolygonData) -> PolygonId {
        self.polygons.insert(data)
    }

    /// Returns a reference to the polygon data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn polygon(&self, id: PolygonId) -> Result<&PolygonData, TopologyError> {
        self.polygons
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("polygon".into()))
    }

    /// Removes a polygon from the arena.
    pub fn remove_polygon(&mut self, id: PolygonId) -> Option<PolygonData> {
        self.polygons.remove(id)
    }

    /// Number of polygons in the arena, across all meshes.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    // --- Mesh operations ---

    /// Inserts a mesh and returns its ID.
    pub fn add_mesh(&mut self, data: MeshData) -> MeshId {
        self.meshes.insert(data)
    }

    /// Returns a reference to the mesh data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn mesh(&self, id: MeshId) -> Result<&MeshData, TopologyError> {
        self.meshes
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("mesh".into()))
    }

    /// Returns a mutable reference to the mesh data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn mesh_mut(&mut self, id: MeshId) -> Result<&mut MeshData, TopologyError> {
        self.meshes
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("mesh".into()))
    }

    /// Iterates over all meshes.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &MeshData)> {
        self.meshes.iter()
    }

    // --- Material operations ---

    /// Inserts a material and returns its ID.
    pub fn add_material(&mut self, data: MaterialData) -> MaterialId {
        self.materials.insert(data)
    }

    /// Returns a reference to the material data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn material(&self, id: MaterialId) -> Result<&MaterialData, TopologyError> {
        self.materials
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("material".into()))
    }

    // --- Image operations ---

    /// Inserts a texture image and returns its ID.
    pub fn add_image(&mut self, data: ImageData) -> ImageId {
        self.images.insert(data)
    }

    /// Returns a reference to the image data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn image(&self, id: ImageId) -> Result<&ImageData, TopologyError> {
        self.images
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("image".into()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    #[test]
    fn stale_ids_are_reported() {
        let mut store = MeshStore::new();
        let v = store.add_vertex(VertexData::new(Point3::origin()));
        store.remove_vertex(v);
        assert!(matches!(
            store.vertex(v),
            Err(TopologyError::EntityNotFound(_))
        ));
    }

    #[test]
    fn material_references_stored_image() {
        let mut store = MeshStore::new();
        let image = store.add_image(ImageData {
            name: Some("weave".into()),
            source: ImageSource::Uri("weave.png".into()),
        });
        let material = store.add_material(MaterialData {
            base_color_texture: Some(image),
            ..MaterialData::default()
        });

        let texture = store.material(material).unwrap().base_color_texture.unwrap();
        assert_eq!(store.image(texture).unwrap().name.as_deref(), Some("weave"));
    }

    #[test]
    fn short_polygon_is_rejected() {
        let mut store = MeshStore::new();
        let a = store.add_vertex(VertexData::new(Point3::origin()));
        let b = store.add_vertex(VertexData::new(Point3::new(1.0, 0.0, 0.0)));
        let err = PolygonData::new(vec![a, b]).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidPolygon { vertices: 2 }));
    }
}
