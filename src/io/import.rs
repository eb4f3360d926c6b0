use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{IoError, OperationError, Result};
use crate::math::{Rotation, Vector3};
use crate::operations::creation::MakeMesh;
use crate::topology::{
    ImageData, ImageId, ImageSource, MaterialData, MaterialId, MeshId, MeshStore, Transform,
};

use super::AxisConvention;

/// Result of importing a scene file.
#[derive(Debug, Clone)]
pub struct ImportedScene {
    /// The imported mesh object.
    pub mesh: MeshId,
    /// Number of mesh-carrying nodes in the scene; only the first is used.
    pub mesh_objects: usize,
}

/// Imports the first mesh object of a glTF/GLB scene into the store.
pub struct ImportGlb {
    path: PathBuf,
    axes: AxisConvention,
}

impl ImportGlb {
    /// Creates a new `ImportGlb` operation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            axes: AxisConvention::default(),
        }
    }

    /// Sets the coordinate frame the mesh is stored in.
    #[must_use]
    pub fn with_axes(mut self, axes: AxisConvention) -> Self {
        self.axes = axes;
        self
    }

    /// Executes the import.
    ///
    /// The scene graph is walked depth first, starting from the default
    /// scene (or the first scene, or every node when the file has no
    /// scenes). The first node that carries a mesh becomes the imported
    /// object. All triangle primitives of its mesh are merged into one
    /// store mesh whose polygons keep their primitive's material. Base
    /// colour images are carried as encoded bytes or as their URI.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NoMeshFound`] if no node carries a mesh,
    /// or an I/O error if the file cannot be read or a primitive lacks
    /// positions.
    pub fn execute(&self, store: &mut MeshStore) -> Result<ImportedScene> {
        let read_err = |source: gltf::Error| IoError::Read {
            path: self.path.clone(),
            source,
        };
        // Buffers only: images are carried as encoded bytes, never decoded.
        let gltf::Gltf { document, blob } = gltf::Gltf::open(&self.path).map_err(read_err)?;
        let buffers =
            gltf::import_buffers(&document, self.path.parent(), blob).map_err(read_err)?;

        let mesh_objects = document.nodes().filter(|n| n.mesh().is_some()).count();
        let scene = document.default_scene().or_else(|| document.scenes().next());
        let node = match scene {
            Some(scene) => first_mesh_node(scene.nodes()),
            None => document.nodes().find(|n| n.mesh().is_some()),
        };
        let Some((node, mesh)) = node.and_then(|n| n.mesh().map(|m| (n, m))) else {
            tracing::error!(path = %self.path.display(), "no mesh found in imported model");
            return Err(OperationError::NoMeshFound.into());
        };

        let mut materials = MaterialImporter::new(&buffers);
        let mut geometry = Geometry::default();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::warn!(
                    mode = ?primitive.mode(),
                    "skipping non-triangle primitive"
                );
                continue;
            }
            let material = materials.import(store, &primitive.material())?;

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or(IoError::MissingAttribute("POSITION"))?
                .collect();
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
            let uvs: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect());
            let count =
                u32::try_from(positions.len()).map_err(|_| IoError::TooLarge(positions.len()))?;
            let indices: Vec<u32> = match reader.read_indices() {
                Some(iter) => iter.into_u32().collect(),
                None => (0..count).collect(),
            };

            geometry.append(self.axes, &positions, normals, uvs, &indices, material)?;
        }

        let name = node
            .name()
            .or_else(|| mesh.name())
            .unwrap_or("mesh")
            .to_string();

        let mut op = MakeMesh::new(name.clone())
            .positions(&geometry.positions)
            .transform(convert_transform(node.transform()));
        for (material, triangles) in &geometry.groups {
            op = match material {
                Some(material) => op.triangles_with_material(triangles, *material),
                None => op.triangles(triangles),
            };
        }
        if let Some(normals) = geometry.normals.as_deref() {
            op = op.normals(normals);
        }
        if let Some(uvs) = geometry.uvs.as_deref() {
            op = op.uvs(uvs);
        }
        let id = op.execute(store)?;

        tracing::info!(
            path = %self.path.display(),
            mesh = %name,
            vertices = geometry.positions.len(),
            polygons = store.mesh(id)?.polygons.len(),
            primitives = geometry.groups.len(),
            materials = materials.by_index.len(),
            mesh_objects,
            "imported mesh"
        );
        Ok(ImportedScene {
            mesh: id,
            mesh_objects,
        })
    }
}

/// Depth-first search for the first node carrying a mesh.
fn first_mesh_node<'a>(
    nodes: impl Iterator<Item = gltf::Node<'a>>,
) -> Option<gltf::Node<'a>> {
    for node in nodes {
        if node.mesh().is_some() {
            return Some(node);
        }
        if let Some(found) = first_mesh_node(node.children()) {
            return Some(found);
        }
    }
    None
}

/// Merged vertex data of all triangle primitives of one mesh.
///
/// An optional attribute survives only if every primitive provides it.
/// Triangles stay grouped by primitive so each keeps its material.
#[derive(Default)]
struct Geometry {
    positions: Vec<[f64; 3]>,
    normals: Option<Vec<[f64; 3]>>,
    uvs: Option<Vec<[f64; 2]>>,
    groups: Vec<(Option<MaterialId>, Vec<[u32; 3]>)>,
}

impl Geometry {
    fn append(
        &mut self,
        axes: AxisConvention,
        positions: &[[f32; 3]],
        normals: Option<Vec<[f32; 3]>>,
        uvs: Option<Vec<[f32; 2]>>,
        indices: &[u32],
        material: Option<MaterialId>,
    ) -> Result<()> {
        let count = positions.len();
        let base = u32::try_from(self.positions.len())
            .map_err(|_| IoError::TooLarge(self.positions.len()))?;
        if let Some(&i) = indices.iter().find(|&&i| i as usize >= count) {
            return Err(OperationError::InvalidInput(format!(
                "primitive index {i} out of range for {count} vertices"
            ))
            .into());
        }

        let first = self.groups.is_empty();

        self.positions.extend(positions.iter().map(|p| axes.to_store(widen3(*p))));
        let normals = normals
            .filter(|n| n.len() == count)
            .map(|n| n.iter().map(|v| axes.to_store(widen3(*v))).collect());
        self.normals = merge_attribute(first, self.normals.take(), normals);
        let uvs = uvs
            .filter(|t| t.len() == count)
            .map(|t| t.iter().map(|uv| [f64::from(uv[0]), f64::from(uv[1])]).collect());
        self.uvs = merge_attribute(first, self.uvs.take(), uvs);

        if indices.len() % 3 != 0 {
            tracing::warn!(
                indices = indices.len(),
                "index count is not a multiple of 3, dropping the remainder"
            );
        }
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| [base + tri[0], base + tri[1], base + tri[2]])
            .collect();
        self.groups.push((material, triangles));
        Ok(())
    }
}

fn merge_attribute<T>(first: bool, acc: Option<Vec<T>>, next: Option<Vec<T>>) -> Option<Vec<T>> {
    match (first, acc, next) {
        (true, _, next) => next,
        (false, Some(mut acc), Some(next)) => {
            acc.extend(next);
            Some(acc)
        }
        _ => None,
    }
}

fn widen3(v: [f32; 3]) -> [f64; 3] {
    [f64::from(v[0]), f64::from(v[1]), f64::from(v[2])]
}

/// Converts glTF materials and their base colour images on first use, so
/// primitives sharing a material share one store entry.
struct MaterialImporter<'a> {
    buffers: &'a [gltf::buffer::Data],
    by_index: HashMap<usize, MaterialId>,
    images: HashMap<usize, ImageId>,
}

impl<'a> MaterialImporter<'a> {
    fn new(buffers: &'a [gltf::buffer::Data]) -> Self {
        Self {
            buffers,
            by_index: HashMap::new(),
            images: HashMap::new(),
        }
    }

    /// Returns `None` for glTF's implicit default material.
    fn import(
        &mut self,
        store: &mut MeshStore,
        material: &gltf::Material<'_>,
    ) -> Result<Option<MaterialId>> {
        let Some(index) = material.index() else {
            return Ok(None);
        };
        if let Some(&id) = self.by_index.get(&index) {
            return Ok(Some(id));
        }

        let pbr = material.pbr_metallic_roughness();
        let base_color_texture = match pbr.base_color_texture() {
            Some(info) => {
                if info.tex_coord() != 0 {
                    tracing::warn!(
                        material = index,
                        tex_coord = info.tex_coord(),
                        "base colour texture will be sampled with TEXCOORD_0"
                    );
                }
                Some(self.image(store, &info.texture().source())?)
            }
            None => None,
        };
        if pbr.metallic_roughness_texture().is_some()
            || material.normal_texture().is_some()
            || material.occlusion_texture().is_some()
            || material.emissive_texture().is_some()
        {
            tracing::warn!(
                material = index,
                "dropping texture maps other than base colour"
            );
        }

        let id = store.add_material(MaterialData {
            name: material.name().map(str::to_string),
            base_color: pbr.base_color_factor(),
            metallic: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
            double_sided: material.double_sided(),
            base_color_texture,
        });
        self.by_index.insert(index, id);
        Ok(Some(id))
    }

    fn image(&mut self, store: &mut MeshStore, image: &gltf::Image<'_>) -> Result<ImageId> {
        if let Some(&id) = self.images.get(&image.index()) {
            return Ok(id);
        }
        let source = match image.source() {
            gltf::image::Source::View { view, mime_type } => {
                let start = view.offset();
                let bytes = self
                    .buffers
                    .get(view.buffer().index())
                    .and_then(|buffer| buffer.get(start..start + view.length()))
                    .ok_or_else(|| {
                        IoError::Malformed(format!(
                            "image {} lies outside its buffer",
                            image.index()
                        ))
                    })?;
                ImageSource::Embedded {
                    mime_type: mime_type.to_string(),
                    bytes: bytes.to_vec(),
                }
            }
            gltf::image::Source::Uri { uri, .. } => ImageSource::Uri(uri.to_string()),
        };
        let id = store.add_image(ImageData {
            name: image.name().map(str::to_string),
            source,
        });
        self.images.insert(image.index(), id);
        Ok(id)
    }
}

/// Node transforms are kept in the file's frame; export writes them back
/// unchanged.
fn convert_transform(transform: gltf::scene::Transform) -> Transform {
    let (t, r, s) = transform.decomposed();
    let q = nalgebra::Quaternion::new(
        f64::from(r[3]),
        f64::from(r[0]),
        f64::from(r[1]),
        f64::from(r[2]),
    );
    Transform {
        translation: Vector3::from(widen3(t)),
        rotation: Rotation::from_quaternion(q),
        scale: Vector3::from(widen3(s)),
    }
}
