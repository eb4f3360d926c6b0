use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use gltf_json as json;
use gltf_json::validation::Checked::Valid;

use crate::error::{IoError, Result, TopologyError};
use crate::topology::{
    ImageId, ImageSource, MaterialId, MeshData, MeshId, MeshStore, Transform, VertexId,
};

use super::glb::{assemble_glb, index, BufferBuilder};
use super::AxisConvention;

const GENERATOR: &str = concat!("garment-zones ", env!("CARGO_PKG_VERSION"));

/// Writes a set of meshes to a single binary glTF file.
///
/// Each mesh becomes one node and one glTF mesh named after it, in the
/// order the meshes were added. Polygons are fan-triangulated and written
/// with `u32` indices, one primitive per material. Embedded images go into
/// the binary chunk; URI images keep their URI.
pub struct ExportGlb {
    path: PathBuf,
    meshes: Vec<MeshId>,
    axes: AxisConvention,
}

impl ExportGlb {
    /// Creates a new `ExportGlb` operation with no meshes.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            meshes: Vec::new(),
            axes: AxisConvention::default(),
        }
    }

    /// Adds a mesh to the export.
    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshId) -> Self {
        self.meshes.push(mesh);
        self
    }

    /// Sets the coordinate frame the store's meshes are in.
    #[must_use]
    pub fn with_axes(mut self, axes: AxisConvention) -> Self {
        self.axes = axes;
        self
    }

    /// Executes the export, creating parent directories as needed.
    ///
    /// A mesh without polygons is written as a node with no geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if a mesh or one of its entities is missing, a
    /// polygon uses a vertex outside its mesh, or the file cannot be
    /// written.
    pub fn execute(&self, store: &MeshStore) -> Result<()> {
        let mut scene = SceneWriter::default();
        let mut nodes: Vec<json::Node> = Vec::new();

        for &id in &self.meshes {
            let mesh = store.mesh(id)?;
            let node_mesh = if mesh.polygons.is_empty() {
                tracing::warn!(mesh = %mesh.name, "mesh has no polygons, exporting empty node");
                None
            } else {
                Some(scene.write_mesh(store, mesh, self.axes)?)
            };
            nodes.push(make_node(&mesh.name, node_mesh, &mesh.transform));
        }

        let scene_nodes = (0..nodes.len()).map(index).collect::<Result<Vec<_>>>()?;
        let (buffers, buffer_views, accessors, data) = scene.buffer.finish();
        let root = json::Root {
            accessors,
            animations: Vec::new(),
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some(GENERATOR.to_string()),
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers,
            buffer_views,
            cameras: Vec::new(),
            extensions: Default::default(),
            extensions_required: Vec::new(),
            extensions_used: Vec::new(),
            extras: Default::default(),
            images: scene.images,
            materials: scene.materials,
            meshes: scene.meshes,
            nodes,
            samplers: Vec::new(),
            scene: Some(json::Index::new(0)),
            scenes: vec![json::Scene {
                extensions: Default::default(),
                extras: Default::default(),
                name: Some("Scene".to_string()),
                nodes: scene_nodes,
            }],
            skins: Vec::new(),
            textures: scene.textures,
        };

        let glb = assemble_glb(&root, &data)?;
        let write_err = |source: std::io::Error| IoError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, &glb).map_err(write_err)?;

        tracing::info!(
            path = %self.path.display(),
            meshes = self.meshes.len(),
            materials = root.materials.len(),
            images = root.images.len(),
            bytes = glb.len(),
            "exported scene"
        );
        Ok(())
    }
}

/// glTF collections being filled for one output file. Materials and images
/// shared between meshes are written once.
#[derive(Default)]
struct SceneWriter {
    buffer: BufferBuilder,
    meshes: Vec<json::Mesh>,
    materials: Vec<json::Material>,
    material_slots: HashMap<MaterialId, json::Index<json::Material>>,
    images: Vec<json::Image>,
    textures: Vec<json::Texture>,
    texture_slots: HashMap<ImageId, json::Index<json::Texture>>,
}

impl SceneWriter {
    /// Writes one glTF mesh with a primitive per material. The primitives
    /// share the mesh's vertex attributes and differ only in indices.
    fn write_mesh(
        &mut self,
        store: &MeshStore,
        mesh: &MeshData,
        axes: AxisConvention,
    ) -> Result<json::Index<json::Mesh>> {
        let mut local: HashMap<VertexId, u32> = HashMap::with_capacity(mesh.vertices.len());
        let mut positions = Vec::with_capacity(mesh.vertices.len());
        let mut normals = Some(Vec::with_capacity(mesh.vertices.len()));
        let mut uvs = Some(Vec::with_capacity(mesh.vertices.len()));

        for (i, &vid) in mesh.vertices.iter().enumerate() {
            let vertex = store.vertex(vid)?;
            local.insert(vid, u32::try_from(i).map_err(|_| IoError::TooLarge(i))?);
            positions.push(narrow3(axes.to_file(vertex.point.coords.into())));
            normals = normals.zip(vertex.normal).map(|(mut acc, n)| {
                acc.push(narrow3(axes.to_file(n.into())));
                acc
            });
            uvs = uvs.zip(vertex.uv).map(|(mut acc, uv)| {
                acc.push(narrow2(uv.coords.into()));
                acc
            });
        }

        // Fan-triangulated indices per material, in first-use order.
        let mut groups: Vec<(Option<MaterialId>, Vec<u32>)> = Vec::new();
        for &pid in &mesh.polygons {
            let polygon = store.polygon(pid)?;
            let corners = polygon
                .vertices
                .iter()
                .map(|v| {
                    local.get(v).copied().ok_or_else(|| {
                        TopologyError::InvalidTopology(format!(
                            "polygon of '{}' uses a vertex outside the mesh",
                            mesh.name
                        ))
                    })
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let slot = match groups.iter().position(|(m, _)| *m == polygon.material) {
                Some(slot) => slot,
                None => {
                    groups.push((polygon.material, Vec::new()));
                    groups.len() - 1
                }
            };
            let indices = &mut groups[slot].1;
            for pair in corners[1..].windows(2) {
                indices.extend_from_slice(&[corners[0], pair[0], pair[1]]);
            }
        }

        let mut attributes = BTreeMap::new();
        attributes.insert(
            Valid(json::mesh::Semantic::Positions),
            self.buffer.pack_positions(&positions)?,
        );
        if let Some(normals) = normals.filter(|n| !n.is_empty()) {
            attributes.insert(
                Valid(json::mesh::Semantic::Normals),
                self.buffer.pack_vec3(&normals)?,
            );
        }
        if let Some(uvs) = uvs.filter(|t| !t.is_empty()) {
            attributes.insert(
                Valid(json::mesh::Semantic::TexCoords(0)),
                self.buffer.pack_vec2(&uvs)?,
            );
        }

        let mut primitives = Vec::with_capacity(groups.len());
        for (material, indices) in groups {
            let material = match material {
                Some(mid) => Some(self.material(store, mid)?),
                None => None,
            };
            primitives.push(json::mesh::Primitive {
                attributes: attributes.clone(),
                extensions: Default::default(),
                extras: Default::default(),
                indices: Some(self.buffer.pack_indices(&indices)?),
                material,
                mode: Valid(json::mesh::Mode::Triangles),
                targets: None,
            });
        }

        let slot = index(self.meshes.len())?;
        self.meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(mesh.name.clone()),
            primitives,
            weights: None,
        });
        Ok(slot)
    }

    fn material(
        &mut self,
        store: &MeshStore,
        id: MaterialId,
    ) -> Result<json::Index<json::Material>> {
        if let Some(&slot) = self.material_slots.get(&id) {
            return Ok(slot);
        }
        let material = store.material(id)?;
        let base_color_texture = match material.base_color_texture {
            Some(image) => Some(json::texture::Info {
                index: self.texture(store, image)?,
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            None => None,
        };

        let slot = index(self.materials.len())?;
        self.materials.push(json::Material {
            name: material.name.clone(),
            double_sided: material.double_sided,
            pbr_metallic_roughness: json::material::PbrMetallicRoughness {
                base_color_factor: json::material::PbrBaseColorFactor(material.base_color),
                base_color_texture,
                metallic_factor: json::material::StrengthFactor(material.metallic),
                roughness_factor: json::material::StrengthFactor(material.roughness),
                ..Default::default()
            },
            ..Default::default()
        });
        self.material_slots.insert(id, slot);
        Ok(slot)
    }

    fn texture(&mut self, store: &MeshStore, id: ImageId) -> Result<json::Index<json::Texture>> {
        if let Some(&slot) = self.texture_slots.get(&id) {
            return Ok(slot);
        }
        let image = store.image(id)?;
        let (buffer_view, mime_type, uri) = match &image.source {
            ImageSource::Embedded { mime_type, bytes } => (
                Some(self.buffer.pack_image(bytes)?),
                Some(json::image::MimeType(mime_type.clone())),
                None,
            ),
            ImageSource::Uri(uri) => (None, None, Some(uri.clone())),
        };

        let source = index(self.images.len())?;
        self.images.push(json::Image {
            buffer_view,
            mime_type,
            name: image.name.clone(),
            uri,
            extensions: Default::default(),
            extras: Default::default(),
        });
        let slot = index(self.textures.len())?;
        self.textures.push(json::Texture {
            name: None,
            sampler: None,
            source,
            extensions: Default::default(),
            extras: Default::default(),
        });
        self.texture_slots.insert(id, slot);
        Ok(slot)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn make_node(
    name: &str,
    mesh: Option<json::Index<json::Mesh>>,
    transform: &Transform,
) -> json::Node {
    let (translation, rotation, scale) = if transform.is_identity() {
        (None, None, None)
    } else {
        let q = transform.rotation.quaternion();
        (
            Some(narrow3(transform.translation.into())),
            Some(json::scene::UnitQuaternion([
                q.i as f32, q.j as f32, q.k as f32, q.w as f32,
            ])),
            Some(narrow3(transform.scale.into())),
        )
    };

    json::Node {
        camera: None,
        children: None,
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh,
        name: Some(name.to_string()),
        rotation,
        scale,
        skin: None,
        translation,
        weights: None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn narrow3(v: [f64; 3]) -> [f32; 3] {
    [v[0] as f32, v[1] as f32, v[2] as f32]
}

#[allow(clippy::cast_possible_truncation)]
fn narrow2(v: [f64; 2]) -> [f32; 2] {
    [v[0] as f32, v[1] as f32]
}
