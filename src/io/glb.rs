//! Binary buffer packing and GLB container assembly.

use gltf_json as json;
use gltf_json::validation::Checked::Valid;

use crate::error::{IoError, Result};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Converts a collection length or position into a glTF index.
pub(crate) fn index<T>(i: usize) -> Result<json::Index<T>> {
    let i = u32::try_from(i).map_err(|_| IoError::TooLarge(i))?;
    Ok(json::Index::new(i))
}

/// Accumulates vertex and index data in a single binary buffer and
/// records the matching buffer views and accessors.
#[derive(Default)]
pub(crate) struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
}

impl BufferBuilder {
    /// Packs `VEC3` positions, recording min/max as glTF requires.
    pub(crate) fn pack_positions(
        &mut self,
        positions: &[[f32; 3]],
    ) -> Result<json::Index<json::Accessor>> {
        let (min, max) = positions.iter().fold(
            ([f32::INFINITY; 3], [f32::NEG_INFINITY; 3]),
            |(lo, hi), p| {
                (
                    std::array::from_fn(|i| lo[i].min(p[i])),
                    std::array::from_fn(|i| hi[i].max(p[i])),
                )
            },
        );
        self.pack(
            bytemuck::cast_slice(positions),
            positions.len(),
            json::accessor::Type::Vec3,
            json::accessor::ComponentType::F32,
            json::buffer::Target::ArrayBuffer,
            Some((min, max)),
        )
    }

    /// Stores encoded image bytes in their own buffer view.
    pub(crate) fn pack_image(
        &mut self,
        bytes: &[u8],
    ) -> Result<json::Index<json::buffer::View>> {
        self.push_view(bytes, None)
    }

    /// Packs `VEC3` data such as normals.
    pub(crate) fn pack_vec3(&mut self, data: &[[f32; 3]]) -> Result<json::Index<json::Accessor>> {
        self.pack(
            bytemuck::cast_slice(data),
            data.len(),
            json::accessor::Type::Vec3,
            json::accessor::ComponentType::F32,
            json::buffer::Target::ArrayBuffer,
            None,
        )
    }

    /// Packs `VEC2` data such as texture coordinates.
    pub(crate) fn pack_vec2(&mut self, data: &[[f32; 2]]) -> Result<json::Index<json::Accessor>> {
        self.pack(
            bytemuck::cast_slice(data),
            data.len(),
            json::accessor::Type::Vec2,
            json::accessor::ComponentType::F32,
            json::buffer::Target::ArrayBuffer,
            None,
        )
    }

    /// Packs `u32` triangle indices.
    pub(crate) fn pack_indices(&mut self, indices: &[u32]) -> Result<json::Index<json::Accessor>> {
        self.pack(
            bytemuck::cast_slice(indices),
            indices.len(),
            json::accessor::Type::Scalar,
            json::accessor::ComponentType::U32,
            json::buffer::Target::ElementArrayBuffer,
            None,
        )
    }

    fn pack(
        &mut self,
        bytes: &[u8],
        count: usize,
        type_: json::accessor::Type,
        component_type: json::accessor::ComponentType,
        target: json::buffer::Target,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> Result<json::Index<json::Accessor>> {
        let view = self.push_view(bytes, Some(target))?;

        let (min, max) = match bounds {
            Some((min, max)) => (Some(to_value(min)), Some(to_value(max))),
            None => (None, None),
        };
        let accessor = index(self.accessors.len())?;
        self.accessors.push(json::Accessor {
            buffer_view: Some(view),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });
        Ok(accessor)
    }

    /// Appends `bytes` at a 4-byte aligned offset and records a view of
    /// them.
    fn push_view(
        &mut self,
        bytes: &[u8],
        target: Option<json::buffer::Target>,
    ) -> Result<json::Index<json::buffer::View>> {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        self.data.resize(self.data.len().next_multiple_of(4), 0);

        let view = index(self.views.len())?;
        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len().into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: target.map(Valid),
        });
        Ok(view)
    }

        /// Splits the builder into buffer descriptors, views, accessors and the
    /// raw bytes.
    pub(crate) fn finish(
        self,
    ) -> (
        Vec<json::Buffer>,
        Vec<json::buffer::View>,
        Vec<json::Accessor>,
        Vec<u8>,
    ) {
        let buffers = if self.data.is_empty() {
            Vec::new()
        } else {
            vec![json::Buffer {
                byte_length: self.data.len().into(),
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                uri: None,
            }]
        };
        (buffers, self.views, self.accessors, self.data)
    }
}

fn to_value(v: [f32; 3]) -> json::Value {
    json::Value::Array(v.into_iter().map(json::Value::from).collect())
}

/// Assembles a GLB container from a document and its binary chunk.
///
/// The BIN chunk is omitted when `bin` is empty.
pub(crate) fn assemble_glb(root: &json::Root, bin: &[u8]) -> Result<Vec<u8>> {
    let json_string =
        json::serialize::to_string(root).map_err(|e| IoError::Serialize(e.to_string()))?;
    let json_bytes = json_string.as_bytes();

    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;

    let bin_padding = (4 - (bin.len() % 4)) % 4;
    let bin_chunk_length = bin.len() + bin_padding;

    let mut total_length = 12 + 8 + json_chunk_length;
    if !bin.is_empty() {
        total_length += 8 + bin_chunk_length;
    }
    let header_length = u32::try_from(total_length).map_err(|_| IoError::TooLarge(total_length))?;
    let json_length =
        u32::try_from(json_chunk_length).map_err(|_| IoError::TooLarge(json_chunk_length))?;
    let bin_length =
        u32::try_from(bin_chunk_length).map_err(|_| IoError::TooLarge(bin_chunk_length))?;

    let mut glb = Vec::with_capacity(total_length);

    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&header_length.to_le_bytes());

    glb.extend_from_slice(&json_length.to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat_n(b' ', json_padding));

    if !bin.is_empty() {
        glb.extend_from_slice(&bin_length.to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(bin);
        glb.extend(std::iter::repeat_n(0u8, bin_padding));
    }

    Ok(glb)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn position_accessor_records_extremes() {
        let mut builder = BufferBuilder::default();
        builder
            .pack_positions(&[[0.0, 4.0, -1.0], [2.0, -3.0, 1.0], [-1.0, 0.0, 0.5]])
            .unwrap();
        let (_, _, accessors, _) = builder.finish();

        let extreme = |v: &Option<json::Value>| -> [f32; 3] {
            json::deserialize::from_value(v.clone().unwrap()).unwrap()
        };
        let (min, max) = (extreme(&accessors[0].min), extreme(&accessors[0].max));
        assert_eq!(min, [-1.0, -3.0, -1.0]);
        assert_eq!(max, [2.0, 4.0, 1.0]);
    }

    #[test]
    fn image_view_has_no_target_and_stays_aligned() {
        let mut builder = BufferBuilder::default();
        let image = builder.pack_image(b"PNG").unwrap();
        let indices = builder.pack_indices(&[0, 1, 2]).unwrap();
        let (_, views, accessors, data) = builder.finish();

        assert_eq!(image.value(), 0);
        assert!(views[0].target.is_none());
        assert_eq!(views[0].byte_length.0, 3);
        assert_eq!(views[1].byte_offset.map(|o| o.0), Some(4));
        assert_eq!(accessors[indices.value()].buffer_view.map(|v| v.value()), Some(1));
        assert_eq!(data.len(), 16);
    }

    #[test]
    fn packed_accessors_point_at_aligned_views() {
        let mut builder = BufferBuilder::default();
        let positions = builder
            .pack_positions(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]])
            .unwrap();
        let uvs = builder.pack_vec2(&[[0.5, 0.5]]).unwrap();
        let (buffers, views, accessors, data) = builder.finish();

        assert_eq!(positions.value(), 0);
        assert_eq!(uvs.value(), 1);
        assert_eq!(buffers.len(), 1);
        assert_eq!(data.len(), 24 + 8);
        assert_eq!(views[1].byte_offset.map(|o| o.0), Some(24));
        assert!(accessors[0].min.is_some());
        assert!(accessors[1].min.is_none());
    }

    #[test]
    fn header_records_total_length() {
        let root = json::Root::default();
        let glb = assemble_glb(&root, &[1, 2, 3, 4, 5]).unwrap();

        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes(glb[4..8].try_into().unwrap()), 2);
        assert_eq!(
            u32::from_le_bytes(glb[8..12].try_into().unwrap()) as usize,
            glb.len()
        );
        assert_eq!(glb.len() % 4, 0);
    }

    #[test]
    fn empty_bin_chunk_is_omitted() {
        let root = json::Root::default();
        let glb = assemble_glb(&root, &[]).unwrap();
        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        assert_eq!(glb.len(), 20 + json_len);
    }
}
