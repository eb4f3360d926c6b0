use super::image::ImageId;

slotmap::new_key_type! {
    /// Unique identifier for a material in the mesh store.
    pub struct MaterialId;
}

/// Surface material carried from the source scene to the exported zones.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    /// Material name, if any.
    pub name: Option<String>,
    /// Linear RGBA base colour factor.
    pub base_color: [f32; 4],
    /// Metalness factor in `[0, 1]`.
    pub metallic: f32,
    /// Roughness factor in `[0, 1]`.
    pub roughness: f32,
    /// Whether back faces are rendered.
    pub double_sided: bool,
    /// Base colour texture, sampled with the first UV set.
    pub base_color_texture: Option<ImageId>,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0; 4],
            metallic: 1.0,
            roughness: 1.0,
            double_sided: false,
            base_color_texture: None,
        }
    }
}
