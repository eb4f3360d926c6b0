slotmap::new_key_type! {
    /// Unique identifier for a texture image in the mesh store.
    pub struct ImageId;
}

/// Where the encoded image bytes live.
///
/// Images are carried through as-is; nothing is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded bytes that were stored inside the source file.
    Embedded { mime_type: String, bytes: Vec<u8> },
    /// External or `data:` URI, written back unchanged.
    Uri(String),
}

/// A texture image referenced by a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub name: Option<String>,
    pub source: ImageSource,
}
