//! GLB scene import and export.

mod export;
mod glb;
mod import;

pub use export::ExportGlb;
pub use import::{ImportGlb, ImportedScene};

/// Coordinate frame used for mesh data held in the store.
///
/// glTF files are Y-up. Modeling applications commonly work Z-up, with Y
/// as the front/back depth axis, and zone classification reads Y in that
/// sense. [`AxisConvention::ZUp`] converts on import and converts back on
/// export so files round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisConvention {
    /// Convert glTF Y-up data to Z-up: `(x, y, z) -> (x, -z, y)`.
    #[default]
    ZUp,
    /// Keep the file's coordinates as they are.
    Native,
}

impl AxisConvention {
    pub(crate) fn to_store(self, p: [f64; 3]) -> [f64; 3] {
        match self {
            AxisConvention::ZUp => crate::math::y_up_to_z_up(p),
            AxisConvention::Native => p,
        }
    }

    pub(crate) fn to_file(self, p: [f64; 3]) -> [f64; 3] {
        match self {
            AxisConvention::ZUp => crate::math::z_up_to_y_up(p),
            AxisConvention::Native => p,
        }
    }
}
