use std::path::PathBuf;

use crate::io::AxisConvention;
use crate::operations::classify::DEFAULT_SLEEVE_RATIO;

/// Default input scene, relative to the working directory.
pub const DEFAULT_INPUT: &str = "public/models/shirt.glb";

/// Default output scene, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "public/models/shirt-zones.glb";

/// How the three zone meshes are derived from the source mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Classify every polygon once and build the zones as index sets.
    #[default]
    Partition,
    /// Duplicate the source twice, then trim each copy to its zone.
    DuplicateAndTrim,
}

/// Settings for [`SeparateZones`](super::SeparateZones).
#[derive(Debug, Clone)]
pub struct SeparateConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Fraction of the X span beyond which a polygon is a sleeve.
    pub threshold_ratio: f64,
    pub strategy: Strategy,
    pub axes: AxisConvention,
}

impl Default for SeparateConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            threshold_ratio: DEFAULT_SLEEVE_RATIO,
            strategy: Strategy::default(),
            axes: AxisConvention::default(),
        }
    }
}

impl SeparateConfig {
    /// Sets the input scene path.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Sets the output scene path.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Sets the sleeve threshold ratio.
    #[must_use]
    pub fn with_threshold_ratio(mut self, ratio: f64) -> Self {
        self.threshold_ratio = ratio;
        self
    }

    /// Sets the zone derivation strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the coordinate frame used for classification.
    #[must_use]
    pub fn with_axes(mut self, axes: AxisConvention) -> Self {
        self.axes = axes;
        self
    }
}
