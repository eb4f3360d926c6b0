use crate::error::{GeometryError, OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::operations::query::Aabb;

use super::Zone;

/// Fraction of the total X span a centroid must be away from the center
/// to count as a sleeve.
pub const DEFAULT_SLEEVE_RATIO: f64 = 0.3;

/// Assigns polygon centroids to garment zones.
///
/// Built once from the source mesh's bounding box and reused unchanged for
/// every polygon and every zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneClassifier {
    center_x: f64,
    center_y: f64,
    threshold: f64,
}

impl ZoneClassifier {
    /// Creates a classifier with the default sleeve ratio.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds have no extent along X or Y.
    pub fn new(bounds: &Aabb) -> Result<Self> {
        Self::with_ratio(bounds, DEFAULT_SLEEVE_RATIO)
    }

    /// Creates a classifier whose sleeve threshold is `ratio` times the X
    /// span of `bounds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds have no extent along X or Y, or if
    /// `ratio` is not in `(0, 0.5]`.
    pub fn with_ratio(bounds: &Aabb, ratio: f64) -> Result<Self> {
        if ratio.is_nan() || ratio <= 0.0 || ratio > 0.5 {
            return Err(OperationError::InvalidInput(format!(
                "sleeve ratio {ratio} must be in (0, 0.5]"
            ))
            .into());
        }

        let extent = bounds.extent();
        if extent.x.is_nan() || extent.x <= TOLERANCE {
            return Err(GeometryError::DegenerateBounds {
                axis: "x",
                extent: extent.x,
            }
            .into());
        }
        if extent.y.is_nan() || extent.y <= TOLERANCE {
            return Err(GeometryError::DegenerateBounds {
                axis: "y",
                extent: extent.y,
            }
            .into());
        }

        let center = bounds.center();
        Ok(Self {
            center_x: center.x,
            center_y: center.y,
            threshold: extent.x * ratio,
        })
    }

    /// Distance from the vertical mid-plane beyond which a centroid is a
    /// sleeve.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the single zone the centroid belongs to, if any.
    ///
    /// Only X and Y are read. A centroid with a NaN coordinate matches no
    /// zone.
    #[must_use]
    pub fn classify(&self, centroid: &Point3) -> Option<Zone> {
        Zone::ALL
            .into_iter()
            .find(|&zone| self.contains(zone, centroid))
    }

    /// Evaluates one zone's membership predicate on its own.
    #[must_use]
    pub fn contains(&self, zone: Zone, centroid: &Point3) -> bool {
        let x_dist = (centroid.x - self.center_x).abs();
        match zone {
            Zone::Sleeves => x_dist > self.threshold,
            Zone::Front => centroid.y > self.center_y && x_dist <= self.threshold,
            Zone::Back => centroid.y <= self.center_y && x_dist <= self.threshold,
        }
    }
}
