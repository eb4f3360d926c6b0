mod bounding_box;
mod centroid;
mod is_valid;

pub use bounding_box::{Aabb, BoundingBox};
pub use centroid::PolygonCentroid;
pub use is_valid::IsValid;
