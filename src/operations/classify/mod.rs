//! Spatial zone classification for garment meshes.
//!
//! A garment is split into three disjoint zones using an axis-aligned
//! heuristic over the source mesh's bounding box:
//!
//! - polygons whose centroid lies far from the vertical mid-plane on X are
//!   **sleeves**;
//! - the remaining polygons are split on the sign of their Y offset from
//!   the box center into **front** (`y > center`) and **back**
//!   (`y <= center`).
//!
//! Polygons that satisfy no predicate are dropped from every zone.

mod classifier;
mod zone;

pub use classifier::{ZoneClassifier, DEFAULT_SLEEVE_RATIO};
pub use zone::Zone;
