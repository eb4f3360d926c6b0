mod delete_polygons;
mod duplicate;
mod partition;
mod remove_loose;

pub use delete_polygons::DeletePolygons;
pub use duplicate::Duplicate;
pub use partition::{PartitionByZone, ZonePartition};
pub use remove_loose::RemoveLooseVertices;
