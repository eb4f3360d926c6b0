//! Splits a garment mesh into sleeve, front-torso and back-torso meshes.
//!
//! Meshes live in a [`MeshStore`](topology::MeshStore) arena and are edited
//! through small command structs (`Op::new(..).execute(&mut store)`), each
//! taking its target mesh explicitly. [`SeparateZones`](pipeline::SeparateZones)
//! strings them together from GLB input to GLB output.

pub mod error;
pub mod io;
pub mod math;
pub mod operations;
pub mod pipeline;
pub mod topology;

pub use error::{Result, ZonesError};
