use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for garment zone separation.
#[derive(Debug, Error)]
pub enum ZonesError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate bounds: {axis} extent {extent} is not positive")]
    DegenerateBounds { axis: &'static str, extent: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the mesh store and mesh connectivity.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("polygon needs at least 3 vertices, got {vertices}")]
    InvalidPolygon { vertices: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to zone operations and the pipeline.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("no mesh found in imported model")]
    NoMeshFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while reading or writing scene files.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to load {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize glTF document: {0}")]
    Serialize(String),

    #[error("malformed glTF data: {0}")]
    Malformed(String),

    #[error("primitive has no {0} attribute")]
    MissingAttribute(&'static str),

    #[error("buffer too large for GLB: {0} bytes")]
    TooLarge(usize),
}

/// Convenience type alias for results using [`ZonesError`].
pub type Result<T> = std::result::Result<T, ZonesError>;
