//! Error types for tessel-gltf.

use thiserror::Error;

/// Result type for tessel-gltf operations.
pub type Result<T> = std::result::Result<T, GltfError>;

/// Errors that can occur while building or writing a glTF document.
#[derive(Debug, Error)]
pub enum GltfError {
    /// Malformed vertex, normal, index or accessor data.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Material factors that are not finite or fall outside `0.0..=1.0`.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Zero-length input where at least one element is required.
    #[error("empty geometry: {0}")]
    EmptyGeometry(&'static str),

    /// An index that does not name an existing entity.
    #[error("invalid reference: {kind} {index} (have {len})")]
    InvalidReference {
        /// Kind of entity being referenced.
        kind: &'static str,
        /// The offending index.
        index: usize,
        /// Number of entities of that kind.
        len: usize,
    },

    /// A byte offset that violates the component type's alignment.
    #[error("misaligned offset {offset} (requires multiple of {alignment})")]
    Misaligned {
        /// Absolute byte offset into the buffer.
        offset: usize,
        /// Required alignment in bytes.
        alignment: usize,
    },

    /// The GLB stream would not fit the 32-bit length fields.
    #[error("container too large: {0} bytes")]
    ContainerTooLarge(usize),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GltfError {
    /// Create an invalid geometry error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }

    /// Create an invalid reference error.
    pub fn reference(kind: &'static str, index: usize, len: usize) -> Self {
        Self::InvalidReference { kind, index, len }
    }
}
