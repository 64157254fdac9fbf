//! Document configuration.

use serde::{Deserialize, Serialize};

/// Generator string emitted in `asset.generator` by default.
pub const DEFAULT_GENERATOR: &str = "tessel-gltf";

/// Options applied when a [`Document`](crate::Document) is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Value of `asset.generator`.
    pub generator: String,
    /// Rotate the scene from Z-up into glTF's Y-up via the root node matrix.
    pub z_up: bool,
    /// Duplicate material colors under `KHR_materials_pbrSpecularGlossiness`.
    pub specular_glossiness_fallback: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            generator: DEFAULT_GENERATOR.to_string(),
            z_up: true,
            specular_glossiness_fallback: true,
        }
    }
}

impl DocumentOptions {
    /// Create default document options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generator string.
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Keep the source axes (no root rotation).
    pub fn y_up(mut self) -> Self {
        self.z_up = false;
        self
    }

    /// Drop the specular-glossiness material block.
    pub fn without_specular_glossiness(mut self) -> Self {
        self.specular_glossiness_fallback = false;
        self
    }
}
