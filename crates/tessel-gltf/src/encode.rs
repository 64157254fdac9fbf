//! Document to glTF JSON.
//!
//! Encoding never mutates the document: the single `Buffer` entity describing
//! the staged bytes is attached to the encoded view instead, so repeated
//! encodes of an unchanged document give identical output.

use crate::document::Document;
use crate::error::Result;
use crate::schema::{Accessor, Asset, Buffer, BufferView, Material, Mesh, Node, Scene};

use indexmap::IndexSet;
use serde::Serialize;

/// Whitespace layout of the JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonLayout {
    /// No whitespace, as embedded in GLB.
    #[default]
    Compact,
    /// Indented, as written next to an external `.bin`.
    Pretty,
}

/// Borrowed glTF root in schema key order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GltfJson<'a> {
    asset: &'a Asset,
    scene: usize,
    scenes: &'a [Scene],
    nodes: &'a [Node],
    #[serde(skip_serializing_if = "is_empty_slice")]
    meshes: &'a [Mesh],
    #[serde(skip_serializing_if = "is_empty_slice")]
    accessors: &'a [Accessor],
    buffers: [Buffer; 1],
    #[serde(skip_serializing_if = "is_empty_slice")]
    buffer_views: &'a [BufferView],
    #[serde(skip_serializing_if = "is_empty_slice")]
    materials: &'a [Material],
    #[serde(skip_serializing_if = "is_empty_set")]
    extensions_used: &'a IndexSet<String>,
}

fn is_empty_slice<T>(items: &&[T]) -> bool {
    items.is_empty()
}

fn is_empty_set(items: &&IndexSet<String>) -> bool {
    items.is_empty()
}

impl Document {
    /// The buffer entity for the staged bytes, optionally stored at `uri`.
    pub fn final_buffer(&self, uri: Option<&str>) -> Buffer {
        Buffer {
            byte_length: self.buffer.len(),
            uri: uri.map(str::to_string),
        }
    }

    pub(crate) fn gltf_json(&self, uri: Option<&str>) -> GltfJson<'_> {
        GltfJson {
            asset: &self.asset,
            scene: self.scene(),
            scenes: &self.scenes,
            nodes: &self.nodes,
            meshes: &self.meshes,
            accessors: &self.accessors,
            buffers: [self.final_buffer(uri)],
            buffer_views: &self.buffer_views,
            materials: &self.materials,
            extensions_used: &self.extensions_used,
        }
    }

    /// Structural JSON form of the document.
    ///
    /// `buffer_uri` names the external binary file; `None` describes a buffer
    /// carried in a GLB binary chunk.
    pub fn to_value(&self, buffer_uri: Option<&str>) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.gltf_json(buffer_uri))?)
    }

    /// JSON text of the document.
    pub fn to_json_string(&self, buffer_uri: Option<&str>, layout: JsonLayout) -> Result<String> {
        let gltf = self.gltf_json(buffer_uri);
        let text = match layout {
            JsonLayout::Compact => serde_json::to_string(&gltf)?,
            JsonLayout::Pretty => serde_json::to_string_pretty(&gltf)?,
        };
        Ok(text)
    }
}
