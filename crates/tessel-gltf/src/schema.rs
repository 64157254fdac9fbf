//! glTF 2.0 entity types.
//!
//! Each type serializes straight to its glTF JSON shape. Optional fields are
//! `Option`s skipped when absent, so no `null` ever reaches the output, and
//! enumerations serialize to their wire codes rather than their Rust names.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Extension key for the specular-glossiness material block.
pub const KHR_MATERIALS_PBR_SPECULAR_GLOSSINESS: &str = "KHR_materials_pbrSpecularGlossiness";

/// Asset metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    /// Generator name.
    pub generator: String,
    /// glTF version.
    pub version: String,
}

impl Asset {
    /// Asset block for a glTF 2.0 document.
    pub fn new(generator: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            version: "2.0".to_string(),
        }
    }
}

/// A scene listing its root nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    /// Root node indices.
    pub nodes: Vec<usize>,
}

/// A node in the scene graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    /// Node name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Child node indices.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
    /// Local transformation matrix (column-major).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 16]>,
    /// Mesh index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<usize>,
}

impl Node {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node drawing the given mesh.
    pub fn with_mesh(mesh: usize) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::default()
        }
    }

    /// Set the node name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the local transform.
    pub fn with_matrix(mut self, matrix: [f32; 16]) -> Self {
        self.matrix = Some(matrix);
        self
    }
}

/// A mesh made of primitives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    /// Mesh name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Drawable primitives.
    pub primitives: Vec<Primitive>,
}

/// Vertex attribute semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Semantic {
    #[serde(rename = "POSITION")]
    Position,
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "TANGENT")]
    Tangent,
    #[serde(rename = "TEXCOORD_0")]
    TexCoord0,
    #[serde(rename = "TEXCOORD_1")]
    TexCoord1,
    #[serde(rename = "COLOR_0")]
    Color0,
    #[serde(rename = "JOINTS_0")]
    Joints0,
    #[serde(rename = "WEIGHTS_0")]
    Weights0,
}

/// Attribute semantic to accessor index, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<Semantic, usize>);

impl Attributes {
    /// Attributes for a position and normal accessor pair.
    pub fn new(position: usize, normal: usize) -> Self {
        let mut map = IndexMap::new();
        map.insert(Semantic::Position, position);
        map.insert(Semantic::Normal, normal);
        Self(map)
    }

    /// Accessor bound to `semantic`, if any.
    pub fn get(&self, semantic: Semantic) -> Option<usize> {
        self.0.get(&semantic).copied()
    }

    /// Position accessor.
    pub fn position(&self) -> Option<usize> {
        self.get(Semantic::Position)
    }

    /// Normal accessor.
    pub fn normal(&self) -> Option<usize> {
        self.get(Semantic::Normal)
    }

    /// Bind an accessor to a semantic.
    pub fn insert(&mut self, semantic: Semantic, accessor: usize) {
        self.0.insert(semantic, accessor);
    }

    /// Iterate bound accessors.
    pub fn iter(&self) -> impl Iterator<Item = (Semantic, usize)> + '_ {
        self.0.iter().map(|(s, a)| (*s, *a))
    }
}

/// Primitive topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    /// Wire code.
    pub fn code(self) -> u32 {
        match self {
            PrimitiveMode::Points => 0,
            PrimitiveMode::Lines => 1,
            PrimitiveMode::LineLoop => 2,
            PrimitiveMode::LineStrip => 3,
            PrimitiveMode::Triangles => 4,
            PrimitiveMode::TriangleStrip => 5,
            PrimitiveMode::TriangleFan => 6,
        }
    }
}

impl Serialize for PrimitiveMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

/// One drawable unit of a mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    /// Vertex attributes.
    pub attributes: Attributes,
    /// Index accessor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<usize>,
    /// Material index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<usize>,
    /// Topology.
    pub mode: PrimitiveMode,
}

/// Accessor component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    /// Wire code.
    pub fn code(self) -> u32 {
        match self {
            ComponentType::Byte => 5120,
            ComponentType::UnsignedByte => 5121,
            ComponentType::Short => 5122,
            ComponentType::UnsignedShort => 5123,
            ComponentType::UnsignedInt => 5125,
            ComponentType::Float => 5126,
        }
    }

    /// Size of one component in bytes, which is also its required alignment.
    pub fn size(self) -> usize {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }
}

impl Serialize for ComponentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

/// Element shape of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessorType {
    #[serde(rename = "SCALAR")]
    Scalar,
    #[serde(rename = "VEC2")]
    Vec2,
    #[serde(rename = "VEC3")]
    Vec3,
    #[serde(rename = "VEC4")]
    Vec4,
    #[serde(rename = "MAT2")]
    Mat2,
    #[serde(rename = "MAT3")]
    Mat3,
    #[serde(rename = "MAT4")]
    Mat4,
}

impl AccessorType {
    /// Components per element.
    pub fn component_count(self) -> usize {
        match self {
            AccessorType::Scalar => 1,
            AccessorType::Vec2 => 2,
            AccessorType::Vec3 => 3,
            AccessorType::Vec4 | AccessorType::Mat2 => 4,
            AccessorType::Mat3 => 9,
            AccessorType::Mat4 => 16,
        }
    }
}

/// Per-component accessor bounds.
///
/// Float accessors carry float bounds, integer accessors integer bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentValues {
    Float(Vec<f32>),
    Integer(Vec<u32>),
}

impl ComponentValues {
    /// Number of components.
    pub fn len(&self) -> usize {
        match self {
            ComponentValues::Float(v) => v.len(),
            ComponentValues::Integer(v) => v.len(),
        }
    }

    /// Whether there are no components.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Typed view over a byte range of a buffer view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    /// Buffer view index.
    pub buffer_view: usize,
    /// Byte offset within the buffer view.
    pub byte_offset: usize,
    /// Component type.
    pub component_type: ComponentType,
    /// Number of elements.
    pub count: usize,
    /// Maximum per component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<ComponentValues>,
    /// Minimum per component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<ComponentValues>,
    /// Element shape.
    #[serde(rename = "type")]
    pub accessor_type: AccessorType,
}

impl Accessor {
    /// Bytes spanned by all elements, assuming tightly packed data.
    pub fn byte_size(&self) -> usize {
        self.count * self.accessor_type.component_count() * self.component_type.size()
    }
}

/// Buffer view binding hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    ArrayBuffer,
    ElementArrayBuffer,
}

impl BufferTarget {
    /// Wire code.
    pub fn code(self) -> u32 {
        match self {
            BufferTarget::ArrayBuffer => 34962,
            BufferTarget::ElementArrayBuffer => 34963,
        }
    }
}

impl Serialize for BufferTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

/// A byte range of a buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    /// Buffer index.
    pub buffer: usize,
    /// Byte offset into the buffer.
    pub byte_offset: usize,
    /// Byte length.
    pub byte_length: usize,
    /// Stride between interleaved elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_stride: Option<usize>,
    /// Binding hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<BufferTarget>,
}

/// A binary buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    /// Byte length, excluding container padding.
    pub byte_length: usize,
    /// External file name; absent when the data lives in the GLB chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Alpha blending mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlphaMode {
    #[serde(rename = "OPAQUE")]
    Opaque,
    #[serde(rename = "MASK")]
    Mask,
    #[serde(rename = "BLEND")]
    Blend,
}

impl AlphaMode {
    /// Blend for translucent colors, opaque otherwise.
    pub fn from_alpha(alpha: f32) -> Self {
        if alpha < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        }
    }
}

/// Metallic-roughness parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    /// RGBA base color.
    pub base_color_factor: [f32; 4],
    /// Metalness.
    pub metallic_factor: f32,
}

/// `KHR_materials_pbrSpecularGlossiness` parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecularGlossiness {
    /// RGBA diffuse color.
    pub diffuse_factor: [f32; 4],
    /// RGB specular color.
    pub specular_factor: [f32; 3],
    /// Glossiness.
    pub glossiness_factor: f32,
}

impl SpecularGlossiness {
    /// Block mirroring a base color.
    pub fn from_color(color: [f32; 4]) -> Self {
        Self {
            diffuse_factor: color,
            specular_factor: [1.0, 1.0, 1.0],
            glossiness_factor: 0.5,
        }
    }
}

/// Material extension blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialExtensions {
    #[serde(rename = "KHR_materials_pbrSpecularGlossiness")]
    pub specular_glossiness: SpecularGlossiness,
}

/// A material.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Metallic-roughness parameters.
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    /// Alpha mode, derived from the base color alpha.
    pub alpha_mode: AlphaMode,
    /// Extension blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<MaterialExtensions>,
}

impl Material {
    /// Material with the given color and metalness.
    pub fn new(color: [f32; 4], metallic_factor: f32, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pbr_metallic_roughness: PbrMetallicRoughness {
                base_color_factor: color,
                metallic_factor,
            },
            alpha_mode: AlphaMode::from_alpha(color[3]),
            extensions: None,
        }
    }

    /// Attach the specular-glossiness duplicate of the base color.
    pub fn with_specular_glossiness(mut self) -> Self {
        let color = self.pbr_metallic_roughness.base_color_factor;
        self.extensions = Some(MaterialExtensions {
            specular_glossiness: SpecularGlossiness::from_color(color),
        });
        self
    }
}
