//! In-memory glTF document and its builder operations.
//!
//! Entities are append-only: every `add_*` call returns the index of the new
//! entity, and that index stays valid for the life of the document. Each call
//! validates all of its input before touching the document, so a failed call
//! leaves it unchanged.

use crate::bounds::{index_bounds, vec3_bounds};
use crate::buffer::BinaryBuffer;
use crate::error::{GltfError, Result};
use crate::options::DocumentOptions;
use crate::schema::{
    Accessor, AccessorType, Asset, Attributes, BufferTarget, BufferView, ComponentType,
    ComponentValues, Material, Mesh, Node, Primitive, PrimitiveMode, Scene,
    KHR_MATERIALS_PBR_SPECULAR_GLOSSINESS,
};

use indexmap::IndexSet;

/// Index of the root node created with every document.
pub const ROOT_NODE: usize = 0;

/// Name given to meshes built by [`Document::add_triangle_mesh`].
pub const DEFAULT_MESH_NAME: &str = "Mesh";

/// Column-major rotation taking Z-up coordinates into glTF's Y-up frame.
pub const Z_UP_TO_Y_UP: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, -1.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// A glTF 2.0 document under construction.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) options: DocumentOptions,
    pub(crate) asset: Asset,
    pub(crate) scenes: Vec<Scene>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) accessors: Vec<Accessor>,
    pub(crate) buffer_views: Vec<BufferView>,
    pub(crate) materials: Vec<Material>,
    pub(crate) extensions_used: IndexSet<String>,
    pub(crate) buffer: BinaryBuffer,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with default options.
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    /// Create a document holding only the root node and the default scene.
    pub fn with_options(options: DocumentOptions) -> Self {
        let root = Node {
            matrix: options.z_up.then_some(Z_UP_TO_Y_UP),
            ..Node::default()
        };

        let mut extensions_used = IndexSet::new();
        if options.specular_glossiness_fallback {
            extensions_used.insert(KHR_MATERIALS_PBR_SPECULAR_GLOSSINESS.to_string());
        }

        Self {
            asset: Asset::new(options.generator.clone()),
            options,
            scenes: vec![Scene {
                nodes: vec![ROOT_NODE],
            }],
            nodes: vec![root],
            meshes: Vec::new(),
            accessors: Vec::new(),
            buffer_views: Vec::new(),
            materials: Vec::new(),
            extensions_used,
            buffer: BinaryBuffer::new(),
        }
    }

    /// Options the document was built with.
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Index of the default scene.
    pub fn scene(&self) -> usize {
        0
    }

    /// Scenes.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Meshes.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Accessors.
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// Buffer views.
    pub fn buffer_views(&self) -> &[BufferView] {
        &self.buffer_views
    }

    /// Materials.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Extension names used by the document.
    pub fn extensions_used(&self) -> impl Iterator<Item = &str> {
        self.extensions_used.iter().map(String::as_str)
    }

    /// The staged binary buffer.
    pub fn buffer(&self) -> &BinaryBuffer {
        &self.buffer
    }

    /// Mutable access to the staged buffer, for callers packing their own data
    /// before [`add_buffer_view`](Self::add_buffer_view).
    pub fn buffer_mut(&mut self) -> &mut BinaryBuffer {
        &mut self.buffer
    }

    /// Add a material and return its index.
    ///
    /// Every factor must be finite and within `0.0..=1.0`. Alpha below 1.0
    /// selects `BLEND`, anything else `OPAQUE`.
    pub fn add_material(
        &mut self,
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
        metallic_factor: f32,
        name: impl Into<String>,
    ) -> Result<usize> {
        let factors = [
            ("red", red),
            ("green", green),
            ("blue", blue),
            ("alpha", alpha),
            ("metallic", metallic_factor),
        ];
        for (what, value) in factors {
            if !(0.0..=1.0).contains(&value) {
                return Err(GltfError::InvalidMaterial(format!(
                    "{what} factor {value} outside 0..=1"
                )));
            }
        }

        let mut material = Material::new([red, green, blue, alpha], metallic_factor, name);
        if self.options.specular_glossiness_fallback {
            material = material.with_specular_glossiness();
        }

        let index = self.materials.len();
        tracing::debug!(index, name = %material.name, alpha_mode = ?material.alpha_mode, "added material");
        self.materials.push(material);
        Ok(index)
    }

    /// Add a triangle mesh under `parent` (the root node when `None`).
    ///
    /// `vertices` and `normals` are flat `x, y, z` arrays with one normal per
    /// vertex; `indices` must fit in 16 bits and reference existing vertices.
    /// Returns the index of the new mesh.
    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[f32],
        normals: &[f32],
        indices: &[u32],
        material: usize,
        parent: Option<usize>,
    ) -> Result<usize> {
        let parent = parent.unwrap_or(ROOT_NODE);
        self.check_node(parent)?;
        if material >= self.materials.len() {
            return Err(GltfError::reference("material", material, self.materials.len()));
        }

        let vertex_bounds = vec3_bounds(vertices, "vertices")?;
        let normal_bounds = vec3_bounds(normals, "normals")?;
        if normals.len() != vertices.len() {
            return Err(GltfError::geometry(format!(
                "{} normals for {} vertices",
                normals.len() / 3,
                vertices.len() / 3
            )));
        }
        let (index_min, index_max) = index_bounds(indices)?;
        let vertex_count = vertices.len() / 3;
        if index_max as usize >= vertex_count {
            return Err(GltfError::geometry(format!(
                "index {index_max} out of range for {vertex_count} vertices"
            )));
        }

        let packed = self.buffer.pack_triangle_mesh(vertices, normals, indices)?;

        let vertex_view = self.push_view(
            packed.vertex_offset,
            packed.vertex_length,
            BufferTarget::ArrayBuffer,
        );
        let normal_view = self.push_view(
            packed.normal_offset,
            packed.normal_length,
            BufferTarget::ArrayBuffer,
        );
        let index_view = self.push_view(
            packed.index_offset,
            packed.index_length,
            BufferTarget::ElementArrayBuffer,
        );

        let position = self.push_accessor(Accessor {
            buffer_view: vertex_view,
            byte_offset: 0,
            component_type: ComponentType::Float,
            count: vertex_count,
            max: Some(ComponentValues::Float(vertex_bounds.max.to_vec())),
            min: Some(ComponentValues::Float(vertex_bounds.min.to_vec())),
            accessor_type: AccessorType::Vec3,
        });
        let normal = self.push_accessor(Accessor {
            buffer_view: normal_view,
            byte_offset: 0,
            component_type: ComponentType::Float,
            count: normals.len() / 3,
            max: Some(ComponentValues::Float(normal_bounds.max.to_vec())),
            min: Some(ComponentValues::Float(normal_bounds.min.to_vec())),
            accessor_type: AccessorType::Vec3,
        });
        let index_accessor = self.push_accessor(Accessor {
            buffer_view: index_view,
            byte_offset: 0,
            component_type: ComponentType::UnsignedShort,
            count: indices.len(),
            max: Some(ComponentValues::Integer(vec![index_max])),
            min: Some(ComponentValues::Integer(vec![index_min])),
            accessor_type: AccessorType::Scalar,
        });

        let mesh_index = self.meshes.len();
        self.meshes.push(Mesh {
            name: Some(DEFAULT_MESH_NAME.to_string()),
            primitives: vec![Primitive {
                attributes: Attributes::new(position, normal),
                indices: Some(index_accessor),
                material: Some(material),
                mode: PrimitiveMode::Triangles,
            }],
        });

        let node_index = self.nodes.len();
        self.nodes.push(Node::with_mesh(mesh_index));
        self.nodes[parent].children.push(node_index);

        tracing::debug!(
            mesh = mesh_index,
            node = node_index,
            vertices = vertex_count,
            indices = indices.len(),
            buffer_len = self.buffer.len(),
            "added triangle mesh"
        );
        Ok(mesh_index)
    }

    /// Append a node as a child of `parent` and return its index.
    ///
    /// The node's own children and mesh must already exist. Each child must
    /// not have a parent yet and must not be `parent` or one of its
    /// ancestors, so the hierarchy stays a tree under the root.
    pub fn add_node(&mut self, node: Node, parent: usize) -> Result<usize> {
        self.check_node(parent)?;
        for (position, &child) in node.children.iter().enumerate() {
            self.check_node(child)?;
            let repeated = node.children[..position].contains(&child);
            if repeated
                || child == ROOT_NODE
                || self.is_ancestor(child, parent)
                || self.parent_of(child).is_some()
            {
                return Err(GltfError::reference("child node", child, self.nodes.len()));
            }
        }
        if let Some(mesh) = node.mesh {
            if mesh >= self.meshes.len() {
                return Err(GltfError::reference("mesh", mesh, self.meshes.len()));
            }
        }

        let index = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(index);
        tracing::debug!(index, parent, "added node");
        Ok(index)
    }

    /// Append a mesh built from existing accessors and materials.
    ///
    /// The mesh is not attached to any node; pair it with
    /// [`add_node`](Self::add_node).
    pub fn add_mesh(&mut self, mesh: Mesh) -> Result<usize> {
        for primitive in &mesh.primitives {
            for (_, accessor) in primitive.attributes.iter() {
                self.check_accessor(accessor)?;
            }
            if let Some(indices) = primitive.indices {
                self.check_accessor(indices)?;
            }
            if let Some(material) = primitive.material {
                if material >= self.materials.len() {
                    return Err(GltfError::reference("material", material, self.materials.len()));
                }
            }
        }

        let index = self.meshes.len();
        self.meshes.push(mesh);
        Ok(index)
    }

    /// Add a view over `byte_length` bytes of the staged buffer at `byte_offset`.
    ///
    /// `buffer` must be 0, the document's only buffer, and the range must lie
    /// within the bytes staged so far.
    pub fn add_buffer_view(
        &mut self,
        buffer: usize,
        byte_offset: usize,
        byte_length: usize,
        byte_stride: Option<usize>,
    ) -> Result<usize> {
        if buffer != 0 {
            return Err(GltfError::reference("buffer", buffer, 1));
        }
        let end = byte_offset
            .checked_add(byte_length)
            .ok_or_else(|| GltfError::geometry("buffer view range overflows"))?;
        if end > self.buffer.len() {
            return Err(GltfError::geometry(format!(
                "buffer view {byte_offset}..{end} exceeds buffer of {} bytes",
                self.buffer.len()
            )));
        }
        if let Some(stride) = byte_stride {
            if !(4..=252).contains(&stride) || stride % 4 != 0 {
                return Err(GltfError::geometry(format!("invalid byte stride {stride}")));
            }
        }

        let index = self.buffer_views.len();
        self.buffer_views.push(BufferView {
            buffer,
            byte_offset,
            byte_length,
            byte_stride,
            target: None,
        });
        Ok(index)
    }

    /// Add an accessor and return its index.
    ///
    /// Checks that the view exists, that the accessor starts on a multiple of
    /// its component size, that its elements fit in the view, and that min
    /// and max (when given) have one entry per component.
    pub fn add_accessor(&mut self, accessor: Accessor) -> Result<usize> {
        let view = self.buffer_views.get(accessor.buffer_view).ok_or_else(|| {
            GltfError::reference("buffer view", accessor.buffer_view, self.buffer_views.len())
        })?;

        let overflow = || GltfError::geometry("accessor range overflows");
        let alignment = accessor.component_type.size();
        let start = view
            .byte_offset
            .checked_add(accessor.byte_offset)
            .ok_or_else(overflow)?;
        if start % alignment != 0 {
            return Err(GltfError::Misaligned {
                offset: start,
                alignment,
            });
        }

        let element_size = accessor.accessor_type.component_count() * alignment;
        let span = match view.byte_stride {
            Some(stride) if stride < element_size => {
                return Err(GltfError::geometry(format!(
                    "byte stride {stride} is smaller than the {element_size}-byte element"
                )))
            }
            Some(stride) if accessor.count > 0 => (accessor.count - 1)
                .checked_mul(stride)
                .and_then(|n| n.checked_add(element_size)),
            _ => accessor.count.checked_mul(element_size),
        }
        .ok_or_else(overflow)?;
        let end = accessor.byte_offset.checked_add(span).ok_or_else(overflow)?;
        if end > view.byte_length {
            return Err(GltfError::geometry(format!(
                "accessor needs {end} bytes but view holds {}",
                view.byte_length
            )));
        }

        let components = accessor.accessor_type.component_count();
        match (&accessor.min, &accessor.max) {
            (None, None) => {}
            (Some(min), Some(max)) if min.len() == components && max.len() == components => {}
            (Some(_), Some(_)) => {
                return Err(GltfError::geometry(format!(
                    "min/max must have {components} components"
                )))
            }
            _ => return Err(GltfError::geometry("min and max must be given together")),
        }

        Ok(self.push_accessor(accessor))
    }

    fn check_node(&self, index: usize) -> Result<()> {
        if index < self.nodes.len() {
            Ok(())
        } else {
            Err(GltfError::reference("node", index, self.nodes.len()))
        }
    }

    /// The node listing `index` among its children, if any.
    fn parent_of(&self, index: usize) -> Option<usize> {
        self.nodes.iter().position(|n| n.children.contains(&index))
    }

    /// Whether `ancestor` is `node` itself or lies on its path to the root.
    fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = Some(node);
        // The hierarchy is a tree, so the walk ends within `nodes.len()` steps.
        for _ in 0..=self.nodes.len() {
            match current {
                Some(n) if n == ancestor => return true,
                Some(n) => current = self.parent_of(n),
                None => return false,
            }
        }
        false
    }

    fn check_accessor(&self, index: usize) -> Result<()> {
        if index < self.accessors.len() {
            Ok(())
        } else {
            Err(GltfError::reference("accessor", index, self.accessors.len()))
        }
    }

    fn push_view(&mut self, byte_offset: usize, byte_length: usize, target: BufferTarget) -> usize {
        let index = self.buffer_views.len();
        self.buffer_views.push(BufferView {
            buffer: 0,
            byte_offset,
            byte_length,
            byte_stride: None,
            target: Some(target),
        });
        index
    }

    fn push_accessor(&mut self, accessor: Accessor) -> usize {
        let index = self.accessors.len();
        self.accessors.push(accessor);
        index
    }
}
