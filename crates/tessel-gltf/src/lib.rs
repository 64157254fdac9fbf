//! tessel-gltf: glTF 2.0 scene builder and binary encoder.
//!
//! Builds a glTF document in memory from raw triangle geometry and writes it
//! either as JSON plus an external `.bin` buffer or as a single GLB file.
//!
//! # Quick Start
//!
//! ```no_run
//! use tessel_gltf::Document;
//!
//! let mut doc = Document::new();
//! let red = doc.add_material(1.0, 0.0, 0.0, 1.0, 0.0, "red")?;
//! doc.add_triangle_mesh(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!     &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
//!     &[0, 1, 2],
//!     red,
//!     None,
//! )?;
//!
//! doc.save("triangle.gltf")?;     // triangle.gltf + triangle.bin
//! doc.save_glb("triangle.glb")?;
//! let inline = doc.to_base64()?;
//! # Ok::<(), tessel_gltf::GltfError>(())
//! ```
//!
//! # Buffer layout
//!
//! Every mesh appends `positions | normals | indices` to the one shared
//! buffer. Zero bytes before and after each mesh keep it on a 4-byte
//! boundary:
//!
//! ```text
//! [pad?][f32 x 3n][f32 x 3n][u16 x m][pad?][f32 x 3n'][f32 x 3n'][u16 x m'][pad?]...
//! ```

pub mod bounds;
pub mod buffer;
pub mod container;
pub mod document;
pub mod encode;
pub mod error;
pub mod options;
pub mod schema;

pub use bounds::{index_bounds, vec3_bounds, Bounds3};
pub use buffer::{BinaryBuffer, PackedMesh};
pub use document::{Document, DEFAULT_MESH_NAME, ROOT_NODE, Z_UP_TO_Y_UP};
pub use encode::JsonLayout;
pub use error::{GltfError, Result};
pub use options::DocumentOptions;
pub use schema::{
    Accessor, AccessorType, AlphaMode, Attributes, Buffer, BufferTarget, BufferView,
    ComponentType, ComponentValues, Material, Mesh, Node, Primitive, PrimitiveMode, Scene,
    Semantic,
};
