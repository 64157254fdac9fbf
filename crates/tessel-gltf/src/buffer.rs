//! Binary buffer packing.
//!
//! All geometry of a document shares one little-endian byte buffer. Float
//! arrays are appended first and 16-bit indices last so that every float view
//! starts on a 4-byte boundary. Zero bytes restore that boundary before and
//! after each mesh, so bytes pushed through the low-level API cannot shift a
//! float view off alignment.

use crate::error::{GltfError, Result};

/// Byte ranges written for one triangle mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedMesh {
    /// Offset of the vertex positions.
    pub vertex_offset: usize,
    /// Length of the vertex positions in bytes.
    pub vertex_length: usize,
    /// Offset of the normals.
    pub normal_offset: usize,
    /// Length of the normals in bytes.
    pub normal_length: usize,
    /// Offset of the indices.
    pub index_offset: usize,
    /// Length of the indices in bytes, excluding any alignment pad.
    pub index_length: usize,
}

/// Growable staging area for the document's single buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryBuffer {
    data: Vec<u8>,
}

impl BinaryBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been packed yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Append `f32` values and return the offset they start at.
    pub fn push_f32s(&mut self, values: &[f32]) -> usize {
        let offset = self.data.len();
        self.data.reserve(values.len() * 4);
        for v in values {
            self.data.extend_from_slice(&v.to_le_bytes());
        }
        offset
    }

    /// Append indices as `u16` and return the offset they start at.
    ///
    /// Nothing is written if any index does not fit in 16 bits.
    pub fn push_u16s(&mut self, values: &[u32]) -> Result<usize> {
        let narrowed = narrow_indices(values)?;
        let offset = self.data.len();
        self.data.reserve(narrowed.len() * 2);
        for v in narrowed {
            self.data.extend_from_slice(&v.to_le_bytes());
        }
        Ok(offset)
    }

    /// Append zero bytes until the length is a multiple of 4.
    pub fn pad_to_four(&mut self) {
        self.data.resize(align4(self.data.len()), 0);
    }

    /// Pack one triangle mesh in the fixed positions, normals, indices order.
    pub fn pack_triangle_mesh(
        &mut self,
        vertices: &[f32],
        normals: &[f32],
        indices: &[u32],
    ) -> Result<PackedMesh> {
        if vertices.len() % 3 != 0 || normals.len() % 3 != 0 {
            return Err(GltfError::geometry(
                "vertex and normal arrays must hold whole triples",
            ));
        }
        // Check before writing so a failure leaves the buffer untouched.
        let narrowed = narrow_indices(indices)?;

        self.pad_to_four();
        let vertex_offset = self.push_f32s(vertices);
        let normal_offset = self.push_f32s(normals);
        let index_offset = self.data.len();
        for v in narrowed {
            self.data.extend_from_slice(&v.to_le_bytes());
        }
        self.pad_to_four();

        Ok(PackedMesh {
            vertex_offset,
            vertex_length: vertices.len() * 4,
            normal_offset,
            normal_length: normals.len() * 4,
            index_offset,
            index_length: indices.len() * 2,
        })
    }

    /// Copy of the bytes zero-padded to a multiple of 4.
    pub fn padded(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        out.resize(align4(out.len()), 0);
        out
    }
}

/// Round `len` up to the next multiple of 4.
pub fn align4(len: usize) -> usize {
    (len + 3) & !3
}

fn narrow_indices(values: &[u32]) -> Result<Vec<u16>> {
    values
        .iter()
        .map(|&v| {
            u16::try_from(v).map_err(|_| {
                GltfError::geometry(format!("index {v} does not fit in an unsigned short"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_f32s_little_endian() {
        let mut buffer = BinaryBuffer::new();
        let offset = buffer.push_f32s(&[1.0]);
        assert_eq!(offset, 0);
        assert_eq!(buffer.as_bytes(), &1.0f32.to_le_bytes());
    }

    #[test]
    fn test_push_u16s_rejects_wide_index() {
        let mut buffer = BinaryBuffer::new();
        assert!(buffer.push_u16s(&[0, 70_000]).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_pack_pads_odd_index_count() {
        let mut buffer = BinaryBuffer::new();
        let vertices = [0.0; 9];
        let packed = buffer.pack_triangle_mesh(&vertices, &vertices, &[0, 1, 2]).unwrap();

        assert_eq!(packed.vertex_offset, 0);
        assert_eq!(packed.normal_offset, 36);
        assert_eq!(packed.index_offset, 72);
        assert_eq!(packed.index_length, 6);
        // 72 + 6 bytes of indices + 2 bytes of padding
        assert_eq!(buffer.len(), 80);
        assert_eq!(&buffer.as_bytes()[78..], &[0, 0]);
    }

    #[test]
    fn test_pack_even_index_count_needs_no_pad() {
        let mut buffer = BinaryBuffer::new();
        let vertices = [0.0; 12];
        buffer
            .pack_triangle_mesh(&vertices, &vertices, &[0, 1, 2, 2, 3, 0])
            .unwrap();
        assert_eq!(buffer.len(), 96 + 12);
    }

    #[test]
    fn test_pack_rejects_partial_triples() {
        let mut buffer = BinaryBuffer::new();
        let result = buffer.pack_triangle_mesh(&[0.0; 4], &[0.0; 3], &[0]);
        assert!(matches!(result, Err(GltfError::InvalidGeometry(_))));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_pack_realigns_after_loose_shorts() {
        let mut buffer = BinaryBuffer::new();
        buffer.push_u16s(&[7]).unwrap();
        let vertices = [0.0; 9];
        let packed = buffer.pack_triangle_mesh(&vertices, &vertices, &[0, 1, 2]).unwrap();

        assert_eq!(packed.vertex_offset, 4);
        assert_eq!(packed.normal_offset, 40);
        assert_eq!(&buffer.as_bytes()[..4], &[7, 0, 0, 0]);
        assert_eq!(buffer.len(), 84);
    }

    #[test]
    fn test_padded() {
        let mut buffer = BinaryBuffer::new();
        buffer.push_u16s(&[1]).unwrap();
        assert_eq!(buffer.padded(), vec![1, 0, 0, 0]);
        assert_eq!(align4(0), 0);
        assert_eq!(align4(5), 8);
    }
}
