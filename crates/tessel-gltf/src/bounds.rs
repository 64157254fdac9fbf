//! Per-axis bounds for accessor min/max.

use crate::error::{GltfError, Result};
use glam::Vec3;

/// Componentwise minimum and maximum of a set of 3D points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

/// Compute bounds over a flat `x, y, z, x, y, z, ...` array.
///
/// Fails with `InvalidGeometry` when the length is not a multiple of 3 or a
/// value is NaN or infinite, and with `EmptyGeometry` when there are no
/// triples.
pub fn vec3_bounds(values: &[f32], what: &'static str) -> Result<Bounds3> {
    if values.len() % 3 != 0 {
        return Err(GltfError::geometry(format!(
            "{what} length {} is not a multiple of 3",
            values.len()
        )));
    }
    if values.is_empty() {
        return Err(GltfError::EmptyGeometry(what));
    }

    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);

    for triple in values.chunks_exact(3) {
        let v = Vec3::from_slice(triple);
        if !v.is_finite() {
            return Err(GltfError::geometry(format!("{what} contain non-finite value {v}")));
        }
        min = min.min(v);
        max = max.max(v);
    }

    Ok(Bounds3 {
        min: min.to_array(),
        max: max.to_array(),
    })
}

/// Compute the scalar minimum and maximum of an index array.
pub fn index_bounds(indices: &[u32]) -> Result<(u32, u32)> {
    let min = indices.iter().copied().min();
    let max = indices.iter().copied().max();
    match (min, max) {
        (Some(min), Some(max)) => Ok((min, max)),
        _ => Err(GltfError::EmptyGeometry("indices")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_bounds_simple() {
        let values = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, -1.0, -2.0, -3.0];
        let bounds = vec3_bounds(&values, "vertices").unwrap();
        assert_eq!(bounds.min, [-1.0, -2.0, -3.0]);
        assert_eq!(bounds.max, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_all_negative_geometry() {
        let values = [-5.0, -4.0, -3.0, -2.0, -1.0, -0.5];
        let bounds = vec3_bounds(&values, "vertices").unwrap();
        assert_eq!(bounds.min, [-5.0, -4.0, -3.0]);
        assert_eq!(bounds.max, [-2.0, -1.0, -0.5]);
    }

    #[test]
    fn test_single_point() {
        let bounds = vec3_bounds(&[4.0, 5.0, 6.0], "vertices").unwrap();
        assert_eq!(bounds.min, bounds.max);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            vec3_bounds(&[], "normals"),
            Err(GltfError::EmptyGeometry("normals"))
        ));
        assert!(matches!(
            index_bounds(&[]),
            Err(GltfError::EmptyGeometry("indices"))
        ));
    }

    #[test]
    fn test_bad_arity() {
        assert!(matches!(
            vec3_bounds(&[1.0, 2.0], "vertices"),
            Err(GltfError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let values = [0.0, 0.0, 0.0, f32::INFINITY, 0.0, 0.0, 0.0, f32::NAN, 0.0];
        assert!(matches!(
            vec3_bounds(&values, "vertices"),
            Err(GltfError::InvalidGeometry(_))
        ));
        assert!(vec3_bounds(&[f32::NEG_INFINITY, 0.0, 0.0], "normals").is_err());
    }

    #[test]
    fn test_index_bounds() {
        assert_eq!(index_bounds(&[3, 0, 7, 2]).unwrap(), (0, 7));
    }
}
