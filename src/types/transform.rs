//! Affine transforms for placing entity geometry in model space
//!
//! A transform maps a local point `p` to `R·p + T`, where `R` is a 3×3
//! rotation/scale matrix and `T` a translation. Batched application works on
//! a 3×N matrix whose columns are points, broadcasting `T` across every
//! column; curve sampling goes through that path.

use crate::types::Vector3;
use nalgebra::{Matrix3, Matrix3xX};
use std::fmt;

/// Rotation/scale plus translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// 3×3 rotation (possibly scaled) matrix `R`
    pub rotation: Matrix3<f64>,
    /// Translation `T`
    pub translation: nalgebra::Vector3<f64>,
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: nalgebra::Vector3::zeros(),
        }
    }

    /// Create a transform from `R` and `T`
    pub fn new(rotation: Matrix3<f64>, translation: nalgebra::Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Create a transform from the rows of `R` and the translation vector
    pub fn from_rows(row0: [f64; 3], row1: [f64; 3], row2: [f64; 3], translation: [f64; 3]) -> Self {
        Self {
            rotation: Matrix3::new(
                row0[0], row0[1], row0[2],
                row1[0], row1[1], row1[2],
                row2[0], row2[1], row2[2],
            ),
            translation: nalgebra::Vector3::new(translation[0], translation[1], translation[2]),
        }
    }

    /// Pure translation
    pub fn from_translation(offset: Vector3) -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: offset.into(),
        }
    }

    /// Whether applying this transform is a no-op
    pub fn is_identity(&self) -> bool {
        self.rotation == Matrix3::identity() && self.translation == nalgebra::Vector3::zeros()
    }

    /// Apply to a single point
    pub fn apply(&self, point: Vector3) -> Vector3 {
        let p: nalgebra::Vector3<f64> = point.into();
        (self.rotation * p + self.translation).into()
    }

    /// Apply to every column of a 3×N point matrix
    pub fn apply_batch(&self, points: &Matrix3xX<f64>) -> Matrix3xX<f64> {
        let rotated = self.rotation * points;
        Matrix3xX::from_fn(points.ncols(), |row, col| {
            rotated[(row, col)] + self.translation[row]
        })
    }

    /// Apply to a list of points, going through the batched path
    pub fn apply_points(&self, points: &[Vector3]) -> Vec<Vector3> {
        if self.is_identity() {
            return points.to_vec();
        }
        let transformed = self.apply_batch(&points_to_matrix(points));
        matrix_to_points(&transformed)
    }

    /// The transform that applies `self` first and `outer` second
    ///
    /// `outer.rotation · (R·p + T) + outer.translation`
    pub fn then(&self, outer: &Transform) -> Transform {
        Transform {
            rotation: outer.rotation * self.rotation,
            translation: outer.rotation * self.translation + outer.translation,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.rotation;
        write!(
            f,
            "R = [[{}, {}, {}], [{}, {}, {}], [{}, {}, {}]] T = [{}, {}, {}]",
            r[(0, 0)], r[(0, 1)], r[(0, 2)],
            r[(1, 0)], r[(1, 1)], r[(1, 2)],
            r[(2, 0)], r[(2, 1)], r[(2, 2)],
            self.translation.x, self.translation.y, self.translation.z
        )
    }
}

/// Pack points as the columns of a 3×N matrix
pub fn points_to_matrix(points: &[Vector3]) -> Matrix3xX<f64> {
    Matrix3xX::from_fn(points.len(), |row, col| {
        let p = &points[col];
        match row {
            0 => p.x,
            1 => p.y,
            _ => p.z,
        }
    })
}

/// Unpack the columns of a 3×N matrix into points
pub fn matrix_to_points(matrix: &Matrix3xX<f64>) -> Vec<Vector3> {
    matrix
        .column_iter()
        .map(|c| Vector3::new(c[0], c[1], c[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rot_z_90_shift() -> Transform {
        Transform::from_rows(
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [10.0, 0.0, 5.0],
        )
    }

    #[test]
    fn test_identity_is_noop() {
        let t = Transform::identity();
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert!(t.is_identity());
        assert_eq!(t.apply(p), p);
        assert_eq!(t.apply_points(&[p, p]), vec![p, p]);
    }

    #[test]
    fn test_apply_rotation_and_translation() {
        let t = rot_z_90_shift();
        let p = t.apply(Vector3::new(1.0, 0.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
        assert!((p.z - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_batch_matches_single() {
        let t = rot_z_90_shift();
        let pts = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(-1.0, 1.0, 3.0),
        ];
        let batched = t.apply_points(&pts);
        for (p, b) in pts.iter().zip(&batched) {
            assert!(t.apply(*p).distance(b) < 1e-12);
        }
    }

    #[test]
    fn test_then_composes_in_order() {
        let inner = Transform::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let outer = rot_z_90_shift();
        let combined = inner.then(&outer);
        let p = Vector3::new(0.0, 0.0, 0.0);
        assert!(combined.apply(p).distance(&outer.apply(inner.apply(p))) < 1e-12);
    }

    #[test]
    fn test_matrix_round_trip() {
        let pts = vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)];
        let m = points_to_matrix(&pts);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m[(2, 1)], 6.0);
        assert_eq!(matrix_to_points(&m), pts);
    }
}
