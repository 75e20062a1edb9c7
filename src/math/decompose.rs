//! Affine matrix decomposition
//!
//! Splits a 4x4 matrix into translation, rotation and scale. Unlike
//! `Mat4::to_scale_rotation_translation`, the basis axes are orthogonalized
//! first (Gram-Schmidt), so shear terms are removed instead of leaking into the
//! rotation. Perspective terms are dropped.

use glam::{Mat3, Mat4, Quat, Vec3};

/// Decompose an affine matrix into `(scale, rotation, translation)`.
///
/// The matrix is first normalized by its homogeneous `w` component. Returns
/// `None` when that component is zero, as such a matrix has no affine
/// interpretation.
///
/// A reflection (negative determinant) is expressed by negating all three
/// scale components, which keeps the rotation proper.
#[must_use]
pub fn decompose_affine(matrix: &Mat4) -> Option<(Vec3, Quat, Vec3)> {
    let w = matrix.w_axis.w;
    if w == 0.0 {
        return None;
    }
    let m = matrix.mul_scalar(1.0 / w);

    // The last row only carries perspective, which is discarded
    let translation = m.w_axis.truncate();
    let mut x = m.x_axis.truncate();
    let mut y = m.y_axis.truncate();
    let mut z = m.z_axis.truncate();

    let mut scale = Vec3::ZERO;

    scale.x = x.length();
    x = x.normalize_or_zero();

    y -= x * x.dot(y);
    scale.y = y.length();
    y = y.normalize_or_zero();

    z -= x * x.dot(z);
    z -= y * y.dot(z);
    scale.z = z.length();
    z = z.normalize_or_zero();

    if x.dot(y.cross(z)) < 0.0 {
        scale = -scale;
        x = -x;
        y = -y;
        z = -z;
    }

    let rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize();

    Some((scale, rotation, translation))
}
