//! Shortest-arc rotation between two directions

use std::f32::consts::PI;

use glam::{Quat, Vec3};

/// Directions whose dot product is below `-1 + ANTIPARALLEL_DOT_EPSILON` are
/// treated as pointing in opposite directions.
pub const ANTIPARALLEL_DOT_EPSILON: f32 = 1e-6;

/// Squared length under which a generated rotation axis is considered collinear
const COLLINEAR_EPSILON: f32 = 1e-6;

/// Compute the shortest rotation that takes `from` onto `dest`.
///
/// Neither input needs to be normalized. When the directions are opposite,
/// every axis perpendicular to them is a valid answer: the rotation is then a
/// half turn about `fallback_axis` if it is non-zero, otherwise about an axis
/// derived from `from` and the world X axis (or the Y axis when `from` lies
/// along X).
#[must_use]
pub fn rotation_to(from: Vec3, dest: Vec3, fallback_axis: Vec3) -> Quat {
    let v0 = from.normalize();
    let v1 = dest.normalize();
    let d = v0.dot(v1);

    if d >= 1.0 {
        return Quat::IDENTITY;
    }

    if d < ANTIPARALLEL_DOT_EPSILON - 1.0 {
        if fallback_axis != Vec3::ZERO {
            return Quat::from_axis_angle(fallback_axis.normalize(), PI);
        }

        let mut axis = Vec3::X.cross(from);
        if axis.length_squared() < COLLINEAR_EPSILON {
            axis = Vec3::Y.cross(from);
        }
        return Quat::from_axis_angle(axis.normalize(), PI);
    }

    let s = ((1.0 + d) * 2.0).sqrt();
    let c = v0.cross(v1) / s;
    Quat::from_xyzw(c.x, c.y, c.z, s * 0.5).normalize()
}
