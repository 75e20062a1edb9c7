//! Math helpers layered on glam
//!
//! glam supplies vectors, quaternions and matrices. This module adds the two
//! operations the transform tree needs on top of them: shortest-arc rotations
//! between directions and decomposition of affine matrices.

mod arc;
mod decompose;

pub use arc::{ANTIPARALLEL_DOT_EPSILON, rotation_to};
pub use decompose::decompose_affine;
