//! A hierarchy of 3D transforms
//!
//! This crate provides:
//! - A tree of nodes, each holding a position, orientation and scale relative
//!   to its parent
//! - World-space values computed lazily and cached until an ancestor changes
//! - Translation, rotation and direction solving in local, parent or world space
//! - Tags and payloads to find nodes again

pub mod core;
pub mod math;
pub mod transformable;
pub mod tree;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{TreeConfig, TreeError};
    pub use crate::transformable::Transformable;
    pub use crate::tree::{Inherit, NodePayload, Space, Transform, TransformTree};
    pub use glam::{Mat4, Quat, Vec3};
    pub use hecs::Entity;
}
