//! Components making up a transform node
//!
//! Every node is a hecs entity carrying a [`LocalTransform`], a cached
//! [`WorldTransform`], its [`Inherit`] flags, its [`Children`] and its [`Tags`].
//! [`Parent`] and [`Payload`] are only present when set.

use glam::{Mat4, Quat, Vec3};
use hecs::Entity;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::math::decompose_affine;

// ============================================================================
// Transform
// ============================================================================

/// Position, orientation and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position
    pub position: Vec3,
    /// Orientation as a unit quaternion
    pub orientation: Quat,
    /// Scale factor per axis
    pub scale: Vec3,
}

impl Transform {
    /// Zero position, identity orientation, unit scale
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform at the origin
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and orientation
    #[must_use]
    pub fn from_position_orientation(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            ..Default::default()
        }
    }

    /// Create from position, orientation, and scale
    #[must_use]
    pub fn from_parts(position: Vec3, orientation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            orientation,
            scale,
        }
    }

    /// Extract a transform from an affine matrix, discarding shear and
    /// perspective.
    ///
    /// Returns `None` when the homogeneous component of the matrix is zero.
    #[must_use]
    pub fn from_matrix(matrix: &Mat4) -> Option<Self> {
        decompose_affine(matrix).map(|(scale, orientation, position)| Self {
            position,
            orientation,
            scale,
        })
    }

    /// Get the transformation matrix.
    ///
    /// The basis axes of the orientation are multiplied by the matching scale
    /// component and the position fills the translation column.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }

    /// Combine this world transform, taken as a parent, with the local
    /// transform of one of its children.
    ///
    /// The child's position always goes through the parent's orientation and
    /// scale; `inherit` only decides whether the child's own orientation and
    /// scale pick up the parent's.
    #[must_use]
    pub fn compose(&self, local: &Transform, inherit: Inherit) -> Transform {
        let orientation = if inherit.orientation {
            (self.orientation * local.orientation).normalize()
        } else {
            local.orientation
        };

        let scale = if inherit.scale {
            self.scale * local.scale
        } else {
            local.scale
        };

        let position = self.orientation * (self.scale * local.position) + self.position;

        Transform {
            position,
            orientation,
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Whether a node picks up its parent's orientation and scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inherit {
    /// Inherit the parent's world orientation
    pub orientation: bool,
    /// Inherit the parent's world scale
    pub scale: bool,
}

impl Default for Inherit {
    fn default() -> Self {
        Self {
            orientation: true,
            scale: true,
        }
    }
}

/// The space a transform operation is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Space {
    /// Relative to the node's own axes
    #[default]
    Local,
    /// Relative to the parent's axes
    Parent,
    /// Relative to world space
    World,
}

// ============================================================================
// Node Components
// ============================================================================

/// Transform relative to the parent, or to world space for a root
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LocalTransform(pub Transform);

/// Cached world-space transform, valid only while clean
#[derive(Debug, Clone, Copy)]
pub(crate) struct WorldTransform {
    transform: Transform,
    dirty: bool,
}

impl WorldTransform {
    /// A cache that has never been computed
    pub fn new() -> Self {
        Self {
            transform: Transform::IDENTITY,
            dirty: true,
        }
    }

    /// The cached value, if it is still valid
    #[inline]
    pub fn get(&self) -> Option<Transform> {
        (!self.dirty).then_some(self.transform)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Store a freshly computed value and mark the cache clean
    #[inline]
    pub fn store(&mut self, transform: Transform) {
        self.transform = transform;
        self.dirty = false;
    }
}

/// Parent component - indicates this node has a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Parent(pub Entity);

impl Parent {
    /// Get the parent entity
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.0
    }
}

/// Children component - tracks all children of this node, in insertion order
#[derive(Debug, Clone, Default)]
pub(crate) struct Children(pub SmallVec<[Entity; 8]>);

impl Children {
    /// Create an empty children list
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Add a child
    pub fn add(&mut self, child: Entity) {
        if !self.0.contains(&child) {
            self.0.push(child);
        }
    }

    /// Remove a child, keeping the order of the others
    pub fn remove(&mut self, child: Entity) -> bool {
        if let Some(pos) = self.0.iter().position(|&e| e == child) {
            self.0.remove(pos);
            true
        } else {
            false
        }
    }

    /// Iterate over children
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entity> {
        self.0.iter()
    }
}

/// Set of string labels used for searching a hierarchy
#[derive(Debug, Clone, Default)]
pub(crate) struct Tags(pub SmallVec<[String; 4]>);

impl Tags {
    pub fn insert(&mut self, tag: String) {
        if !self.contains(&tag) {
            self.0.push(tag);
        }
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|t| t == tag) {
            self.0.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }
}

/// User value associated with a node. The tree never interprets it.
#[derive(Debug, Clone)]
pub(crate) struct Payload<P>(pub P);
