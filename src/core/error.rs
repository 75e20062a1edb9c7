//! Errors reported by transform tree operations

use hecs::Entity;

/// Errors that can occur when operating on a [`TransformTree`](crate::tree::TransformTree)
///
/// All of these are precondition violations: the operation that reports one
/// leaves the tree untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The handle does not refer to a live node of this tree
    NoSuchNode(Entity),
    /// A node was given itself as parent
    SelfParent(Entity),
    /// The requested parent is a descendant of the node
    Cycle {
        /// Node being re-parented
        node: Entity,
        /// Requested parent, found below `node`
        parent: Entity,
    },
    /// Tags must not be empty
    EmptyTag,
    /// The matrix has a zero homogeneous component
    DegenerateMatrix,
    /// A rotation axis or forward axis has zero length
    ZeroAxis,
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSuchNode(node) => write!(f, "No such transform node: {node:?}"),
            Self::SelfParent(node) => write!(f, "Transform node {node:?} cannot be its own parent"),
            Self::Cycle { node, parent } => write!(
                f,
                "Cannot parent {node:?} to {parent:?}: {parent:?} is one of its descendants"
            ),
            Self::EmptyTag => write!(f, "Tags must not be empty"),
            Self::DegenerateMatrix => write!(f, "Matrix has a zero homogeneous component"),
            Self::ZeroAxis => write!(f, "Axis must have a non-zero length"),
        }
    }
}

impl std::error::Error for TreeError {}
