//! Objects that own a node of a transform tree

use hecs::Entity;

use crate::core::TreeError;
use crate::tree::{NodePayload, TransformTree};

/// An object placed in the world through a node it owns.
///
/// Implementors only provide [`node`](Transformable::node); parenting between
/// objects then goes through their nodes.
///
/// ```ignore
/// struct Ship {
///     node: Entity,
/// }
///
/// impl Transformable for Ship {
///     fn node(&self) -> Entity {
///         self.node
///     }
/// }
///
/// turret.attach_to(&mut tree, Some(&ship))?;
/// ```
pub trait Transformable {
    /// The node holding this object's transform
    fn node(&self) -> Entity;

    /// Make this object a child of `parent`, or a root with `None`
    fn attach_to<P: NodePayload, T: Transformable + ?Sized>(
        &self,
        tree: &mut TransformTree<P>,
        parent: Option<&T>,
    ) -> Result<(), TreeError> {
        tree.set_parent(self.node(), parent.map(|parent| parent.node()))
    }

    /// Make this object a root
    fn detach<P: NodePayload>(&self, tree: &mut TransformTree<P>) -> Result<(), TreeError> {
        tree.set_parent(self.node(), None)
    }
}

impl Transformable for Entity {
    fn node(&self) -> Entity {
        *self
    }
}
