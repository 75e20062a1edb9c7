//! Parent-child relationships between nodes

use hecs::Entity;

use super::components::{Children, Parent};
use super::world::{NodePayload, TransformTree};
use crate::core::TreeError;

impl<P: NodePayload> TransformTree<P> {
    /// Get the parent of a node
    pub fn parent(&self, node: Entity) -> Result<Option<Entity>, TreeError> {
        Ok(self.optional::<Parent>(node)?.map(|parent| parent.entity()))
    }

    /// Get the direct children of a node, in the order they were attached
    pub fn children(&self, node: Entity) -> Result<Vec<Entity>, TreeError> {
        Ok(self.component::<Children>(node)?.iter().copied().collect())
    }

    /// Set the parent of a node, or detach it with `None`.
    ///
    /// The node is removed from its previous parent's children and appended
    /// to the new parent's. Its whole subtree is marked dirty.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if either handle is stale, if `parent`
    /// is `node` itself, or if `parent` lies below `node`.
    pub fn set_parent(&mut self, node: Entity, parent: Option<Entity>) -> Result<(), TreeError> {
        self.ensure(node)?;
        if let Some(parent) = parent {
            if parent == node {
                return Err(TreeError::SelfParent(node));
            }
            self.ensure(parent)?;
            if self.is_ancestor_of(node, parent)? {
                return Err(TreeError::Cycle { node, parent });
            }
        }

        let previous = self.parent(node)?;
        if let Some(previous) = previous {
            self.component_mut::<Children>(previous)?.remove(node);
            self.remove::<Parent>(node)?;
        }

        if let Some(parent) = parent {
            self.component_mut::<Children>(parent)?.add(node);
            self.insert(node, Parent(parent))?;
        }

        log::debug!("Reparented {node:?}: {previous:?} -> {parent:?}");
        self.mark_dirty(node)
    }

    /// Check whether `ancestor` is found walking up the parents of `node`
    pub fn is_ancestor_of(&self, ancestor: Entity, node: Entity) -> Result<bool, TreeError> {
        let mut current = self.parent(node)?;
        while let Some(entity) = current {
            if entity == ancestor {
                return Ok(true);
            }
            current = self.parent(entity)?;
        }
        Ok(false)
    }

    /// All nodes without a parent, in no particular order
    #[must_use]
    pub fn roots(&self) -> Vec<Entity> {
        self.query::<&Children>()
            .without::<&Parent>()
            .iter()
            .map(|(node, _)| node)
            .collect()
    }

    /// All nodes below `node`, depth-first, children in attachment order
    pub fn descendants(&self, node: Entity) -> Result<Vec<Entity>, TreeError> {
        let mut result = Vec::new();
        let mut stack: Vec<Entity> = self.children(node)?.into_iter().rev().collect();

        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.component::<Children>(current)?.iter().rev().copied());
        }

        Ok(result)
    }

    /// Find the nodes below `node` carrying `tag`.
    ///
    /// Only direct children are searched unless `recursive` is set, in which
    /// case results come depth-first: each child, then its own matches.
    pub fn find_children(
        &self,
        node: Entity,
        tag: &str,
        recursive: bool,
    ) -> Result<Vec<Entity>, TreeError> {
        if tag.is_empty() {
            return Err(TreeError::EmptyTag);
        }

        let candidates = if recursive {
            self.descendants(node)?
        } else {
            self.children(node)?
        };

        let mut result = Vec::new();
        for candidate in candidates {
            if self.has_tag(candidate, tag)? {
                result.push(candidate);
            }
        }
        Ok(result)
    }
}
