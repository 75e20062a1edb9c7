//! String tags attached to nodes

use hecs::Entity;

use super::components::Tags;
use super::world::{NodePayload, TransformTree};
use crate::core::TreeError;

impl<P: NodePayload> TransformTree<P> {
    /// Attach a tag to a node. Adding a tag twice has no effect.
    pub fn add_tag(&mut self, node: Entity, tag: impl Into<String>) -> Result<(), TreeError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(TreeError::EmptyTag);
        }
        self.component_mut::<Tags>(node)?.insert(tag);
        Ok(())
    }

    /// Detach a tag from a node, returning whether it was present
    pub fn remove_tag(&mut self, node: Entity, tag: &str) -> Result<bool, TreeError> {
        if tag.is_empty() {
            return Err(TreeError::EmptyTag);
        }
        Ok(self.component_mut::<Tags>(node)?.remove(tag))
    }

    /// Check if a node carries a tag
    pub fn has_tag(&self, node: Entity, tag: &str) -> Result<bool, TreeError> {
        if tag.is_empty() {
            return Err(TreeError::EmptyTag);
        }
        Ok(self.component::<Tags>(node)?.contains(tag))
    }

    /// Get the tags of a node in the order they were added
    pub fn tags(&self, node: Entity) -> Result<Vec<String>, TreeError> {
        Ok(self.component::<Tags>(node)?.0.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tag() {
        let mut tree = TransformTree::<()>::new();
        let node = tree.spawn();

        assert!(!tree.has_tag(node, "tag").unwrap());
        assert!(tree.tags(node).unwrap().is_empty());
    }

    #[test]
    fn test_tag_addition() {
        let mut tree = TransformTree::<()>::new();
        let node = tree.spawn();

        tree.add_tag(node, "tag1").unwrap();
        tree.add_tag(node, String::from("tag2")).unwrap();
        tree.add_tag(node, "tag1").unwrap();

        assert!(tree.has_tag(node, "tag1").unwrap());
        assert!(tree.has_tag(node, "tag2").unwrap());
        assert!(!tree.has_tag(node, "tag3").unwrap());
        assert_eq!(tree.tags(node).unwrap(), vec!["tag1", "tag2"]);
    }

    #[test]
    fn test_tag_removal() {
        let mut tree = TransformTree::<()>::new();
        let node = tree.spawn();
        tree.add_tag(node, "tag1").unwrap();
        tree.add_tag(node, "tag2").unwrap();

        assert!(tree.remove_tag(node, "tag1").unwrap());
        assert!(!tree.remove_tag(node, "tag1").unwrap());

        assert!(!tree.has_tag(node, "tag1").unwrap());
        assert!(tree.has_tag(node, "tag2").unwrap());
    }

    #[test]
    fn test_tags_are_per_node() {
        let mut tree = TransformTree::<()>::new();
        let parent = tree.spawn();
        let child = tree.spawn();
        tree.set_parent(child, Some(parent)).unwrap();

        tree.add_tag(parent, "vehicle").unwrap();
        assert!(!tree.has_tag(child, "vehicle").unwrap());
    }

    #[test]
    fn test_empty_tag_rejected() {
        let mut tree = TransformTree::<()>::new();
        let node = tree.spawn();

        assert_eq!(tree.add_tag(node, ""), Err(TreeError::EmptyTag));
        assert_eq!(tree.has_tag(node, ""), Err(TreeError::EmptyTag));
        assert_eq!(tree.remove_tag(node, ""), Err(TreeError::EmptyTag));
        assert!(tree.tags(node).unwrap().is_empty());
    }
}
