//! Dirty-flag propagation and lazy world transform computation
//!
//! # Design Principles
//!
//! - **Eager Invalidation**: Any local change marks the node and its whole
//!   subtree dirty, since every cached world value below depends on it
//! - **Lazy Evaluation**: World values are only recomputed when read
//! - **Pull From Above**: A read first cleans the ancestors it depends on, so
//!   the chain up to the nearest clean ancestor is recomputed at most once
//!
//! # Example
//!
//! ```ignore
//! let mut tree = TransformTree::<()>::new();
//! let parent = tree.spawn();
//! let child = tree.spawn();
//! tree.set_parent(child, Some(parent))?;
//!
//! tree.set_position(parent, Vec3::new(10.0, 0.0, 0.0))?;   // parent and child dirty
//! let p = tree.world_position(child)?;                     // recomputes parent, then child
//! let p2 = tree.world_position(child)?;                    // cached
//! ```

use glam::{Mat4, Quat, Vec3};
use hecs::Entity;
use smallvec::SmallVec;

use super::components::{Children, Inherit, LocalTransform, Transform, WorldTransform};
use super::world::{NodePayload, TransformTree};
use crate::core::TreeError;

impl<P: NodePayload> TransformTree<P> {
    // -------------------------------------------------------------------------
    // Invalidation
    // -------------------------------------------------------------------------

    /// Mark a node and all of its descendants dirty.
    ///
    /// Every local edit does this already; it is only needed when state the
    /// tree cannot see has changed.
    pub fn mark_dirty(&self, node: Entity) -> Result<(), TreeError> {
        let mut stack = vec![node];
        let mut visited = 0usize;

        while let Some(current) = stack.pop() {
            self.component_mut::<WorldTransform>(current)?.mark_dirty();
            stack.extend(self.component::<Children>(current)?.iter().copied());
            visited += 1;
        }

        log::trace!("Marked {visited} node(s) dirty below {node:?}");
        Ok(())
    }

    /// Check if the cached world transform of a node needs recomputation
    pub fn is_dirty(&self, node: Entity) -> Result<bool, TreeError> {
        Ok(self.component::<WorldTransform>(node)?.is_dirty())
    }

    // -------------------------------------------------------------------------
    // World-space getters (recompute when dirty)
    // -------------------------------------------------------------------------

    /// Get the world-space transform of a node
    pub fn world_transform(&self, node: Entity) -> Result<Transform, TreeError> {
        let cached = self.component::<WorldTransform>(node)?.get();
        if let Some(world) = cached {
            return Ok(world);
        }

        // Collect the dirty chain up to the nearest clean ancestor
        let mut chain: SmallVec<[Entity; 16]> = SmallVec::new();
        chain.push(node);
        let mut base = None;
        let mut current = self.parent(node)?;
        while let Some(entity) = current {
            let cached = self.component::<WorldTransform>(entity)?.get();
            if cached.is_some() {
                base = cached;
                break;
            }
            chain.push(entity);
            current = self.parent(entity)?;
        }

        log::trace!("Recomputing {} world transform(s) for {node:?}", chain.len());

        let mut parent_world = base;
        let mut world = Transform::IDENTITY;
        for &entity in chain.iter().rev() {
            let local = self.component::<LocalTransform>(entity)?.0;
            world = match parent_world {
                Some(parent) => parent.compose(&local, *self.component::<Inherit>(entity)?),
                None => local,
            };
            self.component_mut::<WorldTransform>(entity)?.store(world);
            parent_world = Some(world);
        }

        Ok(world)
    }

    /// Get the world-space position of a node
    pub fn world_position(&self, node: Entity) -> Result<Vec3, TreeError> {
        Ok(self.world_transform(node)?.position)
    }

    /// Get the world-space orientation of a node
    pub fn world_orientation(&self, node: Entity) -> Result<Quat, TreeError> {
        Ok(self.world_transform(node)?.orientation)
    }

    /// Get the world-space scale of a node
    pub fn world_scale(&self, node: Entity) -> Result<Vec3, TreeError> {
        Ok(self.world_transform(node)?.scale)
    }

    /// Get the world-space matrix of a node
    pub fn world_matrix(&self, node: Entity) -> Result<Mat4, TreeError> {
        Ok(self.world_transform(node)?.matrix())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::tree::Space;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn same_rotation(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() > 0.9999
    }

    fn chain(tree: &mut TransformTree, len: usize) -> Vec<Entity> {
        let nodes: Vec<Entity> = (0..len).map(|_| tree.spawn()).collect();
        for pair in nodes.windows(2) {
            tree.set_parent(pair[1], Some(pair[0])).unwrap();
        }
        nodes
    }

    #[test]
    fn test_new_node_is_dirty_until_read() {
        let mut tree = TransformTree::<()>::new();
        let node = tree.spawn();

        assert!(tree.is_dirty(node).unwrap());
        let _ = tree.world_position(node).unwrap();
        assert!(!tree.is_dirty(node).unwrap());
    }

    #[test]
    fn test_root_world_equals_local() {
        let mut tree = TransformTree::<()>::new();
        let node = tree.spawn();

        tree.set_position(node, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        tree.set_orientation(node, Quat::from_rotation_z(0.7)).unwrap();
        tree.set_scale(node, Vec3::new(2.0, 3.0, 4.0)).unwrap();

        assert_eq!(tree.world_transform(node).unwrap(), tree.local_transform(node).unwrap());
    }

    #[test]
    fn test_reads_are_idempotent() {
        let mut tree = TransformTree::<()>::new();
        let nodes = chain(&mut tree, 3);
        tree.set_position(nodes[0], Vec3::new(1.0, 0.0, 0.0)).unwrap();
        tree.rotate(nodes[1], Quat::from_rotation_y(0.3), Space::Local).unwrap();
        tree.set_uniform_scale(nodes[1], 1.5).unwrap();
        tree.set_position(nodes[2], Vec3::new(0.0, 2.0, 1.0)).unwrap();

        let first = tree.world_transform(nodes[2]).unwrap();
        let second = tree.world_transform(nodes[2]).unwrap();
        assert_eq!(first, second);
        assert_eq!(tree.world_matrix(nodes[2]).unwrap(), first.matrix());
    }

    #[test]
    fn test_read_cleans_ancestors() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut tree = TransformTree::<()>::new();
        let nodes = chain(&mut tree, 4);

        let _ = tree.world_position(nodes[2]).unwrap();

        assert!(!tree.is_dirty(nodes[0]).unwrap());
        assert!(!tree.is_dirty(nodes[1]).unwrap());
        assert!(!tree.is_dirty(nodes[2]).unwrap());
        assert!(tree.is_dirty(nodes[3]).unwrap());
    }

    #[test]
    fn test_edit_dirties_whole_subtree_only() {
        let mut tree = TransformTree::<()>::new();
        let nodes = chain(&mut tree, 3);
        let sibling = tree.spawn();
        tree.set_parent(sibling, Some(nodes[0])).unwrap();

        for &node in nodes.iter().chain([&sibling]) {
            let _ = tree.world_position(node).unwrap();
        }

        tree.translate(nodes[1], Vec3::X, Space::Parent).unwrap();

        assert!(!tree.is_dirty(nodes[0]).unwrap());
        assert!(tree.is_dirty(nodes[1]).unwrap());
        assert!(tree.is_dirty(nodes[2]).unwrap());
        assert!(!tree.is_dirty(sibling).unwrap());
    }

    #[test]
    fn test_recompute_through_clean_parent() {
        let mut tree = TransformTree::<()>::new();
        let nodes = chain(&mut tree, 3);
        tree.set_position(nodes[0], Vec3::new(1.0, 0.0, 0.0)).unwrap();
        tree.set_position(nodes[1], Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let _ = tree.world_position(nodes[1]).unwrap();

        tree.set_position(nodes[2], Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(!tree.is_dirty(nodes[1]).unwrap());
        assert!(approx(tree.world_position(nodes[2]).unwrap(), Vec3::ONE));
    }

    #[test]
    fn test_position_follows_rotated_parent() {
        let mut tree = TransformTree::<()>::new();
        let p = tree.spawn();
        let c = tree.spawn();
        tree.set_parent(c, Some(p)).unwrap();

        tree.set_position(p, Vec3::splat(10.0)).unwrap();
        tree.set_orientation(p, Quat::from_axis_angle(Vec3::Y, -PI / 2.0)).unwrap();
        tree.set_position(c, Vec3::new(20.0, 30.0, 40.0)).unwrap();

        assert!(approx(tree.world_position(c).unwrap(), Vec3::new(-30.0, 40.0, 30.0)));
    }

    #[test]
    fn test_orientation_inheritance_off() {
        let mut tree = TransformTree::<()>::new();
        let p = tree.spawn();
        let c = tree.spawn();
        tree.set_inherit_orientation(c, false).unwrap();
        tree.set_parent(c, Some(p)).unwrap();

        let quarter = Quat::from_axis_angle(Vec3::Y, -PI / 2.0);
        tree.set_orientation(p, quarter).unwrap();
        tree.set_orientation(c, quarter).unwrap();

        assert!(same_rotation(tree.world_orientation(p).unwrap(), quarter));
        assert!(same_rotation(tree.world_orientation(c).unwrap(), quarter));

        // Changing the parent again leaves the child alone
        tree.rotate(p, Quat::from_rotation_x(1.0), Space::Local).unwrap();
        assert!(same_rotation(tree.world_orientation(c).unwrap(), quarter));
    }

    #[test]
    fn test_orientation_inherited() {
        let mut tree = TransformTree::<()>::new();
        let p = tree.spawn();
        let c = tree.spawn();
        tree.set_parent(c, Some(p)).unwrap();

        let quarter = Quat::from_axis_angle(Vec3::Y, -PI / 2.0);
        tree.set_orientation(p, quarter).unwrap();
        tree.set_orientation(c, quarter).unwrap();

        let half = Quat::from_axis_angle(Vec3::Y, -PI);
        assert!(same_rotation(tree.world_orientation(c).unwrap(), half));
        assert!((tree.world_orientation(c).unwrap().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_scale_inheritance() {
        let mut tree = TransformTree::<()>::new();
        let p = tree.spawn();
        let c = tree.spawn();
        tree.set_parent(c, Some(p)).unwrap();

        tree.set_scale(p, Vec3::new(2.0, 3.0, 4.0)).unwrap();
        tree.set_scale(c, Vec3::new(2.0, 3.0, 4.0)).unwrap();
        assert!(approx(tree.world_scale(c).unwrap(), Vec3::new(4.0, 9.0, 16.0)));

        tree.set_inherit_scale(c, false).unwrap();
        assert!(approx(tree.world_scale(c).unwrap(), Vec3::new(2.0, 3.0, 4.0)));

        tree.set_scale(p, Vec3::splat(10.0)).unwrap();
        assert!(approx(tree.world_scale(c).unwrap(), Vec3::new(2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_scaled_parent_offsets_child() {
        let mut tree = TransformTree::<()>::new();
        let p = tree.spawn();
        let c = tree.spawn();
        tree.set_parent(c, Some(p)).unwrap();

        tree.set_position(p, Vec3::splat(10.0)).unwrap();
        tree.set_uniform_scale(p, 2.0).unwrap();
        tree.set_position(c, Vec3::new(20.0, 30.0, 40.0)).unwrap();

        assert!(approx(tree.world_position(c).unwrap(), Vec3::new(50.0, 70.0, 90.0)));

        // Opting out of scale does not change how the offset is placed
        tree.set_inherit_scale(c, false).unwrap();
        assert!(approx(tree.world_position(c).unwrap(), Vec3::new(50.0, 70.0, 90.0)));
    }
}
