//! Local-space getters and edit operations
//!
//! Every edit overwrites a field of the node's local transform and then
//! invalidates the cached world transform of the node and its subtree.

use glam::{Mat4, Quat, Vec3};
use hecs::Entity;

use super::components::{Inherit, LocalTransform, Space, Transform};
use super::world::{NodePayload, TransformTree};
use crate::core::TreeError;
use crate::math::rotation_to;

impl<P: NodePayload> TransformTree<P> {
    /// Apply `edit` to the local transform of a node and invalidate its subtree
    fn edit_local(
        &mut self,
        node: Entity,
        edit: impl FnOnce(&mut Transform),
    ) -> Result<(), TreeError> {
        edit(&mut self.component_mut::<LocalTransform>(node)?.0);
        self.mark_dirty(node)
    }

    fn edit_inherit(
        &mut self,
        node: Entity,
        edit: impl FnOnce(&mut Inherit),
    ) -> Result<(), TreeError> {
        edit(&mut *self.component_mut::<Inherit>(node)?);
        self.mark_dirty(node)
    }

    // -------------------------------------------------------------------------
    // Local getters
    // -------------------------------------------------------------------------

    /// Get the transform of a node relative to its parent
    pub fn local_transform(&self, node: Entity) -> Result<Transform, TreeError> {
        Ok(self.component::<LocalTransform>(node)?.0)
    }

    /// Get the position of a node relative to its parent
    pub fn position(&self, node: Entity) -> Result<Vec3, TreeError> {
        Ok(self.local_transform(node)?.position)
    }

    /// Get the orientation of a node relative to its parent
    pub fn orientation(&self, node: Entity) -> Result<Quat, TreeError> {
        Ok(self.local_transform(node)?.orientation)
    }

    /// Get the scale of a node relative to its parent
    pub fn scale(&self, node: Entity) -> Result<Vec3, TreeError> {
        Ok(self.local_transform(node)?.scale)
    }

    /// Get the local matrix of a node
    pub fn matrix(&self, node: Entity) -> Result<Mat4, TreeError> {
        Ok(self.local_transform(node)?.matrix())
    }

    /// Check if a node picks up its parent's orientation
    pub fn inherits_orientation(&self, node: Entity) -> Result<bool, TreeError> {
        Ok(self.component::<Inherit>(node)?.orientation)
    }

    /// Check if a node picks up its parent's scale
    pub fn inherits_scale(&self, node: Entity) -> Result<bool, TreeError> {
        Ok(self.component::<Inherit>(node)?.scale)
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    /// Set the position of a node relative to its parent
    pub fn set_position(&mut self, node: Entity, position: Vec3) -> Result<(), TreeError> {
        self.edit_local(node, |local| local.position = position)
    }

    /// Set the orientation of a node relative to its parent.
    ///
    /// The quaternion is normalized before it is stored.
    pub fn set_orientation(&mut self, node: Entity, orientation: Quat) -> Result<(), TreeError> {
        self.edit_local(node, |local| local.orientation = orientation.normalize())
    }

    /// Set the scale of a node relative to its parent
    pub fn set_scale(&mut self, node: Entity, scale: Vec3) -> Result<(), TreeError> {
        self.edit_local(node, |local| local.scale = scale)
    }

    /// Set the same scale on all three axes
    pub fn set_uniform_scale(&mut self, node: Entity, scale: f32) -> Result<(), TreeError> {
        self.set_scale(node, Vec3::splat(scale))
    }

    /// Replace position, orientation and scale with those extracted from an
    /// affine matrix.
    ///
    /// # Errors
    ///
    /// [`TreeError::DegenerateMatrix`] if the homogeneous component of the
    /// matrix is zero.
    pub fn set_matrix(&mut self, node: Entity, matrix: &Mat4) -> Result<(), TreeError> {
        self.ensure(node)?;
        let transform = Transform::from_matrix(matrix).ok_or(TreeError::DegenerateMatrix)?;
        self.edit_local(node, |local| *local = transform)
    }

    /// Choose whether the node picks up its parent's orientation
    pub fn set_inherit_orientation(&mut self, node: Entity, inherit: bool) -> Result<(), TreeError> {
        self.edit_inherit(node, |flags| flags.orientation = inherit)
    }

    /// Choose whether the node picks up its parent's scale
    pub fn set_inherit_scale(&mut self, node: Entity, inherit: bool) -> Result<(), TreeError> {
        self.edit_inherit(node, |flags| flags.scale = inherit)
    }

    // -------------------------------------------------------------------------
    // Translation
    // -------------------------------------------------------------------------

    /// Move a node by `delta`, expressed in `space`.
    ///
    /// A world-space delta is brought into the parent's frame by undoing the
    /// parent's world orientation and scale.
    pub fn translate(&mut self, node: Entity, delta: Vec3, space: Space) -> Result<(), TreeError> {
        let offset = match space {
            Space::Local => self.orientation(node)? * delta,
            Space::Parent => delta,
            Space::World => match self.parent(node)? {
                Some(parent) => {
                    let parent_world = self.world_transform(parent)?;
                    (parent_world.orientation.inverse() * delta) / parent_world.scale
                }
                None => delta,
            },
        };

        self.edit_local(node, |local| local.position += offset)
    }

    // -------------------------------------------------------------------------
    // Rotation
    // -------------------------------------------------------------------------

    /// Rotate a node by `rotation`, expressed in `space`
    pub fn rotate(&mut self, node: Entity, rotation: Quat, space: Space) -> Result<(), TreeError> {
        let orientation = self.orientation(node)?;
        let rotated = match space {
            Space::Local => orientation * rotation,
            Space::Parent => rotation * orientation,
            Space::World => {
                // Read before the local write dirties the cache
                let world = self.world_orientation(node)?;
                orientation * world.inverse() * rotation * world
            }
        };

        self.set_orientation(node, rotated)
    }

    /// Rotate a node by `angle` radians around `axis`
    ///
    /// # Errors
    ///
    /// [`TreeError::ZeroAxis`] if `axis` has zero length.
    pub fn rotate_axis(
        &mut self,
        node: Entity,
        axis: Vec3,
        angle: f32,
        space: Space,
    ) -> Result<(), TreeError> {
        self.ensure(node)?;
        if axis.length_squared() == 0.0 {
            return Err(TreeError::ZeroAxis);
        }
        self.rotate(node, Quat::from_axis_angle(axis.normalize(), angle), space)
    }

    /// Rotate around the X axis
    pub fn roll(&mut self, node: Entity, angle: f32, space: Space) -> Result<(), TreeError> {
        self.rotate_axis(node, Vec3::X, angle, space)
    }

    /// Rotate around the Y axis
    pub fn pitch(&mut self, node: Entity, angle: f32, space: Space) -> Result<(), TreeError> {
        self.rotate_axis(node, Vec3::Y, angle, space)
    }

    /// Rotate around the Z axis
    pub fn yaw(&mut self, node: Entity, angle: f32, space: Space) -> Result<(), TreeError> {
        self.rotate_axis(node, Vec3::Z, angle, space)
    }

    /// Reset the orientation of a node to identity
    pub fn reset_orientation(&mut self, node: Entity) -> Result<(), TreeError> {
        self.set_orientation(node, Quat::IDENTITY)
    }

    // -------------------------------------------------------------------------
    // Scaling
    // -------------------------------------------------------------------------

    /// Multiply the scale of a node component-wise
    pub fn scale_by(&mut self, node: Entity, factor: Vec3) -> Result<(), TreeError> {
        self.edit_local(node, |local| local.scale *= factor)
    }

    /// Multiply the scale of a node by the same factor on all axes
    pub fn scale_uniform(&mut self, node: Entity, factor: f32) -> Result<(), TreeError> {
        self.scale_by(node, Vec3::splat(factor))
    }

    // -------------------------------------------------------------------------
    // Direction
    // -------------------------------------------------------------------------

    /// Turn a node so that its `local_forward` axis points along `target`,
    /// expressed in `space`.
    ///
    /// A zero `target` leaves the node unchanged. When the node currently
    /// faces exactly away from `target` it is turned by a fixed half turn.
    ///
    /// # Errors
    ///
    /// [`TreeError::ZeroAxis`] if `local_forward` has zero length.
    pub fn set_direction(
        &mut self,
        node: Entity,
        target: Vec3,
        space: Space,
        local_forward: Vec3,
    ) -> Result<(), TreeError> {
        self.ensure(node)?;
        if local_forward.length_squared() == 0.0 {
            return Err(TreeError::ZeroAxis);
        }
        if target == Vec3::ZERO {
            log::trace!("Ignoring zero direction for {node:?}");
            return Ok(());
        }

        let inherits = self.inherits_orientation(node)?;
        let parent_orientation = match self.parent(node)? {
            Some(parent) if inherits => Some(self.world_orientation(parent)?),
            _ => None,
        };

        let current = self.world_orientation(node)?;
        let target = target.normalize();
        let target = match space {
            Space::Local => current * target,
            Space::Parent => parent_orientation.map_or(target, |parent| parent * target),
            Space::World => target,
        };

        let current_direction = current * local_forward;
        let world = if (current_direction + target).length_squared()
            < self.config().antiparallel_epsilon
        {
            log::trace!("Half turn fallback for {node:?}");
            Quat::from_xyzw(-current.z, current.w, current.x, -current.y)
        } else {
            rotation_to(current_direction, target, Vec3::ZERO) * current
        };

        let local = parent_orientation.map_or(world, |parent| parent.conjugate() * world);
        self.set_orientation(node, local)
    }

    /// [`set_direction`](Self::set_direction) in local space with the
    /// configured forward axis
    pub fn set_direction_default(&mut self, node: Entity, target: Vec3) -> Result<(), TreeError> {
        let forward = self.config().forward;
        self.set_direction(node, target, Space::Local, forward)
    }

    /// Turn a node so that its `local_forward` axis points at `point`.
    ///
    /// The point is measured from the world position of the node in world
    /// space, from its local position in parent space and from the origin in
    /// local space.
    pub fn look_at(
        &mut self,
        node: Entity,
        point: Vec3,
        space: Space,
        local_forward: Vec3,
    ) -> Result<(), TreeError> {
        let origin = match space {
            Space::World => self.world_position(node)?,
            Space::Parent => self.position(node)?,
            Space::Local => Vec3::ZERO,
        };

        self.set_direction(node, point - origin, space, local_forward)
    }

    /// [`look_at`](Self::look_at) in local space with the configured forward
    /// axis
    pub fn look_at_default(&mut self, node: Entity, point: Vec3) -> Result<(), TreeError> {
        let forward = self.config().forward;
        self.look_at(node, point, Space::Local, forward)
    }
}
