//! Transform tree configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tree::Inherit;

/// Transform tree configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Axis that points "forward" in a node's local space, usually -Z
    pub forward: Vec3,
    /// Whether new nodes inherit the orientation of their parent
    pub inherit_orientation: bool,
    /// Whether new nodes inherit the scale of their parent
    pub inherit_scale: bool,
    /// Squared length under which the current and target directions of
    /// `set_direction` are considered opposite
    pub antiparallel_epsilon: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            inherit_orientation: true,
            inherit_scale: true,
            antiparallel_epsilon: 5e-5,
        }
    }
}

impl TreeConfig {
    /// Set the local forward axis
    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.forward = forward;
        self
    }

    /// Set whether new nodes inherit orientation
    pub fn with_inherit_orientation(mut self, inherit: bool) -> Self {
        self.inherit_orientation = inherit;
        self
    }

    /// Set whether new nodes inherit scale
    pub fn with_inherit_scale(mut self, inherit: bool) -> Self {
        self.inherit_scale = inherit;
        self
    }

    /// Set the threshold for the half-turn fallback of `set_direction`
    pub fn with_antiparallel_epsilon(mut self, epsilon: f32) -> Self {
        self.antiparallel_epsilon = epsilon;
        self
    }

    /// Inheritance flags given to newly spawned nodes
    pub(crate) fn inherit(&self) -> Inherit {
        Inherit {
            orientation: self.inherit_orientation,
            scale: self.inherit_scale,
        }
    }
}
