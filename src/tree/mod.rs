//! Transform hierarchy
//!
//! A [`TransformTree`] owns every node. Nodes are addressed by [`hecs::Entity`]
//! handles, each carrying a local [`Transform`] relative to its parent and a
//! lazily recomputed world transform.

mod cached;
mod components;
mod edit;
mod hierarchy;
mod tags;
mod world;

pub use components::{Inherit, Space, Transform};
pub use world::{NodePayload, TransformTree};
