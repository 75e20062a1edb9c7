//! Node pool wrapper around hecs

use std::marker::PhantomData;

use hecs::{Component, ComponentError, Entity};

use super::components::{Children, LocalTransform, Payload, Tags, WorldTransform};
use crate::core::{TreeConfig, TreeError};

/// Values that can be associated with a transform node.
///
/// Payloads are compared with `==` when looking nodes up by payload.
pub trait NodePayload: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> NodePayload for T {}

/// A forest of transform nodes.
///
/// Nodes are hecs entities owned by the tree; parent and children links are
/// plain [`Entity`] handles and never keep a node alive. `P` is the type of
/// the optional payload each node can carry.
///
/// World-space getters take `&self`: they refresh the cached values through
/// hecs' runtime-checked borrows. The tree does no locking of its own, so it
/// must not be read and mutated from several threads at once.
pub struct TransformTree<P: NodePayload = ()> {
    /// Storage for all node components
    world: hecs::World,
    /// Settings applied to new nodes and direction solving
    config: TreeConfig,
    _payload: PhantomData<P>,
}

impl<P: NodePayload> TransformTree<P> {
    /// Create an empty tree with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree with the given configuration
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            world: hecs::World::new(),
            config,
            _payload: PhantomData,
        }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Components every node starts with
    fn node_bundle(&self) -> hecs::EntityBuilder {
        let mut builder = hecs::EntityBuilder::new();
        builder
            .add(LocalTransform::default())
            .add(WorldTransform::new())
            .add(self.config.inherit())
            .add(Children::new())
            .add(Tags::default());
        builder
    }

    /// Create a root node with the identity transform
    pub fn spawn(&mut self) -> Entity {
        let mut builder = self.node_bundle();
        let node = self.world.spawn(builder.build());
        log::debug!("Spawned transform node {node:?}");
        node
    }

    /// Create a root node carrying a payload
    pub fn spawn_with(&mut self, payload: P) -> Entity {
        let mut builder = self.node_bundle();
        builder.add(Payload(payload));
        let node = self.world.spawn(builder.build());
        log::debug!("Spawned transform node {node:?} with payload");
        node
    }

    /// Remove a node from the tree.
    ///
    /// The node is detached from its parent first. Its children become roots
    /// and are marked dirty, so no handle to the removed node is left behind.
    pub fn despawn(&mut self, node: Entity) -> Result<(), TreeError> {
        let children = self.children(node)?;

        self.set_parent(node, None)?;
        for &child in &children {
            self.set_parent(child, None)?;
        }

        self.world
            .despawn(node)
            .map_err(|_| TreeError::NoSuchNode(node))?;
        log::debug!(
            "Despawned transform node {node:?}, orphaning {} child(ren)",
            children.len()
        );
        Ok(())
    }

    /// Check if a node exists
    #[must_use]
    pub fn contains(&self, node: Entity) -> bool {
        self.world.contains(node)
    }

    /// Get the number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    /// Check if the tree is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    // -------------------------------------------------------------------------
    // Payload
    // -------------------------------------------------------------------------

    /// Get the payload of a node
    pub fn payload(&self, node: Entity) -> Result<Option<P>, TreeError> {
        Ok(self.optional::<Payload<P>>(node)?.map(|payload| payload.0))
    }

    /// Get the payload of a node converted to `T`.
    ///
    /// Yields `None` when the node has no payload or the conversion fails.
    pub fn payload_as<T: TryFrom<P>>(&self, node: Entity) -> Result<Option<T>, TreeError> {
        Ok(self.payload(node)?.and_then(|payload| T::try_from(payload).ok()))
    }

    /// Associate a payload with a node, replacing any previous one
    pub fn set_payload(&mut self, node: Entity, payload: P) -> Result<(), TreeError> {
        self.world
            .insert_one(node, Payload(payload))
            .map_err(|_| TreeError::NoSuchNode(node))
    }

    /// Remove the payload of a node, returning it
    pub fn clear_payload(&mut self, node: Entity) -> Result<Option<P>, TreeError> {
        match self.world.remove_one::<Payload<P>>(node) {
            Ok(payload) => Ok(Some(payload.0)),
            Err(ComponentError::MissingComponent(_)) => Ok(None),
            Err(ComponentError::NoSuchEntity) => Err(TreeError::NoSuchNode(node)),
        }
    }

    /// Find the node carrying a payload equal to `payload`
    #[must_use]
    pub fn find_by_payload(&self, payload: &P) -> Option<Entity> {
        self.world
            .query::<&Payload<P>>()
            .iter()
            .find_map(|(node, stored)| (stored.0 == *payload).then_some(node))
    }

    // -------------------------------------------------------------------------
    // Component access
    // -------------------------------------------------------------------------

    /// Fail unless `node` is alive
    pub(super) fn ensure(&self, node: Entity) -> Result<(), TreeError> {
        if self.world.contains(node) {
            Ok(())
        } else {
            Err(TreeError::NoSuchNode(node))
        }
    }

    /// Borrow a component every node carries
    pub(super) fn component<T: Component>(
        &self,
        node: Entity,
    ) -> Result<hecs::Ref<'_, T>, TreeError> {
        self.world
            .get::<&T>(node)
            .map_err(|_| TreeError::NoSuchNode(node))
    }

    /// Mutably borrow a component every node carries.
    ///
    /// Takes `&self` so cached world values can be refreshed from getters;
    /// hecs checks the borrow at runtime.
    pub(super) fn component_mut<T: Component>(
        &self,
        node: Entity,
    ) -> Result<hecs::RefMut<'_, T>, TreeError> {
        self.world
            .get::<&mut T>(node)
            .map_err(|_| TreeError::NoSuchNode(node))
    }

    /// Copy out a component only some nodes carry
    pub(super) fn optional<T: Component + Clone>(
        &self,
        node: Entity,
    ) -> Result<Option<T>, TreeError> {
        match self.world.get::<&T>(node) {
            Ok(component) => Ok(Some((*component).clone())),
            Err(ComponentError::MissingComponent(_)) => Ok(None),
            Err(ComponentError::NoSuchEntity) => Err(TreeError::NoSuchNode(node)),
        }
    }

    pub(super) fn insert<T: Component>(&mut self, node: Entity, component: T) -> Result<(), TreeError> {
        self.world
            .insert_one(node, component)
            .map_err(|_| TreeError::NoSuchNode(node))
    }

    /// Remove a component only some nodes carry, ignoring its absence
    pub(super) fn remove<T: Component>(&mut self, node: Entity) -> Result<(), TreeError> {
        match self.world.remove_one::<T>(node) {
            Ok(_) | Err(ComponentError::MissingComponent(_)) => Ok(()),
            Err(ComponentError::NoSuchEntity) => Err(TreeError::NoSuchNode(node)),
        }
    }

    /// Query the underlying storage
    pub(super) fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.world.query::<Q>()
    }
}

impl<P: NodePayload> Default for TransformTree<P> {
    fn default() -> Self {
        Self::new()
    }
}
