//! Entities are an id plus a bag of components keyed by component type.
//!
//! Each entity holds at most one component of a given type; attaching another
//! replaces the first. Owners release entities explicitly through
//! [`Entity::destroy`].

pub mod components;

pub use components::{CameraBinding, Position, Rotation, Velocity};

use log::debug;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out unique entity ids.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> Entity {
        let id = EntityId(self.next);
        self.next += 1;
        Entity::new(id)
    }
}

pub struct Entity {
    id: EntityId,
    components: HashMap<TypeId, Box<dyn Any>>,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            components: HashMap::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attaches `component`, returning the one of the same type it replaced.
    pub fn attach<C: 'static>(&mut self, component: C) -> Option<C> {
        self.components
            .insert(TypeId::of::<C>(), Box::new(component))
            .and_then(|old| old.downcast::<C>().ok())
            .map(|old| *old)
    }

    /// Builder-style [`Entity::attach`].
    pub fn with<C: 'static>(mut self, component: C) -> Self {
        self.attach(component);
        self
    }

    pub fn get<C: 'static>(&self) -> Option<&C> {
        self.components
            .get(&TypeId::of::<C>())
            .and_then(|c| c.downcast_ref::<C>())
    }

    pub fn get_mut<C: 'static>(&mut self) -> Option<&mut C> {
        self.components
            .get_mut(&TypeId::of::<C>())
            .and_then(|c| c.downcast_mut::<C>())
    }

    pub fn has<C: 'static>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<C>())
    }

    pub fn detach<C: 'static>(&mut self) -> Option<C> {
        self.components
            .remove(&TypeId::of::<C>())
            .and_then(|c| c.downcast::<C>().ok())
            .map(|c| *c)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Releases every component. Called by the owning collection when it drops the entity.
    pub fn destroy(mut self) {
        debug!("Destroying entity {} ({} components)", self.id, self.components.len());
        self.components.clear();
    }

    /// Component of type `C`, or a default one attached on the spot.
    pub fn get_or_default<C: Default + 'static>(&mut self) -> &mut C {
        if !self.has::<C>() {
            debug!("Entity {} had no {}, attaching default", self.id, type_name::<C>());
            self.attach(C::default());
        }
        self.components
            .get_mut(&TypeId::of::<C>())
            .and_then(|c| c.downcast_mut::<C>())
            .unwrap_or_else(|| unreachable!("component was just attached"))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", &self.components.len())
            .finish()
    }
}
