//! Entity list appliers
//!
//! A reconciler owns one `EntityList` per entity kind. Server events are the
//! only input: each applier takes the current list and one payload and leaves
//! the next list behind, reporting whether anything changed.

use super::{add_reaction, remove_reaction, Entity};
use crate::value_objects::{EntityId, UserId};

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
    Unchanged,
}

impl Upsert {
    #[inline]
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Ordered list of entities keyed by id
#[derive(Debug, Clone, PartialEq)]
pub struct EntityList<E: Entity> {
    items: Vec<E>,
}

impl<E: Entity> EntityList<E> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a list from a REST load, keeping server order
    ///
    /// Later duplicates replace earlier ones in place.
    pub fn from_loaded(items: Vec<E>) -> Self {
        let mut list = Self::new();
        for item in items {
            list.apply_upserted(item);
        }
        list
    }

    /// Replace the whole list with a fresh load
    pub fn replace_all(&mut self, items: Vec<E>) {
        *self = Self::from_loaded(items);
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(E::id).collect()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }

    // === Appliers ===

    /// Apply a created event; a repeated event never duplicates
    pub fn apply_created(&mut self, entity: E) -> bool {
        self.apply_upserted(entity).changed()
    }

    /// Apply an updated event; unknown ids are ignored
    pub fn apply_updated(&mut self, entity: E) -> bool {
        match self.position(entity.id()) {
            Some(index) if self.items[index] != entity => {
                self.items[index] = entity;
                true
            }
            _ => false,
        }
    }

    /// Insert at the end or replace in place
    pub fn apply_upserted(&mut self, entity: E) -> Upsert {
        match self.position(entity.id()) {
            Some(index) if self.items[index] == entity => Upsert::Unchanged,
            Some(index) => {
                self.items[index] = entity;
                Upsert::Replaced
            }
            None => {
                self.items.push(entity);
                Upsert::Inserted
            }
        }
    }

    pub fn apply_deleted(&mut self, id: EntityId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn apply_reaction_added(&mut self, id: EntityId, emoji: &str, user_id: &UserId) -> bool {
        self.reactions_of(id)
            .is_some_and(|reactions| add_reaction(reactions, emoji, user_id))
    }

    pub fn apply_reaction_removed(&mut self, id: EntityId, emoji: &str, user_id: &UserId) -> bool {
        self.reactions_of(id)
            .is_some_and(|reactions| remove_reaction(reactions, emoji, user_id))
    }

    fn reactions_of(&mut self, id: EntityId) -> Option<&mut Vec<super::Reaction>> {
        self.items
            .iter_mut()
            .find(|e| e.id() == id)
            .and_then(E::reactions_mut)
    }
}

impl<E: Entity> Default for EntityList<E> {
    fn default() -> Self {
        Self::new()
    }
}
