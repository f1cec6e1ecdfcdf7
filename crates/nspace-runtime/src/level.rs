use std::collections::BTreeMap;

use nspace_entity::Entity;
use nspace_props::EntityId;
use nspace_voxel::{SubstanceId, VoxelArray};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStats {
    pub entities: usize,
    pub voxels: usize,
    pub substances: usize,
}

/// Voxels plus entities keyed by stable id.
#[derive(Default, Debug)]
pub struct Level {
    pub voxels: VoxelArray,
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl Level {
    pub fn new() -> Self {
        Self {
            voxels: VoxelArray::new(),
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn stats(&self) -> LevelStats {
        LevelStats {
            entities: self.entities.len(),
            voxels: self.voxels.len(),
            substances: self.voxels.substances().count(),
        }
    }

    /// Adds an entity under a fresh id and returns it, or `None` once every id is taken.
    pub fn add_entity(&mut self, mut entity: Entity) -> Option<EntityId> {
        let id = self.free_id()?;
        self.next_id = id.0.checked_add(1).unwrap_or(1);
        entity.id = id;
        self.entities.insert(id, entity);
        Some(id)
    }

    /// First unused id at or after `next_id`, wrapping past `u32::MAX` back to 1.
    fn free_id(&self) -> Option<EntityId> {
        if self.entities.len() >= u32::MAX as usize {
            return None;
        }
        let start = self.next_id.max(1);
        (start..=u32::MAX)
            .chain(1..start)
            .map(EntityId)
            .find(|id| !self.entities.contains_key(id))
    }

    /// Adds an entity under the id it already carries. Returns `false` if the id is taken.
    pub fn insert_entity(&mut self, entity: Entity) -> bool {
        let id = entity.id;
        if self.entities.contains_key(&id) {
            return false;
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.entities.insert(id, entity);
        true
    }

    /// Removes an entity; references to it elsewhere become null.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(&id)?;
        for other in self.entities.values_mut() {
            let cleared = other.retain_references(|r| r != id);
            if cleared > 0 {
                log::info!(
                    target: "level",
                    "{} {}: cleared {} reference(s) to removed {}",
                    other.id,
                    other,
                    cleared,
                    id
                );
            }
        }
        Some(removed)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// The substance entity that owns `substance`, if any.
    pub fn substance_entity(&self, substance: SubstanceId) -> Option<EntityId> {
        self.entities
            .values()
            .find(|e| e.kind.substance() == Some(substance))
            .map(|e| e.id)
    }

    /// Copies a substance entity's x-ray flag into its substance. Returns whether it changed.
    pub(crate) fn sync_x_ray(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.get(&id) else {
            return false;
        };
        let (Some(substance), Some(dynamic)) = (entity.kind.substance(), entity.kind.dynamic())
        else {
            return false;
        };
        let x_ray = dynamic.x_ray;
        self.voxels.update_substance(substance, |f| f.x_ray = x_ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nspace_entity::{Sensor, ToggleSensor};
    use nspace_props::{EntityRef, PropValue};

    #[test]
    fn ids_are_fresh_and_insert_respects_existing() {
        let mut level = Level::new();
        let a = level.add_entity(Entity::ball());
        assert_eq!(a, Some(EntityId(1)));
        let mut loaded = Entity::marker();
        loaded.id = EntityId(7);
        assert!(level.insert_entity(loaded.clone()));
        assert!(!level.insert_entity(loaded));
        assert_eq!(level.add_entity(Entity::marker()), Some(EntityId(8)));
        assert_eq!(level.stats().entities, 3);
    }

    #[test]
    fn fresh_ids_never_replace_an_entity_at_the_top_of_the_range() {
        let mut level = Level::new();
        let mut player = Entity::player();
        player.id = EntityId(u32::MAX);
        assert!(level.insert_entity(player));
        let mut low = Entity::ball();
        low.id = EntityId(1);
        assert!(level.insert_entity(low));

        assert_eq!(level.add_entity(Entity::marker()), Some(EntityId(2)));
        assert_eq!(level.stats().entities, 3);
        assert!(level.entity(EntityId(u32::MAX)).is_some_and(|e| e.kind.object_type().full_name == "Player"));
        assert!(level.entity(EntityId(1)).is_some());
    }

    #[test]
    fn removing_an_entity_nulls_references_to_it() {
        let mut level = Level::new();
        let target = level.add_entity(Entity::ball()).unwrap();
        let mut lamp = Entity::marker();
        lamp.sensor = Some(Sensor::Toggle(ToggleSensor {
            on_input: EntityRef::to(target),
            ..ToggleSensor::default()
        }));
        let lamp = level.add_entity(lamp).unwrap();

        level.remove_entity(target);
        let sensor = level.entity(lamp).and_then(|e| e.sensor.as_ref()).unwrap();
        assert_eq!(
            sensor.get_property("On input"),
            Some(PropValue::Entity(EntityRef::NONE))
        );
        assert!(level.remove_entity(target).is_none());
    }
}
