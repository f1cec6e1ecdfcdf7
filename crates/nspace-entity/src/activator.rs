use std::collections::BTreeSet;

use nspace_geom::Vec3;
use nspace_props::EntityId;

/// Read-only view of the level a sensor evaluates against.
///
/// Sensor states seen through this view are the ones snapshotted at the start of the tick.
pub trait WorldView {
    /// `false` for entities without a sensor and for ids that do not exist.
    fn sensor_on(&self, id: EntityId) -> bool;
    fn sensor_activator(&self, id: EntityId) -> Option<EntityId>;
    /// Entities currently touching `id`, as reported by the physics host.
    fn contacts(&self, id: EntityId) -> Vec<EntityId>;
    fn position(&self, id: EntityId) -> Option<Vec3>;
    fn entity_ids(&self) -> Vec<EntityId>;
    /// `(tag, type full_name)` for filter matching.
    fn describe(&self, id: EntityId) -> Option<(u8, &'static str)>;
}

pub struct SensorContext<'a> {
    pub owner: EntityId,
    pub position: Vec3,
    pub dt: f32,
    pub world: &'a dyn WorldView,
}

pub(crate) static NO_ACTIVATORS: BTreeSet<EntityId> = BTreeSet::new();

/// Current activator set plus what entered and left it on the last update.
#[derive(Clone, Debug, Default)]
pub struct ActivatorTracker {
    current: BTreeSet<EntityId>,
    added: BTreeSet<EntityId>,
    removed: BTreeSet<EntityId>,
}

impl ActivatorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current set and records the difference.
    pub fn update(&mut self, next: BTreeSet<EntityId>) {
        self.added = next.difference(&self.current).copied().collect();
        self.removed = self.current.difference(&next).copied().collect();
        self.current = next;
    }

    pub fn current(&self) -> &BTreeSet<EntityId> {
        &self.current
    }

    pub fn added(&self) -> &BTreeSet<EntityId> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeSet<EntityId> {
        &self.removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> BTreeSet<EntityId> {
        ids.iter().map(|&i| EntityId(i)).collect()
    }

    #[test]
    fn diffs_against_previous_update() {
        let mut t = ActivatorTracker::new();
        t.update(set(&[1, 2]));
        assert_eq!(t.added(), &set(&[1, 2]));
        assert!(t.removed().is_empty());
        t.update(set(&[2, 3]));
        assert_eq!(t.added(), &set(&[3]));
        assert_eq!(t.removed(), &set(&[1]));
        t.update(set(&[2, 3]));
        assert!(t.added().is_empty() && t.removed().is_empty());
        assert_eq!(t.current(), &set(&[2, 3]));
    }
}
