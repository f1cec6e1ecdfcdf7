use std::collections::BTreeMap;

use hashbrown::HashMap;
use nspace_entity::{Effect, EffectQueue, EntityComponent, SensorContext, WorldView};
use nspace_geom::Vec3;
use nspace_props::{EntityId, PropertiesObject};
use nspace_voxel::{EditorMode, RenderContext, VoxelId, VoxelRender};

use crate::level::Level;

/// Play-time world state of one entity, as changed by behavior effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityState {
    pub visible: bool,
    pub solid: bool,
    /// `None` for entities without health.
    pub health: Option<f32>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub effects: usize,
    pub rebuilt: usize,
}

/// What sensors see during one tick. Sensor states are taken before any entity updates.
struct Snapshot<'a> {
    sensors: HashMap<EntityId, (bool, Option<EntityId>)>,
    level: &'a Level,
    contacts: &'a HashMap<EntityId, Vec<EntityId>>,
}

impl WorldView for Snapshot<'_> {
    fn sensor_on(&self, id: EntityId) -> bool {
        self.sensors.get(&id).is_some_and(|s| s.0)
    }

    fn sensor_activator(&self, id: EntityId) -> Option<EntityId> {
        self.sensors.get(&id).and_then(|s| s.1)
    }

    fn contacts(&self, id: EntityId) -> Vec<EntityId> {
        self.contacts.get(&id).cloned().unwrap_or_default()
    }

    fn position(&self, id: EntityId) -> Option<Vec3> {
        self.level.entity(id).map(|e| e.position)
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.level.entity_ids()
    }

    fn describe(&self, id: EntityId) -> Option<(u8, &'static str)> {
        self.level
            .entity(id)
            .map(|e| (e.tag, e.object_type().full_name))
    }
}

fn apply_effects(
    states: &mut BTreeMap<EntityId, EntityState>,
    effects: &mut EffectQueue,
    tick: u64,
) {
    for effect in effects.drain() {
        let id = effect.entity();
        let Some(state) = states.get_mut(&id) else {
            log::debug!(target: "behavior", "[tick {}] {:?} targets missing {}", tick, effect, id);
            continue;
        };
        match effect {
            Effect::SetVisible { visible, .. } => {
                if state.visible != visible {
                    state.visible = visible;
                    log::info!(target: "behavior", "[tick {}] {} visible={}", tick, id, visible);
                }
            }
            Effect::SetSolid { solid, .. } => {
                if state.solid != solid {
                    state.solid = solid;
                    log::info!(target: "behavior", "[tick {}] {} solid={}", tick, id, solid);
                }
            }
            Effect::Damage { amount, .. } => {
                if let Some(health) = state.health.as_mut() {
                    *health -= amount;
                    log::info!(
                        target: "behavior",
                        "[tick {}] {} hurt {:.1} -> health {:.1}",
                        tick,
                        id,
                        amount,
                        *health
                    );
                }
            }
        }
    }
}

/// A running level: one entity component per entity, ticked in id order.
pub struct PlaySession {
    level: Level,
    ctx: RenderContext,
    components: HashMap<EntityId, EntityComponent>,
    states: BTreeMap<EntityId, EntityState>,
    contacts: HashMap<EntityId, Vec<EntityId>>,
    renders: HashMap<VoxelId, VoxelRender>,
    tick: u64,
}

impl PlaySession {
    pub fn start(level: Level, ctx: RenderContext) -> Self {
        let ctx = RenderContext {
            mode: EditorMode::Play,
            ..ctx
        };
        let states = level
            .entities()
            .map(|e| {
                let flags = e
                    .kind
                    .substance()
                    .and_then(|s| level.voxels.substance(s))
                    .map(|s| s.flags);
                let state = EntityState {
                    visible: flags.is_none_or(|f| f.visible),
                    solid: flags.is_none_or(|f| f.solid),
                    health: e.kind.dynamic().map(|d| d.health),
                };
                (e.id, state)
            })
            .collect();

        let mut session = Self {
            level,
            ctx,
            components: HashMap::new(),
            states,
            contacts: HashMap::new(),
            renders: HashMap::new(),
            tick: 0,
        };

        let mut effects = EffectQueue::new();
        for entity in session.level.entities() {
            let component = EntityComponent::start(entity, &mut effects);
            session.components.insert(entity.id, component);
            apply_effects(&mut session.states, &mut effects, 0);
        }
        session.sync_substances();
        for id in session.level.voxels.ids() {
            session.level.voxels.mark_dirty(id);
        }
        session.rebuild_dirty();
        log::info!(
            target: "level",
            "play started: {} entities, {} voxels",
            session.components.len(),
            session.level.voxels.len()
        );
        session
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Ends the session, handing back the level with its play-time positions.
    pub fn into_level(self) -> Level {
        self.level
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn state(&self, id: EntityId) -> Option<&EntityState> {
        self.states.get(&id)
    }

    pub fn states(&self) -> impl Iterator<Item = (&EntityId, &EntityState)> {
        self.states.iter()
    }

    pub fn component(&self, id: EntityId) -> Option<&EntityComponent> {
        self.components.get(&id)
    }

    pub fn is_on(&self, id: EntityId) -> bool {
        self.components.get(&id).is_some_and(EntityComponent::is_on)
    }

    pub fn render(&self, voxel: VoxelId) -> Option<&VoxelRender> {
        self.renders.get(&voxel)
    }

    /// Physics host input: everything currently touching `entity`.
    pub fn set_contacts(&mut self, entity: EntityId, others: Vec<EntityId>) {
        if others.is_empty() {
            self.contacts.remove(&entity);
        } else {
            self.contacts.insert(entity, others);
        }
    }

    /// Physics host input: where `entity` is now.
    pub fn set_position(&mut self, entity: EntityId, position: Vec3) {
        if let Some(e) = self.level.entity_mut(entity) {
            e.position = position;
        }
    }

    /// Snapshot sensors, update every entity in id order applying its effects, then remesh.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        self.tick += 1;
        let effects = self.update_entities(dt);
        self.sync_substances();
        let rebuilt = self.rebuild_dirty();
        TickReport {
            tick: self.tick,
            effects,
            rebuilt,
        }
    }

    fn update_entities(&mut self, dt: f32) -> usize {
        let tick = self.tick;
        let mut effects = EffectQueue::new();
        let mut applied = 0;
        let snapshot = Snapshot {
            sensors: self
                .components
                .iter()
                .map(|(id, c)| (*id, (c.is_on(), c.activator())))
                .collect(),
            level: &self.level,
            contacts: &self.contacts,
        };
        for entity in self.level.entities() {
            let Some(component) = self.components.get_mut(&entity.id) else {
                continue;
            };
            let ctx = SensorContext {
                owner: entity.id,
                position: entity.position,
                dt,
                world: &snapshot,
            };
            let was_on = component.is_on();
            component.update(&ctx, &mut effects);
            if component.is_on() != was_on {
                log::info!(
                    target: "sensor",
                    "[tick {}] {} {} -> {}",
                    tick,
                    entity.id,
                    entity,
                    if component.is_on() { "on" } else { "off" }
                );
            }
            applied += effects.len();
            apply_effects(&mut self.states, &mut effects, tick);
        }
        applied
    }

    /// Pushes substance entities' visible/solid state into their substances.
    fn sync_substances(&mut self) {
        let updates: Vec<_> = self
            .level
            .entities()
            .filter_map(|e| {
                let state = self.states.get(&e.id)?;
                Some((e.kind.substance()?, state.visible, state.solid))
            })
            .collect();
        for (substance, visible, solid) in updates {
            self.level.voxels.update_substance(substance, |f| {
                f.visible = visible;
                f.solid = solid;
            });
        }
    }

    fn rebuild_dirty(&mut self) -> usize {
        let dirty = self.level.voxels.dirty_voxels();
        for &id in &dirty {
            let rev = self.level.voxels.get_rev(id);
            if let Some(out) = self.level.voxels.render(id, &self.ctx) {
                self.renders.insert(id, out);
            }
            self.level.voxels.mark_built(id, rev);
        }
        if !dirty.is_empty() {
            log::debug!(target: "voxel", "[tick {}] rebuilt {} voxel(s)", self.tick, dirty.len());
        }
        dirty.len()
    }
}
