use std::collections::BTreeSet;

use nspace_props::{Condition, EntityId};

use crate::activator::{NO_ACTIVATORS, SensorContext};
use crate::effect::EffectQueue;
use crate::entity::Entity;
use crate::sensor_component::SensorComponent;
use crate::unit::{BehaviorUnit, UnitContext};

struct UnitSlot {
    condition: Condition,
    label: &'static str,
    unit: Box<dyn BehaviorUnit>,
    enabled: bool,
}

/// Play-time state machine of one entity: its sensor component and gated behavior units.
///
/// On a rising edge every OFF unit is disabled before any ON unit is enabled; on a falling
/// edge the reverse. `Both` units stay enabled for the whole session.
pub struct EntityComponent {
    entity: EntityId,
    sensor: Option<Box<dyn SensorComponent>>,
    units: Vec<UnitSlot>,
    sensor_was_on: bool,
}

impl EntityComponent {
    /// Builds the sensor component and behavior units for `entity` and applies their start state.
    pub fn start(entity: &Entity, effects: &mut EffectQueue) -> Self {
        let sensor = entity
            .sensor
            .as_ref()
            .and_then(|s| s.make_component(entity.id));
        if entity.sensor.is_some() && sensor.is_none() {
            log::warn!(target: "sensor", "{} {}: sensor failed to start", entity.id, entity);
        }
        let units = entity
            .behaviors()
            .iter()
            .map(|b| {
                let unit = b.make_unit(entity.id);
                if unit.is_none() {
                    log::warn!(
                        target: "behavior",
                        "{} {}: {} behavior failed to start",
                        entity.id,
                        entity,
                        b.kind.object_type()
                    );
                }
                (b.condition, b.kind.object_type().full_name, unit)
            })
            .collect();
        Self::from_parts(entity.id, sensor, units, effects)
    }

    /// Assembles a component from already-built parts. Units given as `None` are skipped.
    pub fn from_parts(
        entity: EntityId,
        sensor: Option<Box<dyn SensorComponent>>,
        units: Vec<(Condition, &'static str, Option<Box<dyn BehaviorUnit>>)>,
        effects: &mut EffectQueue,
    ) -> Self {
        let mut this = Self {
            entity,
            sensor,
            units: units
                .into_iter()
                .filter_map(|(condition, label, unit)| {
                    unit.map(|unit| UnitSlot {
                        condition,
                        label,
                        unit,
                        enabled: false,
                    })
                })
                .collect(),
            sensor_was_on: false,
        };
        let mut ctx = UnitContext {
            owner: entity,
            dt: 0.0,
            activators: &NO_ACTIVATORS,
            effects,
        };
        for slot in this.units.iter_mut() {
            slot.enabled = slot.condition != Condition::On;
            if slot.enabled {
                slot.unit.activate(&mut ctx);
            } else {
                slot.unit.deactivate(&mut ctx);
            }
        }
        this
    }

    #[inline]
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn has_sensor(&self) -> bool {
        self.sensor.is_some()
    }

    /// `false` without a sensor component.
    pub fn is_on(&self) -> bool {
        self.sensor.as_ref().is_some_and(|s| s.is_on())
    }

    pub fn activators(&self) -> &BTreeSet<EntityId> {
        self.sensor.as_ref().map_or(&NO_ACTIVATORS, |s| s.activators())
    }

    pub fn new_activators(&self) -> &BTreeSet<EntityId> {
        self.sensor.as_ref().map_or(&NO_ACTIVATORS, |s| s.new_activators())
    }

    pub fn removed_activators(&self) -> &BTreeSet<EntityId> {
        self.sensor.as_ref().map_or(&NO_ACTIVATORS, |s| s.removed_activators())
    }

    pub fn activator(&self) -> Option<EntityId> {
        self.sensor.as_ref().and_then(|s| s.activator())
    }

    /// Enabled flag of each started unit, in behavior order.
    pub fn unit_states(&self) -> Vec<bool> {
        self.units.iter().map(|s| s.enabled).collect()
    }

    /// One tick: sensor update, edge handling, then a step of every enabled unit.
    pub fn update(&mut self, ctx: &SensorContext<'_>, effects: &mut EffectQueue) {
        if let Some(sensor) = self.sensor.as_mut() {
            sensor.update(ctx);
            let is_on = sensor.is_on();
            if is_on != self.sensor_was_on {
                log::debug!(
                    target: "sensor",
                    "{} sensor {}",
                    self.entity,
                    if is_on { "on" } else { "off" }
                );
                let (disable, enable) = if is_on {
                    (Condition::Off, Condition::On)
                } else {
                    (Condition::On, Condition::Off)
                };
                self.set_group(disable, false, ctx.dt, effects);
                self.set_group(enable, true, ctx.dt, effects);
            }
            self.sensor_was_on = is_on;
        }

        let activators = self.sensor.as_ref().map_or(&NO_ACTIVATORS, |s| s.activators());
        let mut uctx = UnitContext {
            owner: self.entity,
            dt: ctx.dt,
            activators,
            effects,
        };
        for slot in self.units.iter_mut().filter(|s| s.enabled) {
            slot.unit.step(&mut uctx);
        }
    }

    fn set_group(&mut self, condition: Condition, enabled: bool, dt: f32, effects: &mut EffectQueue) {
        let activators = self.sensor.as_ref().map_or(&NO_ACTIVATORS, |s| s.activators());
        let mut ctx = UnitContext {
            owner: self.entity,
            dt,
            activators,
            effects,
        };
        for slot in self.units.iter_mut() {
            if slot.condition != condition || slot.enabled == enabled {
                continue;
            }
            slot.enabled = enabled;
            log::info!(
                target: "behavior",
                "{} {} {}",
                self.entity,
                slot.label,
                if enabled { "enabled" } else { "disabled" }
            );
            if enabled {
                slot.unit.activate(&mut ctx);
            } else {
                slot.unit.deactivate(&mut ctx);
            }
        }
    }
}
