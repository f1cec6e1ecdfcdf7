use std::collections::BTreeSet;

use nspace_props::{ActivatorFilter, EntityId, EntityRef};

use crate::activator::{ActivatorTracker, NO_ACTIVATORS, SensorContext};

/// Play-time counterpart of a [`Sensor`](crate::Sensor).
pub trait SensorComponent {
    fn update(&mut self, ctx: &SensorContext<'_>);
    fn is_on(&self) -> bool;
    fn activators(&self) -> &BTreeSet<EntityId>;
    /// Activators that appeared on the last update.
    fn new_activators(&self) -> &BTreeSet<EntityId>;
    /// Activators that went away on the last update.
    fn removed_activators(&self) -> &BTreeSet<EntityId>;

    fn activator(&self) -> Option<EntityId> {
        self.activators().first().copied()
    }
}

pub struct ToggleComponent {
    off_input: EntityRef,
    on_input: EntityRef,
    value: bool,
    both_on: bool,
    activator: Option<EntityId>,
    tracker: ActivatorTracker,
}

impl ToggleComponent {
    pub fn new(off_input: EntityRef, on_input: EntityRef, start_on: bool) -> Self {
        Self {
            off_input,
            on_input,
            value: start_on,
            both_on: false,
            activator: None,
            tracker: ActivatorTracker::new(),
        }
    }
}

impl SensorComponent for ToggleComponent {
    fn update(&mut self, ctx: &SensorContext<'_>) {
        let off_on = self.off_input.entity.is_some_and(|id| ctx.world.sensor_on(id));
        let on_on = self.on_input.entity.is_some_and(|id| ctx.world.sensor_on(id));
        let on_input = self.on_input.entity;
        let on_activator = || on_input.and_then(|id| ctx.world.sensor_activator(id));

        if off_on && on_on {
            if !self.both_on {
                self.both_on = true;
                self.value = !self.value;
                if self.value {
                    self.activator = on_activator();
                }
            }
        } else {
            self.both_on = false;
            if off_on {
                self.value = false;
            } else if on_on {
                self.value = true;
                self.activator = on_activator();
            }
        }

        let mut next = BTreeSet::new();
        if self.value {
            next.extend(self.activator);
        }
        self.tracker.update(next);
    }

    fn is_on(&self) -> bool {
        self.value
    }

    fn activators(&self) -> &BTreeSet<EntityId> {
        self.tracker.current()
    }

    fn new_activators(&self) -> &BTreeSet<EntityId> {
        self.tracker.added()
    }

    fn removed_activators(&self) -> &BTreeSet<EntityId> {
        self.tracker.removed()
    }

    fn activator(&self) -> Option<EntityId> {
        self.activator
    }
}

/// Where a touch component gets its candidate entities from.
#[derive(Clone, Copy, Debug, PartialEq)]
enum TouchVolume {
    /// Contacts reported for the owner.
    Owner,
    /// A trigger sphere around the owner; the owner itself never counts.
    Sphere { radius: f32 },
}

pub struct TouchComponent {
    filter: ActivatorFilter,
    volume: TouchVolume,
    tracker: ActivatorTracker,
}

impl TouchComponent {
    pub fn new(filter: ActivatorFilter) -> Self {
        Self {
            filter,
            volume: TouchVolume::Owner,
            tracker: ActivatorTracker::new(),
        }
    }

    pub fn sphere(filter: ActivatorFilter, radius: f32) -> Self {
        Self {
            filter,
            volume: TouchVolume::Sphere { radius },
            tracker: ActivatorTracker::new(),
        }
    }

    fn accepts(&self, ctx: &SensorContext<'_>, id: EntityId) -> bool {
        ctx.world
            .describe(id)
            .is_some_and(|(tag, type_name)| self.filter.matches(id, tag, type_name))
    }
}

impl SensorComponent for TouchComponent {
    fn update(&mut self, ctx: &SensorContext<'_>) {
        let candidates = match self.volume {
            TouchVolume::Owner => ctx.world.contacts(ctx.owner),
            TouchVolume::Sphere { radius } => ctx
                .world
                .entity_ids()
                .into_iter()
                .filter(|&id| id != ctx.owner)
                .filter(|&id| {
                    ctx.world
                        .position(id)
                        .is_some_and(|p| p.distance(ctx.position) <= radius)
                })
                .collect(),
        };
        let next = candidates
            .into_iter()
            .filter(|&id| self.accepts(ctx, id))
            .collect();
        self.tracker.update(next);
    }

    fn is_on(&self) -> bool {
        !self.tracker.current().is_empty()
    }

    fn activators(&self) -> &BTreeSet<EntityId> {
        self.tracker.current()
    }

    fn new_activators(&self) -> &BTreeSet<EntityId> {
        self.tracker.added()
    }

    fn removed_activators(&self) -> &BTreeSet<EntityId> {
        self.tracker.removed()
    }
}

/// Wraps a touch sphere that only exists once the component has run.
pub struct InRangeComponent {
    filter: ActivatorFilter,
    distance: f32,
    sphere: Option<TouchComponent>,
}

impl InRangeComponent {
    pub fn new(filter: ActivatorFilter, distance: f32) -> Self {
        Self {
            filter,
            distance,
            sphere: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sphere.is_some()
    }
}

impl SensorComponent for InRangeComponent {
    fn update(&mut self, ctx: &SensorContext<'_>) {
        let filter = &self.filter;
        let distance = self.distance;
        self.sphere
            .get_or_insert_with(|| TouchComponent::sphere(filter.clone(), distance))
            .update(ctx);
    }

    fn is_on(&self) -> bool {
        self.sphere.as_ref().is_some_and(|s| s.is_on())
    }

    fn activators(&self) -> &BTreeSet<EntityId> {
        self.sphere.as_ref().map_or(&NO_ACTIVATORS, |s| s.activators())
    }

    fn new_activators(&self) -> &BTreeSet<EntityId> {
        self.sphere.as_ref().map_or(&NO_ACTIVATORS, |s| s.new_activators())
    }

    fn removed_activators(&self) -> &BTreeSet<EntityId> {
        self.sphere.as_ref().map_or(&NO_ACTIVATORS, |s| s.removed_activators())
    }
}

/// Square wave: on for `on_time`, then off for `off_time`.
pub struct PulseComponent {
    value: bool,
    on_time: f32,
    period: f32,
    /// Position within one on+off cycle; the on half comes first.
    phase: f32,
}

impl PulseComponent {
    pub fn new(start_on: bool, on_time: f32, off_time: f32) -> Self {
        let on_time = on_time.max(0.0);
        let period = on_time + off_time.max(0.0);
        let phase = if start_on { 0.0 } else { on_time };
        Self {
            value: start_on,
            on_time,
            period,
            phase,
        }
    }

    fn phase_is_on(&self) -> bool {
        self.phase < self.on_time
    }
}

impl SensorComponent for PulseComponent {
    fn update(&mut self, ctx: &SensorContext<'_>) {
        if !(ctx.dt.is_finite() && ctx.dt >= 0.0) {
            return;
        }
        if !(self.period.is_finite() && self.period > 0.0) {
            return;
        }
        self.phase = (self.phase + ctx.dt).rem_euclid(self.period);
        if self.phase >= self.period {
            self.phase = 0.0;
        }
        self.value = self.phase_is_on();
    }

    fn is_on(&self) -> bool {
        self.value
    }

    fn activators(&self) -> &BTreeSet<EntityId> {
        &NO_ACTIVATORS
    }

    fn new_activators(&self) -> &BTreeSet<EntityId> {
        &NO_ACTIVATORS
    }

    fn removed_activators(&self) -> &BTreeSet<EntityId> {
        &NO_ACTIVATORS
    }
}
