//! Entities, their sensor/behavior descriptors, and the play-time activation graph.
#![forbid(unsafe_code)]

pub mod activator;
pub mod behavior;
pub mod component;
pub mod effect;
pub mod entity;
pub mod sensor;
pub mod sensor_component;
pub mod types;
pub mod unit;

pub use activator::{ActivatorTracker, SensorContext, WorldView};
pub use behavior::{Behavior, BehaviorError, BehaviorKind, BehaviorRule};
pub use component::EntityComponent;
pub use effect::{Effect, EffectQueue};
pub use entity::{DynamicEntity, Entity, EntityKind, NUM_TAGS, tag_to_string};
pub use sensor::{InRangeSensor, PulseSensor, Sensor, ToggleSensor, TouchSensor};
pub use sensor_component::{
    InRangeComponent, PulseComponent, SensorComponent, ToggleComponent, TouchComponent,
};
pub use types::{behavior_types, entity_types, sensor_types};
pub use unit::{BehaviorUnit, UnitContext, resolve_targets};
