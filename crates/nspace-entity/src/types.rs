//! Name-keyed factories for every entity, sensor and behavior kind.

use nspace_props::{ObjectCategory, TypeRegistry};

use crate::behavior::{Behavior, HURT_TYPE, SOLID_TYPE, VISIBLE_TYPE};
use crate::entity::{BALL_TYPE, Entity, MARKER_TYPE, PLAYER_TYPE, SUBSTANCE_TYPE};
use crate::sensor::{
    IN_RANGE_TYPE, InRangeSensor, PULSE_TYPE, PulseSensor, Sensor, TOGGLE_TYPE, TOUCH_TYPE,
    ToggleSensor, TouchSensor,
};

pub fn entity_types() -> TypeRegistry<Entity> {
    let mut reg = TypeRegistry::new(ObjectCategory::Entity);
    reg.register(MARKER_TYPE, Entity::marker)
        .register(BALL_TYPE, Entity::ball)
        .register(PLAYER_TYPE, Entity::player)
        .register(SUBSTANCE_TYPE, || Entity::substance(None));
    reg
}

pub fn sensor_types() -> TypeRegistry<Sensor> {
    let mut reg = TypeRegistry::new(ObjectCategory::Sensor);
    reg.register(TOGGLE_TYPE, || Sensor::Toggle(ToggleSensor::default()))
        .register(TOUCH_TYPE, || Sensor::Touch(TouchSensor::default()))
        .register(IN_RANGE_TYPE, || Sensor::InRange(InRangeSensor::default()))
        .register(PULSE_TYPE, || Sensor::Pulse(PulseSensor::default()));
    reg
}

pub fn behavior_types() -> TypeRegistry<Behavior> {
    let mut reg = TypeRegistry::new(ObjectCategory::Behavior);
    reg.register(VISIBLE_TYPE, Behavior::visible)
        .register(SOLID_TYPE, Behavior::solid)
        .register(HURT_TYPE, Behavior::hurt);
    reg
}

#[cfg(test)]
mod tests {
    use super::*;
    use nspace_props::PropertiesObject;

    #[test]
    fn factories_build_their_own_type() {
        let entities = entity_types();
        for r in entities.iter() {
            assert_eq!(r.create().object_type(), r.ty);
        }
        let sensors = sensor_types();
        for r in sensors.iter() {
            assert_eq!(r.create().object_type(), r.ty);
        }
        let behaviors = behavior_types();
        for r in behaviors.iter() {
            assert_eq!(r.create().object_type(), r.ty);
        }
        assert!(sensors.create("Laser").is_err());
        assert_eq!(sensors.len(), 4);
    }
}
