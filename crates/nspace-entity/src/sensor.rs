use nspace_props::{
    ActivatorFilter, EntityId, EntityRef, ObjectCategory, PropValue, PropertiesObject,
    PropertiesObjectType, Property, PropertyError, PropertyGui, PropertyInfo,
};

use crate::sensor_component::{
    InRangeComponent, PulseComponent, SensorComponent, ToggleComponent, TouchComponent,
};
use crate::unit::MIN_PERIOD;

pub const TOGGLE_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Toggle", ObjectCategory::Sensor)
        .with_description("One input switches it on, one input switches it off")
        .with_long_description("Activator: the activator of the On input")
        .with_icon("toggle-switch");
pub const TOUCH_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Touch", ObjectCategory::Sensor)
        .with_description("Active when touching another object")
        .with_long_description("Activator: all touching objects")
        .with_icon("vector-combine");
pub const IN_RANGE_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("In Range", ObjectCategory::Sensor)
        .with_description("Detect objects within a certain distance")
        .with_long_description("Activator: all objects in range")
        .with_icon("radar");
pub const PULSE_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Pulse", ObjectCategory::Sensor)
        .with_description("Turn on and off continuously")
        .with_long_description("Activator: none")
        .with_icon("pulse");

/// Two-input flip-flop driven by other entities' sensors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToggleSensor {
    pub start_on: bool,
    pub off_input: EntityRef,
    pub on_input: EntityRef,
}

const TOGGLE_PROPERTIES: &[Property<ToggleSensor>] = &[
    Property::new(
        "Start on?",
        PropertyGui::Toggle,
        |s| PropValue::Bool(s.start_on),
        |s, v| {
            if let Some(b) = v.as_bool() {
                s.start_on = b;
            }
        },
    ),
    Property::new(
        "Off input",
        PropertyGui::EntityReferenceWithNull,
        |s| PropValue::Entity(s.off_input),
        |s, v| {
            if let PropValue::Entity(r) = v {
                s.off_input = r;
            }
        },
    ),
    Property::new(
        "On input",
        PropertyGui::EntityReferenceWithNull,
        |s| PropValue::Entity(s.on_input),
        |s, v| {
            if let PropValue::Entity(r) = v {
                s.on_input = r;
            }
        },
    ),
];

impl PropertiesObject for ToggleSensor {
    fn object_type(&self) -> PropertiesObjectType {
        TOGGLE_TYPE
    }

    fn property_table(&self) -> Vec<Property<Self>> {
        TOGGLE_PROPERTIES.to_vec()
    }
}

/// On while any filtered entity touches the owner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouchSensor {
    pub filter: ActivatorFilter,
}

const TOUCH_PROPERTIES: &[Property<TouchSensor>] = &[Property::new(
    "Filter",
    PropertyGui::Filter,
    |s: &TouchSensor| PropValue::Filter(s.filter.clone()),
    |s: &mut TouchSensor, v| {
        if let PropValue::Filter(f) = v {
            s.filter = f;
        }
    },
)
.with_explicit_type()];

impl PropertiesObject for TouchSensor {
    fn object_type(&self) -> PropertiesObjectType {
        TOUCH_TYPE
    }

    fn property_table(&self) -> Vec<Property<Self>> {
        TOUCH_PROPERTIES.to_vec()
    }
}

/// On while any filtered entity is within `distance` of the owner.
#[derive(Clone, Debug, PartialEq)]
pub struct InRangeSensor {
    pub filter: ActivatorFilter,
    pub distance: f32,
}

impl Default for InRangeSensor {
    fn default() -> Self {
        Self {
            filter: ActivatorFilter::Any,
            distance: 5.0,
        }
    }
}

const IN_RANGE_PROPERTIES: &[Property<InRangeSensor>] = &[
    Property::new(
        "Filter",
        PropertyGui::Filter,
        |s: &InRangeSensor| PropValue::Filter(s.filter.clone()),
        |s: &mut InRangeSensor, v| {
            if let PropValue::Filter(f) = v {
                s.filter = f;
            }
        },
    )
    .with_explicit_type(),
    Property::new(
        "Distance",
        PropertyGui::Float,
        |s| PropValue::Float(s.distance),
        |s, v| {
            if let Some(d) = v.as_float() {
                s.distance = d;
            }
        },
    ),
];

impl PropertiesObject for InRangeSensor {
    fn object_type(&self) -> PropertiesObjectType {
        IN_RANGE_TYPE
    }

    fn property_table(&self) -> Vec<Property<Self>> {
        IN_RANGE_PROPERTIES.to_vec()
    }
}

/// Square wave: `on_time` seconds on, then `off_time` seconds off.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseSensor {
    pub start_on: bool,
    pub on_time: f32,
    pub off_time: f32,
}

impl Default for PulseSensor {
    fn default() -> Self {
        Self {
            start_on: true,
            on_time: 1.0,
            off_time: 1.0,
        }
    }
}

const PULSE_PROPERTIES: &[Property<PulseSensor>] = &[
    Property::new(
        "Start on?",
        PropertyGui::Toggle,
        |s| PropValue::Bool(s.start_on),
        |s, v| {
            if let Some(b) = v.as_bool() {
                s.start_on = b;
            }
        },
    ),
    Property::new(
        "Off time",
        PropertyGui::Time,
        |s| PropValue::Float(s.off_time),
        |s, v| {
            if let Some(t) = v.as_float() {
                s.off_time = t;
            }
        },
    ),
    Property::new(
        "On time",
        PropertyGui::Time,
        |s| PropValue::Float(s.on_time),
        |s, v| {
            if let Some(t) = v.as_float() {
                s.on_time = t;
            }
        },
    ),
];

impl PropertiesObject for PulseSensor {
    fn object_type(&self) -> PropertiesObjectType {
        PULSE_TYPE
    }

    fn property_table(&self) -> Vec<Property<Self>> {
        PULSE_PROPERTIES.to_vec()
    }
}

/// Edit-time sensor descriptor. Each kind owns its data and property table.
#[derive(Clone, Debug, PartialEq)]
pub enum Sensor {
    Toggle(ToggleSensor),
    Touch(TouchSensor),
    InRange(InRangeSensor),
    Pulse(PulseSensor),
}

macro_rules! each_sensor {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Sensor::Toggle($s) => $body,
            Sensor::Touch($s) => $body,
            Sensor::InRange($s) => $body,
            Sensor::Pulse($s) => $body,
        }
    };
}

impl Sensor {
    pub fn object_type(&self) -> PropertiesObjectType {
        each_sensor!(self, s => s.object_type())
    }

    pub fn properties(&self) -> Vec<PropertyInfo> {
        each_sensor!(self, s => s.properties())
    }

    pub fn get_property(&self, name: &str) -> Option<PropValue> {
        each_sensor!(self, s => s.get_property(name))
    }

    pub fn set_property(&mut self, name: &str, value: PropValue) -> Result<bool, PropertyError> {
        each_sensor!(self, s => s.set_property(name, value))
    }

    pub fn property_values(&self) -> Vec<(&'static str, PropValue)> {
        each_sensor!(self, s => s.property_values())
    }

    /// Builds the play-time counterpart. `None` leaves the owner permanently off.
    pub fn make_component(&self, owner: EntityId) -> Option<Box<dyn SensorComponent>> {
        match self {
            Sensor::Toggle(s) => Some(Box::new(ToggleComponent::new(
                s.off_input,
                s.on_input,
                s.start_on,
            ))),
            Sensor::Touch(s) => Some(Box::new(TouchComponent::new(s.filter.clone()))),
            Sensor::InRange(s) => {
                if !(s.distance.is_finite() && s.distance > 0.0) {
                    log::warn!(
                        target: "sensor",
                        "{}: In Range distance {} is not usable; sensor stays off",
                        owner,
                        s.distance
                    );
                    return None;
                }
                Some(Box::new(InRangeComponent::new(s.filter.clone(), s.distance)))
            }
            Sensor::Pulse(s) => {
                let period = s.on_time + s.off_time;
                let times_ok = s.on_time >= 0.0 && s.off_time >= 0.0;
                if !(period.is_finite() && period >= MIN_PERIOD && times_ok) {
                    log::warn!(
                        target: "sensor",
                        "{}: Pulse times {}/{} are not usable; sensor stays off",
                        owner,
                        s.on_time,
                        s.off_time
                    );
                    return None;
                }
                Some(Box::new(PulseComponent::new(s.start_on, s.on_time, s.off_time)))
            }
        }
    }
}

impl Default for Sensor {
    fn default() -> Self {
        Sensor::Toggle(ToggleSensor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_property_order() {
        let sensor = Sensor::Toggle(ToggleSensor::default());
        let names: Vec<_> = sensor.properties().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Start on?", "Off input", "On input"]);
        assert_eq!(sensor.object_type().full_name, "Toggle");
    }

    #[test]
    fn writes_route_to_the_variant() {
        let mut sensor = Sensor::InRange(InRangeSensor::default());
        assert_eq!(sensor.get_property("Distance"), Some(PropValue::Float(5.0)));
        assert_eq!(sensor.set_property("Distance", PropValue::Float(5.0)), Ok(false));
        assert_eq!(sensor.set_property("Distance", PropValue::Float(2.5)), Ok(true));
        assert_eq!(
            sensor,
            Sensor::InRange(InRangeSensor {
                filter: ActivatorFilter::Any,
                distance: 2.5,
            })
        );
        assert!(sensor.set_property("On input", PropValue::Entity(EntityRef::NONE)).is_err());
        assert_eq!(
            sensor.object_type().long_description,
            "Activator: all objects in range"
        );
    }

    #[test]
    fn unusable_settings_build_no_component() {
        let owner = EntityId(1);
        let bad_range = Sensor::InRange(InRangeSensor {
            distance: 0.0,
            ..InRangeSensor::default()
        });
        assert!(bad_range.make_component(owner).is_none());
        let bad_pulse = Sensor::Pulse(PulseSensor {
            start_on: false,
            on_time: 0.0,
            off_time: 0.0,
        });
        assert!(bad_pulse.make_component(owner).is_none());
        let tiny_pulse = Sensor::Pulse(PulseSensor {
            start_on: true,
            on_time: 1e-30,
            off_time: 1e-30,
        });
        assert!(tiny_pulse.make_component(owner).is_none());
        assert!(Sensor::default().make_component(owner).is_some());
    }
}
