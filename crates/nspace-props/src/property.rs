use thiserror::Error;

use crate::object_type::PropertiesObjectType;
use crate::value::{PropKind, PropValue};

/// Editor widget hint for a property. Rendering itself belongs to the GUI host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyGui {
    Text,
    Toggle,
    Float,
    Int,
    Time,
    Slider { min: f32, max: f32 },
    Tag,
    BehaviorCondition,
    BehaviorTarget,
    EntityReference,
    EntityReferenceWithNull,
    Filter,
}

#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("no property named {0:?}")]
    Unknown(String),
    #[error("property {name:?} expects {expected:?}, got {found:?}")]
    TypeMismatch {
        name: &'static str,
        expected: PropKind,
        found: PropKind,
    },
}

/// Named accessor pair over one logical value of `T`.
pub struct Property<T> {
    pub name: &'static str,
    pub gui: PropertyGui,
    /// Store the value's type alongside it when persisting.
    pub explicit_type: bool,
    getter: fn(&T) -> PropValue,
    setter: fn(&mut T, PropValue),
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> Property<T> {
    pub const fn new(
        name: &'static str,
        gui: PropertyGui,
        getter: fn(&T) -> PropValue,
        setter: fn(&mut T, PropValue),
    ) -> Self {
        Self {
            name,
            gui,
            explicit_type: false,
            getter,
            setter,
        }
    }

    pub const fn with_explicit_type(mut self) -> Self {
        self.explicit_type = true;
        self
    }

    #[inline]
    pub fn value(&self, obj: &T) -> PropValue {
        (self.getter)(obj)
    }

    /// Writes `value` only if it differs from the current value.
    ///
    /// Returns `Ok(true)` when the setter ran. Setter side effects never fire on a no-op write.
    pub fn set_value(&self, obj: &mut T, value: PropValue) -> Result<bool, PropertyError> {
        let current = (self.getter)(obj);
        self.check_kind(&current, &value)?;
        if current.same_value(&value) {
            return Ok(false);
        }
        (self.setter)(obj, value);
        Ok(true)
    }

    /// Writes without the equality gate (e.g. re-applying a material that changed in place).
    pub fn set_unchecked(&self, obj: &mut T, value: PropValue) -> Result<(), PropertyError> {
        let current = (self.getter)(obj);
        self.check_kind(&current, &value)?;
        (self.setter)(obj, value);
        Ok(())
    }

    pub fn info(&self) -> PropertyInfo {
        PropertyInfo {
            name: self.name,
            gui: self.gui,
            explicit_type: self.explicit_type,
        }
    }

    fn check_kind(&self, current: &PropValue, value: &PropValue) -> Result<(), PropertyError> {
        if current.kind() != value.kind() {
            return Err(PropertyError::TypeMismatch {
                name: self.name,
                expected: current.kind(),
                found: value.kind(),
            });
        }
        Ok(())
    }
}

/// Host-facing description of one property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub gui: PropertyGui,
    pub explicit_type: bool,
}

/// Concatenates two property lists, `base` first.
pub fn join_properties<T>(base: &[Property<T>], extra: &[Property<T>]) -> Vec<Property<T>> {
    let mut props = Vec::with_capacity(base.len() + extra.len());
    props.extend_from_slice(base);
    props.extend_from_slice(extra);
    props
}

/// Anything the editor and persistence hosts can introspect.
///
/// Implementors only supply their accessor table; reads and gated writes come for free.
pub trait PropertiesObject: Sized {
    fn object_type(&self) -> PropertiesObjectType;

    fn property_table(&self) -> Vec<Property<Self>>;

    fn properties(&self) -> Vec<PropertyInfo> {
        self.property_table().iter().map(Property::info).collect()
    }

    fn property(&self, name: &str) -> Option<Property<Self>> {
        self.property_table().into_iter().find(|p| p.name == name)
    }

    fn get_property(&self, name: &str) -> Option<PropValue> {
        self.property(name).map(|p| p.value(self))
    }

    /// Equality-gated write by name. `Ok(false)` means the value was already current.
    fn set_property(&mut self, name: &str, value: PropValue) -> Result<bool, PropertyError> {
        let prop = self
            .property(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
        prop.set_value(self, value)
    }

    /// Ordered `(name, value)` pairs, as written by persistence.
    fn property_values(&self) -> Vec<(&'static str, PropValue)> {
        self.property_table()
            .iter()
            .map(|p| (p.name, p.value(self)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_type::ObjectCategory;

    #[derive(Default)]
    struct Lamp {
        lit: bool,
        brightness: f32,
        writes: u32,
    }

    const LAMP_PROPERTIES: &[Property<Lamp>] = &[
        Property::new(
            "Lit?",
            PropertyGui::Toggle,
            |l| PropValue::Bool(l.lit),
            |l, v| {
                if let Some(b) = v.as_bool() {
                    l.lit = b;
                    l.writes += 1;
                }
            },
        ),
        Property::new(
            "Brightness",
            PropertyGui::Slider { min: 0.0, max: 1.0 },
            |l| PropValue::Float(l.brightness),
            |l, v| {
                if let Some(f) = v.as_float() {
                    l.brightness = f;
                    l.writes += 1;
                }
            },
        ),
    ];

    impl PropertiesObject for Lamp {
        fn object_type(&self) -> PropertiesObjectType {
            PropertiesObjectType::new("Lamp", ObjectCategory::Entity)
        }

        fn property_table(&self) -> Vec<Property<Self>> {
            LAMP_PROPERTIES.to_vec()
        }
    }

    #[test]
    fn no_op_write_skips_setter() {
        let mut lamp = Lamp::default();
        assert_eq!(lamp.set_property("Lit?", PropValue::Bool(false)), Ok(false));
        assert_eq!(lamp.writes, 0);
        assert_eq!(lamp.set_property("Lit?", PropValue::Bool(true)), Ok(true));
        assert_eq!(lamp.writes, 1);
        assert_eq!(lamp.set_property("Lit?", PropValue::Bool(true)), Ok(false));
        assert_eq!(lamp.writes, 1);
    }

    #[test]
    fn repeated_nan_write_runs_setter_once() {
        let mut lamp = Lamp::default();
        assert_eq!(lamp.set_property("Brightness", PropValue::Float(f32::NAN)), Ok(true));
        assert_eq!(lamp.set_property("Brightness", PropValue::Float(f32::NAN)), Ok(false));
        assert_eq!(lamp.set_property("Brightness", PropValue::Float(-0.0)), Ok(true));
        assert_eq!(lamp.set_property("Brightness", PropValue::Float(0.0)), Ok(false));
        assert_eq!(lamp.writes, 2);
    }

    #[test]
    fn unchecked_write_always_runs() {
        let mut lamp = Lamp::default();
        let prop = lamp.property("Brightness").unwrap();
        prop.set_unchecked(&mut lamp, PropValue::Float(0.0)).unwrap();
        assert_eq!(lamp.writes, 1);
    }

    #[test]
    fn wrong_kind_and_unknown_name_are_errors() {
        let mut lamp = Lamp::default();
        assert_eq!(
            lamp.set_property("Lit?", PropValue::Float(1.0)),
            Err(PropertyError::TypeMismatch {
                name: "Lit?",
                expected: PropKind::Bool,
                found: PropKind::Float,
            })
        );
        assert!(matches!(
            lamp.set_property("Colour", PropValue::Bool(true)),
            Err(PropertyError::Unknown(_))
        ));
        assert_eq!(lamp.writes, 0);
    }

    #[test]
    fn join_keeps_base_first() {
        let joined = join_properties(&LAMP_PROPERTIES[1..], &LAMP_PROPERTIES[..1]);
        let names: Vec<_> = joined.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Brightness", "Lit?"]);
        let lamp = Lamp::default();
        assert_eq!(
            lamp.property_values(),
            vec![("Lit?", PropValue::Bool(false)), ("Brightness", PropValue::Float(0.0))]
        );
    }
}
