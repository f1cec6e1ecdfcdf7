use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable entity identifier, valid across save/load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Nullable reference to another entity by id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityId>,
}

impl EntityRef {
    pub const NONE: EntityRef = EntityRef { entity: None };

    #[inline]
    pub const fn to(id: EntityId) -> Self {
        Self { entity: Some(id) }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.entity.is_none()
    }
}

impl From<Option<EntityId>> for EntityRef {
    fn from(entity: Option<EntityId>) -> Self {
        Self { entity }
    }
}

/// Gating rule for a behavior relative to its entity's sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    On = 0,
    Off = 1,
    #[default]
    Both = 2,
}

impl Condition {
    pub const LABELS: [&'static str; 3] = ["On", "Off", "Both"];

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Out-of-range indices fall back to `Both`.
    #[inline]
    pub fn from_index(i: u8) -> Condition {
        match i {
            0 => Condition::On,
            1 => Condition::Off,
            _ => Condition::Both,
        }
    }
}

/// Which entity a behavior's effect applies to.
///
/// `activator == true` wins over `entity`; with neither set the behavior targets its own entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "EntityRef::is_none")]
    pub entity: EntityRef,
    #[serde(default)]
    pub activator: bool,
}

impl Target {
    pub const SELF: Target = Target {
        entity: EntityRef::NONE,
        activator: false,
    };
    pub const ACTIVATORS: Target = Target {
        entity: EntityRef::NONE,
        activator: true,
    };

    #[inline]
    pub const fn entity(id: EntityId) -> Self {
        Self {
            entity: EntityRef::to(id),
            activator: false,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.activator {
            f.write_str("Activators")
        } else if let Some(id) = self.entity.entity {
            write!(f, "{}", id)
        } else {
            f.write_str("Self")
        }
    }
}

/// Restricts which entities may activate a sensor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivatorFilter {
    #[default]
    Any,
    Entity(EntityRef),
    Tag(u8),
    /// Matches by the entity type's `full_name`.
    Type(String),
}

impl ActivatorFilter {
    pub fn matches(&self, id: EntityId, tag: u8, type_name: &str) -> bool {
        match self {
            ActivatorFilter::Any => true,
            ActivatorFilter::Entity(r) => r.entity == Some(id),
            ActivatorFilter::Tag(t) => *t == tag,
            ActivatorFilter::Type(name) => name == type_name,
        }
    }
}

impl fmt::Display for ActivatorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivatorFilter::Any => f.write_str("Anything"),
            ActivatorFilter::Entity(r) => match r.entity {
                Some(id) => write!(f, "{}", id),
                None => f.write_str("Nothing"),
            },
            ActivatorFilter::Tag(t) => write!(f, "Tag {}", t),
            ActivatorFilter::Type(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropKind {
    Bool,
    Int,
    Float,
    Text,
    Tag,
    Condition,
    Entity,
    Target,
    Filter,
}

/// A single property value as seen by editor and persistence hosts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(String),
    Tag(u8),
    Condition(Condition),
    Entity(EntityRef),
    Target(Target),
    Filter(ActivatorFilter),
}

impl PropValue {
    pub fn kind(&self) -> PropKind {
        match self {
            PropValue::Bool(_) => PropKind::Bool,
            PropValue::Int(_) => PropKind::Int,
            PropValue::Float(_) => PropKind::Float,
            PropValue::Text(_) => PropKind::Text,
            PropValue::Tag(_) => PropKind::Tag,
            PropValue::Condition(_) => PropKind::Condition,
            PropValue::Entity(_) => PropKind::Entity,
            PropValue::Target(_) => PropKind::Target,
            PropValue::Filter(_) => PropKind::Filter,
        }
    }

    /// Value equality as the write gate sees it: NaN equals NaN.
    pub fn same_value(&self, other: &PropValue) -> bool {
        match (self, other) {
            (PropValue::Float(a), PropValue::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<u8> {
        match self {
            PropValue::Tag(t) => Some(*t),
            _ => None,
        }
    }

    /// The entity this value points at, if it is a reference.
    pub fn referenced_entity(&self) -> Option<EntityId> {
        match self {
            PropValue::Entity(r) => r.entity,
            PropValue::Target(t) => t.entity.entity,
            PropValue::Filter(ActivatorFilter::Entity(r)) => r.entity,
            _ => None,
        }
    }

    /// Same value with any entity reference cleared.
    pub fn without_reference(&self) -> PropValue {
        match self {
            PropValue::Entity(_) => PropValue::Entity(EntityRef::NONE),
            PropValue::Target(t) => PropValue::Target(Target {
                entity: EntityRef::NONE,
                activator: t.activator,
            }),
            PropValue::Filter(ActivatorFilter::Entity(_)) => {
                PropValue::Filter(ActivatorFilter::Entity(EntityRef::NONE))
            }
            other => other.clone(),
        }
    }
}
