use std::fmt;

use nspace_geom::Vec3;
use nspace_props::{
    EntityId, ObjectCategory, PropValue, PropertiesObject, PropertiesObjectType, Property,
    PropertyGui, join_properties,
};
use nspace_voxel::SubstanceId;

use crate::behavior::{Behavior, BehaviorError};
use crate::sensor::Sensor;

pub const NUM_TAGS: u8 = 16;

const TAG_SYMBOLS: [char; NUM_TAGS as usize] = [
    '■', '□', '▲', '△', '●', '○', '★', '☆', '♥', '♡', '♦', '♢', '♠', '♤', '♣', '♧',
];

/// Symbol for a tag, wrapping mod [`NUM_TAGS`].
pub fn tag_to_string(tag: u8) -> char {
    TAG_SYMBOLS[(tag % NUM_TAGS) as usize]
}

pub const MARKER_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Marker", ObjectCategory::Entity)
        .with_description("A point in the level that other objects can refer to")
        .with_icon("map-marker");
pub const BALL_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Ball", ObjectCategory::Entity)
        .with_description("A sphere which can be moved by the player")
        .with_icon("circle-outline");
pub const PLAYER_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Player", ObjectCategory::Entity)
        .with_description("The character you control in the game")
        .with_icon("human");
pub const SUBSTANCE_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Substance", ObjectCategory::Entity)
        .with_description("An entity made of blocks")
        .with_icon("cube-outline");

/// State shared by entities that exist physically in the game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicEntity {
    /// Editor-only: draw see-through so things behind can be selected.
    pub x_ray: bool,
    pub health: f32,
}

impl Default for DynamicEntity {
    fn default() -> Self {
        Self {
            x_ray: false,
            health: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Marker,
    Ball(DynamicEntity),
    Player(DynamicEntity),
    Substance {
        dynamic: DynamicEntity,
        substance: Option<SubstanceId>,
    },
}

impl EntityKind {
    pub fn object_type(&self) -> PropertiesObjectType {
        match self {
            EntityKind::Marker => MARKER_TYPE,
            EntityKind::Ball(_) => BALL_TYPE,
            EntityKind::Player(_) => PLAYER_TYPE,
            EntityKind::Substance { .. } => SUBSTANCE_TYPE,
        }
    }

    pub fn dynamic(&self) -> Option<&DynamicEntity> {
        match self {
            EntityKind::Marker => None,
            EntityKind::Ball(d) | EntityKind::Player(d) => Some(d),
            EntityKind::Substance { dynamic, .. } => Some(dynamic),
        }
    }

    pub fn dynamic_mut(&mut self) -> Option<&mut DynamicEntity> {
        match self {
            EntityKind::Marker => None,
            EntityKind::Ball(d) | EntityKind::Player(d) => Some(d),
            EntityKind::Substance { dynamic, .. } => Some(dynamic),
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self, EntityKind::Player(_))
    }

    pub fn substance(&self) -> Option<SubstanceId> {
        match self {
            EntityKind::Substance { substance, .. } => *substance,
            _ => None,
        }
    }
}

/// A placeable game object with at most one sensor and an ordered list of behaviors.
#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub tag: u8,
    pub position: Vec3,
    pub kind: EntityKind,
    pub sensor: Option<Sensor>,
    behaviors: Vec<Behavior>,
    revision: u64,
}

const BASE_PROPERTIES: &[Property<Entity>] = &[Property::new(
    "Tag",
    PropertyGui::Tag,
    |e| PropValue::Tag(e.tag),
    |e, v| {
        if let Some(t) = v.as_tag() {
            e.tag = t;
        }
    },
)];

const DYNAMIC_PROPERTIES: &[Property<Entity>] = &[
    Property::new(
        "X-Ray?",
        PropertyGui::Toggle,
        |e| PropValue::Bool(e.kind.dynamic().is_some_and(|d| d.x_ray)),
        |e, v| {
            let (Some(b), Some(d)) = (v.as_bool(), e.kind.dynamic_mut()) else {
                return;
            };
            d.x_ray = b;
            e.update_entity();
        },
    ),
    Property::new(
        "Health",
        PropertyGui::Float,
        |e| PropValue::Float(e.kind.dynamic().map_or(0.0, |d| d.health)),
        |e, v| {
            if let (Some(h), Some(d)) = (v.as_float(), e.kind.dynamic_mut()) {
                d.health = h;
            }
        },
    ),
];

impl Entity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            id: EntityId(0),
            tag: 0,
            position: Vec3::ZERO,
            kind,
            sensor: None,
            behaviors: Vec::new(),
            revision: 0,
        }
    }

    pub fn marker() -> Self {
        Self::new(EntityKind::Marker)
    }

    pub fn ball() -> Self {
        Self::new(EntityKind::Ball(DynamicEntity::default()))
    }

    pub fn player() -> Self {
        Self::new(EntityKind::Player(DynamicEntity::default()))
    }

    pub fn substance(substance: Option<SubstanceId>) -> Self {
        Self::new(EntityKind::Substance {
            dynamic: DynamicEntity::default(),
            substance,
        })
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Mutable access for property edits; adding goes through [`add_behavior`](Self::add_behavior).
    pub fn behaviors_mut(&mut self) -> &mut [Behavior] {
        &mut self.behaviors
    }

    /// Appends a behavior if its rule accepts this entity's kind.
    pub fn add_behavior(&mut self, behavior: Behavior) -> Result<(), BehaviorError> {
        let ty = behavior.object_type();
        if !behavior.kind.rule().applies(&self.kind) {
            return Err(BehaviorError::NotApplicable {
                behavior: ty.full_name,
                entity: self.kind.object_type().full_name,
            });
        }
        self.behaviors.push(behavior);
        Ok(())
    }

    pub fn remove_behavior(&mut self, index: usize) -> Option<Behavior> {
        (index < self.behaviors.len()).then(|| self.behaviors.remove(index))
    }

    /// Signals hosts that derived state (e.g. a substance's voxels) must be refreshed.
    pub fn update_entity(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        log::debug!(target: "level", "{} {} updated (rev {})", self.id, self, self.revision);
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Resets every sensor/behavior reference for which `keep` is false. Returns how many.
    pub fn retain_references(&mut self, keep: impl Fn(EntityId) -> bool) -> usize {
        let mut cleared = 0;
        if let Some(sensor) = self.sensor.as_mut() {
            for (name, value) in sensor.property_values() {
                if value.referenced_entity().is_some_and(|id| !keep(id))
                    && sensor.set_property(name, value.without_reference()).is_ok()
                {
                    cleared += 1;
                }
            }
        }
        for behavior in self.behaviors.iter_mut() {
            for (name, value) in behavior.property_values() {
                if value.referenced_entity().is_some_and(|id| !keep(id))
                    && behavior.set_property(name, value.without_reference()).is_ok()
                {
                    cleared += 1;
                }
            }
        }
        cleared
    }
}

impl PropertiesObject for Entity {
    fn object_type(&self) -> PropertiesObjectType {
        self.kind.object_type()
    }

    fn property_table(&self) -> Vec<Property<Self>> {
        if self.kind.dynamic().is_some() {
            join_properties(BASE_PROPERTIES, DYNAMIC_PROPERTIES)
        } else {
            BASE_PROPERTIES.to_vec()
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", tag_to_string(self.tag), self.kind.object_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_wrap_through_the_alphabet() {
        assert_eq!(tag_to_string(0), '■');
        assert_eq!(tag_to_string(15), '♧');
        assert_eq!(tag_to_string(16), '■');
        let mut ball = Entity::ball();
        ball.tag = 4;
        assert_eq!(ball.to_string(), "● Ball");
    }

    #[test]
    fn x_ray_setter_updates_entity_once() {
        let mut ball = Entity::ball();
        assert_eq!(ball.set_property("X-Ray?", PropValue::Bool(false)), Ok(false));
        assert_eq!(ball.revision(), 0);
        assert_eq!(ball.set_property("X-Ray?", PropValue::Bool(true)), Ok(true));
        assert_eq!(ball.revision(), 1);
        assert_eq!(ball.set_property("X-Ray?", PropValue::Bool(true)), Ok(false));
        assert_eq!(ball.revision(), 1);
    }

    #[test]
    fn markers_only_have_a_tag() {
        let marker = Entity::marker();
        let names: Vec<_> = marker.properties().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Tag"]);
        let names: Vec<_> = Entity::player().properties().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Tag", "X-Ray?", "Health"]);
        assert_eq!(Entity::player().get_property("Health"), Some(PropValue::Float(100.0)));
    }
}
