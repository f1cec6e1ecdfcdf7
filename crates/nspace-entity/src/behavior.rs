use nspace_props::{
    Condition, EntityId, ObjectCategory, PropValue, PropertiesObject, PropertiesObjectType,
    Property, PropertyGui, Target, join_properties,
};
use thiserror::Error;

use crate::entity::EntityKind;
use crate::unit::{BehaviorUnit, HurtUnit, MIN_PERIOD, SolidUnit, VisibleUnit};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("{behavior} behavior cannot be added to a {entity}")]
    NotApplicable {
        behavior: &'static str,
        entity: &'static str,
    },
}

/// Which entity kinds a behavior type may be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BehaviorRule {
    Any,
    Dynamic,
    Player,
    Not(&'static BehaviorRule),
    And(&'static [BehaviorRule]),
}

impl BehaviorRule {
    pub fn applies(&self, kind: &EntityKind) -> bool {
        match self {
            BehaviorRule::Any => true,
            BehaviorRule::Dynamic => kind.dynamic().is_some(),
            BehaviorRule::Player => kind.is_player(),
            BehaviorRule::Not(rule) => !rule.applies(kind),
            BehaviorRule::And(rules) => rules.iter().all(|r| r.applies(kind)),
        }
    }
}

const VISIBLE_RULE: BehaviorRule =
    BehaviorRule::And(&[BehaviorRule::Dynamic, BehaviorRule::Not(&BehaviorRule::Player)]);

pub const VISIBLE_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Visible", ObjectCategory::Behavior)
        .with_description("Object is visible in the game")
        .with_icon("eye");
pub const SOLID_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Solid", ObjectCategory::Behavior)
        .with_description("Object blocks movement")
        .with_icon("wall");
pub const HURT_TYPE: PropertiesObjectType =
    PropertiesObjectType::new("Hurt", ObjectCategory::Behavior)
        .with_description("Lose health periodically")
        .with_icon("heart-broken");

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BehaviorKind {
    Visible,
    Solid,
    Hurt { amount: f32, period: f32 },
}

impl BehaviorKind {
    pub fn object_type(&self) -> PropertiesObjectType {
        match self {
            BehaviorKind::Visible => VISIBLE_TYPE,
            BehaviorKind::Solid => SOLID_TYPE,
            BehaviorKind::Hurt { .. } => HURT_TYPE,
        }
    }

    pub fn rule(&self) -> BehaviorRule {
        match self {
            BehaviorKind::Visible => VISIBLE_RULE,
            BehaviorKind::Solid => BehaviorRule::Dynamic,
            BehaviorKind::Hurt { .. } => BehaviorRule::Any,
        }
    }
}

/// Edit-time behavior: a gating condition, a target, and what it does.
#[derive(Clone, Debug, PartialEq)]
pub struct Behavior {
    pub condition: Condition,
    pub target: Target,
    pub kind: BehaviorKind,
}

const BASE_PROPERTIES: &[Property<Behavior>] = &[
    Property::new(
        "Condition",
        PropertyGui::BehaviorCondition,
        |b| PropValue::Condition(b.condition),
        |b, v| {
            if let PropValue::Condition(c) = v {
                b.condition = c;
            }
        },
    ),
    Property::new(
        "Target",
        PropertyGui::BehaviorTarget,
        |b| PropValue::Target(b.target),
        |b, v| {
            if let PropValue::Target(t) = v {
                b.target = t;
            }
        },
    ),
];

const HURT_PROPERTIES: &[Property<Behavior>] = &[
    Property::new(
        "Amount",
        PropertyGui::Float,
        |b| match b.kind {
            BehaviorKind::Hurt { amount, .. } => PropValue::Float(amount),
            _ => PropValue::Float(0.0),
        },
        |b, v| {
            if let (Some(x), BehaviorKind::Hurt { amount, .. }) = (v.as_float(), &mut b.kind) {
                *amount = x;
            }
        },
    ),
    Property::new(
        "Period",
        PropertyGui::Time,
        |b| match b.kind {
            BehaviorKind::Hurt { period, .. } => PropValue::Float(period),
            _ => PropValue::Float(0.0),
        },
        |b, v| {
            if let (Some(x), BehaviorKind::Hurt { period, .. }) = (v.as_float(), &mut b.kind) {
                *period = x;
            }
        },
    ),
];

impl Behavior {
    pub fn new(kind: BehaviorKind) -> Self {
        Self {
            condition: Condition::Both,
            target: Target::SELF,
            kind,
        }
    }

    pub fn visible() -> Self {
        Self::new(BehaviorKind::Visible)
    }

    pub fn solid() -> Self {
        Self::new(BehaviorKind::Solid)
    }

    pub fn hurt() -> Self {
        Self::new(BehaviorKind::Hurt {
            amount: 10.0,
            period: 1.0,
        })
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Builds the play-time unit. `None` leaves the behavior inert.
    pub fn make_unit(&self, owner: EntityId) -> Option<Box<dyn BehaviorUnit>> {
        match self.kind {
            BehaviorKind::Visible => Some(Box::new(VisibleUnit {
                target: self.target,
            })),
            BehaviorKind::Solid => Some(Box::new(SolidUnit {
                target: self.target,
            })),
            BehaviorKind::Hurt { amount, period } => {
                // Zero or negative periods hit once per activation.
                let period_ok = period.is_finite() && (period <= 0.0 || period >= MIN_PERIOD);
                if !(amount.is_finite() && period_ok) {
                    log::warn!(
                        target: "behavior",
                        "{}: Hurt amount {} / period {} are not usable; behavior is inert",
                        owner,
                        amount,
                        period
                    );
                    return None;
                }
                Some(Box::new(HurtUnit::new(self.target, amount, period)))
            }
        }
    }
}

impl PropertiesObject for Behavior {
    fn object_type(&self) -> PropertiesObjectType {
        self.kind.object_type()
    }

    fn property_table(&self) -> Vec<Property<Self>> {
        match self.kind {
            BehaviorKind::Hurt { .. } => join_properties(BASE_PROPERTIES, HURT_PROPERTIES),
            _ => BASE_PROPERTIES.to_vec(),
        }
    }
}
