use nspace_props::EntityId;

/// World change requested by a behavior unit, applied by the session after the owner's update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    SetVisible { entity: EntityId, visible: bool },
    SetSolid { entity: EntityId, solid: bool },
    Damage { entity: EntityId, amount: f32 },
}

impl Effect {
    pub fn entity(&self) -> EntityId {
        match *self {
            Effect::SetVisible { entity, .. }
            | Effect::SetSolid { entity, .. }
            | Effect::Damage { entity, .. } => entity,
        }
    }
}

#[derive(Default, Debug)]
pub struct EffectQueue {
    effects: Vec<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Takes every queued effect in push order.
    pub fn drain(&mut self) -> impl Iterator<Item = Effect> + '_ {
        self.effects.drain(..)
    }
}
