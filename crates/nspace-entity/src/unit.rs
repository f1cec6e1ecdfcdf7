use std::collections::BTreeSet;

use nspace_props::{EntityId, Target};

use crate::effect::{Effect, EffectQueue};

pub struct UnitContext<'a> {
    pub owner: EntityId,
    pub dt: f32,
    /// Current activators of the owner's sensor (empty without one).
    pub activators: &'a BTreeSet<EntityId>,
    pub effects: &'a mut EffectQueue,
}

/// Entities a behavior with `target` acts on right now.
pub fn resolve_targets(
    target: Target,
    owner: EntityId,
    activators: &BTreeSet<EntityId>,
) -> Vec<EntityId> {
    if target.activator {
        activators.iter().copied().collect()
    } else {
        vec![target.entity.entity.unwrap_or(owner)]
    }
}

/// Play-time counterpart of a [`Behavior`](crate::Behavior), switched by its entity component.
pub trait BehaviorUnit {
    fn activate(&mut self, ctx: &mut UnitContext<'_>);
    fn deactivate(&mut self, ctx: &mut UnitContext<'_>);
    /// Runs once per tick while enabled.
    fn step(&mut self, _ctx: &mut UnitContext<'_>) {}
}

pub struct VisibleUnit {
    pub target: Target,
}

impl BehaviorUnit for VisibleUnit {
    fn activate(&mut self, ctx: &mut UnitContext<'_>) {
        for entity in resolve_targets(self.target, ctx.owner, ctx.activators) {
            ctx.effects.push(Effect::SetVisible {
                entity,
                visible: true,
            });
        }
    }

    fn deactivate(&mut self, ctx: &mut UnitContext<'_>) {
        for entity in resolve_targets(self.target, ctx.owner, ctx.activators) {
            ctx.effects.push(Effect::SetVisible {
                entity,
                visible: false,
            });
        }
    }
}

pub struct SolidUnit {
    pub target: Target,
}

impl BehaviorUnit for SolidUnit {
    fn activate(&mut self, ctx: &mut UnitContext<'_>) {
        for entity in resolve_targets(self.target, ctx.owner, ctx.activators) {
            ctx.effects.push(Effect::SetSolid { entity, solid: true });
        }
    }

    fn deactivate(&mut self, ctx: &mut UnitContext<'_>) {
        for entity in resolve_targets(self.target, ctx.owner, ctx.activators) {
            ctx.effects.push(Effect::SetSolid {
                entity,
                solid: false,
            });
        }
    }
}

/// Shortest repeat period a pulse or hurt timer accepts.
pub const MIN_PERIOD: f32 = f32::EPSILON;

/// Damages its targets on activation and then every `period` seconds.
pub struct HurtUnit {
    pub target: Target,
    pub amount: f32,
    pub period: f32,
    elapsed: f32,
}

impl HurtUnit {
    pub fn new(target: Target, amount: f32, period: f32) -> Self {
        Self {
            target,
            amount,
            period,
            elapsed: 0.0,
        }
    }

    fn hurt(&self, ctx: &mut UnitContext<'_>, amount: f32) {
        for entity in resolve_targets(self.target, ctx.owner, ctx.activators) {
            ctx.effects.push(Effect::Damage { entity, amount });
        }
    }
}

impl BehaviorUnit for HurtUnit {
    fn activate(&mut self, ctx: &mut UnitContext<'_>) {
        self.elapsed = 0.0;
        self.hurt(ctx, self.amount);
    }

    fn deactivate(&mut self, _ctx: &mut UnitContext<'_>) {}

    fn step(&mut self, ctx: &mut UnitContext<'_>) {
        // A zero period means one hit per activation.
        if self.period <= 0.0 || !(ctx.dt.is_finite() && ctx.dt >= 0.0) {
            return;
        }
        self.elapsed += ctx.dt;
        if self.elapsed < self.period {
            return;
        }
        // Periods that elapsed within one tick land as a single combined hit.
        let hits = (self.elapsed / self.period).floor();
        self.elapsed = self.elapsed.rem_euclid(self.period);
        if self.elapsed >= self.period {
            self.elapsed = 0.0;
        }
        self.hurt(ctx, self.amount * hits);
    }
}
