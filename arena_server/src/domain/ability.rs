// Per-player ability slots and their Ready/Active/Cooldown state machine.
//
// Every ability is the same value type; what differs is the data in its effect
// descriptor, so adding an ability means adding a table entry.

use crate::domain::tuning::AbilityTable;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AbilityKind {
    RapidFire,
    SpeedBoost,
    Heal,
    PowerShot,
    Shield,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 5] = [
        AbilityKind::RapidFire,
        AbilityKind::SpeedBoost,
        AbilityKind::Heal,
        AbilityKind::PowerShot,
        AbilityKind::Shield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityKind::RapidFire => "rapid_fire",
            AbilityKind::SpeedBoost => "speed_boost",
            AbilityKind::Heal => "heal",
            AbilityKind::PowerShot => "power_shot",
            AbilityKind::Shield => "shield",
        }
    }

    /// Parses the wire name; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// What an ability does while active (or once, for instant abilities).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityEffect {
    /// Divides the fire interval.
    FireRate { multiplier: f32 },
    /// Multiplies movement speed.
    MoveSpeed { multiplier: f32 },
    /// Restores health immediately, capped at max health.
    Heal { amount: i32 },
    /// Multiplies the damage stamped on bullets fired while active.
    Damage { multiplier: f32 },
    /// Absorbs all incoming damage while active.
    Shield,
}

/// Static timing and effect for one ability kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilitySpec {
    /// Zero means instant: the ability never enters the Active state.
    pub duration_ms: u64,
    pub cooldown_ms: u64,
    pub effect: AbilityEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityState {
    Ready,
    Active,
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ability {
    pub kind: AbilityKind,
    pub spec: AbilitySpec,
    pub is_active: bool,
    pub active_until: u64,
    pub cooldown_until: u64,
}

impl Ability {
    pub fn new(kind: AbilityKind, spec: AbilitySpec) -> Self {
        Self {
            kind,
            spec,
            is_active: false,
            active_until: 0,
            cooldown_until: 0,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.spec.duration_ms == 0
    }

    pub fn state(&self, now: u64) -> AbilityState {
        if self.is_active && now < self.active_until {
            AbilityState::Active
        } else if now < self.cooldown_until {
            AbilityState::Cooldown
        } else {
            AbilityState::Ready
        }
    }

    /// Ready -> Active (or Ready -> Cooldown for instant abilities).
    ///
    /// Returns false and leaves every timer untouched unless the ability is Ready.
    pub fn try_activate(&mut self, now: u64) -> bool {
        if self.state(now) != AbilityState::Ready {
            return false;
        }

        if self.is_instant() {
            self.is_active = false;
            self.active_until = now;
            self.cooldown_until = now + self.spec.cooldown_ms;
        } else {
            self.is_active = true;
            self.active_until = now + self.spec.duration_ms;
            self.cooldown_until = now + self.spec.duration_ms + self.spec.cooldown_ms;
        }
        true
    }

    /// Active -> Cooldown once the duration has elapsed. Returns true on the transition.
    pub fn expire(&mut self, now: u64) -> bool {
        if self.is_active && now >= self.active_until {
            self.is_active = false;
            return true;
        }
        false
    }
}

/// Multipliers from all currently active abilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    pub move_speed: f32,
    pub fire_rate: f32,
    pub damage: f32,
    pub shielded: bool,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            fire_rate: 1.0,
            damage: 1.0,
            shielded: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Abilities {
    slots: BTreeMap<AbilityKind, Ability>,
}

impl Abilities {
    pub fn from_table(table: &AbilityTable) -> Self {
        let slots = table
            .iter()
            .map(|(kind, spec)| (kind, Ability::new(kind, spec)))
            .collect();
        Self { slots }
    }

    pub fn get(&self, kind: AbilityKind) -> Option<&Ability> {
        self.slots.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.slots.values()
    }

    pub fn is_active(&self, kind: AbilityKind, now: u64) -> bool {
        self.slots
            .get(&kind)
            .is_some_and(|a| a.state(now) == AbilityState::Active)
    }

    /// Attempts activation; `None` when this arena has no such ability.
    pub fn activate(&mut self, kind: AbilityKind, now: u64) -> Option<(bool, Ability)> {
        let ability = self.slots.get_mut(&kind)?;
        let activated = ability.try_activate(now);
        Some((activated, *ability))
    }

    /// Runs the Active -> Cooldown check on every slot and returns the kinds that ended.
    pub fn expire(&mut self, now: u64) -> Vec<AbilityKind> {
        self.slots
            .values_mut()
            .filter_map(|a| a.expire(now).then_some(a.kind))
            .collect()
    }

    pub fn modifiers(&self, now: u64) -> Modifiers {
        let mut mods = Modifiers::default();
        for ability in self.slots.values() {
            if ability.state(now) != AbilityState::Active {
                continue;
            }
            match ability.spec.effect {
                AbilityEffect::FireRate { multiplier } => mods.fire_rate *= multiplier,
                AbilityEffect::MoveSpeed { multiplier } => mods.move_speed *= multiplier,
                AbilityEffect::Damage { multiplier } => mods.damage *= multiplier,
                AbilityEffect::Shield => mods.shielded = true,
                AbilityEffect::Heal { .. } => {}
            }
        }
        mods
    }
}
