use crate::domain::ability::{AbilityEffect, AbilityKind, AbilitySpec};

/// Timing and effect table for every ability a player can use.
///
/// Kinds missing from the table are treated as unknown by the intent gateway.
#[derive(Debug, Clone)]
pub struct AbilityTable {
    entries: Vec<(AbilityKind, AbilitySpec)>,
}

impl AbilityTable {
    pub fn new(entries: Vec<(AbilityKind, AbilitySpec)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AbilityKind, AbilitySpec)> + '_ {
        self.entries.iter().copied()
    }

    pub fn get(&self, kind: AbilityKind) -> Option<AbilitySpec> {
        self.iter().find(|(k, _)| *k == kind).map(|(_, spec)| spec)
    }
}

impl Default for AbilityTable {
    fn default() -> Self {
        Self::new(vec![
            (
                AbilityKind::RapidFire,
                AbilitySpec {
                    duration_ms: 10_000,
                    cooldown_ms: 10_000,
                    effect: AbilityEffect::FireRate { multiplier: 10.0 },
                },
            ),
            (
                AbilityKind::SpeedBoost,
                AbilitySpec {
                    duration_ms: 5_000,
                    cooldown_ms: 15_000,
                    effect: AbilityEffect::MoveSpeed { multiplier: 1.5 },
                },
            ),
            (
                AbilityKind::Heal,
                AbilitySpec {
                    duration_ms: 0,
                    cooldown_ms: 20_000,
                    effect: AbilityEffect::Heal { amount: 40 },
                },
            ),
            (
                AbilityKind::PowerShot,
                AbilitySpec {
                    duration_ms: 5_000,
                    cooldown_ms: 15_000,
                    effect: AbilityEffect::Damage { multiplier: 3.0 },
                },
            ),
            (
                AbilityKind::Shield,
                AbilitySpec {
                    duration_ms: 3_000,
                    cooldown_ms: 20_000,
                    effect: AbilityEffect::Shield,
                },
            ),
        ])
    }
}
