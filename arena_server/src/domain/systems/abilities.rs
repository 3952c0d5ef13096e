use crate::domain::ability::Modifiers;
use crate::domain::events::ArenaEvent;
use crate::domain::state::Player;

/// Effective per-tick stats after ability multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStats {
    pub move_speed: f32,
    pub fire_rate_ms: f32,
    pub damage_multiplier: f32,
}

/// Ends expired abilities (Active -> Cooldown) and reports each one to its owner.
pub fn tick_abilities(p: &mut Player, now: u64, events: &mut Vec<ArenaEvent>) {
    for kind in p.abilities.expire(now) {
        events.push(ArenaEvent::SkillDeactivated {
            player_id: p.id,
            kind,
        });
    }
}

pub fn effective_stats(p: &Player, now: u64) -> EffectiveStats {
    let Modifiers {
        move_speed,
        fire_rate,
        damage,
        ..
    } = p.abilities.modifiers(now);

    EffectiveStats {
        move_speed: p.stats.move_speed * move_speed,
        fire_rate_ms: p.stats.fire_rate_ms / fire_rate,
        damage_multiplier: damage,
    }
}
