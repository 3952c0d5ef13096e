use crate::domain::events::ArenaEvent;
use crate::domain::registry::{EntityRegistry, random_point};
use crate::domain::state::{Player, PlayerId};
use crate::domain::tuning::WorldConfig;
use crate::domain::vec2::Vec2;
use rand::Rng;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target is no longer in the registry.
    Missing,
    /// Absorbed by respawn grace or an active shield.
    Blocked,
    Damaged,
    /// Health reached zero; the target has already respawned.
    Killed,
}

/// Applies one hit. A kill runs the death and respawn sequence before returning,
/// so the next snapshot only ever shows the respawned player.
#[allow(clippy::too_many_arguments)]
pub fn take_damage<R: Rng>(
    registry: &mut EntityRegistry,
    target_id: PlayerId,
    amount: i32,
    attacker_id: PlayerId,
    now: u64,
    cfg: &WorldConfig,
    rng: &mut R,
    events: &mut Vec<ArenaEvent>,
) -> DamageOutcome {
    let Some(target) = registry.player_mut(target_id) else {
        return DamageOutcome::Missing;
    };

    if target.is_invulnerable(now) {
        // Only a visible shield reports the block; respawn grace is silent.
        if target.abilities.modifiers(now).shielded {
            events.push(ArenaEvent::ShieldHit {
                attacker_id,
                target_id,
                position: target.position,
            });
        }
        return DamageOutcome::Blocked;
    }

    target.stats.health = (target.stats.health - amount).max(0);
    let position = target.position;
    events.push(ArenaEvent::PlayerHit {
        attacker_id,
        target_id,
        position,
        damage: amount,
        remaining_health: target.stats.health,
    });

    if target.stats.health > 0 {
        return DamageOutcome::Damaged;
    }

    target.pvp.deaths += 1;
    let target_deaths = target.pvp.deaths;

    // Attacker may have disconnected while the bullet was in flight.
    let attacker_kills = registry
        .player_mut(attacker_id)
        .map(|attacker| {
            attacker.pvp.kills += 1;
            attacker.pvp.kills
        })
        .unwrap_or(0);

    info!(
        attacker_id,
        target_id,
        attacker_kills,
        target_deaths,
        "player killed"
    );
    events.push(ArenaEvent::PlayerKilled {
        attacker_id,
        target_id,
        position,
        attacker_kills,
        target_deaths,
    });

    if let Some(target) = registry.player_mut(target_id) {
        respawn(target, now, cfg, rng, events);
    }
    DamageOutcome::Killed
}

/// Full health at a uniformly random point, facing up, with no held input and a
/// fresh invulnerability window.
pub fn respawn<R: Rng>(
    p: &mut Player,
    now: u64,
    cfg: &WorldConfig,
    rng: &mut R,
    events: &mut Vec<ArenaEvent>,
) {
    p.stats.health = p.stats.max_health;
    p.position = random_point(rng, cfg.play_min(), cfg.play_max());
    p.facing = Vec2::UP;
    p.clear_intents();
    p.invulnerable_until = now + cfg.player.respawn_grace_ms;

    events.push(ArenaEvent::PlayerRespawn {
        player_id: p.id,
        position: p.position,
        health: p.stats.health,
        invulnerable_until: p.invulnerable_until,
    });
}
