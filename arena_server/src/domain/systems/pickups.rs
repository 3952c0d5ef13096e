use crate::domain::events::ArenaEvent;
use crate::domain::registry::EntityRegistry;
use crate::domain::state::Player;
use crate::domain::tuning::{ProgressionTuning, WorldConfig};
use rand::Rng;
use tracing::debug;

/// Players collect pickups they overlap; each collected pickup is replaced so the
/// world keeps a constant count.
pub fn collect_pickups<R: Rng>(
    registry: &mut EntityRegistry,
    cfg: &WorldConfig,
    rng: &mut R,
    events: &mut Vec<ArenaEvent>,
) {
    if !cfg.progression.enabled {
        return;
    }

    let radius_sq = cfg.progression.pickup_radius * cfg.progression.pickup_radius;
    let mut collected = 0;

    for player in registry.players.values_mut() {
        let mut gained = 0;
        registry.pickups.retain(|pickup| {
            if pickup.position.distance_sq_to(player.position) < radius_sq {
                gained += pickup.value;
                collected += 1;
                false
            } else {
                true
            }
        });

        if gained > 0 {
            gain_exp(player, gained, &cfg.progression, events);
        }
    }

    for _ in 0..collected {
        registry.spawn_pickup(cfg, rng);
    }
}

/// Adds experience and applies every level-up it pays for.
pub fn gain_exp(
    p: &mut Player,
    amount: u32,
    tuning: &ProgressionTuning,
    events: &mut Vec<ArenaEvent>,
) {
    p.stats.exp += amount;

    while p.stats.exp >= p.stats.exp_to_next {
        let stats = &mut p.stats;
        stats.level += 1;
        stats.exp -= stats.exp_to_next;
        stats.exp_to_next = (stats.exp_to_next as f32 * tuning.exp_growth).ceil() as u32;

        stats.max_health += tuning.max_health_per_level;
        stats.health = (stats.health + tuning.max_health_per_level).min(stats.max_health);
        stats.attack_power += tuning.attack_power_per_level;
        stats.fire_rate_ms = (stats.fire_rate_ms * tuning.fire_rate_factor).max(tuning.min_fire_rate_ms);
        stats.move_speed += tuning.move_speed_per_level;

        debug!(player_id = p.id, level = stats.level, "player leveled up");
        events.push(ArenaEvent::PlayerLevelUp {
            player_id: p.id,
            stats: *stats,
        });
    }
}
