use crate::domain::events::ArenaEvent;
use crate::domain::registry::EntityRegistry;
use crate::domain::state::{Bullet, Player, PlayerId};
use crate::domain::systems::combat;
use crate::domain::tuning::WorldConfig;
use crate::domain::vec2::Vec2;
use rand::Rng;
use tracing::debug;

/// A bullet a player is about to fire; it gets its id when handed to the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub owner_id: PlayerId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: i32,
    pub power_shot: bool,
}

/// Fires if the player wants to and the fire interval has elapsed.
///
/// An aimed shot flies along its own direction regardless of movement, and the
/// player turns to that direction only if the shot comes out. The aimed latch
/// is consumed whether or not a shot comes out.
pub fn try_fire(
    p: &mut Player,
    velocity: Vec2,
    fire_rate_ms: f32,
    damage_multiplier: f32,
    now: u64,
    cfg: &WorldConfig,
) -> Option<Shot> {
    let aim = p.pending_aim.take();
    if !p.firing && aim.is_none() {
        return None;
    }
    if (now.saturating_sub(p.last_fired_at) as f32) < fire_rate_ms {
        return None;
    }

    let direction = aim.unwrap_or(p.facing);
    p.facing = direction;
    p.last_fired_at = now;

    // Shooting while strafing carries some of the player's speed into the bullet.
    let speed = cfg.projectile.speed + velocity.length() * cfg.projectile.strafe_bonus;
    let damage = (p.stats.attack_power as f32 * damage_multiplier).round() as i32;

    Some(Shot {
        owner_id: p.id,
        // Spawn at the muzzle, in the firing direction.
        position: p.position + direction * cfg.player.muzzle_offset,
        velocity: direction * speed,
        damage,
        power_shot: damage_multiplier > 1.0,
    })
}

/// Integrates bullet movement and drops bullets that left the world or expired.
pub fn advance_bullets(bullets: &mut Vec<Bullet>, dt: f32, now: u64, cfg: &WorldConfig) {
    for b in bullets.iter_mut() {
        b.position += b.velocity * dt;
    }

    bullets.retain(|b| {
        cfg.bullet_in_bounds(b.position)
            && now.saturating_sub(b.spawned_at) < cfg.projectile.lifetime_ms
    });
}

/// Bullet vs player collision against settled positions (naive O(B*P)).
///
/// The first non-owner player inside the hit radius absorbs the bullet.
pub fn resolve_hits<R: Rng>(
    registry: &mut EntityRegistry,
    cfg: &WorldConfig,
    now: u64,
    rng: &mut R,
    events: &mut Vec<ArenaEvent>,
) {
    let hit_radius_sq = cfg.player.hit_radius * cfg.player.hit_radius;
    let mut bullets = std::mem::take(&mut registry.bullets);

    bullets.retain(|b| {
        let target = registry
            .players()
            .find(|p| p.id != b.owner_id && p.position.distance_sq_to(b.position) < hit_radius_sq)
            .map(|p| p.id);

        let Some(target_id) = target else {
            return true;
        };

        debug!(
            bullet_id = b.id,
            shooter_id = b.owner_id,
            victim_id = target_id,
            "bullet hit"
        );
        combat::take_damage(registry, target_id, b.damage, b.owner_id, now, cfg, rng, events);
        false
    });

    registry.bullets = bullets;
}
