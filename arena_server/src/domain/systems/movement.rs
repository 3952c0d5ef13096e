use crate::domain::state::Player;
use crate::domain::tuning::WorldConfig;
use crate::domain::vec2::Vec2;

/// Integrates one tick of held-key movement and returns the velocity used.
///
/// Diagonals are normalized so holding two keys never exceeds `speed`.
pub fn tick_player(p: &mut Player, speed: f32, dt: f32, cfg: &WorldConfig) -> Vec2 {
    let heading = p.movement.vector().normalize();
    let velocity = heading * speed;

    // position integrate
    p.position += velocity * dt;

    // world clamp (no bounce)
    p.position = p.position.clamp_axes(cfg.play_min(), cfg.play_max());

    // Facing keeps the last non-zero heading.
    if !heading.is_zero() {
        p.facing = heading;
    }

    velocity
}
