/// Gameplay tuning for player avatars.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Health on spawn and after every respawn.
    pub max_health: i32,

    /// Damage carried by each bullet the player fires.
    pub attack_power: i32,

    /// Minimum milliseconds between two shots.
    pub fire_rate_ms: f32,

    /// Movement speed in world units per second.
    pub move_speed: f32,

    /// Circle radius used for bullet hit checks.
    pub hit_radius: f32,

    /// Distance in front of the player where bullets spawn.
    pub muzzle_offset: f32,

    /// Invulnerability granted after a respawn, in milliseconds.
    pub respawn_grace_ms: u64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            attack_power: 10,
            fire_rate_ms: 500.0,
            move_speed: 160.0,
            hit_radius: 20.0,
            muzzle_offset: 30.0,
            respawn_grace_ms: 3000,
        }
    }
}
