/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Base bullet speed in world units per second.
    pub speed: f32,

    /// Lifetime in milliseconds before the bullet is despawned.
    pub lifetime_ms: u64,

    /// Fraction of the firer's current movement speed added to the bullet speed.
    pub strafe_bonus: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 400.0,
            lifetime_ms: 3000,
            strafe_bonus: 0.5,
        }
    }
}
