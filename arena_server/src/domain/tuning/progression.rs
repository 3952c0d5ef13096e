/// Experience pickups and level-up growth.
///
/// Disable for fixed-stat PVP arenas.
#[derive(Debug, Clone, Copy)]
pub struct ProgressionTuning {
    pub enabled: bool,

    /// Pickups per 4000x4000 area; scaled to the actual world area.
    pub pickups_per_reference_area: u32,

    /// Distance from the world edge kept free of pickups.
    pub pickup_edge_inset: f32,

    /// Distance at which a player collects a pickup.
    pub pickup_radius: f32,

    /// Experience granted per pickup.
    pub pickup_value: u32,

    pub initial_exp_to_next: u32,
    /// Growth factor for the experience needed per level (rounded up).
    pub exp_growth: f32,

    pub max_health_per_level: i32,
    pub attack_power_per_level: i32,
    pub move_speed_per_level: f32,
    /// Fire rate is multiplied by this on every level, down to `min_fire_rate_ms`.
    pub fire_rate_factor: f32,
    pub min_fire_rate_ms: f32,
}

const REFERENCE_AREA: f32 = 4000.0 * 4000.0;

impl ProgressionTuning {
    /// Number of pickups kept in a world of the given size.
    pub fn pickup_count(&self, width: f32, height: f32) -> usize {
        if !self.enabled {
            return 0;
        }
        ((width * height) / REFERENCE_AREA * self.pickups_per_reference_area as f32).floor() as usize
    }
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            pickups_per_reference_area: 100,
            pickup_edge_inset: 100.0,
            pickup_radius: 30.0,
            pickup_value: 1,
            initial_exp_to_next: 10,
            exp_growth: 1.5,
            max_health_per_level: 5,
            attack_power_per_level: 1,
            move_speed_per_level: 10.0,
            fire_rate_factor: 0.9,
            min_fire_rate_ms: 200.0,
        }
    }
}
