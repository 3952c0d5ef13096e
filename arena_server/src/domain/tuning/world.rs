use super::{AbilityTable, PlayerTuning, ProgressionTuning, ProjectileTuning};
use crate::domain::vec2::Vec2;
use std::time::Duration;

/// Static arena constants consumed by every system.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Players are clamped this far inside the edges; bullets may travel this far outside.
    pub margin: f32,
    /// Spacing of the static background grid sent in `map_data`.
    pub grid_cell: f32,
    pub tick_rate: u32,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub abilities: AbilityTable,
    pub progression: ProgressionTuning,
}

impl WorldConfig {
    /// Fixed simulation timestep in seconds.
    pub fn delta_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }

    /// Lowest corner a player may occupy.
    pub fn play_min(&self) -> Vec2 {
        Vec2::new(self.margin, self.margin)
    }

    /// Highest corner a player may occupy.
    pub fn play_max(&self) -> Vec2 {
        Vec2::new(self.width - self.margin, self.height - self.margin)
    }

    /// True while a bullet is still inside the world plus the margin slack.
    pub fn bullet_in_bounds(&self, position: Vec2) -> bool {
        position.x >= -self.margin
            && position.x <= self.width + self.margin
            && position.y >= -self.margin
            && position.y <= self.height + self.margin
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            margin: 50.0,
            grid_cell: 100.0,
            tick_rate: 60,
            player: PlayerTuning::default(),
            projectile: ProjectileTuning::default(),
            abilities: AbilityTable::default(),
            progression: ProgressionTuning::default(),
        }
    }
}
