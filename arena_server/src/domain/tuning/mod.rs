// Gameplay tuning tables. Runtime settings (ports, channel sizes) live in frameworks::config.

pub mod ability;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod world;

pub use ability::AbilityTable;
pub use player::PlayerTuning;
pub use progression::ProgressionTuning;
pub use projectile::ProjectileTuning;
pub use world::WorldConfig;
