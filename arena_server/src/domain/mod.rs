// Domain layer: core simulation types and rules.

pub mod ability;
pub mod events;
pub mod ports;
pub mod registry;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod vec2;

pub use ability::{Abilities, Ability, AbilityEffect, AbilityKind, AbilitySpec, AbilityState};
pub use events::ArenaEvent;
pub use ports::{Clock, SystemClock};
pub use registry::EntityRegistry;
pub use state::{
    BulletSnapshot, Direction, PickupSnapshot, PlayerId, PlayerIntent, PlayerSnapshot,
    PlayerStats, PvpStats,
};
pub use tuning::WorldConfig;
pub use vec2::Vec2;
