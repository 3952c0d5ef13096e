// Per-tick simulation systems. Each works on the registry or a single player and
// reports what happened as `ArenaEvent`s.

pub mod abilities;
pub mod combat;
pub mod movement;
pub mod pickups;
pub mod projectiles;
