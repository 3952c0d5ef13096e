// Use cases layer: application workflows for the arena server.

pub mod arena;
pub mod dispatch;
pub mod game;
pub mod types;

pub use arena::Arena;
pub use dispatch::{Recipient, route};
pub use game::world_task;
pub use types::{GameEvent, WorldUpdate};
