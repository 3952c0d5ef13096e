// Use-case level inputs/outputs for the game loop.

use crate::domain::{BulletSnapshot, PickupSnapshot, PlayerId, PlayerIntent, PlayerSnapshot};

#[derive(Debug, Clone)]
pub enum GameEvent {
    Join { player_id: PlayerId },
    Leave { player_id: PlayerId },
    Intent { player_id: PlayerId, intent: PlayerIntent },
}

#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    /// Server clock (ms) the snapshot was taken at; ability and grace deadlines use it too.
    pub server_time: u64,
    pub players: Vec<PlayerSnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    pub pickups: Vec<PickupSnapshot>,
}
