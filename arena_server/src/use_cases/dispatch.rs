// Resolves simulation events to the connections that should receive them.

use crate::domain::{ArenaEvent, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    All,
    Player(PlayerId),
}

impl Recipient {
    pub fn includes(&self, player_id: PlayerId) -> bool {
        match self {
            Recipient::All => true,
            Recipient::Player(id) => *id == player_id,
        }
    }
}

/// Feedback about a player's own actions goes to that player; combat goes to everyone.
pub fn route(event: &ArenaEvent) -> Recipient {
    match event {
        ArenaEvent::SkillResult { player_id, .. }
        | ArenaEvent::SkillDeactivated { player_id, .. }
        | ArenaEvent::FireSound { player_id, .. }
        | ArenaEvent::PlayerLevelUp { player_id, .. } => Recipient::Player(*player_id),
        ArenaEvent::PlayerHit { .. }
        | ArenaEvent::PlayerKilled { .. }
        | ArenaEvent::PlayerRespawn { .. }
        | ArenaEvent::ShieldHit { .. }
        | ArenaEvent::HealEffect { .. } => Recipient::All,
    }
}
