// Typed notifications produced by the simulation. Routing to connections happens
// outside the domain.

use crate::domain::ability::{Ability, AbilityKind};
use crate::domain::state::{BulletId, PlayerId, PlayerStats};
use crate::domain::vec2::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum ArenaEvent {
    PlayerHit {
        attacker_id: PlayerId,
        target_id: PlayerId,
        position: Vec2,
        damage: i32,
        remaining_health: i32,
    },
    PlayerKilled {
        attacker_id: PlayerId,
        target_id: PlayerId,
        position: Vec2,
        attacker_kills: u32,
        target_deaths: u32,
    },
    PlayerRespawn {
        player_id: PlayerId,
        position: Vec2,
        health: i32,
        invulnerable_until: u64,
    },
    ShieldHit {
        attacker_id: PlayerId,
        target_id: PlayerId,
        position: Vec2,
    },
    SkillResult {
        player_id: PlayerId,
        kind: AbilityKind,
        success: bool,
        ability: Ability,
    },
    SkillDeactivated {
        player_id: PlayerId,
        kind: AbilityKind,
    },
    HealEffect {
        player_id: PlayerId,
        position: Vec2,
        amount: i32,
        health: i32,
    },
    FireSound {
        player_id: PlayerId,
        bullet_id: BulletId,
        position: Vec2,
        power_shot: bool,
    },
    PlayerLevelUp {
        player_id: PlayerId,
        stats: PlayerStats,
    },
}
