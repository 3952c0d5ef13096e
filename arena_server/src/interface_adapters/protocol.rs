// Wire protocol DTOs and conversions for the public arena messages.
// Envelope in both directions: {"type": "<kind>", "data": ...}.

use crate::domain::{
    Ability, AbilityKind, ArenaEvent, BulletSnapshot, Direction, PickupSnapshot, PlayerIntent,
    PlayerSnapshot, PlayerStats, Vec2, WorldConfig,
};
use crate::use_cases::WorldUpdate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    MoveStart(String),
    MoveStop(String),
    FireInput(bool),
    // One aimed shot; the vector does not need to be normalized.
    Fire(PointDto),
    UseSkill(String),
}

impl ClientMessage {
    /// Maps a well-formed message to a domain intent. Unknown directions or
    /// ability names yield `None` and are dropped without penalty.
    pub fn into_intent(self) -> Option<PlayerIntent> {
        match self {
            ClientMessage::MoveStart(dir) => Direction::parse(&dir).map(PlayerIntent::MoveStart),
            ClientMessage::MoveStop(dir) => Direction::parse(&dir).map(PlayerIntent::MoveStop),
            ClientMessage::FireInput(firing) => Some(PlayerIntent::Fire(firing)),
            ClientMessage::Fire(aim) => Some(PlayerIntent::FireAt(aim.into())),
            ClientMessage::UseSkill(kind) => AbilityKind::parse(&kind).map(PlayerIntent::UseSkill),
        }
    }
}

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    // Assigned identity for the connection once Join is queued.
    Identity {
        player_id: String,
    },
    // Static arena description, sent once per connection.
    MapData(MapDataDto),
    // Full snapshot of the world for a given tick.
    GameState(GameStateDto),
    PlayerHitBroadcast {
        attacker_id: String,
        target_id: String,
        x: f32,
        y: f32,
        damage: i32,
        remaining_health: i32,
    },
    PlayerKilledBroadcast {
        attacker_id: String,
        target_id: String,
        x: f32,
        y: f32,
        attacker_kills: u32,
        target_deaths: u32,
    },
    PlayerRespawnBroadcast {
        player_id: String,
        x: f32,
        y: f32,
        health: i32,
        invulnerable_until: u64,
    },
    ShieldHitBroadcast {
        attacker_id: String,
        target_id: String,
        x: f32,
        y: f32,
    },
    SkillResult {
        kind: String,
        success: bool,
        timers: AbilityTimerDto,
    },
    SkillDeactivated {
        kind: String,
    },
    HealEffect {
        player_id: String,
        x: f32,
        y: f32,
        amount: i32,
        health: i32,
    },
    FireSound {
        player_id: String,
        bullet_id: String,
        x: f32,
        y: f32,
        power_shot: bool,
    },
    PlayerLevelUp {
        player_id: String,
        level: u32,
        stats: StatsDto,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDto {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for PointDto {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<PointDto> for Vec2 {
    fn from(p: PointDto) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MapDataDto {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub grid_cell: f32,
    pub tick_rate: u32,
}

impl From<&WorldConfig> for MapDataDto {
    fn from(cfg: &WorldConfig) -> Self {
        Self {
            width: cfg.width,
            height: cfg.height,
            margin: cfg.margin,
            grid_cell: cfg.grid_cell,
            tick_rate: cfg.tick_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateDto {
    pub tick: u64,
    pub server_time: u64,
    // Keyed by player id.
    pub players: BTreeMap<String, PlayerStateDto>,
    pub bullets: Vec<BulletStateDto>,
    pub pickups: Vec<PickupStateDto>,
}

impl From<WorldUpdate> for GameStateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            server_time: update.server_time,
            players: update
                .players
                .iter()
                .map(|p| (p.id.to_string(), PlayerStateDto::from(p)))
                .collect(),
            bullets: update.bullets.iter().map(BulletStateDto::from).collect(),
            pickups: update.pickups.iter().map(PickupStateDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub direction: PointDto,
    pub stats: StatsDto,
    pub pvp_stats: PvpStatsDto,
    pub ability_timers: BTreeMap<&'static str, AbilityTimerDto>,
    pub invulnerable_until: u64,
}

impl From<&PlayerSnapshot> for PlayerStateDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.position.x,
            y: p.position.y,
            direction: p.facing.into(),
            stats: p.stats.into(),
            pvp_stats: PvpStatsDto {
                kills: p.pvp.kills,
                deaths: p.pvp.deaths,
            },
            ability_timers: p
                .abilities
                .iter()
                .map(|a| (a.kind.as_str(), AbilityTimerDto::from(*a)))
                .collect(),
            invulnerable_until: p.invulnerable_until,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatsDto {
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    pub health: i32,
    pub max_health: i32,
    pub attack_power: i32,
    pub fire_rate: f32,
    pub move_speed: f32,
}

impl From<PlayerStats> for StatsDto {
    fn from(s: PlayerStats) -> Self {
        Self {
            level: s.level,
            exp: s.exp,
            exp_to_next: s.exp_to_next,
            health: s.health,
            max_health: s.max_health,
            attack_power: s.attack_power,
            fire_rate: s.fire_rate_ms,
            move_speed: s.move_speed,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PvpStatsDto {
    pub kills: u32,
    pub deaths: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityTimerDto {
    pub is_active: bool,
    pub active_until: u64,
    pub cooldown_until: u64,
}

impl From<Ability> for AbilityTimerDto {
    fn from(a: Ability) -> Self {
        Self {
            is_active: a.is_active,
            active_until: a.active_until,
            cooldown_until: a.cooldown_until,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletStateDto {
    pub id: String,
    pub owner_id: String,
    pub x: f32,
    pub y: f32,
    pub damage: i32,
    pub power_shot: bool,
}

impl From<&BulletSnapshot> for BulletStateDto {
    fn from(b: &BulletSnapshot) -> Self {
        Self {
            id: b.id.to_string(),
            owner_id: b.owner_id.to_string(),
            x: b.position.x,
            y: b.position.y,
            damage: b.damage,
            power_shot: b.power_shot,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub value: u32,
}

impl From<&PickupSnapshot> for PickupStateDto {
    fn from(p: &PickupSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.position.x,
            y: p.position.y,
            value: p.value,
        }
    }
}

impl From<ArenaEvent> for ServerMessage {
    fn from(event: ArenaEvent) -> Self {
        match event {
            ArenaEvent::PlayerHit {
                attacker_id,
                target_id,
                position,
                damage,
                remaining_health,
            } => ServerMessage::PlayerHitBroadcast {
                attacker_id: attacker_id.to_string(),
                target_id: target_id.to_string(),
                x: position.x,
                y: position.y,
                damage,
                remaining_health,
            },
            ArenaEvent::PlayerKilled {
                attacker_id,
                target_id,
                position,
                attacker_kills,
                target_deaths,
            } => ServerMessage::PlayerKilledBroadcast {
                attacker_id: attacker_id.to_string(),
                target_id: target_id.to_string(),
                x: position.x,
                y: position.y,
                attacker_kills,
                target_deaths,
            },
            ArenaEvent::PlayerRespawn {
                player_id,
                position,
                health,
                invulnerable_until,
            } => ServerMessage::PlayerRespawnBroadcast {
                player_id: player_id.to_string(),
                x: position.x,
                y: position.y,
                health,
                invulnerable_until,
            },
            ArenaEvent::ShieldHit {
                attacker_id,
                target_id,
                position,
            } => ServerMessage::ShieldHitBroadcast {
                attacker_id: attacker_id.to_string(),
                target_id: target_id.to_string(),
                x: position.x,
                y: position.y,
            },
            ArenaEvent::SkillResult {
                kind,
                success,
                ability,
                ..
            } => ServerMessage::SkillResult {
                kind: kind.as_str().to_string(),
                success,
                timers: ability.into(),
            },
            ArenaEvent::SkillDeactivated { kind, .. } => ServerMessage::SkillDeactivated {
                kind: kind.as_str().to_string(),
            },
            ArenaEvent::HealEffect {
                player_id,
                position,
                amount,
                health,
            } => ServerMessage::HealEffect {
                player_id: player_id.to_string(),
                x: position.x,
                y: position.y,
                amount,
                health,
            },
            ArenaEvent::FireSound {
                player_id,
                bullet_id,
                position,
                power_shot,
            } => ServerMessage::FireSound {
                player_id: player_id.to_string(),
                bullet_id: bullet_id.to_string(),
                x: position.x,
                y: position.y,
                power_shot,
            },
            ArenaEvent::PlayerLevelUp { player_id, stats } => ServerMessage::PlayerLevelUp {
                player_id: player_id.to_string(),
                level: stats.level,
                stats: stats.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AbilitySpec, AbilityEffect};
    use serde_json::{Value, json};

    fn parse(raw: &str) -> Option<PlayerIntent> {
        serde_json::from_str::<ClientMessage>(raw)
            .ok()
            .and_then(ClientMessage::into_intent)
    }

    #[test]
    fn when_move_start_received_then_direction_intent_is_produced() {
        assert_eq!(
            parse(r#"{"type":"move_start","data":"left"}"#),
            Some(PlayerIntent::MoveStart(Direction::Left))
        );
        assert_eq!(
            parse(r#"{"type":"move_stop","data":"down"}"#),
            Some(PlayerIntent::MoveStop(Direction::Down))
        );
    }

    #[test]
    fn when_fire_and_skill_received_then_intents_are_produced() {
        assert_eq!(
            parse(r#"{"type":"fire_input","data":true}"#),
            Some(PlayerIntent::Fire(true))
        );
        assert_eq!(
            parse(r#"{"type":"fire","data":{"x":3.0,"y":-4.0}}"#),
            Some(PlayerIntent::FireAt(Vec2::new(3.0, -4.0)))
        );
        assert_eq!(
            parse(r#"{"type":"use_skill","data":"power_shot"}"#),
            Some(PlayerIntent::UseSkill(AbilityKind::PowerShot))
        );
    }

    #[test]
    fn when_direction_or_skill_is_unknown_then_message_is_ignored() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"move_start","data":"sideways"}"#).unwrap();
        assert_eq!(msg.into_intent(), None);
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"use_skill","data":"teleport"}"#).unwrap();
        assert_eq!(msg.into_intent(), None);
    }

    #[test]
    fn when_message_type_is_unknown_then_parse_fails() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"dance","data":1}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn when_identity_serialized_then_envelope_has_type_and_data() {
        let value = serde_json::to_value(ServerMessage::Identity {
            player_id: "7".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"type": "identity", "data": {"player_id": "7"}}));
    }

    #[test]
    fn when_skill_result_serialized_then_timers_are_included() {
        let mut ability = Ability::new(
            AbilityKind::Shield,
            AbilitySpec {
                duration_ms: 3_000,
                cooldown_ms: 20_000,
                effect: AbilityEffect::Shield,
            },
        );
        ability.try_activate(1_000);
        let msg = ServerMessage::from(ArenaEvent::SkillResult {
            player_id: 1,
            kind: AbilityKind::Shield,
            success: true,
            ability,
        });

        let value = serde_json::to_value(msg).unwrap();

        assert_eq!(value["type"], "skill_result");
        assert_eq!(value["data"]["kind"], "shield");
        assert_eq!(value["data"]["success"], true);
        assert_eq!(value["data"]["timers"]["active_until"], 4_000);
        assert_eq!(value["data"]["timers"]["cooldown_until"], 24_000);
    }

    #[test]
    fn when_game_state_serialized_then_players_are_keyed_by_id() {
        use crate::domain::state::Player;
        let cfg = WorldConfig::default();
        let player = Player::spawn(12, Vec2::new(40.0, 60.0), &cfg);
        let update = WorldUpdate {
            tick: 3,
            server_time: 99,
            players: vec![PlayerSnapshot::from(&player)],
            bullets: vec![BulletSnapshot {
                id: 1,
                owner_id: 12,
                position: Vec2::new(1.0, 2.0),
                damage: 30,
                power_shot: true,
            }],
            pickups: Vec::new(),
        };

        let value: Value =
            serde_json::to_value(ServerMessage::GameState(update.into())).unwrap();

        assert_eq!(value["type"], "game_state");
        let player = &value["data"]["players"]["12"];
        assert_eq!(player["x"], 40.0);
        assert_eq!(player["direction"], json!({"x": 0.0, "y": -1.0}));
        assert_eq!(player["stats"]["health"], 100);
        assert_eq!(player["pvp_stats"]["kills"], 0);
        assert!(player["ability_timers"]["rapid_fire"].is_object());
        assert_eq!(value["data"]["bullets"][0]["owner_id"], "12");
        assert_eq!(value["data"]["bullets"][0]["damage"], 30);
        assert_eq!(value["data"]["bullets"][0]["power_shot"], true);
    }

    #[test]
    fn when_hit_broadcast_then_remaining_health_is_named_explicitly() {
        let msg = ServerMessage::from(ArenaEvent::PlayerHit {
            attacker_id: 1,
            target_id: 2,
            position: Vec2::new(10.0, 20.0),
            damage: 15,
            remaining_health: 85,
        });

        let value = serde_json::to_value(msg).unwrap();

        assert_eq!(value["type"], "player_hit_broadcast");
        assert_eq!(value["data"]["damage"], 15);
        assert_eq!(value["data"]["remaining_health"], 85);
        assert!(value["data"].get("health").is_none());
    }
}
