// Domain-level simulation entities, player intents and snapshot types.

use crate::domain::ability::{Abilities, Ability, AbilityEffect, AbilityKind};
use crate::domain::tuning::WorldConfig;
use crate::domain::vec2::Vec2;

pub type PlayerId = u64;
pub type BulletId = u64;
pub type PickupId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Parses the wire name; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    fn unit(&self) -> Vec2 {
        match self {
            Direction::Left => Vec2::LEFT,
            Direction::Right => Vec2::RIGHT,
            Direction::Up => Vec2::UP,
            Direction::Down => Vec2::DOWN,
        }
    }
}

/// Held movement keys. Written by intents only; the simulation just reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementIntent {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    /// Sum of the held axes, not normalized (diagonals have length sqrt(2)).
    pub fn vector(&self) -> Vec2 {
        let held = [
            (self.left, Direction::Left),
            (self.right, Direction::Right),
            (self.up, Direction::Up),
            (self.down, Direction::Down),
        ];
        held.iter()
            .filter(|(on, _)| *on)
            .fold(Vec2::ZERO, |acc, (_, dir)| acc + dir.unit())
    }
}

/// A validated client request addressed to one player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerIntent {
    MoveStart(Direction),
    MoveStop(Direction),
    Fire(bool),
    /// One aimed shot in the given (not necessarily normalized) direction.
    FireAt(Vec2),
    UseSkill(AbilityKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    pub health: i32,
    pub max_health: i32,
    pub attack_power: i32,
    pub fire_rate_ms: f32,
    pub move_speed: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PvpStats {
    pub kills: u32,
    pub deaths: u32,
}

pub struct Player {
    pub id: PlayerId,
    pub position: Vec2,
    /// Last meaningful heading; unit length.
    pub facing: Vec2,

    // Intent state (written by the gateway only).
    pub movement: MovementIntent,
    pub firing: bool,
    /// Normalized direction of a one-shot aimed fire, consumed by the next step.
    pub pending_aim: Option<Vec2>,

    pub stats: PlayerStats,
    pub pvp: PvpStats,
    pub last_fired_at: u64,
    pub invulnerable_until: u64,
    pub abilities: Abilities,
}

/// Result of a `use_skill` request, evaluated at the moment of the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillOutcome {
    pub kind: AbilityKind,
    pub success: bool,
    pub ability: Ability,
    /// Health actually restored by an instant heal.
    pub healed: Option<i32>,
}

impl Player {
    pub fn spawn(id: PlayerId, position: Vec2, cfg: &WorldConfig) -> Self {
        Self {
            id,
            position,
            facing: Vec2::UP,
            movement: MovementIntent::default(),
            firing: false,
            pending_aim: None,
            stats: PlayerStats {
                level: 1,
                exp: 0,
                exp_to_next: cfg.progression.initial_exp_to_next,
                health: cfg.player.max_health,
                max_health: cfg.player.max_health,
                attack_power: cfg.player.attack_power,
                fire_rate_ms: cfg.player.fire_rate_ms,
                move_speed: cfg.player.move_speed,
            },
            pvp: PvpStats::default(),
            last_fired_at: 0,
            invulnerable_until: 0,
            abilities: Abilities::from_table(&cfg.abilities),
        }
    }

    pub fn is_invulnerable(&self, now: u64) -> bool {
        now < self.invulnerable_until
    }

    /// Applies a movement or fire intent. Skill requests go through `use_skill`.
    pub fn apply_input(&mut self, intent: PlayerIntent) {
        match intent {
            PlayerIntent::MoveStart(dir) => self.movement.set(dir, true),
            PlayerIntent::MoveStop(dir) => self.movement.set(dir, false),
            PlayerIntent::Fire(firing) => self.firing = firing,
            PlayerIntent::FireAt(aim) => {
                if !aim.is_finite() || aim.is_zero() {
                    return;
                }
                // Facing only follows the aim once the shot actually fires.
                self.pending_aim = Some(aim.normalize());
            }
            PlayerIntent::UseSkill(_) => {}
        }
    }

    /// Ready check and activation in one step; `None` for abilities this arena lacks.
    pub fn use_skill(&mut self, kind: AbilityKind, now: u64) -> Option<SkillOutcome> {
        let (success, ability) = self.abilities.activate(kind, now)?;

        let mut healed = None;
        if success {
            match ability.spec.effect {
                AbilityEffect::Heal { amount } => {
                    let before = self.stats.health;
                    self.stats.health = (before + amount).min(self.stats.max_health);
                    healed = Some(self.stats.health - before);
                }
                AbilityEffect::Shield => {
                    self.invulnerable_until = self.invulnerable_until.max(ability.active_until);
                }
                _ => {}
            }
        }

        Some(SkillOutcome {
            kind,
            success,
            ability,
            healed,
        })
    }

    /// Drops every held key so a respawned player does not lurch before new input arrives.
    pub fn clear_intents(&mut self) {
        self.movement = MovementIntent::default();
        self.firing = false;
        self.pending_aim = None;
    }
}

pub struct Bullet {
    pub id: BulletId,
    pub owner_id: PlayerId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Owner's damage at fire time; later stat changes do not touch it.
    pub damage: i32,
    pub spawned_at: u64,
    pub power_shot: bool,
}

pub struct Pickup {
    pub id: PickupId,
    pub position: Vec2,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub position: Vec2,
    pub facing: Vec2,
    pub stats: PlayerStats,
    pub pvp: PvpStats,
    pub abilities: Vec<Ability>,
    pub invulnerable_until: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletSnapshot {
    pub id: BulletId,
    pub owner_id: PlayerId,
    pub position: Vec2,
    pub damage: i32,
    pub power_shot: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickupSnapshot {
    pub id: PickupId,
    pub position: Vec2,
    pub value: u32,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            position: p.position,
            facing: p.facing,
            stats: p.stats,
            pvp: p.pvp,
            abilities: p.abilities.iter().copied().collect(),
            invulnerable_until: p.invulnerable_until,
        }
    }
}

impl From<&Bullet> for BulletSnapshot {
    fn from(b: &Bullet) -> Self {
        Self {
            id: b.id,
            owner_id: b.owner_id,
            position: b.position,
            damage: b.damage,
            power_shot: b.power_shot,
        }
    }
}

impl From<&Pickup> for PickupSnapshot {
    fn from(p: &Pickup) -> Self {
        Self {
            id: p.id,
            position: p.position,
            value: p.value,
        }
    }
}
