// The arena owns the entity registry and is the only thing that mutates it:
// intents between ticks, one simulation step per tick, then a snapshot.

use super::types::{GameEvent, WorldUpdate};
use crate::domain::state::{Bullet, SkillOutcome};
use crate::domain::systems::{abilities, movement, pickups, projectiles};
use crate::domain::{
    AbilityKind, ArenaEvent, EntityRegistry, PlayerId, PlayerIntent, WorldConfig,
};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

pub struct Arena<R = StdRng> {
    config: WorldConfig,
    registry: EntityRegistry,
    rng: R,
    tick: u64,
}

impl<R: Rng> Arena<R> {
    pub fn new(config: WorldConfig, mut rng: R) -> Self {
        let mut registry = EntityRegistry::new();
        registry.seed_pickups(&config, &mut rng);
        Self {
            config,
            registry,
            rng,
            tick: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Applies one queued connection event.
    pub fn handle(&mut self, event: GameEvent, now: u64, events: &mut Vec<ArenaEvent>) {
        match event {
            GameEvent::Join { player_id } => self.join(player_id),
            GameEvent::Leave { player_id } => self.leave(player_id),
            GameEvent::Intent { player_id, intent } => {
                self.apply_intent(player_id, intent, now, events);
            }
        }
    }

    pub fn join(&mut self, player_id: PlayerId) {
        if self
            .registry
            .add_player(player_id, &self.config, &mut self.rng)
        {
            info!(player_id, players = self.registry.player_count(), "player joined");
        } else {
            debug!(player_id, "duplicate join ignored");
        }
    }

    pub fn leave(&mut self, player_id: PlayerId) {
        if self.registry.remove_player(player_id).is_some() {
            info!(player_id, players = self.registry.player_count(), "player left");
        }
    }

    /// Intent gateway: mutates only the addressed player. Unknown players are ignored.
    pub fn apply_intent(
        &mut self,
        player_id: PlayerId,
        intent: PlayerIntent,
        now: u64,
        events: &mut Vec<ArenaEvent>,
    ) {
        match intent {
            PlayerIntent::UseSkill(kind) => {
                self.use_skill(player_id, kind, now, events);
            }
            other => {
                if let Some(player) = self.registry.player_mut(player_id) {
                    player.apply_input(other);
                }
            }
        }
    }

    /// Evaluates the Ready check right now (not at the next tick) and reports the
    /// outcome to the requester.
    pub fn use_skill(
        &mut self,
        player_id: PlayerId,
        kind: AbilityKind,
        now: u64,
        events: &mut Vec<ArenaEvent>,
    ) -> Option<SkillOutcome> {
        let player = self.registry.player_mut(player_id)?;
        let outcome = player.use_skill(kind, now)?;

        debug!(player_id, skill = kind.as_str(), success = outcome.success, "skill requested");
        events.push(ArenaEvent::SkillResult {
            player_id,
            kind,
            success: outcome.success,
            ability: outcome.ability,
        });
        if let Some(amount) = outcome.healed {
            events.push(ArenaEvent::HealEffect {
                player_id,
                position: player.position,
                amount,
                health: player.stats.health,
            });
        }
        Some(outcome)
    }

    /// One fixed-timestep simulation step.
    pub fn step(&mut self, now: u64, events: &mut Vec<ArenaEvent>) {
        let cfg = &self.config;
        let dt = cfg.delta_seconds();

        // Players: abilities, movement, firing. No player reads another here.
        let mut shots = Vec::new();
        for player in self.registry.players_mut() {
            abilities::tick_abilities(player, now, events);
            let effective = abilities::effective_stats(player, now);
            let velocity = movement::tick_player(player, effective.move_speed, dt, cfg);
            if let Some(shot) = projectiles::try_fire(
                player,
                velocity,
                effective.fire_rate_ms,
                effective.damage_multiplier,
                now,
                cfg,
            ) {
                shots.push(shot);
            }
        }

        for shot in shots {
            let id = self.registry.next_bullet_id();
            events.push(ArenaEvent::FireSound {
                player_id: shot.owner_id,
                bullet_id: id,
                position: shot.position,
                power_shot: shot.power_shot,
            });
            self.registry.spawn_bullet(Bullet {
                id,
                owner_id: shot.owner_id,
                position: shot.position,
                velocity: shot.velocity,
                damage: shot.damage,
                spawned_at: now,
                power_shot: shot.power_shot,
            });
        }

        pickups::collect_pickups(&mut self.registry, cfg, &mut self.rng, events);

        // Bullets, then collisions against the settled positions.
        projectiles::advance_bullets(self.registry.bullets_mut(), dt, now, cfg);
        projectiles::resolve_hits(&mut self.registry, cfg, now, &mut self.rng, events);

        self.tick += 1;
    }

    pub fn snapshot(&self, now: u64) -> WorldUpdate {
        WorldUpdate {
            tick: self.tick,
            server_time: now,
            players: self.registry.player_snapshots(),
            bullets: self.registry.bullet_snapshots(),
            pickups: self.registry.pickup_snapshots(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AbilityState, Direction, Vec2};
    use rand::SeedableRng;

    const T0: u64 = 1_000_000;

    fn pvp_arena() -> Arena {
        let mut config = WorldConfig::default();
        config.progression.enabled = false;
        Arena::new(config, StdRng::seed_from_u64(21))
    }

    fn place(arena: &mut Arena, id: PlayerId, x: f32, y: f32) {
        arena.join(id);
        arena.registry_mut().player_mut(id).unwrap().position = Vec2::new(x, y);
    }

    #[test]
    fn when_ticking_with_random_input_then_players_stay_in_bounds() {
        let mut arena = pvp_arena();
        let mut rng = StdRng::seed_from_u64(99);
        let dirs = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];
        for id in 1..=8 {
            arena.join(id);
        }
        let mut events = Vec::new();

        for tick in 0..600u64 {
            for id in 1..=8 {
                let dir = dirs[rng.gen_range(0..4)];
                let intent = if rng.gen_bool(0.5) {
                    PlayerIntent::MoveStart(dir)
                } else {
                    PlayerIntent::MoveStop(dir)
                };
                arena.apply_intent(id, intent, T0, &mut events);
            }
            arena.step(T0 + tick * 16, &mut events);

            let cfg = arena.config().clone();
            for p in arena.registry().players() {
                assert!(p.position.x >= cfg.margin && p.position.x <= cfg.width - cfg.margin);
                assert!(p.position.y >= cfg.margin && p.position.y <= cfg.height - cfg.margin);
            }
        }
    }

    #[test]
    fn when_bullet_is_in_flight_then_later_attack_buffs_do_not_change_it() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 100.0, 100.0);
        let mut events = Vec::new();
        arena.apply_intent(1, PlayerIntent::FireAt(Vec2::RIGHT), T0, &mut events);

        arena.step(T0, &mut events);
        let attack_at_fire = arena.registry().player(1).unwrap().stats.attack_power;
        arena.registry_mut().player_mut(1).unwrap().stats.attack_power += 50;
        arena.step(T0 + 16, &mut events);

        let bullets = arena.registry().bullets();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].damage, attack_at_fire);
        assert_eq!(bullets[0].owner_id, 1);
        assert!(bullets[0].position.x > 130.0);
        assert!(events.iter().any(|e| matches!(e, ArenaEvent::FireSound { player_id: 1, .. })));
    }

    #[test]
    fn when_bullet_reaches_target_then_damage_applies_once_and_bullet_is_gone() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 100.0, 500.0);
        place(&mut arena, 2, 200.0, 500.0);
        let mut events = Vec::new();
        arena.apply_intent(1, PlayerIntent::FireAt(Vec2::RIGHT), T0, &mut events);

        for i in 0..30 {
            arena.step(T0 + i * 16, &mut events);
        }

        let target = arena.registry().player(2).unwrap();
        assert_eq!(target.stats.health, target.stats.max_health - 10);
        assert!(arena.registry().bullets().is_empty());
        let hits = events
            .iter()
            .filter(|e| matches!(e, ArenaEvent::PlayerHit { target_id: 2, .. }))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn when_rapid_fire_used_during_cooldown_then_result_is_failure_and_timers_hold() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 500.0, 500.0);
        let mut events = Vec::new();

        let first = arena
            .use_skill(1, AbilityKind::RapidFire, T0, &mut events)
            .unwrap();
        assert!(first.success);
        // Let it run out so it is cooling down.
        arena.step(T0 + 10_000, &mut events);
        let before = *arena
            .registry()
            .player(1)
            .unwrap()
            .abilities
            .get(AbilityKind::RapidFire)
            .unwrap();
        assert_eq!(before.state(T0 + 12_000), AbilityState::Cooldown);

        let second = arena
            .use_skill(1, AbilityKind::RapidFire, T0 + 12_000, &mut events)
            .unwrap();

        assert!(!second.success);
        assert_eq!(second.ability.active_until, before.active_until);
        assert_eq!(second.ability.cooldown_until, before.cooldown_until);
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::SkillResult {
                success: false,
                kind: AbilityKind::RapidFire,
                ..
            }
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::SkillDeactivated {
                kind: AbilityKind::RapidFire,
                ..
            }
        )));
    }

    #[test]
    fn when_rapid_fire_active_then_shots_come_ten_times_faster() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 500.0, 500.0);
        let mut events = Vec::new();
        arena.apply_intent(1, PlayerIntent::Fire(true), T0, &mut events);
        arena.use_skill(1, AbilityKind::RapidFire, T0, &mut events);

        // 500 ms of ticks at 50 ms each; a 50 ms interval allows a shot every tick.
        for i in 0..10 {
            arena.step(T0 + i * 50, &mut events);
        }

        let shots = events
            .iter()
            .filter(|e| matches!(e, ArenaEvent::FireSound { .. }))
            .count();
        assert_eq!(shots, 10);
    }

    #[test]
    fn when_heal_used_then_heal_effect_is_broadcast() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 500.0, 500.0);
        arena.registry_mut().player_mut(1).unwrap().stats.health = 30;
        let mut events = Vec::new();

        let outcome = arena.use_skill(1, AbilityKind::Heal, T0, &mut events).unwrap();

        assert!(outcome.success);
        assert_eq!(arena.registry().player(1).unwrap().stats.health, 70);
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::HealEffect {
                amount: 40,
                health: 70,
                ..
            }
        )));
    }

    #[test]
    fn when_intent_targets_unknown_player_then_nothing_happens() {
        let mut arena = pvp_arena();
        let mut events = Vec::new();
        arena.apply_intent(77, PlayerIntent::MoveStart(Direction::Up), T0, &mut events);
        arena.apply_intent(77, PlayerIntent::UseSkill(AbilityKind::Heal), T0, &mut events);
        assert!(events.is_empty());
        assert_eq!(arena.registry().player_count(), 0);
    }

    #[test]
    fn when_player_leaves_then_snapshot_drops_them_but_keeps_their_bullets() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 500.0, 500.0);
        let mut events = Vec::new();
        arena.apply_intent(1, PlayerIntent::FireAt(Vec2::UP), T0, &mut events);
        arena.step(T0, &mut events);

        arena.handle(GameEvent::Leave { player_id: 1 }, T0 + 16, &mut events);
        arena.step(T0 + 16, &mut events);
        let snapshot = arena.snapshot(T0 + 16);

        assert!(snapshot.players.is_empty());
        assert_eq!(snapshot.bullets.len(), 1);
        assert_eq!(snapshot.tick, 2);
    }

    #[test]
    fn when_progression_enabled_then_snapshot_lists_pickups() {
        let arena: Arena = Arena::new(WorldConfig::default(), StdRng::seed_from_u64(4));
        assert_eq!(arena.snapshot(T0).pickups.len(), 25);
    }

    #[test]
    fn when_moving_and_firing_aimed_then_bullet_follows_the_aim() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 500.0, 500.0);
        let mut events = Vec::new();
        arena.apply_intent(1, PlayerIntent::MoveStart(Direction::Up), T0, &mut events);
        arena.apply_intent(1, PlayerIntent::FireAt(Vec2::RIGHT), T0, &mut events);

        arena.step(T0, &mut events);

        let bullets = arena.registry().bullets();
        assert_eq!(bullets.len(), 1);
        assert!(bullets[0].velocity.x > 0.0);
        assert_eq!(bullets[0].velocity.y, 0.0);
        assert_eq!(arena.registry().player(1).unwrap().facing, Vec2::RIGHT);
    }

    #[test]
    fn when_aimed_fire_rejected_by_cooldown_then_facing_is_unchanged() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 500.0, 500.0);
        arena.registry_mut().player_mut(1).unwrap().last_fired_at = T0 - 100;
        let mut events = Vec::new();
        arena.apply_intent(1, PlayerIntent::FireAt(Vec2::RIGHT), T0, &mut events);

        arena.step(T0, &mut events);

        assert!(arena.registry().bullets().is_empty());
        assert!(!events.iter().any(|e| matches!(e, ArenaEvent::FireSound { .. })));
        let player = arena.registry().player(1).unwrap();
        assert_eq!(player.facing, Vec2::UP);
        assert_eq!(player.pending_aim, None);
    }

    #[test]
    fn when_power_shot_active_then_bullet_damage_triples() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 100.0, 500.0);
        let mut events = Vec::new();
        arena.use_skill(1, AbilityKind::PowerShot, T0, &mut events).unwrap();
        arena.apply_intent(1, PlayerIntent::FireAt(Vec2::RIGHT), T0, &mut events);

        arena.step(T0, &mut events);

        let bullets = arena.registry().bullets();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].damage, 30);
        assert!(bullets[0].power_shot);
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::FireSound { player_id: 1, power_shot: true, .. }
        )));
    }

    #[test]
    fn when_power_shot_expires_then_bullet_in_flight_keeps_tripled_damage() {
        let mut arena = pvp_arena();
        place(&mut arena, 1, 100.0, 500.0);
        let mut events = Vec::new();
        arena.use_skill(1, AbilityKind::PowerShot, T0, &mut events).unwrap();
        arena.apply_intent(1, PlayerIntent::FireAt(Vec2::RIGHT), T0 + 4_000, &mut events);
        arena.step(T0 + 4_000, &mut events);

        // Past the 5s duration but inside the bullet's lifetime.
        arena.step(T0 + 5_100, &mut events);

        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::SkillDeactivated { player_id: 1, kind: AbilityKind::PowerShot }
        )));
        let bullets = arena.registry().bullets();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].damage, 30);
        assert!(bullets[0].power_shot);
    }
}
