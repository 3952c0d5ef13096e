// Entity Registry: the single owner of players, bullets and pickups.

use crate::domain::state::{
    Bullet, BulletId, BulletSnapshot, Pickup, PickupId, PickupSnapshot, Player, PlayerId,
    PlayerSnapshot,
};
use crate::domain::tuning::WorldConfig;
use crate::domain::vec2::Vec2;
use rand::Rng;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct EntityRegistry {
    pub(crate) players: BTreeMap<PlayerId, Player>,
    pub(crate) bullets: Vec<Bullet>,
    pub(crate) pickups: Vec<Pickup>,
    next_bullet_id: BulletId,
    next_pickup_id: PickupId,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            next_bullet_id: 1,
            next_pickup_id: 1,
            ..Default::default()
        }
    }

    /// Creates a player at a random valid spawn point. Returns false if the id is taken.
    pub fn add_player<R: Rng>(&mut self, id: PlayerId, cfg: &WorldConfig, rng: &mut R) -> bool {
        if self.players.contains_key(&id) {
            return false;
        }
        let position = random_point(rng, cfg.play_min(), cfg.play_max());
        self.players.insert(id, Player::spawn(id, position, cfg));
        true
    }

    /// Removes the player. In-flight bullets it fired keep flying.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.values_mut()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut Vec<Bullet> {
        &mut self.bullets
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn next_bullet_id(&mut self) -> BulletId {
        let id = self.next_bullet_id;
        self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
        id
    }

    pub fn spawn_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    /// Places one pickup uniformly inside the pickup area.
    pub fn spawn_pickup<R: Rng>(&mut self, cfg: &WorldConfig, rng: &mut R) {
        let inset = cfg.progression.pickup_edge_inset;
        let min = Vec2::new(inset, inset);
        let max = Vec2::new(cfg.width - inset, cfg.height - inset);
        let id = self.next_pickup_id;
        self.next_pickup_id = self.next_pickup_id.wrapping_add(1);
        self.pickups.push(Pickup {
            id,
            position: random_point(rng, min, max),
            value: cfg.progression.pickup_value,
        });
    }

    /// Fills the world with the configured number of pickups.
    pub fn seed_pickups<R: Rng>(&mut self, cfg: &WorldConfig, rng: &mut R) {
        let target = cfg.progression.pickup_count(cfg.width, cfg.height);
        while self.pickups.len() < target {
            self.spawn_pickup(cfg, rng);
        }
    }

    pub fn player_snapshots(&self) -> Vec<PlayerSnapshot> {
        self.players.values().map(PlayerSnapshot::from).collect()
    }

    pub fn bullet_snapshots(&self) -> Vec<BulletSnapshot> {
        self.bullets.iter().map(BulletSnapshot::from).collect()
    }

    pub fn pickup_snapshots(&self) -> Vec<PickupSnapshot> {
        self.pickups.iter().map(PickupSnapshot::from).collect()
    }
}

/// Uniform point in `[min, max]` on both axes; degenerate ranges collapse to `min`.
pub fn random_point<R: Rng>(rng: &mut R, min: Vec2, max: Vec2) -> Vec2 {
    let x = if max.x > min.x {
        rng.gen_range(min.x..=max.x)
    } else {
        min.x
    };
    let y = if max.y > min.y {
        rng.gen_range(min.y..=max.y)
    } else {
        min.y
    };
    Vec2::new(x, y)
}
