use crate::domain::WorldConfig;
use std::{env, net::IpAddr};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env_parse("ARENA_SERVER_PORT").unwrap_or(3000)
}

pub fn bind_addr() -> IpAddr {
    env_parse("ARENA_BIND_ADDR").unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

/// Gameplay defaults with the env overrides for world size and tick rate applied.
pub fn world_config() -> WorldConfig {
    let mut cfg = WorldConfig::default();
    if let Some(tick_rate) = env_parse::<u32>("ARENA_TICK_RATE").filter(|rate| *rate > 0) {
        cfg.tick_rate = tick_rate;
    }
    // The play area must stay non-empty after the margin is taken off both sides.
    let min_extent = cfg.margin * 2.0;
    if let Some(width) = world_extent(env_parse("ARENA_WORLD_WIDTH"), min_extent) {
        cfg.width = width;
    }
    if let Some(height) = world_extent(env_parse("ARENA_WORLD_HEIGHT"), min_extent) {
        cfg.height = height;
    }
    cfg
}

/// Largest accepted world width or height. Pickup seeding scales with the area.
pub const MAX_WORLD_EXTENT: f32 = 16_000.0;

fn world_extent(value: Option<f32>, min_extent: f32) -> Option<f32> {
    value
        .filter(|v| v.is_finite() && *v > min_extent)
        .map(|v| v.min(MAX_WORLD_EXTENT))
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;
pub const EVENT_BROADCAST_CAPACITY: usize = 1024;
