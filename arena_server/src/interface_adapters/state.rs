use crate::domain::ArenaEvent;
use crate::interface_adapters::utils::ids::IdAllocator;
use crate::use_cases::{GameEvent, Recipient, WorldUpdate};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::{broadcast, mpsc, watch};

/// A serialized event together with the connections it is meant for.
#[derive(Debug, Clone)]
pub struct OutboundEvent {
    pub recipient: Recipient,
    pub bytes: Utf8Bytes,
}

pub struct AppState {
    // Intents flowing from the network into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Snapshots produced by the world task (domain structs).
    pub world_tx: broadcast::Sender<WorldUpdate>,
    // Per-tick events produced by the world task (domain structs).
    pub events_tx: broadcast::Sender<ArenaEvent>,
    // Serialized snapshots, shared across all connections.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized snapshot for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // Serialized events with their routing.
    pub event_bytes_tx: broadcast::Sender<OutboundEvent>,
    // `map_data` never changes, so it is serialized once at startup.
    pub map_data: Utf8Bytes,
    // Flips to true when the server starts shutting down.
    pub shutdown_tx: watch::Sender<bool>,
    pub conn_ids: IdAllocator,
    pub player_ids: IdAllocator,
}
