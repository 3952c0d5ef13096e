use crate::domain::{ArenaEvent, WorldConfig};
use crate::interface_adapters::protocol::{GameStateDto, MapDataDto, ServerMessage};
use crate::interface_adapters::state::OutboundEvent;
use crate::use_cases::{WorldUpdate, route};

use axum::extract::ws::Utf8Bytes;
use tokio::sync::{broadcast, watch};
use tracing::{error, warn};

pub fn map_data_bytes(cfg: &WorldConfig) -> Result<Utf8Bytes, serde_json::Error> {
    let msg = ServerMessage::MapData(MapDataDto::from(cfg));
    serde_json::to_string(&msg).map(Utf8Bytes::from)
}

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each snapshot once and broadcast the shared bytes.
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::GameState(GameStateDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize game state");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Store the latest bytes for lag recovery.
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn event_serializer(
    mut events_rx: broadcast::Receiver<ArenaEvent>,
    event_bytes_tx: broadcast::Sender<OutboundEvent>,
) {
    loop {
        match events_rx.recv().await {
            Ok(event) => {
                let recipient = route(&event);
                let msg = ServerMessage::from(event);
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize event");
                        continue;
                    }
                };
                let _ = event_bytes_tx.send(OutboundEvent {
                    recipient,
                    bytes: Utf8Bytes::from(txt),
                });
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                // Events are transitions; a dropped one is not resent.
                warn!(missed = n, "event serializer lagged; events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("events channel closed; serializer exiting");
                break;
            }
        }
    }
}
