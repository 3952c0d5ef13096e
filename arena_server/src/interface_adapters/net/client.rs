use crate::domain::PlayerIntent;
use crate::interface_adapters::protocol::{ClientMessage, ServerMessage};
use crate::interface_adapters::state::{AppState, OutboundEvent};
use crate::use_cases::GameEvent;

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
    EventsClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs before a player_id exists.
        let conn_id = state.conn_ids.next_id();
        let span = info_span!("conn", conn_id, player_id = tracing::field::Empty);
        handle_socket(socket, state).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut ctx = match bootstrap_connection(&mut socket, &state).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::ERROR,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };

    Span::current().record("player_id", ctx.player_id);
    info!(player_id = ctx.player_id, "client connected");

    // Main Client Loop
    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    socket.send(Message::Text(txt.into())).await?;
    Ok(())
}

/// Inbound bookkeeping for one connection.
struct InputGuard {
    invalid_json: u32,
    last_full_log: Instant,
    last_invalid_log: Instant,
    close_frame: Option<CloseFrame>,
}

impl InputGuard {
    fn new() -> Self {
        let now = Instant::now() - LOG_THROTTLE;
        Self {
            invalid_json: 0,
            last_full_log: now,
            last_invalid_log: now,
            close_frame: None,
        }
    }

    fn close_with(&mut self, code: u16, reason: &'static str) -> LoopControl {
        self.close_frame = Some(CloseFrame {
            code,
            reason: reason.into(),
        });
        LoopControl::Disconnect
    }
}

struct ConnCtx {
    player_id: u64,
    input_tx: mpsc::Sender<GameEvent>,
    world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    world_latest_rx: watch::Receiver<Utf8Bytes>,
    event_bytes_rx: broadcast::Receiver<OutboundEvent>,
    shutdown_rx: watch::Receiver<bool>,
    input: InputGuard,
    last_world_lag_log: Instant,
    last_event_lag_log: Instant,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    state: &AppState,
) -> Result<ConnCtx, NetError> {
    // Subscribe before any await so no tick or event is missed.
    let world_bytes_rx = state.world_bytes_tx.subscribe();
    let world_latest_rx = state.world_latest_tx.subscribe();
    let event_bytes_rx = state.event_bytes_tx.subscribe();
    let shutdown_rx = state.shutdown_tx.subscribe();

    let player_id = state.player_ids.next_id();
    let input_tx = state.input_tx.clone();

    // Join first so the first snapshot already holds the player; undo it if the
    // handshake fails.
    input_tx
        .send(GameEvent::Join { player_id })
        .await
        .map_err(|_| NetError::InputClosed)?;

    let identity = ServerMessage::Identity {
        player_id: player_id.to_string(),
    };
    let handshake = async {
        send_message(socket, &identity).await?;
        socket.send(Message::Text(state.map_data.clone())).await?;
        Ok::<(), NetError>(())
    };
    if let Err(e) = handshake.await {
        input_tx
            .send(GameEvent::Leave { player_id })
            .await
            .map_err(|_| NetError::InputClosed)?;
        return Err(e);
    }

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        player_id,
        input_tx,
        world_bytes_rx,
        world_latest_rx,
        event_bytes_rx,
        shutdown_rx,
        input: InputGuard::new(),
        last_world_lag_log: now,
        last_event_lag_log: now,
    })
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

fn process_intent(
    player_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
    intent: PlayerIntent,
    last_full_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    match input_tx.try_send(GameEvent::Intent { player_id, intent }) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_)) => {
            if should_log(last_full_log) {
                warn!(player_id, "input channel full; dropping intent");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_)) => Err(NetError::InputClosed),
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let player_id = ctx.player_id;

    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        input_tx,
        world_bytes_rx,
        world_latest_rx,
        event_bytes_rx,
        shutdown_rx,
        input,
        last_world_lag_log,
        last_event_lag_log,
        ..
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        let control = tokio::select! {
            incoming = socket.recv() => {
                handle_incoming_ws(incoming, player_id, input_tx, input).unwrap_or_else(|e| {
                    fatal = Some(e);
                    LoopControl::Disconnect
                })
            }

            world_msg = world_bytes_rx.recv() => match world_msg {
                Ok(bytes) => forward_bytes(bytes, socket).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    if should_log(last_world_lag_log) {
                        warn!(missed = n, "world updates lagged; sending snapshot");
                    }
                    // Skip the backlog and resync from the latest snapshot.
                    let latest = world_latest_rx.borrow().clone();
                    if latest.is_empty() {
                        LoopControl::Continue
                    } else {
                        forward_bytes(latest, socket).await
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    fatal = Some(NetError::WorldUpdatesClosed);
                    LoopControl::Disconnect
                }
            },

            event_msg = event_bytes_rx.recv() => match event_msg {
                Ok(event) if event.recipient.includes(player_id) => {
                    forward_bytes(event.bytes, socket).await
                }
                Ok(_) => LoopControl::Continue,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Events are transitions; dropped ones are not replayed.
                    if should_log(last_event_lag_log) {
                        warn!(missed = n, "events lagged; dropped");
                    }
                    LoopControl::Continue
                }
                Err(broadcast::error::RecvError::Closed) => {
                    fatal = Some(NetError::EventsClosed);
                    LoopControl::Disconnect
                }
            },

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    input.close_with(close_code::AWAY, "server shutting down")
                } else {
                    LoopControl::Continue
                }
            }
        };

        if let LoopControl::Disconnect = control {
            if let Some(frame) = input.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(player_id, input_tx).await {
        warn!(error = ?e, "error during disconnect cleanup");
        fatal.get_or_insert(e);
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    player_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
    input: &mut InputGuard,
) -> Result<LoopControl, NetError> {
    let msg = match incoming {
        Some(Ok(msg)) => msg,
        Some(Err(e)) => {
            warn!(player_id, error = %e, "websocket recv error");
            return Ok(LoopControl::Disconnect);
        }
        None => {
            info!(player_id, "websocket closed");
            return Ok(LoopControl::Disconnect);
        }
    };

    let text = match msg {
        Message::Text(text) => text,
        Message::Binary(_) => {
            return Ok(input.close_with(close_code::UNSUPPORTED, "binary messages not supported"));
        }
        Message::Ping(_) | Message::Pong(_) => return Ok(LoopControl::Continue),
        Message::Close(_) => return Ok(LoopControl::Disconnect),
    };

    match serde_json::from_str::<ClientMessage>(&text) {
        Ok(message) => match message.into_intent() {
            Some(intent) => process_intent(player_id, input_tx, intent, &mut input.last_full_log),
            None => {
                // Unknown direction or ability name: ignored, not counted.
                if should_log(&mut input.last_invalid_log) {
                    debug!(player_id, "unknown intent value ignored");
                }
                Ok(LoopControl::Continue)
            }
        },
        Err(parse_err) => {
            input.invalid_json += 1;
            if should_log(&mut input.last_invalid_log) {
                warn!(
                    player_id,
                    bytes = text.len(),
                    error = %parse_err,
                    "failed to parse client message"
                );
            }
            if input.invalid_json > MAX_INVALID_JSON {
                return Ok(input.close_with(close_code::POLICY, "too many invalid messages"));
            }
            Ok(LoopControl::Continue)
        }
    }
}

async fn forward_bytes(msg: Utf8Bytes, socket: &mut WebSocket) -> LoopControl {
    match socket.send(Message::Text(msg)).await {
        Ok(()) => LoopControl::Continue,
        Err(err) => {
            warn!(error = ?err, "failed to send message");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(
    player_id: u64,
    input_tx: &mpsc::Sender<GameEvent>,
) -> Result<(), NetError> {
    input_tx
        .send(GameEvent::Leave { player_id })
        .await
        .map_err(|_| NetError::InputClosed)?;
    info!(player_id, "client disconnected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    fn text(s: &str) -> Option<Result<Message, Error>> {
        Some(Ok(Message::Text(Utf8Bytes::from(s.to_string()))))
    }

    #[test]
    fn when_valid_intent_received_then_it_is_queued_for_the_world() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut input = InputGuard::new();

        let control = handle_incoming_ws(
            text(r#"{"type":"move_start","data":"left"}"#),
            7,
            &tx,
            &mut input,
        )
        .unwrap();

        assert!(matches!(control, LoopControl::Continue));
        assert!(matches!(
            rx.try_recv(),
            Ok(GameEvent::Intent {
                player_id: 7,
                intent: PlayerIntent::MoveStart(Direction::Left)
            })
        ));
    }

    #[test]
    fn when_too_many_invalid_messages_then_connection_closes_with_policy() {
        let (tx, _rx) = mpsc::channel(4);
        let mut input = InputGuard::new();

        for _ in 0..MAX_INVALID_JSON {
            let control = handle_incoming_ws(text("not json"), 7, &tx, &mut input).unwrap();
            assert!(matches!(control, LoopControl::Continue));
        }
        let control = handle_incoming_ws(text("not json"), 7, &tx, &mut input).unwrap();

        assert!(matches!(control, LoopControl::Disconnect));
        assert_eq!(input.close_frame.map(|f| f.code), Some(close_code::POLICY));
    }

    #[test]
    fn when_unknown_direction_received_then_it_is_ignored_without_penalty() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut input = InputGuard::new();

        let control = handle_incoming_ws(
            text(r#"{"type":"move_start","data":"sideways"}"#),
            7,
            &tx,
            &mut input,
        )
        .unwrap();

        assert!(matches!(control, LoopControl::Continue));
        assert_eq!(input.invalid_json, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn when_binary_frame_received_then_connection_closes_as_unsupported() {
        let (tx, _rx) = mpsc::channel(4);
        let mut input = InputGuard::new();

        let control = handle_incoming_ws(
            Some(Ok(Message::Binary(vec![1, 2, 3].into()))),
            7,
            &tx,
            &mut input,
        )
        .unwrap();

        assert!(matches!(control, LoopControl::Disconnect));
        assert_eq!(input.close_frame.map(|f| f.code), Some(close_code::UNSUPPORTED));
    }
}
