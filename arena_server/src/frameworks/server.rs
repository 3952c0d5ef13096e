// Framework bootstrap for the arena server runtime.

use crate::domain::{SystemClock, WorldConfig};
use crate::frameworks::config;
use crate::interface_adapters::net::{
    event_serializer, map_data_bytes, world_update_serializer, ws_handler,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::IdAllocator;
use crate::use_cases::{Arena, game::world_task};

use axum::{Router, extract::ws::Utf8Bytes, routing::get};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::future::Future;
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{Notify, broadcast, mpsc, watch};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves until the process is stopped; used by the binary and integration tests.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_until(listener, WorldConfig::default(), std::future::pending()).await
}

/// Serves with the given world until `signal` resolves, then shuts down gracefully:
/// connections are closed, the world task stops, and the listener is released.
pub async fn run_until(
    listener: tokio::net::TcpListener,
    world: WorldConfig,
    signal: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let address = listener.local_addr()?;
    let (state, world_shutdown) = build_state(world)?;

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state.clone());

    tracing::info!(%address, "listening");

    let shutdown = async move {
        signal.await;
        tracing::info!("shutdown requested");
        // Ask open sockets to close, then stop the simulation.
        let _ = state.shutdown_tx.send(true);
        world_shutdown.notify_one();
    };

    // Serve app and report errors rather than panicking
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::new(config::bind_addr(), config::http_port());
    let world = config::world_config();

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run_until(listener, world, ctrl_c()).await
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
}

/// Wires channels, spawns the world task and serializers, and returns the shared
/// state plus the handle that stops the world task.
fn build_state(world: WorldConfig) -> Result<(Arc<AppState>, Arc<Notify>)> {
    let map_data = map_data_bytes(&world)
        .map_err(|e| std::io::Error::other(format!("failed to serialize map data: {e}")))?;

    // input_tx/rx: All client intents go to the single world task.
    let (input_tx, input_rx) = mpsc::channel(config::INPUT_CHANNEL_CAPACITY);
    // world_tx/events_tx: domain output fanned out to the serializers.
    let (world_tx, _) = broadcast::channel(config::WORLD_BROADCAST_CAPACITY);
    let (events_tx, _) = broadcast::channel(config::EVENT_BROADCAST_CAPACITY);
    // Serialized output shared across all connections.
    let (world_bytes_tx, _) = broadcast::channel(config::WORLD_BROADCAST_CAPACITY);
    let (world_latest_tx, _) = watch::channel(Utf8Bytes::from(""));
    let (event_bytes_tx, _) = broadcast::channel(config::EVENT_BROADCAST_CAPACITY);
    let (shutdown_tx, _) = watch::channel(false);

    let tick_interval = world.tick_interval();
    tracing::info!(
        width = world.width,
        height = world.height,
        tick_rate = world.tick_rate,
        progression = world.progression.enabled,
        "arena configured"
    );

    let state = Arc::new(AppState {
        input_tx,
        world_tx,
        events_tx,
        world_bytes_tx,
        world_latest_tx,
        event_bytes_tx,
        map_data,
        shutdown_tx,
        conn_ids: IdAllocator::new(),
        player_ids: IdAllocator::new(),
    });

    // Serializers subscribe before the world task starts so the first tick is not lost.
    tokio::spawn(world_update_serializer(
        state.world_tx.subscribe(),
        state.world_bytes_tx.clone(),
        state.world_latest_tx.clone(),
    ));
    tokio::spawn(event_serializer(
        state.events_tx.subscribe(),
        state.event_bytes_tx.clone(),
    ));

    let world_shutdown = Arc::new(Notify::new());
    let arena = Arena::new(world, StdRng::from_entropy());
    tokio::spawn(world_task(
        arena,
        SystemClock,
        input_rx,
        state.world_tx.clone(),
        state.events_tx.clone(),
        tick_interval,
        world_shutdown.clone(),
    ));

    Ok((state, world_shutdown))
}
