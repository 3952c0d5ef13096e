use super::arena::Arena;
use super::types::{GameEvent, WorldUpdate};
use crate::domain::{ArenaEvent, Clock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// The single owner of the arena. Intents are applied as they arrive (never
/// mid-step); every tick drains what is left, steps, then publishes the
/// snapshot followed by that tick's events.
pub async fn world_task<C: Clock>(
    mut arena: Arena,
    clock: C,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    events_tx: broadcast::Sender<ArenaEvent>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);
    // A slow tick must not trigger a burst of catch-up ticks.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut events: Vec<ArenaEvent> = Vec::new();
    info!(
        tick_ms = tick_interval.as_millis() as u64,
        pickups = arena.registry().pickups().len(),
        "world task started"
    );

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(tick = arena.tick(), "world task shutting down");
                break;
            }
            maybe_event = input_rx.recv() => {
                let Some(event) = maybe_event else {
                    warn!("input channel closed; world task exiting");
                    break;
                };
                arena.handle(event, clock.now_millis(), &mut events);
                publish_events(&events_tx, &mut events);
            }
            _ = interval.tick() => {
                let started = Instant::now();
                let now = clock.now_millis();

                // Anything that raced the timer still lands before the step.
                while let Ok(event) = input_rx.try_recv() {
                    arena.handle(event, now, &mut events);
                }

                arena.step(now, &mut events);
                // No subscribers is fine; the serializer may not be up yet.
                let _ = world_tx.send(arena.snapshot(now));
                publish_events(&events_tx, &mut events);

                let elapsed = started.elapsed();
                if elapsed > tick_interval {
                    warn!(
                        tick = arena.tick(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        budget_ms = tick_interval.as_millis() as u64,
                        "tick overran its budget"
                    );
                }
            }
        }
    }
}

fn publish_events(events_tx: &broadcast::Sender<ArenaEvent>, events: &mut Vec<ArenaEvent>) {
    for event in events.drain(..) {
        if events_tx.send(event).is_err() {
            debug!("no event subscribers; dropping event");
        }
    }
}
