use std::time::{SystemTime, UNIX_EPOCH};

// Port for retrieving the current time used by ability, fire-rate and lifetime checks.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall clock in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
