use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How often the dispatch job scans the store for due reminders.
    /// The due check compares wall-clock time at tick time, so a larger
    /// interval only delays dispatch, it never skips a reminder.
    pub scheduler_tick_interval_secs: u64,
    /// Upper bound for a single telephony call. A call that has neither
    /// succeeded nor failed within this duration is recorded as failed.
    pub call_timeout_secs: u64,
    /// Maximum number of in-flight calls per scheduler tick
    pub dispatch_concurrency: usize,
    /// Age after which a reminder stuck in `dispatching` is handed back to
    /// the scheduler by the recovery sweep
    pub dispatching_requeue_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            port: env_or("PORT", 5000),
            scheduler_tick_interval_secs: env_or("SCHEDULER_TICK_INTERVAL_SECS", 30),
            call_timeout_secs: env_or("CALL_TIMEOUT_SECS", 30),
            dispatch_concurrency: env_or("DISPATCH_CONCURRENCY", 5),
            dispatching_requeue_secs: env_or("DISPATCHING_REQUEUE_SECS", 300),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn env_or<T: FromStr + Display + Copy>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    var, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}
