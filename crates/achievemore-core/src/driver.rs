//! Background drivers for a shared engine.
//!
//! Two cancellable tokio tasks feed the engine its periodic inputs: the
//! reminder sweep and the one-second focus timer tick. Each takes the engine
//! lock only for the duration of one step, so commands from the host
//! interleave with ticks but never overlap them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::Engine;

/// Engine shared between the host and the drivers.
pub type SharedEngine = Arc<Mutex<Engine>>;

/// Wrap an engine for use with the drivers.
pub fn shared(engine: Engine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// A running driver task.
#[derive(Debug)]
pub struct DriverHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl DriverHandle {
    /// Ask the driver to stop after its current step.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the driver to exit.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            debug!(error = %e, "driver task ended abnormally");
        }
    }
}

/// Run the reminder sweep every `interval` until cancelled.
pub fn spawn_reminder_driver(
    engine: SharedEngine,
    interval: Duration,
    cancel: CancellationToken,
) -> DriverHandle {
    let token = cancel.clone();
    let task = tokio::spawn(async move {
        info!(?interval, "reminder driver started");
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("reminder driver cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    let fired = engine.lock().await.tick_reminders();
                    if !fired.is_empty() {
                        debug!(count = fired.len(), "reminders fired");
                    }
                }
            }
        }
    });
    DriverHandle { cancel, task }
}

/// Tick the focus timer every `interval` for the current run.
///
/// The driver binds to the run that is active when it is spawned and exits
/// the moment that run pauses, resets or completes, even mid-sleep. Spawn a
/// new driver after each start. If the timer is not running, the returned
/// handle finishes immediately.
pub async fn spawn_timer_driver(
    engine: SharedEngine,
    interval: Duration,
    cancel: CancellationToken,
) -> DriverHandle {
    let run = engine.lock().await.timer_run();
    let token = cancel.clone();
    let task = tokio::spawn(async move {
        let Some(run) = run else {
            debug!("timer not running, driver not started");
            return;
        };
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("timer driver cancelled");
                    break;
                }
                _ = run.cancelled() => {
                    debug!("timer run ended");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    let mut engine = engine.lock().await;
                    // The run may have ended while this step waited for the lock.
                    if run.is_cancelled() {
                        break;
                    }
                    if let Some(event) = engine.tick_timer() {
                        debug!(?event, "timer driver observed completion");
                    }
                }
            }
        }
    });
    DriverHandle { cancel, task }
}
