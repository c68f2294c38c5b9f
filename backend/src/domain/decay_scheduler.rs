//! Recurring hunger decay for active user sessions.
//!
//! Each session owns one [`DecaySubscription`]. The subscription's task
//! calls [`PetCareCommand::decay`] once per interval and forwards the
//! outcome to the session. Cancellation is observed between ticks only:
//! an in-flight tick always completes and no later tick starts.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::domain::UserId;
use crate::domain::ports::{DecayRequest, DecayResponse, PetCareCommand};

/// Scheduler tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecaySchedulerConfig {
    /// Time between ticks; the first tick fires one interval after start.
    pub interval: Duration,
    /// Outcomes buffered for a slow session before new ones are dropped.
    pub buffer: usize,
}

impl DecaySchedulerConfig {
    const MIN_INTERVAL: Duration = Duration::from_millis(1);

    fn effective_interval(&self) -> Duration {
        self.interval.max(Self::MIN_INTERVAL)
    }
}

impl Default for DecaySchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            buffer: 8,
        }
    }
}

/// Spawns per-session decay tasks.
#[derive(Clone)]
pub struct DecayScheduler {
    command: Arc<dyn PetCareCommand>,
    config: DecaySchedulerConfig,
}

impl DecayScheduler {
    pub fn new(command: Arc<dyn PetCareCommand>, config: DecaySchedulerConfig) -> Self {
        Self { command, config }
    }

    #[must_use]
    pub fn config(&self) -> DecaySchedulerConfig {
        self.config
    }

    /// Start ticking for `user_id`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(&self, user_id: UserId) -> DecaySubscription {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (updates_tx, updates_rx) = mpsc::channel(self.config.buffer.max(1));
        let task = tokio::spawn(run_ticks(
            Arc::clone(&self.command),
            user_id,
            self.config.effective_interval(),
            cancel_rx,
            updates_tx,
        ));
        debug!(%user_id, "decay subscription started");
        DecaySubscription {
            user_id,
            cancel: cancel_tx,
            task: Some(task),
            updates: updates_rx,
        }
    }
}

async fn run_ticks(
    command: Arc<dyn PetCareCommand>,
    user_id: UserId,
    interval: Duration,
    mut cancel: watch::Receiver<bool>,
    updates: mpsc::Sender<DecayResponse>,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        match command.decay(DecayRequest { user_id }).await {
            Ok(outcome) => {
                if updates.try_send(outcome).is_err() {
                    debug!(%user_id, "decay update dropped; session not keeping up");
                }
            }
            Err(error) => {
                warn!(%user_id, code = ?error.code(), error = %error, "decay tick failed; retrying next tick");
            }
        }
    }
    debug!(%user_id, "decay subscription stopped");
}

/// Handle to one session's decay task.
///
/// Dropping the handle cancels the task without waiting for it.
#[derive(Debug)]
pub struct DecaySubscription {
    user_id: UserId,
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    updates: mpsc::Receiver<DecayResponse>,
}

impl DecaySubscription {
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Next tick outcome. Returns `None` once the task has stopped.
    pub async fn next_update(&mut self) -> Option<DecayResponse> {
        self.updates.recv().await
    }

    /// Stop ticking and wait for an in-flight tick to finish.
    pub async fn cancel(mut self) {
        self.cancel.send_replace(true);
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(error) = task.await {
            warn!(user_id = %self.user_id, %error, "decay task ended abnormally");
        }
    }
}

impl Drop for DecaySubscription {
    fn drop(&mut self) {
        self.cancel.send_replace(true);
    }
}
