//! Bounded fire-and-forget broadcast.
//!
//! Each target peer gets its own task in a [`JoinSet`]. The number of sends
//! in flight is capped by a semaphore; a dispatch that finds no free permit is
//! dropped rather than queued. Every send runs under a deadline and is never
//! retried. Completed tasks are reaped on the next broadcast, and
//! [`Broadcaster::drain`] / [`Broadcaster::shutdown`] give structured
//! completion at stop time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

use crate::channel::ChannelId;
use crate::peer::Peer;

/// Default cap on concurrently running sends.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 256;

/// Default per-send deadline.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// How a single send ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Failed,
    TimedOut,
}

/// Outcome of a broadcast attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastResult {
    /// Number of peers a send task was spawned for.
    pub dispatched: usize,
    /// Number of peers skipped because the in-flight cap was reached.
    pub dropped: usize,
}

/// Running totals of completed sends.
#[derive(Debug, Default)]
pub struct BroadcastStats {
    sent: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

impl BroadcastStats {
    fn record(&self, outcome: SendOutcome) {
        let counter = match outcome {
            SendOutcome::Sent => &self.sent,
            SendOutcome::Failed => &self.failed,
            SendOutcome::TimedOut => &self.timed_out,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn timed_out(&self) -> u64 {
        self.timed_out.load(Ordering::Relaxed)
    }
}

pub struct Broadcaster {
    permits: Arc<Semaphore>,
    max_in_flight: usize,
    send_timeout: Duration,
    tasks: Mutex<JoinSet<SendOutcome>>,
    stats: Arc<BroadcastStats>,
}

impl Broadcaster {
    pub fn new(max_in_flight: usize, send_timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            send_timeout,
            tasks: Mutex::new(JoinSet::new()),
            stats: Arc::new(BroadcastStats::default()),
        }
    }

    /// Spawn one send per peer. Returns once every task is spawned; sends
    /// complete in the background.
    pub async fn broadcast(
        &self,
        channel: ChannelId,
        message: &[u8],
        peers: &[Arc<dyn Peer>],
    ) -> BroadcastResult {
        let mut result = BroadcastResult::default();
        let mut tasks = self.tasks.lock().await;
        reap(&mut tasks);

        for peer in peers {
            let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
                tracing::debug!(peer = %peer.id(), "send cap reached, dropping gossip send");
                result.dropped += 1;
                continue;
            };
            let peer = Arc::clone(peer);
            let message = message.to_vec();
            let deadline = self.send_timeout;
            let stats = Arc::clone(&self.stats);

            tasks.spawn(async move {
                let _permit = permit;
                let outcome = match tokio::time::timeout(deadline, peer.send(channel, message)).await
                {
                    Ok(Ok(())) => SendOutcome::Sent,
                    Ok(Err(e)) => {
                        tracing::debug!(peer = %peer.id(), error = %e, "gossip send failed");
                        SendOutcome::Failed
                    }
                    Err(_) => {
                        tracing::debug!(peer = %peer.id(), ?deadline, "gossip send timed out");
                        SendOutcome::TimedOut
                    }
                };
                stats.record(outcome);
                outcome
            });
            result.dispatched += 1;
        }

        result
    }

    /// Wait for every send in flight at the time of the call to finish.
    ///
    /// The pending tasks are taken out of the set first, so broadcasts
    /// issued meanwhile are not held up behind slow sends.
    pub async fn drain(&self) {
        let mut tasks = self.take_tasks().await;
        while let Some(joined) = tasks.join_next().await {
            log_join_error(joined);
        }
    }

    /// Abort every in-flight send and wait for the tasks to unwind.
    pub async fn shutdown(&self) {
        let mut tasks = self.take_tasks().await;
        tasks.shutdown().await;
    }

    async fn take_tasks(&self) -> JoinSet<SendOutcome> {
        std::mem::take(&mut *self.tasks.lock().await)
    }

    /// Sends currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.permits.available_permits()
    }

    pub fn stats(&self) -> &BroadcastStats {
        &self.stats
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IN_FLIGHT, DEFAULT_SEND_TIMEOUT)
    }
}

fn reap(tasks: &mut JoinSet<SendOutcome>) {
    while let Some(joined) = tasks.try_join_next() {
        log_join_error(joined);
    }
}

fn log_join_error(joined: Result<SendOutcome, tokio::task::JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::warn!(error = %e, "gossip send task panicked");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
