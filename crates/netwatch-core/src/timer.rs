// ── Refresh timer ──
//
// A cancellable fixed-period ticker feeding the controller's run loop.
// Ticks are tagged with the epoch of the run that produced them, so a
// tick queued just before `stop()` is recognisably stale afterwards.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One firing of the refresh timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTick {
    pub epoch: u64,
}

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owner of the background tick task.
///
/// At most one tick task exists at a time: `start()` on a running timer
/// is a no-op, as is `stop()` on a stopped one.
pub struct RefreshTimer {
    period: Duration,
    tx: mpsc::UnboundedSender<RefreshTick>,
    epoch: u64,
    running: Option<Running>,
}

impl RefreshTimer {
    /// Create a stopped timer and the receiver its ticks arrive on.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<RefreshTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = Self {
            period,
            tx,
            epoch: 0,
            running: None,
        };
        (timer, rx)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Epoch of the current (or most recent) run.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start ticking. The first tick fires one full period from now.
    ///
    /// Returns `false` if the timer was already running or the period is
    /// zero (background refresh disabled).
    pub fn start(&mut self) -> bool {
        if self.running.is_some() {
            return false;
        }
        if self.period.is_zero() {
            warn!("refresh interval is zero, background refresh disabled");
            return false;
        }

        self.epoch += 1;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(tick_task(
            self.period,
            self.epoch,
            self.tx.clone(),
            cancel.clone(),
        ));
        debug!(epoch = self.epoch, period = ?self.period, "refresh timer started");
        self.running = Some(Running { cancel, handle });
        true
    }

    /// Stop ticking. Returns `false` if the timer was not running.
    pub fn stop(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };
        running.cancel.cancel();
        running.handle.abort();
        debug!(epoch = self.epoch, "refresh timer stopped");
        true
    }

    /// Whether `tick` belongs to the run that is currently active.
    pub fn is_current(&self, tick: RefreshTick) -> bool {
        self.running.is_some() && tick.epoch == self.epoch
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick_task(
    period: Duration,
    epoch: u64,
    tx: mpsc::UnboundedSender<RefreshTick>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if tx.send(RefreshTick { epoch }).is_err() {
                    break;
                }
            }
        }
    }
}
