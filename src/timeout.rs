//! Cancelable deferred timers for the command session
//!
//! Each manager owns at most one scheduled fire at a time. Fires are
//! delivered into the controller's own event loop rather than invoked from
//! the timer task, keeping all state mutation on one logical thread. A
//! generation counter lets the controller discard a fire that raced with a
//! `reset()` or `cancel()`.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What a fired timer asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Idle timeout while in command mode
    Idle,
    /// Post-termination grace delay before returning to wake listening
    Grace,
}

#[derive(Debug, Clone, Copy)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

/// Single cancelable deferred timer. `reset()` cancels any pending fire and
/// reschedules; `cancel()` clears unconditionally and is safe to call when
/// nothing is scheduled.
pub struct CommandTimeoutManager {
    kind: TimerKind,
    timeout: Duration,
    tx: mpsc::UnboundedSender<TimerFired>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl CommandTimeoutManager {
    pub fn new(kind: TimerKind, timeout: Duration, tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            kind,
            timeout,
            tx,
            handle: None,
            generation: 0,
        }
    }

    /// Cancel any pending fire and schedule a fresh one after the timeout
    pub fn reset(&mut self) {
        self.cancel();
        self.generation += 1;

        let fired = TimerFired {
            kind: self.kind,
            generation: self.generation,
        };
        let tx = self.tx.clone();
        let timeout = self.timeout;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = tx.send(fired);
        }));
    }

    /// Clear the pending fire, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        // A task that already sent its message is beyond aborting; bumping
        // the generation marks that message stale.
        self.generation += 1;
    }

    /// True only for the most recently scheduled fire
    pub fn is_current(&self, fired: &TimerFired) -> bool {
        fired.kind == self.kind && fired.generation == self.generation
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CommandTimeoutManager {
    fn drop(&mut self) {
        self.cancel();
    }
}
