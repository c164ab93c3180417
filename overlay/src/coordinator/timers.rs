use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;

use super::command::Command;

/// At most one pending timer of a given kind.
///
/// Firing sends a command back to the coordinator. The timer only holds a
/// weak sender, so a pending timer never keeps a stopped coordinator alive.
#[derive(Debug)]
pub(crate) struct TimerSlot {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    /// Cancel any pending timer, then schedule `command` after `delay`.
    pub fn arm(&mut self, delay: Duration, tx: WeakUnboundedSender<Command>, command: Command) {
        self.cancel();
        tracing::trace!(timer = self.name, delay_ms = delay.as_millis() as u64, "Timer armed");
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(command);
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::trace!(timer = self.name, "Timer cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
