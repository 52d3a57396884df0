//! Per-hook polling loop.
//!
//! One background task per monitored hook: resolve the pointer chain,
//! read and decode the value, notify on change, sleep, repeat. Transient
//! read failures are logged and retried at the same cadence; only the
//! running flag stops the loop.

use super::commands::MemoryEvent;
use crate::core::types::{Address, DataType, MemoryValue};
use crate::memory::resolver;
use crate::os::ProcessMemory;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tracing::warn;

/// Handle to a running monitor loop
pub struct MonitorHandle {
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the loop and wait for it to exit, bounded by `timeout`.
    ///
    /// Cancellation is cooperative: the flag is checked once per
    /// iteration, so a stop can observe up to one in-flight read plus
    /// the wake-up latency. A loop that fails to exit within the timeout
    /// is abandoned (and logged) rather than blocked on forever.
    pub async fn stop(self, timeout: Duration) {
        self.running.store(false, Ordering::Release);
        self.wake.notify_one();

        if tokio::time::timeout(timeout, self.task).await.is_err() {
            warn!("monitor loop did not exit within {:?}, abandoning task", timeout);
        }
    }
}

/// Spawn a polling task for one hook
pub fn spawn(
    hook_id: String,
    memory: Arc<dyn ProcessMemory>,
    base_address: Address,
    offsets: Vec<i64>,
    data_type: DataType,
    interval: Duration,
    events: mpsc::UnboundedSender<MemoryEvent>,
) -> MonitorHandle {
    let running = Arc::new(AtomicBool::new(true));
    let wake = Arc::new(Notify::new());

    let task = tokio::spawn(poll_loop(
        hook_id,
        memory,
        base_address,
        offsets,
        data_type,
        interval,
        events,
        Arc::clone(&running),
        Arc::clone(&wake),
    ));

    MonitorHandle {
        running,
        wake,
        task,
    }
}

#[allow(clippy::too_many_arguments)]
async fn poll_loop(
    hook_id: String,
    memory: Arc<dyn ProcessMemory>,
    base_address: Address,
    offsets: Vec<i64>,
    data_type: DataType,
    interval: Duration,
    events: mpsc::UnboundedSender<MemoryEvent>,
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
) {
    let mut last: Option<MemoryValue> = None;

    while running.load(Ordering::Acquire) {
        // The chain is re-resolved on every poll; see resolver docs.
        match resolver::read_value(memory.as_ref(), base_address, &offsets, data_type) {
            Ok(value) => {
                if last.as_ref() != Some(&value) {
                    last = Some(value.clone());
                    let event = MemoryEvent {
                        hook_id: hook_id.clone(),
                        value,
                    };
                    if events.send(event).is_err() {
                        // Subscriber side is gone, nothing left to notify.
                        break;
                    }
                }
            }
            Err(e) => {
                warn!(hook = %hook_id, error = %e, "memory read failed, retrying");
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = wake.notified() => {}
        }
    }
}
