//! Background poller that notices writes to the shared state file.
//!
//! The watcher only reads the store's modification time and sends events; it never
//! touches UI state. The UI thread drains the channel and repaints itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime};

use crate::store::SharedGridStore;

/// Events handed from the watcher thread to the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// The stored grid was written after the last observed write.
    StateChanged,
}

pub struct StateWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StateWatcher {
    /// Start polling `store` every `interval`.
    pub fn spawn(
        store: SharedGridStore,
        interval: Duration,
        events: Sender<DisplayEvent>,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name("state-watcher".to_string())
            .spawn(move || poll_loop(store, interval, events, flag))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                tracing::error!("State watcher thread panicked");
            }
        }
    }
}

impl Drop for StateWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop(
    store: SharedGridStore,
    interval: Duration,
    events: Sender<DisplayEvent>,
    stop: Arc<AtomicBool>,
) {
    let mut last_seen = store.modified();
    tracing::debug!(?interval, "State watcher started");

    while !stop.load(Ordering::SeqCst) {
        let current = store.modified();
        if is_newer(current, last_seen) {
            last_seen = current;
            tracing::debug!("Detected state file update");
            if events.send(DisplayEvent::StateChanged).is_err() {
                // UI side is gone
                break;
            }
        }
        std::thread::park_timeout(interval);
    }

    tracing::debug!("State watcher stopped");
}

fn is_newer(current: Option<SystemTime>, last_seen: Option<SystemTime>) -> bool {
    match (current, last_seen) {
        (Some(current), Some(last)) => current > last,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
