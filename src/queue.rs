//! Serialized action queue.
//!
//! Terminal writes and cursor positioning are not safely interleavable
//! across threads, so every stateful call is routed through a single
//! dedicated worker thread that drains actions strictly in submission
//! order. Serializing here also guarantees a "show items" submitted before
//! a status update is drawn before it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Pending actions allowed before `submit` blocks the producer.
///
/// Draws are cheap, so depth stays near zero in practice; the bound exists
/// to apply backpressure instead of growing without limit.
pub const QUEUE_CAPACITY: usize = 20;

enum Msg<T> {
    Action(T),
    Stop,
}

/// Bounded single-consumer queue with exactly one worker thread.
pub struct ActionQueue<T> {
    tx: SyncSender<Msg<T>>,
    worker: Option<JoinHandle<()>>,
    stopped: Arc<AtomicBool>,
}

impl<T: Send + 'static> ActionQueue<T> {
    /// Spawn the worker and start draining.
    ///
    /// `handler` runs on the worker thread for every submitted action, in
    /// FIFO order. A panicking action is logged and skipped; the worker
    /// keeps going with the next one.
    pub fn start<F>(mut handler: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(QUEUE_CAPACITY);
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopped);
        let spawned = thread::Builder::new()
            .name("statusgrid-worker".into())
            .spawn(move || {
                while let Ok(msg) = rx.recv() {
                    match msg {
                        Msg::Action(action) => {
                            let outcome =
                                panic::catch_unwind(AssertUnwindSafe(|| handler(action)));
                            if outcome.is_err() {
                                tracing::error!("dashboard action panicked; worker continues");
                            }
                        }
                        Msg::Stop => break,
                    }
                }
                flag.store(true, Ordering::SeqCst);
            });
        let worker = match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::error!(%err, "failed to spawn dashboard worker");
                stopped.store(true, Ordering::SeqCst);
                None
            }
        };
        Self {
            tx,
            worker,
            stopped,
        }
    }

    /// Enqueue an action, blocking while the queue is full.
    ///
    /// Once the queue has stopped or the worker has exited this becomes a
    /// silent no-op, so late producers never hang.
    pub fn submit(&self, action: T) {
        if self.stopped.load(Ordering::SeqCst) {
            return;
        }
        // A send error means the worker is gone; same as stopped.
        let _ = self.tx.send(Msg::Action(action));
    }

    /// Whether the worker has exited.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Enqueue the stop sentinel and wait for the worker to exit.
    ///
    /// Every action submitted before this call executes first; nothing
    /// submitted after it runs at all.
    pub fn stop(&mut self) {
        let _ = self.tx.send(Msg::Stop);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::error!("dashboard worker terminated abnormally");
            }
        }
        self.stopped.store(true, Ordering::SeqCst);
    }
}

impl<T> Drop for ActionQueue<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = self.tx.send(Msg::Stop);
            let _ = handle.join();
        }
    }
}
