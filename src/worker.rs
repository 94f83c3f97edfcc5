//! Periodic display updates on a background thread.
//!
//! The worker owns the [`SignController`] and thereby the sink, so all writes
//! are serialized. It stops when its [`CancellationToken`] is cancelled, and
//! returns the controller when joined.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::compose::DisplayIntent;
use crate::sink::{ByteSink, Error, SignController};

/// Cooperative stop signal, shared between the worker and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation, waking anyone blocked in [`wait_timeout`](Self::wait_timeout).
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(|e| e.into_inner()) = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep for `timeout` or until cancelled. Returns true if cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut cancelled = lock.lock().unwrap_or_else(|e| e.into_inner());
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            cancelled = cvar
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }
        *cancelled
    }
}

/// Handle to a running periodic worker.
#[derive(Debug)]
pub struct PeriodicWorker<S> {
    token: CancellationToken,
    handle: JoinHandle<Result<SignController<S>, Error>>,
}

impl<S> PeriodicWorker<S>
where
    S: ByteSink + Send + 'static,
{
    /// Start calling `next_intent` every `interval`, sending each intent it
    /// returns. `None` skips the tick. The first tick runs immediately.
    ///
    /// A send error stops the worker, and is returned by [`join`](Self::join).
    pub fn spawn<F>(
        mut controller: SignController<S>,
        interval: Duration,
        token: CancellationToken,
        mut next_intent: F,
    ) -> Self
    where
        F: FnMut() -> Option<DisplayIntent> + Send + 'static,
    {
        let worker_token = token.clone();
        let handle = thread::spawn(move || {
            info!("Display worker started, interval {:?}", interval);
            while !worker_token.is_cancelled() {
                if let Some(intent) = next_intent() {
                    if let Err(e) = controller.show(&intent) {
                        warn!("Display worker stopping: {}", e);
                        return Err(e);
                    }
                }
                if worker_token.wait_timeout(interval) {
                    break;
                }
            }
            info!("Display worker stopped");
            Ok(controller)
        });
        Self { token, handle }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the worker and wait for it, returning the controller.
    pub fn stop(self) -> thread::Result<Result<SignController<S>, Error>> {
        self.token.cancel();
        self.join()
    }

    /// Wait for the worker to finish without cancelling it.
    pub fn join(self) -> thread::Result<Result<SignController<S>, Error>> {
        self.handle.join()
    }
}
