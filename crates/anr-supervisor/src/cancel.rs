//! Cooperative cancellation for the worker thread.
//!
//! Every suspension point of the supervision loop is a bounded sleep on a
//! [`CancellationToken`], so cancelling the token wakes the worker right away
//! instead of waiting for the current sleep to run out.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Returned by [`CancellationToken::sleep`] when the token was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Shared cancellation flag with a cancellable sleep.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token and wake every sleeper. Idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self.inner.cancelled.lock();
        *cancelled = true;
        self.inner.wake.notify_all();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Sleep for `duration` unless the token is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the token was cancelled before or during the sleep.
    pub fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        let deadline = Instant::now().checked_add(duration);
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            match deadline {
                Some(deadline) => {
                    if self.inner.wake.wait_until(&mut cancelled, deadline).timed_out() {
                        break;
                    }
                }
                None => self.inner.wake.wait(&mut cancelled),
            }
        }
        if *cancelled { Err(Cancelled) } else { Ok(()) }
    }

    /// Return [`Cancelled`] if the token has been cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the token was cancelled.
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() { Err(Cancelled) } else { Ok(()) }
    }
}
