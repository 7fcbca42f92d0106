//! Wall-clock timer backend.
//!
//! Holds block the calling thread on a condition variable so another
//! thread can cut them short through an [`InterruptHandle`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::MorseError;
use crate::sequencer::Timer;

struct Interrupt {
    pending: Mutex<bool>,
    wake: Condvar,
}

/// Real-time [`Timer`].
pub struct ThreadTimer {
    epoch: Instant,
    interrupt: Arc<Interrupt>,
}

/// Cloneable handle that aborts the hold in progress.
///
/// If no hold is in progress the interrupt stays pending and the next
/// hold fails immediately.
#[derive(Clone)]
pub struct InterruptHandle(Arc<Interrupt>);

impl ThreadTimer {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            interrupt: Arc::new(Interrupt {
                pending: Mutex::new(false),
                wake: Condvar::new(),
            }),
        }
    }

    /// Handle for interrupting holds from another thread.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle(Arc::clone(&self.interrupt))
    }
}

impl Default for ThreadTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for ThreadTimer {
    fn hold(&mut self, duration: Duration) -> Result<(), MorseError> {
        let deadline = Instant::now() + duration;
        let mut pending = self.interrupt.pending.lock();

        loop {
            if std::mem::take(&mut *pending) {
                return Err(MorseError::InterruptedWait);
            }
            // Spurious wakeups loop back and re-check the flag
            if self
                .interrupt
                .wake
                .wait_until(&mut pending, deadline)
                .timed_out()
            {
                return if std::mem::take(&mut *pending) {
                    Err(MorseError::InterruptedWait)
                } else {
                    Ok(())
                };
            }
        }
    }

    fn now_us(&self) -> i64 {
        self.epoch.elapsed().as_micros() as i64
    }
}

impl InterruptHandle {
    /// Abort the current (or next) hold.
    pub fn interrupt(&self) {
        *self.0.pending.lock() = true;
        self.0.wake.notify_all();
    }

    /// Drop a pending interrupt that no hold has observed yet.
    pub fn cancel(&self) {
        *self.0.pending.lock() = false;
    }
}
