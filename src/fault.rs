//! Fault state for the write path.
//!
//! A failed write stops at the first error and leaves whatever it already
//! keyed in place. The fault state records why, so the collaborator layer
//! (or a diagnostics console) can report it after the call returns.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::error::MorseError;

/// Fault codes indicating why the last write stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// A non-letter reached the code table. Segmenter defect.
    InvalidLetter = 1,

    /// Transcript queue full: nobody is reading the transcript.
    QueueFull = 2,

    /// A hold was interrupted mid-write.
    InterruptedWait = 3,

    /// Signal backend error.
    SignalFault = 4,

    /// A setting outside its accepted range.
    OutOfRange = 5,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::InvalidLetter,
            2 => FaultCode::QueueFull,
            3 => FaultCode::InterruptedWait,
            4 => FaultCode::SignalFault,
            5 => FaultCode::OutOfRange,
            _ => FaultCode::None,
        }
    }
}

impl From<MorseError> for FaultCode {
    fn from(err: MorseError) -> Self {
        match err {
            MorseError::InvalidLetter(_) => FaultCode::InvalidLetter,
            MorseError::QueueFull => FaultCode::QueueFull,
            MorseError::InterruptedWait => FaultCode::InterruptedWait,
            MorseError::SignalFault => FaultCode::SignalFault,
            MorseError::OutOfRange => FaultCode::OutOfRange,
        }
    }
}

/// Thread-safe fault state.
///
/// # Usage
///
/// ```ignore
/// match device.write(text) {
///     Ok(_) => {}
///     Err(_) => {
///         let fault = device.fault();
///         report(fault.code, fault.data);
///     }
/// }
/// ```
pub struct FaultState {
    /// True if the most recent write failed.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Letters fully keyed before the failure.
    data: AtomicU32,

    /// Total fault count since creation (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Set fault state.
    ///
    /// Increments the fault counter.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (letters keyed before the failure).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear fault state (after a successful write).
    ///
    /// Note: This clears the active flag but does NOT reset the counter.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
