//! Transcript queue.
//!
//! Bounded byte FIFO holding the dot/dash rendering of everything keyed,
//! until a reader drains it.
//!
//! # Rules
//!
//! - `push` never overwrites: a full queue is an error
//! - `drain` on an empty queue returns nothing, not an error
//! - Capacity is fixed at construction and must be a power of 2
//! - Pushers are serialized among themselves, drainers among themselves;
//!   a push and a drain never wait for each other

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::MorseError;

/// Default transcript capacity in bytes.
pub const TRANSCRIPT_CAPACITY: usize = 512;

/// Bounded FIFO of transcript bytes.
///
/// # Safety
///
/// Slots live in an `UnsafeCell`. Sharing is sound because:
/// - `push` holds the producer lock, so one slot writer at a time
/// - `drain_into` holds the consumer lock, so one slot reader at a time
/// - A slot is only written while it lies outside `[read, write)`
///   and only read while it lies inside it
///
/// # Memory Ordering
///
/// - Producer publishes with `Release` on `write_idx`
/// - Consumer releases slots with `Release` on `read_idx`
/// - Each side `Acquire`s the other side's index
pub struct TranscriptQueue<const N: usize = TRANSCRIPT_CAPACITY> {
    slots: UnsafeCell<[u8; N]>,
    write_idx: AtomicUsize,
    read_idx: AtomicUsize,
    producer: Mutex<()>,
    consumer: Mutex<()>,
}

// SAFETY: slot access is confined to the lock holders described above.
unsafe impl<const N: usize> Sync for TranscriptQueue<N> {}
unsafe impl<const N: usize> Send for TranscriptQueue<N> {}

impl<const N: usize> TranscriptQueue<N> {
    /// Mask for wrapping index to buffer size.
    const MASK: usize = N - 1;

    /// Create new empty queue
    pub const fn new() -> Self {
        // Compile-time check that N is power of 2
        const { assert!(N.is_power_of_two(), "Transcript size must be power of 2") };

        Self {
            slots: UnsafeCell::new([0u8; N]),
            write_idx: AtomicUsize::new(0),
            read_idx: AtomicUsize::new(0),
            producer: Mutex::new(()),
            consumer: Mutex::new(()),
        }
    }

    /// Append one byte.
    ///
    /// # Errors
    ///
    /// [`MorseError::QueueFull`] if `N` bytes are already waiting.
    #[inline]
    pub fn push(&self, byte: u8) -> Result<(), MorseError> {
        let _producer = self.producer.lock();
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N {
            return Err(MorseError::QueueFull);
        }

        // SAFETY: Producer lock held; slot is outside the readable window
        unsafe {
            self.slots.get().cast::<u8>().add(write & Self::MASK).write(byte);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Append bytes in order, stopping at the first failure.
    ///
    /// Bytes pushed before the failure stay queued.
    #[inline]
    pub fn push_all(&self, bytes: &[u8]) -> Result<(), MorseError> {
        bytes.iter().try_for_each(|&b| self.push(b))
    }

    /// Move up to `out.len()` bytes into `out`, oldest first.
    ///
    /// Returns the number of bytes written. Zero means nothing is ready.
    #[inline]
    pub fn drain_into(&self, out: &mut [u8]) -> usize {
        let _consumer = self.consumer.lock();
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        let count = write.wrapping_sub(read).min(out.len());
        for (i, dst) in out[..count].iter_mut().enumerate() {
            // SAFETY: Consumer lock held; slot is inside the readable window
            *dst = unsafe {
                self.slots
                    .get()
                    .cast::<u8>()
                    .add(read.wrapping_add(i) & Self::MASK)
                    .read()
            };
        }

        self.read_idx.store(read.wrapping_add(count), Ordering::Release);
        count
    }

    /// Remove and return up to `max` bytes, oldest first.
    pub fn drain(&self, max: usize) -> Vec<u8> {
        let mut out = vec![0u8; max.min(self.len())];
        let count = self.drain_into(&mut out);
        out.truncate(count);
        out
    }

    /// Number of bytes waiting.
    ///
    /// Safe to call from any thread. `read_idx` is loaded first: both
    /// indices only grow, so the later `write_idx` can never be behind it.
    /// A push/drain pair landing between the loads can still make the
    /// difference overshoot, hence the clamp.
    #[inline]
    pub fn len(&self) -> usize {
        let read = self.read_idx.load(Ordering::Acquire);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read).min(N)
    }

    /// Check if nothing is waiting
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free space in bytes.
    #[inline]
    pub fn available(&self) -> usize {
        N - self.len()
    }

    /// Get the buffer capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for TranscriptQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
