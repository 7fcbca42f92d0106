//! Device log ring.
//!
//! The write path records what it did (ready, config retunes, write
//! summaries, failures) without allocating and without waiting on the
//! log reader. Entries sit in a fixed ring until
//! [`log_sink::drain_to`](crate::log_sink::drain_to) ships them out.
//! When the ring is full new entries are counted and discarded.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

/// Longest message kept; the rest is cut.
pub const MAX_MSG_LEN: usize = 120;

/// Entries per device log.
pub const LOG_BUFFER_SIZE: usize = 64;

/// Severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// One log record, stored inline.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timer reading when the entry was made.
    pub timestamp_us: i64,
    pub level: LogLevel,
    /// Used prefix of `msg`.
    pub len: u8,
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const BLANK: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Debug,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text. A cut that split a UTF-8 sequence drops the partial char.
    pub fn text(&self) -> &str {
        let bytes = &self.msg[..self.len as usize];
        core::str::from_utf8(bytes).unwrap_or_else(|e| {
            core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default()
        })
    }
}

impl core::fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp_us, self.level.as_str(), self.text())
    }
}

/// Fixed ring of [`LogEntry`].
///
/// Writers and readers each take their own lock, so a slow reader never
/// holds up a write in progress and two readers never see the same entry.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    ring: UnsafeCell<[LogEntry; N]>,
    head: AtomicU32,
    tail: AtomicU32,
    lost: AtomicU32,
    writer: Mutex<()>,
    reader: Mutex<()>,
}

// SAFETY: a slot is written only by the `writer` lock holder while it is
// outside [tail, head), and read only by the `reader` lock holder while
// it is inside.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    pub const fn new() -> Self {
        const { assert!(N.is_power_of_two(), "log ring size must be power of 2") };

        Self {
            ring: UnsafeCell::new([LogEntry::BLANK; N]),
            head: AtomicU32::new(0),
            tail: AtomicU32::new(0),
            lost: AtomicU32::new(0),
            writer: Mutex::new(()),
            reader: Mutex::new(()),
        }
    }

    /// Record a message. Returns `false` if the ring was full.
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        let _writer = self.writer.lock();
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head.wrapping_sub(tail) >= N as u32 {
            self.lost.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let len = msg.len().min(MAX_MSG_LEN);
        let mut entry = LogEntry {
            timestamp_us,
            level,
            len: len as u8,
            msg: [0; MAX_MSG_LEN],
        };
        entry.msg[..len].copy_from_slice(&msg[..len]);

        // SAFETY: writer lock held; slot is outside the readable window
        unsafe {
            self.ring
                .get()
                .cast::<LogEntry>()
                .add(head as usize & (N - 1))
                .write(entry);
        }

        self.head.store(head.wrapping_add(1), Ordering::Release);
        true
    }

    /// Oldest entry, if any.
    pub fn drain(&self) -> Option<LogEntry> {
        let _reader = self.reader.lock();
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: reader lock held; slot is inside the readable window
        let entry = unsafe {
            self.ring
                .get()
                .cast::<LogEntry>()
                .add(tail as usize & (N - 1))
                .read()
        };

        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Entries discarded because the ring was full.
    pub fn dropped(&self) -> u32 {
        self.lost.load(Ordering::Relaxed)
    }

    /// Read and zero the discard counter.
    pub fn take_dropped(&self) -> u32 {
        self.lost.swap(0, Ordering::Relaxed)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `args` into `buf`, cutting whatever does not fit.
///
/// Returns the number of bytes used.
pub fn format_message(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    struct Cut<'a> {
        buf: &'a mut [u8],
        used: usize,
    }

    impl core::fmt::Write for Cut<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let room = self.buf.len() - self.used;
            let n = s.len().min(room);
            self.buf[self.used..self.used + n].copy_from_slice(&s.as_bytes()[..n]);
            self.used += n;
            Ok(())
        }
    }

    let mut cut = Cut { buf, used: 0 };
    let _ = core::fmt::write(&mut cut, args);
    cut.used
}

/// Log at an explicit level.
///
/// ```ignore
/// log_at!(LogLevel::Info, self.log, now_us, "wrote {} letters", n);
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_message(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

#[macro_export]
macro_rules! log_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn stamps<const N: usize>(stream: &LogStream<N>) -> Vec<i64> {
        core::iter::from_fn(|| stream.drain()).map(|e| e.timestamp_us).collect()
    }

    #[test]
    fn test_entries_come_back_in_order() {
        let stream = LogStream::<8>::new();
        crate::log_info!(stream, 10, "ready");
        crate::log_warn!(stream, 20, "queue full after {} letters", 3);

        let first = stream.drain().unwrap();
        assert_eq!((first.level, first.text()), (LogLevel::Info, "ready"));
        let second = stream.drain().unwrap();
        assert_eq!(second.text(), "queue full after 3 letters");
        assert!(stream.drain().is_none());
    }

    #[test]
    fn test_full_ring_counts_losses() {
        let stream = LogStream::<2>::new();
        for t in 0..5 {
            stream.push(t, LogLevel::Debug, b"x");
        }
        assert_eq!(stream.take_dropped(), 3);
        assert_eq!(stream.dropped(), 0);
        assert_eq!(stamps(&stream), [0, 1]);

        // Room again once read
        assert!(stream.push(9, LogLevel::Debug, b"y"));
        assert_eq!(stamps(&stream), [9]);
    }

    #[test]
    fn test_cut_keeps_whole_chars() {
        let stream = LogStream::<2>::new();
        let mut msg = vec![b'a'; MAX_MSG_LEN - 1];
        msg.extend_from_slice("é".as_bytes());
        stream.push(0, LogLevel::Info, &msg);
        assert_eq!(stream.drain().unwrap().text().len(), MAX_MSG_LEN - 1);
    }

    #[test]
    fn test_format_message_cuts() {
        let mut buf = [0u8; 6];
        let n = format_message(&mut buf, format_args!("dot {} ms", 200));
        assert_eq!(&buf[..n], b"dot 20");
    }

    #[test]
    fn test_competing_readers_never_duplicate() {
        let stream = Arc::new(LogStream::<64>::new());
        for t in 0..64 {
            assert!(stream.push(t, LogLevel::Debug, b"m"));
        }

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let stream = Arc::clone(&stream);
                thread::spawn(move || stamps(&stream))
            })
            .collect();

        let mut all: Vec<i64> = readers
            .into_iter()
            .flat_map(|r| r.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn test_competing_writers_lose_nothing() {
        let stream = Arc::new(LogStream::<256>::new());
        let writers: Vec<_> = (0..4)
            .map(|w| {
                let stream = Arc::clone(&stream);
                thread::spawn(move || {
                    for i in 0..50 {
                        assert!(stream.push(w * 100 + i, LogLevel::Debug, b"m"));
                    }
                })
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }

        let mut all = stamps(&stream);
        all.sort_unstable();
        let expected: Vec<i64> = (0..4).flat_map(|w| (0..50).map(move |i| w * 100 + i)).collect();
        assert_eq!(all, expected);
    }
}
