//! Log output: drains a [`LogStream`] into a byte sink.
//!
//! On the host the sink is stderr. On a board it would be a UART; any
//! `std::io::Write` works.

use std::io::{self, Write};

use crate::logging::{LogEntry, LogStream};

/// Size of the per-entry format buffer.
const FORMAT_BUF_LEN: usize = 256;

/// Format log entry to bytes.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut cursor = io::Cursor::new(buf);
    // A full buffer just truncates the line
    let _ = writeln!(
        cursor,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.text()
    );
    cursor.position() as usize
}

/// Write every pending entry to `out`, then report drops (if any).
///
/// Returns the number of entries written.
pub fn drain_to<W: Write, const N: usize>(stream: &LogStream<N>, out: &mut W) -> io::Result<usize> {
    let mut format_buf = [0u8; FORMAT_BUF_LEN];
    let mut written = 0;

    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut format_buf);
        out.write_all(&format_buf[..len])?;
        written += 1;
    }

    let dropped = stream.take_dropped();
    if dropped > 0 {
        writeln!(out, "[WARN] Dropped: {}", dropped)?;
    }

    out.flush()?;
    Ok(written)
}
