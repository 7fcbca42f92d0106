//! Morse device: the write/read surface handed to the registration layer.
//!
//! # Architecture
//!
//! ```text
//! write(bytes) ──▶ Segmenter ──▶ code table ──▶ Symbols ──▶ Sequencer ──▶ LED
//!                                                   │
//!                                                   └──▶ TranscriptQueue ──▶ read(max)
//! ```
//!
//! # Rules
//!
//! - One writer lock spans an entire write call: letters from concurrent
//!   writers never interleave, on the signal or in the transcript
//! - Reads never take the writer lock. The transcript serializes readers
//!   among themselves
//! - A write either processes all of its input or fails at the first error
//!   and stops. Nothing already keyed is rolled back
//! - On failure the output is forced off before returning. If that also
//!   fails the device logs an error; the write still reports the first error
//! - Every write runs at the dot time currently configured, whatever the
//!   generation counter says

use parking_lot::Mutex;

use crate::code;
use crate::config::{MorseConfig, Settings};
use crate::error::MorseError;
use crate::fault::{FaultCode, FaultSnapshot, FaultState};
use crate::logging::LogStream;
use crate::segmenter::{Segmenter, WhitespacePolicy};
use crate::sequencer::{Sequencer, SignalOutput, Timer};
use crate::transcript::{TranscriptQueue, TRANSCRIPT_CAPACITY};
use crate::{log_debug, log_error, log_info, log_warn};

/// Byte appended to the transcript at the end of every successful write.
pub const END_OF_WRITE: u8 = b'\n';

struct Writer<S, T> {
    seq: Sequencer<S, T>,
    /// Config generation the sequencer was last tuned to.
    generation: u16,
}

/// Text-to-Morse device.
///
/// `S` drives the indicator, `T` provides the blocking holds. `N` is the
/// transcript capacity in bytes (power of 2).
///
/// # Example
///
/// ```ignore
/// let device = MorseDevice::new(ConsoleLed::new(io::stderr()), ThreadTimer::new());
/// device.write(b"sos")?;
/// assert_eq!(device.read(64), b"... --- ...\n");
/// ```
pub struct MorseDevice<S, T, const N: usize = TRANSCRIPT_CAPACITY> {
    config: MorseConfig,
    writer: Mutex<Writer<S, T>>,
    transcript: TranscriptQueue<N>,
    fault: FaultState,
    log: LogStream,
}

impl<S: SignalOutput, T: Timer, const N: usize> MorseDevice<S, T, N> {
    /// Create a device with default configuration.
    pub fn new(signal: S, timer: T) -> Self {
        Self::with_config(signal, timer, MorseConfig::new())
    }

    /// Create a device with the given configuration.
    pub fn with_config(signal: S, timer: T, config: MorseConfig) -> Self {
        let settings = config.snapshot();
        let now_us = timer.now_us();

        let device = Self {
            writer: Mutex::new(Writer {
                seq: Sequencer::new(signal, timer, settings.dot_time),
                generation: settings.generation,
            }),
            transcript: TranscriptQueue::new(),
            fault: FaultState::new(),
            log: LogStream::new(),
            config,
        };

        log_info!(
            device.log,
            now_us,
            "morse device ready: dot {} ms, {} whitespace, transcript {} bytes",
            settings.dot_time.as_millis(),
            settings.whitespace.as_str(),
            N
        );
        device
    }

    /// Key `input` and append its transcript.
    ///
    /// Blocks for the full keyed duration of the message. Returns
    /// `input.len()` on success.
    ///
    /// # Errors
    ///
    /// - [`MorseError::QueueFull`]: transcript has no room; bytes pushed
    ///   before the failure stay readable
    /// - [`MorseError::InterruptedWait`]: a hold was interrupted
    /// - [`MorseError::SignalFault`]: the output backend failed
    /// - [`MorseError::InvalidLetter`]: segmenter let a non-letter through
    ///
    /// In every case processing stops at the failure and the fault state
    /// records it.
    pub fn write(&self, input: &[u8]) -> Result<usize, MorseError> {
        let mut writer = self.writer.lock();
        let settings = self.config.snapshot();
        self.retune(&mut writer, &settings);

        let mut letters = 0u32;
        match self.key_text(&mut writer.seq, settings.whitespace, input, &mut letters) {
            Ok(()) => {
                self.fault.clear();
                log_debug!(
                    self.log,
                    writer.seq.now_us(),
                    "wrote {} bytes, {} letters",
                    input.len(),
                    letters
                );
                Ok(input.len())
            }
            Err(err) => {
                self.fault.set(FaultCode::from(err), letters);

                let now_us = writer.seq.now_us();
                if let Err(off) = writer.seq.silence() {
                    log_error!(self.log, now_us, "output stuck on after failed write: {}", off);
                }
                match err {
                    MorseError::QueueFull | MorseError::InterruptedWait => {
                        log_warn!(self.log, now_us, "write aborted after {} letters: {}", letters, err)
                    }
                    _ => log_error!(self.log, now_us, "write failed after {} letters: {}", letters, err),
                }
                Err(err)
            }
        }
    }

    /// Remove up to `max` transcript bytes, oldest first.
    ///
    /// Never blocks on a write in progress. Empty means nothing is ready.
    pub fn read(&self, max: usize) -> Vec<u8> {
        self.transcript.drain(max)
    }

    /// Like [`read`](Self::read), into a caller buffer. Returns bytes copied.
    pub fn read_into(&self, buf: &mut [u8]) -> usize {
        self.transcript.drain_into(buf)
    }

    /// Transcript bytes waiting to be read.
    #[inline]
    pub fn pending(&self) -> usize {
        self.transcript.len()
    }

    /// Transcript capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Runtime configuration. Changes apply from the next write.
    pub fn config(&self) -> &MorseConfig {
        &self.config
    }

    /// Outcome of the most recent write.
    pub fn fault(&self) -> FaultSnapshot {
        self.fault.snapshot()
    }

    /// Device log stream. Drain it with [`crate::log_sink::drain_to`].
    pub fn log(&self) -> &LogStream {
        &self.log
    }

    /// Force the output off. Waits for a write in progress to finish.
    pub fn silence(&self) -> Result<(), MorseError> {
        self.writer.lock().seq.silence()
    }

    /// Tear down and hand back the backends.
    pub fn into_parts(self) -> (S, T) {
        self.writer.into_inner().seq.into_parts()
    }

    // --- Private methods ---

    fn retune(&self, writer: &mut Writer<S, T>, settings: &Settings) {
        // The generation is a 16-bit counter and can come back around to
        // the value last seen, so it only gates the log line.
        writer.seq.set_dot_time(settings.dot_time);
        if writer.generation == settings.generation {
            return;
        }
        writer.generation = settings.generation;
        log_info!(
            self.log,
            writer.seq.now_us(),
            "config gen {}: dot {} ms, {} whitespace",
            settings.generation,
            settings.dot_time.as_millis(),
            settings.whitespace.as_str()
        );
    }

    fn key_text(
        &self,
        seq: &mut Sequencer<S, T>,
        policy: WhitespacePolicy,
        input: &[u8],
        letters: &mut u32,
    ) -> Result<(), MorseError> {
        for step in Segmenter::segment(policy, input) {
            if let Some(gap) = step.gap {
                self.transcript.push_all(gap.transcript())?;
                seq.pause(gap)?;
            }

            let symbols = code::symbols_for(step.letter)?;
            seq.send_letter(symbols, |symbol| self.transcript.push(symbol.as_byte()))?;
            *letters += 1;
        }

        self.transcript.push(END_OF_WRITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    struct Nop;

    impl SignalOutput for Nop {
        fn set(&mut self, _on: bool) -> Result<(), MorseError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Clock {
        now_us: i64,
    }

    impl Timer for Clock {
        fn hold(&mut self, duration: Duration) -> Result<(), MorseError> {
            self.now_us += duration.as_micros() as i64;
            Ok(())
        }

        fn now_us(&self) -> i64 {
            self.now_us
        }
    }

    #[test]
    fn test_write_returns_input_len() {
        let device: MorseDevice<_, _> = MorseDevice::new(Nop, Clock::default());
        assert_eq!(device.write(b"hi, 42!"), Ok(7));
        assert_eq!(device.read(64), b".... ..\n");
    }

    #[test]
    fn test_elapsed_time_matches_units() {
        let device: MorseDevice<_, _> =
            MorseDevice::with_config(Nop, Clock::default(), MorseConfig::with_dot_ms(10).unwrap());
        device.write(b"e e").unwrap();
        let (_, clock) = device.into_parts();
        // dot + word break + dot = 9 units
        assert_eq!(clock.now_us, 90_000);
    }

    #[test]
    fn test_ready_logged_at_creation() {
        let device: MorseDevice<_, _> = MorseDevice::new(Nop, Clock::default());
        let entry = device.log().drain().unwrap();
        assert!(entry.text().starts_with("morse device ready"));
    }
}
