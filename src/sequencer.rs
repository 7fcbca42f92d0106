//! Signal sequencer: turns symbols and breaks into timed key-down /
//! key-up intervals on an abstract output.
//!
//! Blocking by design. Every hold is a real wait on the [`Timer`], so the
//! wall-clock cost of a letter is proportional to its length in units.

use core::time::Duration;

use crate::error::MorseError;
use crate::symbol::{Break, Symbol};

/// Something that can be switched on and off (LED, GPIO, sidetone...).
pub trait SignalOutput {
    /// Drive the output active (`true`) or inactive (`false`).
    fn set(&mut self, on: bool) -> Result<(), MorseError>;
}

/// Monotonic blocking time source.
pub trait Timer {
    /// Block for `duration`.
    ///
    /// Returns [`MorseError::InterruptedWait`] if the wait was cut short.
    fn hold(&mut self, duration: Duration) -> Result<(), MorseError>;

    /// Microseconds since an arbitrary fixed epoch. Used for log stamps.
    fn now_us(&self) -> i64;
}

impl<S: SignalOutput + ?Sized> SignalOutput for &mut S {
    fn set(&mut self, on: bool) -> Result<(), MorseError> {
        (**self).set(on)
    }
}

impl<T: Timer + ?Sized> Timer for &mut T {
    fn hold(&mut self, duration: Duration) -> Result<(), MorseError> {
        (**self).hold(duration)
    }

    fn now_us(&self) -> i64 {
        (**self).now_us()
    }
}

/// Drives a [`SignalOutput`] with Morse timing.
pub struct Sequencer<S, T> {
    signal: S,
    timer: T,
    dot_time: Duration,
}

impl<S: SignalOutput, T: Timer> Sequencer<S, T> {
    /// Create a sequencer with the given unit length.
    pub fn new(signal: S, timer: T, dot_time: Duration) -> Self {
        Self {
            signal,
            timer,
            dot_time,
        }
    }

    /// Update the unit length (applies to the next hold).
    pub fn set_dot_time(&mut self, dot_time: Duration) {
        self.dot_time = dot_time;
    }

    /// Current unit length.
    pub fn dot_time(&self) -> Duration {
        self.dot_time
    }

    /// Timestamp from the underlying timer.
    #[inline]
    pub fn now_us(&self) -> i64 {
        self.timer.now_us()
    }

    /// Key one letter.
    ///
    /// For every symbol: `before_each(symbol)`, key down for the symbol's
    /// length, key up. An inter-symbol break separates consecutive symbols;
    /// none follows the last one.
    ///
    /// Returns the number of symbols keyed.
    ///
    /// # Errors
    ///
    /// Stops at the first error from `before_each`, the output, or the
    /// timer. A failed hold can leave the output on; call
    /// [`silence`](Self::silence) and handle its result.
    pub fn send_letter<I, F>(&mut self, symbols: I, mut before_each: F) -> Result<usize, MorseError>
    where
        I: IntoIterator<Item = Symbol>,
        F: FnMut(Symbol) -> Result<(), MorseError>,
    {
        let mut symbols = symbols.into_iter().peekable();
        let mut sent = 0;

        while let Some(symbol) = symbols.next() {
            before_each(symbol)?;
            self.key(symbol)?;
            sent += 1;

            if symbols.peek().is_some() {
                self.pause(Break::InterSymbol)?;
            }
        }

        Ok(sent)
    }

    /// Hold the output off for a break.
    #[inline]
    pub fn pause(&mut self, gap: Break) -> Result<(), MorseError> {
        self.hold_units(gap.units())
    }

    /// Force the output off.
    pub fn silence(&mut self) -> Result<(), MorseError> {
        self.signal.set(false)
    }

    /// Access the output backend.
    pub fn signal(&self) -> &S {
        &self.signal
    }

    /// Access the timer backend.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Take the backends back.
    pub fn into_parts(self) -> (S, T) {
        (self.signal, self.timer)
    }

    // --- Private methods ---

    fn key(&mut self, symbol: Symbol) -> Result<(), MorseError> {
        self.signal.set(true)?;
        self.hold_units(symbol.units())?;
        self.signal.set(false)
    }

    #[inline]
    fn hold_units(&mut self, units: u32) -> Result<(), MorseError> {
        self.timer.hold(self.dot_time * units)
    }
}
