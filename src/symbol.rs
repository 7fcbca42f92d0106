//! Morse symbols, breaks, and the packed-pattern decoder.
//!
//! Pure logic, no hardware dependencies. Fully testable on host.

use crate::code::CODE_BITS;

/// Keyed element inside a letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// 1 unit key down.
    Dot,
    /// 3 units key down.
    Dash,
}

impl Symbol {
    /// Key-down duration in dot units.
    #[inline]
    pub const fn units(self) -> u32 {
        match self {
            Symbol::Dot => 1,
            Symbol::Dash => 3,
        }
    }

    /// Transcript character for this symbol.
    #[inline]
    pub const fn as_byte(self) -> u8 {
        match self {
            Symbol::Dot => b'.',
            Symbol::Dash => b'-',
        }
    }

    /// Classify a run of consecutive `1` bits.
    ///
    /// Valid tables only produce runs of 1 and 3. Anything longer than a
    /// single bit is treated as a dash.
    #[inline]
    pub const fn from_run(run: u8) -> Self {
        if run <= 1 {
            Symbol::Dot
        } else {
            Symbol::Dash
        }
    }
}

/// Key-up interval between elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Break {
    /// Between symbols of one letter (1 unit).
    InterSymbol,
    /// Between letters of one word (3 units).
    InterCharacter,
    /// Between words (7 units).
    InterWord,
}

impl Break {
    /// Key-up duration in dot units.
    #[inline]
    pub const fn units(self) -> u32 {
        match self {
            Break::InterSymbol => 1,
            Break::InterCharacter => 3,
            Break::InterWord => 7,
        }
    }

    /// Bytes this break contributes to the transcript.
    #[inline]
    pub const fn transcript(self) -> &'static [u8] {
        match self {
            Break::InterSymbol => b"",
            Break::InterCharacter => b" ",
            Break::InterWord => b"   ",
        }
    }
}

/// Lazy decoder over a packed code pattern.
///
/// Scans MSB to LSB counting consecutive `1` bits. A `0` closes the
/// current run and yields a symbol; a `0` with no run pending means the
/// padding has been reached and the scan stops. A run still open when the
/// width is exhausted is flushed as a final symbol.
///
/// # Example
///
/// ```
/// use morse_code::symbol::{Symbol, Symbols};
///
/// let r: Vec<Symbol> = Symbols::new(0xBA00).collect();
/// assert_eq!(r, [Symbol::Dot, Symbol::Dash, Symbol::Dot]);
/// ```
#[derive(Clone, Debug)]
pub struct Symbols {
    pattern: u16,
    /// Bits not yet scanned.
    remaining: u32,
    /// Consecutive `1` bits since the last emitted symbol.
    run: u8,
    done: bool,
}

impl Symbols {
    /// Start decoding `pattern` from its most significant bit.
    pub const fn new(pattern: u16) -> Self {
        Self {
            pattern,
            remaining: CODE_BITS,
            run: 0,
            done: false,
        }
    }

    /// The pattern being decoded.
    #[inline]
    pub const fn pattern(&self) -> u16 {
        self.pattern
    }

    /// Rewind to the first symbol.
    pub fn restart(&mut self) {
        *self = Self::new(self.pattern);
    }

    fn take_run(&mut self) -> Symbol {
        let run = core::mem::replace(&mut self.run, 0);
        Symbol::from_run(run)
    }
}

impl Iterator for Symbols {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        if self.done {
            return None;
        }

        while self.remaining > 0 {
            self.remaining -= 1;
            if self.pattern & (1 << self.remaining) != 0 {
                self.run += 1;
            } else if self.run == 0 {
                // Padding reached
                self.done = true;
                return None;
            } else {
                return Some(self.take_run());
            }
        }

        // Width exhausted: flush a run the table forgot to terminate
        self.done = true;
        if self.run > 0 {
            Some(self.take_run())
        } else {
            None
        }
    }
}

impl core::iter::FusedIterator for Symbols {}
