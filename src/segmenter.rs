//! Text segmenter finite state machine.
//!
//! Pure logic, no hardware dependencies. Consumes input bytes one at a
//! time and decides, for each letter, which break (if any) must be keyed
//! before it.
//!
//! # Classification order
//!
//! 1. Whitespace (per [`WhitespacePolicy`]) arms a word break and is skipped
//! 2. Other non-letters are dropped silently
//! 3. A letter consumes the pending break and arms a character break

use crate::symbol::Break;

/// Which bytes count as word separators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum WhitespacePolicy {
    /// Space, tab, CR and LF separate words; whitespace before the first
    /// letter is ignored.
    #[default]
    Extended = 0,
    /// Only a literal space separates words, and leading spaces are not
    /// special: they produce a word break before the first letter. Tab,
    /// CR and LF are dropped like punctuation.
    SpaceOnly = 1,
}

impl WhitespacePolicy {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => WhitespacePolicy::SpaceOnly,
            _ => WhitespacePolicy::Extended,
        }
    }

    /// Does `byte` separate words under this policy?
    #[inline]
    pub fn is_separator(self, byte: u8) -> bool {
        match self {
            WhitespacePolicy::Extended => matches!(byte, b' ' | b'\t' | b'\r' | b'\n'),
            WhitespacePolicy::SpaceOnly => byte == b' ',
        }
    }

    /// Is leading whitespace ignored?
    #[inline]
    pub fn suppresses_leading(self) -> bool {
        self == WhitespacePolicy::Extended
    }

    /// Name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            WhitespacePolicy::Extended => "extended",
            WhitespacePolicy::SpaceOnly => "space-only",
        }
    }
}

/// One letter to key, plus the break that must precede it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Break to key before the letter, if any.
    pub gap: Option<Break>,
    /// The letter, as it appeared in the input.
    pub letter: u8,
}

/// Per-write segmentation state.
///
/// Create one per write call: the line-start state does not carry over.
///
/// # Example
///
/// ```
/// use morse_code::segmenter::{Segmenter, Step, WhitespacePolicy};
/// use morse_code::symbol::Break;
///
/// let mut seg = Segmenter::new(WhitespacePolicy::Extended);
/// assert_eq!(seg.feed(b'a'), Some(Step { gap: None, letter: b'a' }));
/// assert_eq!(seg.feed(b' '), None);
/// assert_eq!(seg.feed(b'b'), Some(Step { gap: Some(Break::InterWord), letter: b'b' }));
/// ```
#[derive(Clone, Debug)]
pub struct Segmenter {
    policy: WhitespacePolicy,
    at_line_start: bool,
    pending_word: bool,
    pending_char: bool,
}

impl Segmenter {
    /// Create a segmenter at the start of a line.
    pub fn new(policy: WhitespacePolicy) -> Self {
        Self {
            policy,
            at_line_start: true,
            pending_word: false,
            pending_char: false,
        }
    }

    /// Active policy.
    pub fn policy(&self) -> WhitespacePolicy {
        self.policy
    }

    /// Classify one byte.
    ///
    /// Returns `Some(step)` when `byte` is a letter to key, `None` when it
    /// only updated state or was dropped.
    #[inline]
    pub fn feed(&mut self, byte: u8) -> Option<Step> {
        if self.policy.is_separator(byte) {
            if !(self.at_line_start && self.policy.suppresses_leading()) {
                self.pending_word = true;
            }
            return None;
        }

        if !byte.is_ascii_alphabetic() {
            return None;
        }

        let gap = if self.pending_word {
            self.pending_word = false;
            self.pending_char = false;
            Some(Break::InterWord)
        } else if self.pending_char {
            Some(Break::InterCharacter)
        } else {
            None
        };

        self.at_line_start = false;
        self.pending_char = true;

        Some(Step { gap, letter: byte })
    }

    /// Run a whole buffer through a fresh segmenter.
    pub fn segment(policy: WhitespacePolicy, input: &[u8]) -> impl Iterator<Item = Step> + '_ {
        let mut seg = Self::new(policy);
        input.iter().filter_map(move |&b| seg.feed(b))
    }
}
