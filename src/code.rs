//! Module: code
//!
//! Purpose: Packed Morse code table for 'a'..='z'.
//!
//! Each entry is 16 bits, read MSB first:
//! - `1` = one dot time of key down
//! - dot = `1`, dash = `111`
//! - symbols are separated by a single `0`
//! - zero bits after the last `1` are padding
//!
//! ```text
//! R  .-.   1011 1010 0000 0000 = 0xBA00
//! J  .---  1011 1011 1011 1000 = 0xBBB8
//! ```
//!
//! Safety: Safe. No unsafe blocks. Immutable table.

use crate::error::MorseError;
use crate::symbol::Symbols;

/// Width of a packed code entry in bits.
pub const CODE_BITS: u32 = 16;

/// Packed codes, indexed by `letter - 'a'`.
pub const CODE_TABLE: [u16; 26] = [
    0xB800, // A .-
    0xEA80, // B -...
    0xEBA0, // C -.-.
    0xEA00, // D -..
    0x8000, // E .
    0xAE80, // F ..-.
    0xEE80, // G --.
    0xAA00, // H ....
    0xA000, // I ..
    0xBBB8, // J .---
    0xEB80, // K -.-
    0xBA80, // L .-..
    0xEE00, // M --
    0xE800, // N -.
    0xEEE0, // O ---
    0xBBA0, // P .--.
    0xEEB8, // Q --.-
    0xBA00, // R .-.
    0xA800, // S ...
    0xE000, // T -
    0xAE00, // U ..-
    0xAB80, // V ...-
    0xBB80, // W .--
    0xEAE0, // X -..-
    0xEBB8, // Y -.--
    0xEEA0, // Z --..
];

/// Look up the packed code for a letter (case-insensitive).
///
/// # Errors
///
/// [`MorseError::InvalidLetter`] if `letter` is not ASCII alphabetic.
#[inline]
pub fn code_for(letter: u8) -> Result<u16, MorseError> {
    if !letter.is_ascii_alphabetic() {
        return Err(MorseError::InvalidLetter(letter));
    }
    Ok(CODE_TABLE[(letter.to_ascii_lowercase() - b'a') as usize])
}

/// Look up a letter and decode its symbols in one step.
#[inline]
pub fn symbols_for(letter: u8) -> Result<Symbols, MorseError> {
    code_for(letter).map(Symbols::new)
}
