//! # MorseCode
//!
//! Text to Morse signal driver with a buffered dot/dash transcript.
//!
//! ## Architecture
//!
//! Leaves first:
//! - [`code`]: packed 16-bit code table for 'a'..='z'
//! - [`symbol`]: dot/dash runs decoded from a packed pattern
//! - [`sequencer`]: timed on/off keying of an abstract output
//! - [`transcript`]: bounded FIFO of the textual rendering
//! - [`segmenter`]: classifies input bytes and places breaks
//! - [`device`]: the write/read surface tying them together
//!
//! Signal output and timing are capabilities
//! ([`SignalOutput`], [`Timer`]); tests inject fakes, [`hal`] has the
//! real backends.

pub mod code;
pub mod config;
pub mod device;
pub mod error;
pub mod fault;
pub mod hal;
pub mod log_sink;
pub mod logging;
pub mod segmenter;
pub mod sequencer;
pub mod symbol;
pub mod transcript;

pub use config::{MorseConfig, Settings};
pub use device::MorseDevice;
pub use error::MorseError;
pub use fault::{FaultCode, FaultState};
pub use segmenter::WhitespacePolicy;
pub use sequencer::{SignalOutput, Timer};
pub use symbol::{Break, Symbol, Symbols};
pub use transcript::TranscriptQueue;
