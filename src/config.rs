//! Module: config
//!
//! Purpose: Runtime configuration for the Morse driver.
//!
//! Architecture:
//! - All parameters atomically accessible (lock-free)
//! - Every change bumps `generation`
//! - The write path samples a [`Settings`] snapshot once per write, so a
//!   change made mid-write applies to the next write
//!
//! Safety: Safe. All access via atomics, no locks.

use core::sync::atomic::{AtomicU16, AtomicU32, AtomicU8, Ordering};
use core::time::Duration;

use crate::error::MorseError;
use crate::segmenter::WhitespacePolicy;

/// Default dot time in milliseconds.
pub const DEFAULT_DOT_MS: u32 = 200;

/// Accepted dot time range in milliseconds.
pub const DOT_MS_RANGE: core::ops::RangeInclusive<u32> = 1..=10_000;

/// Accepted speed range in words per minute.
pub const WPM_RANGE: core::ops::RangeInclusive<u32> = 1..=200;

/// PARIS timing: dot = 1200 ms / WPM.
const PARIS_MS: u32 = 1200;

/// Driver configuration.
pub struct MorseConfig {
    dot_ms: AtomicU32,
    whitespace: AtomicU8,
    generation: AtomicU16,
}

/// Point-in-time copy of [`MorseConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Length of one unit.
    pub dot_time: Duration,
    /// Word separator policy.
    pub whitespace: WhitespacePolicy,
    /// Configuration generation this snapshot was taken at.
    pub generation: u16,
}

impl MorseConfig {
    /// Create config with default values.
    pub const fn new() -> Self {
        Self {
            dot_ms: AtomicU32::new(DEFAULT_DOT_MS),
            whitespace: AtomicU8::new(WhitespacePolicy::Extended as u8),
            generation: AtomicU16::new(0),
        }
    }

    /// Builder: start from defaults with a given dot time.
    ///
    /// # Errors
    ///
    /// [`MorseError::OutOfRange`] if `dot_ms` is outside [`DOT_MS_RANGE`].
    pub fn with_dot_ms(dot_ms: u32) -> Result<Self, MorseError> {
        let config = Self::new();
        config.set_dot_ms(dot_ms)?;
        Ok(config)
    }

    /// Dot time in milliseconds.
    #[inline]
    pub fn dot_ms(&self) -> u32 {
        self.dot_ms.load(Ordering::Relaxed)
    }

    /// Dot time as a duration.
    #[inline]
    pub fn dot_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.dot_ms()))
    }

    /// Set the dot time.
    pub fn set_dot_ms(&self, dot_ms: u32) -> Result<(), MorseError> {
        if !DOT_MS_RANGE.contains(&dot_ms) {
            return Err(MorseError::OutOfRange);
        }
        self.dot_ms.store(dot_ms, Ordering::Relaxed);
        self.bump();
        Ok(())
    }

    /// Set the speed in words per minute (PARIS timing).
    pub fn set_wpm(&self, wpm: u32) -> Result<(), MorseError> {
        if !WPM_RANGE.contains(&wpm) {
            return Err(MorseError::OutOfRange);
        }
        self.set_dot_ms(PARIS_MS / wpm)
    }

    /// Word separator policy.
    #[inline]
    pub fn whitespace(&self) -> WhitespacePolicy {
        WhitespacePolicy::from_u8(self.whitespace.load(Ordering::Relaxed))
    }

    /// Set the word separator policy.
    pub fn set_whitespace(&self, policy: WhitespacePolicy) {
        self.whitespace.store(policy as u8, Ordering::Relaxed);
        self.bump();
    }

    /// Generation counter (bumped on every change).
    #[inline]
    pub fn generation(&self) -> u16 {
        self.generation.load(Ordering::Acquire)
    }

    /// Take a consistent-enough snapshot for one write.
    pub fn snapshot(&self) -> Settings {
        Settings {
            generation: self.generation(),
            dot_time: self.dot_time(),
            whitespace: self.whitespace(),
        }
    }

    #[inline]
    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }
}

impl Default for MorseConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MorseConfig::new();
        assert_eq!(config.dot_ms(), DEFAULT_DOT_MS);
        assert_eq!(config.whitespace(), WhitespacePolicy::Extended);
        assert_eq!(config.generation(), 0);
    }

    #[test]
    fn test_wpm_paris_timing() {
        let config = MorseConfig::new();
        config.set_wpm(20).unwrap();
        assert_eq!(config.dot_ms(), 60);
        config.set_wpm(25).unwrap();
        assert_eq!(config.dot_time(), Duration::from_millis(48));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let config = MorseConfig::new();
        assert_eq!(config.set_dot_ms(0), Err(MorseError::OutOfRange));
        assert_eq!(config.set_wpm(0), Err(MorseError::OutOfRange));
        assert_eq!(config.set_wpm(500), Err(MorseError::OutOfRange));
        assert_eq!(config.dot_ms(), DEFAULT_DOT_MS);
        assert_eq!(config.generation(), 0);
        assert!(MorseConfig::with_dot_ms(20_000).is_err());
    }

    #[test]
    fn test_generation_bumps() {
        let config = MorseConfig::new();
        config.set_dot_ms(50).unwrap();
        config.set_whitespace(WhitespacePolicy::SpaceOnly);
        let snap = config.snapshot();
        assert_eq!(snap.generation, 2);
        assert_eq!(snap.whitespace, WhitespacePolicy::SpaceOnly);
        assert_eq!(snap.dot_time, Duration::from_millis(50));
    }
}
