//! Error types for the write path and configuration.

/// Driver error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorseError {
    /// E01: Byte outside 'a'..='z' / 'A'..='Z' reached the code table.
    ///
    /// The segmenter filters non-letters first, so this is a defect if seen.
    InvalidLetter(u8),
    /// E02: Transcript queue is full
    QueueFull,
    /// E03: A blocking hold was interrupted
    InterruptedWait,
    /// E04: Signal backend refused a level change
    SignalFault,
    /// E05: Configuration value out of allowed range
    OutOfRange,
}

impl MorseError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidLetter(_) => "E01",
            Self::QueueFull => "E02",
            Self::InterruptedWait => "E03",
            Self::SignalFault => "E04",
            Self::OutOfRange => "E05",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidLetter(_) => "invalid letter",
            Self::QueueFull => "transcript queue full",
            Self::InterruptedWait => "wait interrupted",
            Self::SignalFault => "signal output fault",
            Self::OutOfRange => "out of range",
        }
    }
}

impl core::fmt::Display for MorseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLetter(byte) => {
                write!(f, "{}: {} (0x{:02x})", self.code(), self.message(), byte)
            }
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

impl std::error::Error for MorseError {}
