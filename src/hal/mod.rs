//! Hardware Abstraction Layer for the Morse driver.
//!
//! Thin backends for the [`SignalOutput`](crate::sequencer::SignalOutput)
//! and [`Timer`](crate::sequencer::Timer) capabilities.
//! Business logic stays in core modules, HAL is just I/O.

pub mod led;
pub mod timer;

pub use led::{ConsoleLed, LedConfig};
#[cfg(target_os = "espidf")]
pub use led::GpioLed;
pub use timer::{InterruptHandle, ThreadTimer};
