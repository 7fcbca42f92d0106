//! LED backends for the signal output.

use std::io::Write;

use crate::error::MorseError;
use crate::sequencer::SignalOutput;

/// LED output configuration.
#[derive(Clone, Copy, Debug)]
pub struct LedConfig {
    pub pin: i32,
    pub active_high: bool,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            pin: 2, // On-board LED on most ESP32 dev kits
            active_high: true,
        }
    }
}

/// Host stand-in for an LED: renders each transition to a byte sink.
///
/// Key down prints `█`, key up prints `_`. The sleeps in between are
/// what make the pattern readable.
pub struct ConsoleLed<W: Write> {
    out: W,
    lit: bool,
}

impl<W: Write> ConsoleLed<W> {
    pub fn new(out: W) -> Self {
        Self { out, lit: false }
    }

    /// Current LED state.
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SignalOutput for ConsoleLed<W> {
    fn set(&mut self, on: bool) -> Result<(), MorseError> {
        if on == self.lit {
            return Ok(());
        }
        let mark: &[u8] = if on { "█".as_bytes() } else { b"_" };
        self.out
            .write_all(mark)
            .and_then(|()| self.out.flush())
            .map_err(|_| MorseError::SignalFault)?;
        self.lit = on;
        Ok(())
    }
}

/// GPIO-driven LED.
#[cfg(target_os = "espidf")]
pub struct GpioLed {
    pin: esp_idf_svc::hal::gpio::PinDriver<
        'static,
        esp_idf_svc::hal::gpio::AnyOutputPin,
        esp_idf_svc::hal::gpio::Output,
    >,
    active_high: bool,
}

#[cfg(target_os = "espidf")]
impl GpioLed {
    /// Take ownership of `pin` and drive it inactive.
    pub fn new(
        pin: esp_idf_svc::hal::gpio::AnyOutputPin,
        config: &LedConfig,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let mut led = Self {
            pin: esp_idf_svc::hal::gpio::PinDriver::output(pin)?,
            active_high: config.active_high,
        };
        led.drive(false)?;
        Ok(led)
    }

    fn drive(&mut self, on: bool) -> Result<(), esp_idf_svc::sys::EspError> {
        if on == self.active_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}

#[cfg(target_os = "espidf")]
impl SignalOutput for GpioLed {
    fn set(&mut self, on: bool) -> Result<(), MorseError> {
        self.drive(on).map_err(|_| MorseError::SignalFault)
    }
}
