//! Shared test doubles: a recording signal and a fake timer writing to
//! one timeline.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use morse_code::{MorseConfig, MorseDevice, MorseError, SignalOutput, Symbol, Timer};

/// Something that happened on the output, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    On,
    Off,
    /// Hold of this many milliseconds (== units when dot time is 1 ms).
    Hold(u64),
}

/// Shared event log.
#[derive(Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<Event>>>);

impl Timeline {
    pub fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }

    fn record(&self, event: Event) {
        self.0.lock().push(event);
    }
}

/// Records every level change.
pub struct FakeSignal {
    timeline: Timeline,
    /// Level that cannot be driven.
    fails_at: Option<bool>,
}

impl FakeSignal {
    pub fn new(timeline: Timeline) -> Self {
        Self { timeline, fails_at: None }
    }

    /// A signal whose every `set(true)` fails.
    pub fn broken(timeline: Timeline) -> Self {
        Self { timeline, fails_at: Some(true) }
    }

    /// A signal that turns on but every `set(false)` fails.
    pub fn stuck(timeline: Timeline) -> Self {
        Self { timeline, fails_at: Some(false) }
    }
}

impl SignalOutput for FakeSignal {
    fn set(&mut self, on: bool) -> Result<(), MorseError> {
        if self.fails_at == Some(on) {
            return Err(MorseError::SignalFault);
        }
        self.timeline.record(if on { Event::On } else { Event::Off });
        Ok(())
    }
}

/// Advances virtual time instead of sleeping.
pub struct FakeTimer {
    timeline: Timeline,
    now_us: i64,
    holds: usize,
    /// 1-based index of the hold that reports an interruption.
    interrupt_at: Option<usize>,
}

impl FakeTimer {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            now_us: 0,
            holds: 0,
            interrupt_at: None,
        }
    }

    pub fn interrupting_at(timeline: Timeline, hold: usize) -> Self {
        Self {
            interrupt_at: Some(hold),
            ..Self::new(timeline)
        }
    }

    pub fn now(&self) -> i64 {
        self.now_us
    }
}

impl Timer for FakeTimer {
    fn hold(&mut self, duration: Duration) -> Result<(), MorseError> {
        self.holds += 1;
        if self.interrupt_at == Some(self.holds) {
            return Err(MorseError::InterruptedWait);
        }
        self.timeline.record(Event::Hold(duration.as_millis() as u64));
        self.now_us += duration.as_micros() as i64;
        Ok(())
    }

    fn now_us(&self) -> i64 {
        self.now_us
    }
}

pub type TestDevice<const N: usize> = MorseDevice<FakeSignal, FakeTimer, N>;

/// Device with a 1 ms dot so holds read directly as units.
pub fn device<const N: usize>() -> (TestDevice<N>, Timeline) {
    let timeline = Timeline::default();
    let device = MorseDevice::with_config(
        FakeSignal::new(timeline.clone()),
        FakeTimer::new(timeline.clone()),
        MorseConfig::with_dot_ms(1).unwrap(),
    );
    (device, timeline)
}

/// Drain the whole transcript.
pub fn read_all<const N: usize>(device: &TestDevice<N>) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let chunk = device.read(7);
        if chunk.is_empty() {
            return out;
        }
        out.extend_from_slice(&chunk);
    }
}

/// Expected keying of one letter given its symbols.
pub fn letter_events(symbols: &[Symbol]) -> Vec<Event> {
    let mut events = Vec::new();
    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 {
            events.push(Event::Hold(1));
        }
        events.extend([Event::On, Event::Hold(u64::from(symbol.units())), Event::Off]);
    }
    events
}

/// Re-pack symbols into a 16-bit pattern, MSB first.
pub fn pack(symbols: &[Symbol]) -> u16 {
    let mut bits = 0u32;
    let mut width = 0u32;
    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 {
            width += 1; // gap
        }
        for _ in 0..symbol.units() {
            bits |= 1 << (15 - width);
            width += 1;
        }
    }
    bits as u16
}
