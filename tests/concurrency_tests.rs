//! Concurrent writers and readers

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use morse_code::{MorseDevice, MorseError, SignalOutput, Timer};

/// Output that remembers nothing; interleaving shows up in the transcript.
struct Nop;

impl SignalOutput for Nop {
    fn set(&mut self, _on: bool) -> Result<(), MorseError> {
        Ok(())
    }
}

/// Real but tiny sleeps so writers get a chance to overlap.
struct ShortSleep;

impl Timer for ShortSleep {
    fn hold(&mut self, _duration: Duration) -> Result<(), MorseError> {
        thread::sleep(Duration::from_micros(50));
        Ok(())
    }

    fn now_us(&self) -> i64 {
        0
    }
}

/// Holds that return at once, to keep the transcript churning.
struct Instant;

impl Timer for Instant {
    fn hold(&mut self, _duration: Duration) -> Result<(), MorseError> {
        Ok(())
    }

    fn now_us(&self) -> i64 {
        0
    }
}

#[test]
fn test_concurrent_writes_do_not_interleave() {
    let device: Arc<MorseDevice<_, _, 1024>> = Arc::new(MorseDevice::new(Nop, ShortSleep));
    let mut handles = vec![];

    for text in [&b"eeee"[..], &b"tttt"[..], &b"ii ii"[..]] {
        let device = Arc::clone(&device);
        handles.push(thread::spawn(move || {
            for _ in 0..10 {
                device.write(text).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let transcript = device.read(usize::MAX);
    let text = String::from_utf8(transcript).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 30);
    for line in lines {
        assert!(
            matches!(line, ". . . ." | "- - - -" | "..   .."),
            "interleaved line: {:?}",
            line
        );
    }
}

#[test]
fn test_reader_runs_alongside_writer() {
    let device: Arc<MorseDevice<_, _, 64>> = Arc::new(MorseDevice::new(Nop, ShortSleep));

    let writer = {
        let device = Arc::clone(&device);
        thread::spawn(move || {
            for _ in 0..50 {
                // Retry until the reader makes room
                while device.write(b"sos").is_err() {
                    thread::yield_now();
                }
            }
        })
    };

    let mut collected = Vec::new();
    while collected.iter().filter(|&&b| b == b'\n').count() < 50 {
        let chunk = device.read(16);
        if chunk.is_empty() {
            thread::yield_now();
        }
        collected.extend(chunk);
    }
    writer.join().unwrap();

    // Failed attempts leave partial lines behind; every complete line
    // from a successful write ends with the full "sos" group.
    let text = String::from_utf8(collected).unwrap();
    assert_eq!(text.matches("... --- ...\n").count(), 50);
}

#[test]
fn test_pending_stays_within_capacity_under_load() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let device: Arc<MorseDevice<_, _, 16>> = Arc::new(MorseDevice::new(Nop, Instant));
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let (device, done) = (Arc::clone(&device), Arc::clone(&done));
        thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                let _ = device.write(b"e");
            }
        })
    };
    let reader = {
        let (device, done) = (Arc::clone(&device), Arc::clone(&done));
        thread::spawn(move || {
            let mut buf = [0u8; 3];
            while !done.load(Ordering::Relaxed) {
                device.read_into(&mut buf);
            }
        })
    };

    for _ in 0..200_000 {
        let pending = device.pending();
        assert!(pending <= device.capacity(), "pending {}", pending);
    }
    done.store(true, Ordering::Relaxed);
    writer.join().unwrap();
    reader.join().unwrap();
}
