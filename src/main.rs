//! morse-code - collaborator layer around the Morse device.
//!
//! Reads stdin line by line, keys each line, and prints the transcript
//! read back from the device. Device logs go to stderr.
//!
//! On ESP-IDF targets the signal drives the on-board LED; on a host it is
//! rendered to stderr.

use std::error::Error;
use std::io::{self, BufRead, Write};

use morse_code::hal::ThreadTimer;
use morse_code::{log_sink, MorseDevice, SignalOutput};

/// Transcript bytes fetched per read call.
const READ_CHUNK: usize = 64;

#[cfg(target_os = "espidf")]
fn signal_output() -> Result<morse_code::hal::GpioLed, Box<dyn Error>> {
    use esp_idf_svc::hal::gpio::OutputPin;
    use esp_idf_svc::hal::peripherals::Peripherals;

    // Initialize ESP-IDF
    esp_idf_svc::sys::link_patches();

    let peripherals = Peripherals::take()?;
    let config = morse_code::hal::LedConfig::default();
    let pin = peripherals.pins.gpio2.downgrade_output();
    Ok(morse_code::hal::GpioLed::new(pin, &config)?)
}

#[cfg(not(target_os = "espidf"))]
fn signal_output() -> Result<morse_code::hal::ConsoleLed<io::Stderr>, Box<dyn Error>> {
    Ok(morse_code::hal::ConsoleLed::new(io::stderr()))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("morse-code: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    eprintln!("{}", env!("VERSION_STRING"));

    let device: MorseDevice<_, _> = MorseDevice::new(signal_output()?, ThreadTimer::new());
    log_sink::drain_to(device.log(), &mut io::stderr())?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if let Err(e) = device.write(line.as_bytes()) {
            eprintln!();
            eprintln!("write failed: {}", e);
        }
        eprintln!();

        echo_transcript(&device, &mut stdout)?;
        log_sink::drain_to(device.log(), &mut io::stderr())?;
    }

    device.silence()?;
    Ok(())
}

fn echo_transcript<S, T, const N: usize, W>(
    device: &MorseDevice<S, T, N>,
    out: &mut W,
) -> io::Result<()>
where
    S: SignalOutput,
    T: morse_code::Timer,
    W: Write,
{
    let mut buf = [0u8; READ_CHUNK];
    loop {
        let n = device.read_into(&mut buf);
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
    }
    out.flush()
}
