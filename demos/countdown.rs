use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serialport::{DataBits, Parity};

use nxtp_proto::sink::SignController;
use nxtp_proto::worker::{CancellationToken, PeriodicWorker};
use nxtp_proto::{ControllerIdentity, DisplayIntent, SignAddress};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args();
    args.next(); // Skip program name
    let port = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let minutes: u64 = args.next().map_or(Ok(10), |m| m.parse())?;

    let serial = serialport::new(&port, 9600)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .timeout(Duration::from_millis(100))
        .open()
        .context("Failed to open serial port")?;

    let sign = SignController::new(serial, ControllerIdentity::default());
    let end = Instant::now() + Duration::from_secs(minutes * 60);
    let token = CancellationToken::new();

    let worker = PeriodicWorker::spawn(sign, Duration::from_secs(1), token.clone(), move || {
        let left = end.saturating_duration_since(Instant::now()).as_secs();
        Some(DisplayIntent::StaticText {
            address: SignAddress::BROADCAST,
            text: format!("DEPARTS {:02}:{:02}", left / 60, left % 60),
            hold_seconds: 2,
        })
    });

    println!("Press enter to stop.");
    let mut buf = String::new();
    let _ = std::io::stdin().read_line(&mut buf);

    let mut sign = match worker.stop() {
        Ok(res) => res?,
        Err(_) => anyhow::bail!("Display worker panicked"),
    };
    sign.reset(SignAddress::BROADCAST)?;
    sign.close()?;
    Ok(())
}
