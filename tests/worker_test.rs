mod common;

use std::thread;
use std::time::Duration;

use common::{SerialIOPlane, SerialInterface, SignSim};
use nxtp_proto::sink::{Error, SignController};
use nxtp_proto::worker::{CancellationToken, PeriodicWorker};
use nxtp_proto::{ControllerIdentity, DisplayIntent, SignAddress};

#[test]
fn countdown_worker() {
    let serial_sim = SerialInterface::new();
    let ctlr = SignController::new(SerialIOPlane::new(&serial_sim), ControllerIdentity::default());

    let mut minutes = 5u32;
    let worker = PeriodicWorker::spawn(
        ctlr,
        Duration::from_millis(1),
        CancellationToken::new(),
        move || {
            let text = format!("ARRIVING IN {} MIN", minutes);
            minutes = minutes.saturating_sub(1);
            Some(DisplayIntent::StaticText {
                address: SignAddress::new(1),
                text,
                hold_seconds: 1,
            })
        },
    );

    while serial_sim.lock().unwrap().write_count() < 3 {
        thread::sleep(Duration::from_millis(1));
    }
    let ctlr = worker.stop().unwrap().unwrap();
    assert!(ctlr.close().is_ok());

    let serial_if = serial_sim.lock().unwrap();
    let mut sign = SignSim::new(1);
    sign.receive(&serial_if.writes()[0]);
    assert_eq!(sign.displayed.as_deref(), Some("ARRIVING IN 5 MIN"));
    sign.receive(&serial_if.writes()[1]);
    assert_eq!(sign.displayed.as_deref(), Some("ARRIVING IN 4 MIN"));
}

#[test]
fn cancel_stops_idle_worker() {
    let serial_sim = SerialInterface::new();
    let ctlr = SignController::new(SerialIOPlane::new(&serial_sim), ControllerIdentity::default());
    let token = CancellationToken::new();

    let worker = PeriodicWorker::spawn(ctlr, Duration::from_secs(100), token.clone(), || None);
    thread::sleep(Duration::from_millis(10));
    assert!(!worker.is_finished());

    token.cancel();
    assert!(worker.join().unwrap().is_ok());
    assert_eq!(serial_sim.lock().unwrap().write_count(), 0);
}

#[test]
fn write_error_stops_worker() {
    let serial_sim = SerialInterface::new();
    serial_sim.lock().unwrap().trigger_write_error();
    let ctlr = SignController::new(SerialIOPlane::new(&serial_sim), ControllerIdentity::default());

    let worker = PeriodicWorker::spawn(
        ctlr,
        Duration::from_millis(1),
        CancellationToken::new(),
        || Some(DisplayIntent::Trigger),
    );
    let res = worker.join().unwrap();
    assert!(matches!(res, Err(Error::Transport { .. })));
}
