#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::sync::{Arc, Mutex};

use nxtp_proto::{verify_checksum, Position};

/// Simulated serial port, recording every write.
#[derive(Default)]
pub struct SerialInterface {
    writes: Vec<Vec<u8>>,
    do_write_error: bool,
}

impl SerialInterface {
    pub fn new() -> Arc<Mutex<SerialInterface>> {
        Default::default()
    }

    pub fn trigger_write_error(&mut self) {
        self.do_write_error = true;
    }

    /// Number of write calls that reached the port.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    pub fn tx(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

pub struct SerialIOPlane(Arc<Mutex<SerialInterface>>);

impl SerialIOPlane {
    pub fn new(serial_if: &Arc<Mutex<SerialInterface>>) -> SerialIOPlane {
        SerialIOPlane(Arc::clone(serial_if))
    }
}

impl std::io::Write for SerialIOPlane {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut inner = self.0.lock().unwrap();
        if inner.do_write_error {
            inner.do_write_error = false;
            Err(Error::new(ErrorKind::PermissionDenied, "write error"))
        } else {
            inner.writes.push(buf.to_vec());
            Ok(buf.len())
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Split a byte stream of message, format and trigger packets.
pub fn split_packets(mut data: &[u8]) -> Vec<&[u8]> {
    let mut packets = Vec::new();
    while data.len() >= 4 {
        let len = 4 + data[3] as usize + 1;
        assert!(data.len() >= len, "Truncated packet");
        let (pkt, rest) = data.split_at(len);
        assert!(verify_checksum(pkt), "Bad checksum in {:?}", pkt);
        packets.push(pkt);
        data = rest;
    }
    assert!(data.is_empty(), "Trailing bytes {:?}", data);
    packets
}

/// Minimal model of a sign: buffers message segments and format options
/// until a trigger.
#[derive(Default, Debug)]
pub struct SignSim {
    pub address: u8,
    pending: BTreeMap<u8, Vec<u8>>,
    pending_format: Vec<(u8, u8)>,
    pub displayed: Option<String>,
    pub format: Vec<(u8, u8)>,
    pub triggers: usize,
}

impl SignSim {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    pub fn receive(&mut self, data: &[u8]) {
        for pkt in split_packets(data) {
            match pkt[4] {
                b'M' if pkt[5] == self.address || pkt[5] == 0 => {
                    let position = Position::from_raw(pkt[7]);
                    if position.is_reset() {
                        self.pending.clear();
                        self.displayed = None;
                    } else {
                        let text = &pkt[8..pkt.len() - 1];
                        self.pending.insert(position.index(), text.to_vec());
                    }
                }
                b'M' => {}
                b'F' => self.pending_format.push((pkt[5], pkt[6])),
                b'T' => {
                    self.triggers += 1;
                    if !self.pending.is_empty() {
                        let text: Vec<u8> = self.pending.values().flatten().copied().collect();
                        self.displayed = Some(String::from_utf8(text).unwrap());
                        self.pending.clear();
                    }
                    self.format = std::mem::take(&mut self.pending_format);
                }
                other => panic!("Unexpected packet type {}", other),
            }
        }
    }
}
