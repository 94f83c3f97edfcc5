//! Parser for the status record a sign sends in reply to a
//! [request parameter](crate::Packet::request_parameter) packet.
//!
//! The checksum of the record is copied but not verified, so a corrupted
//! record parses just like a valid one. Use
//! [`verify_checksum`](crate::verify_checksum) on the raw bytes if that matters.

use nom::combinator::map;
use nom::number::complete::u8 as byte;
use nom::sequence::tuple;
use nom::IResult;

use crate::types::{response_too_short, Error};
use crate::RESPONSE_LEN;

type Buf = [u8];

/// Data link escape record, copied field by field from the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    /// MID of the sign, normally 189.
    pub sign_mid: u8,
    pub ext_pid: u8,
    /// Normally 254, the data link escape PID.
    pub pid: u8,
    /// MID of the controller the record is addressed to.
    pub mid: u8,
    /// Number of bytes following, excluding the checksum. Normally 7.
    pub len: u8,
    pub address: u8,
    /// `R`, `B` or `P`.
    pub state: u8,
    pub host_mid: u8,
    pub tbmu: u8,
    pub tbml: u8,
    pub fbm: u8,
    /// `S` or `F`.
    pub aux_state: u8,
    pub checksum: u8,
}

impl ResponseRecord {
    /// The `tbmu` and `tbml` bytes as one big-endian counter.
    pub fn tbm(&self) -> u16 {
        u16::from_be_bytes([self.tbmu, self.tbml])
    }
}

/// Parse a status record from `buf`. Bytes following the record are ignored.
///
/// # Errors
/// Returns [`Error::ResponseTooShort`] if `buf` holds less than
/// [`RESPONSE_LEN`](crate::RESPONSE_LEN) bytes.
pub fn parse_response(buf: &[u8]) -> Result<ResponseRecord, Error> {
    if buf.len() < RESPONSE_LEN {
        return Err(response_too_short(buf.len()));
    }
    record(buf)
        .map(|(_rest, record)| record)
        .map_err(|_| response_too_short(buf.len()))
}

fn record(buf: &Buf) -> IResult<&Buf, ResponseRecord> {
    map(
        tuple((
            tuple((byte, byte, byte, byte, byte, byte)),
            tuple((byte, byte, byte, byte, byte, byte, byte)),
        )),
        |(
            (sign_mid, ext_pid, pid, mid, len, address),
            (state, host_mid, tbmu, tbml, fbm, aux_state, checksum),
        )| ResponseRecord {
            sign_mid,
            ext_pid,
            pid,
            mid,
            len,
            address,
            state,
            host_mid,
            tbmu,
            tbml,
            fbm,
            aux_state,
            checksum,
        },
    )(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum;

    fn response_bytes() -> Vec<u8> {
        let mut buf = vec![189, 255, 254, 195, 7, 1, b'R', 195, 0x01, 0x02, 0x30, b'S'];
        buf.push(checksum(&buf));
        buf
    }

    #[test]
    fn test_parse_response() {
        let buf = response_bytes();
        let rec = parse_response(&buf).unwrap();
        assert_eq!(rec.sign_mid, 189);
        assert_eq!(rec.pid, 254);
        assert_eq!(rec.mid, 195);
        assert_eq!(rec.len, 7);
        assert_eq!(rec.address, 1);
        assert_eq!(rec.state, b'R');
        assert_eq!(rec.tbm(), 0x0102);
        assert_eq!(rec.fbm, 0x30);
        assert_eq!(rec.aux_state, b'S');
        assert_eq!(rec.checksum, buf[12]);
    }

    #[test]
    fn test_short_response() {
        let buf = response_bytes();
        assert_eq!(
            parse_response(&buf[..12]),
            Err(Error::ResponseTooShort { len: 12, needed: 13 })
        );
        assert!(parse_response(&[]).is_err());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut buf = response_bytes();
        let rec = parse_response(&buf).unwrap();
        buf.extend_from_slice(b"garbage");
        assert_eq!(parse_response(&buf), Ok(rec));
    }

    #[test]
    fn test_bad_checksum_is_accepted() {
        // Known gap: the record checksum isn't validated.
        let mut buf = response_bytes();
        buf[12] = buf[12].wrapping_add(1);
        assert!(!crate::verify_checksum(&buf));
        let rec = parse_response(&buf).unwrap();
        assert_eq!(rec.state, b'R');
    }
}
