//! Sans-io packet construction for Sunrise Systems NXTP transit signs.
//!
//! NXTP signs listen on a serial bus for J1587 style packets: three
//! controller addressing bytes, a length, a packet type, the payload and a
//! two's complement checksum. This crate builds those packets, splits long
//! texts into message segments, and composes complete display updates. It
//! performs no I/O of its own; the optional [`sink`] module pushes the
//! composed bytes to any [`std::io::Write`].
//!
//! Messages and format options are buffered by the sign and only become
//! visible when a trigger packet is received.
//!
//! ```
//! use nxtp_proto::{Composer, ControllerIdentity, PacketBuffer, SignAddress};
//!
//! let composer = Composer::new(ControllerIdentity::default());
//! let packets = composer.static_text(SignAddress::new(1), "NEXT STOP: MAIN ST", 5)?;
//! assert_eq!(packets.len(), 4); // two segments, hold time, trigger
//!
//! let mut buf = PacketBuffer::new();
//! buf.extend(&packets);
//! // write buf.as_bytes() to the serial port
//! # Ok::<(), nxtp_proto::Error>(())
//! ```

mod buffer;
pub mod compose;
pub mod packet;
pub mod response;
pub mod segment;
#[cfg(feature = "std")]
pub mod sink;
pub mod types;
#[cfg(feature = "std")]
pub mod worker;

pub use buffer::PacketBuffer;
pub use compose::{Composer, DisplayIntent};
pub use packet::{Packet, WireKind};
pub use response::{parse_response, ResponseRecord};
pub use segment::{segment_count, segments, Segment};
pub use types::{ControllerIdentity, Error, FormatOption, Position, SignAddress};

/// Maximum length of any packet, checksum included.
pub const MAX_PKT_LEN: usize = 21;
/// Maximum number of text bytes carried by a single message packet.
pub const MAX_TEXT_SEG_LEN: usize = 12;
/// Longest text the sign accepts, longer texts are truncated.
pub const MAX_TEXT_LEN: usize = 156;
/// Length of the status record returned by a sign.
pub const RESPONSE_LEN: usize = 13;

/// Two's complement of the byte sum, making the sum of `data` and the
/// checksum zero.
pub fn checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, byte| acc.wrapping_add(*byte));
    sum.wrapping_neg()
}

/// Returns true if the bytes of a complete packet, checksum included, sum to zero.
pub fn verify_checksum(packet: &[u8]) -> bool {
    !packet.is_empty() && checksum(packet) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte_sum(data: &[u8]) -> u8 {
        data.iter().fold(0, |a: u8, b| a.wrapping_add(*b))
    }

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[1]), 0xff);
        assert_eq!(checksum(&[0x80, 0x80]), 0);
        assert_eq!(checksum(&[195, 255, 245, 1, b'T']), 0xf4);
    }

    #[test]
    fn test_checksum_sums_to_zero() {
        let mut data = Vec::new();
        for n in 0..=255u8 {
            data.push(n.wrapping_mul(37));
            let cs = checksum(&data);
            assert_eq!(byte_sum(&data).wrapping_add(cs), 0);
            data.push(cs);
            assert!(verify_checksum(&data));
            data.pop();
        }
    }

    #[test]
    fn test_verify_checksum() {
        assert!(!verify_checksum(&[]));
        assert!(verify_checksum(&[0]));
        assert!(!verify_checksum(&[1, 2, 3]));
        assert!(verify_checksum(&[1, 2, 3, 0xfa]));
    }
}
