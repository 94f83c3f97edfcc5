//! Construction of the J1587 framed packets understood by NXTP signs.
//!
//! | Kind | Header | Payload |
//! |---|---|---|
//! | Message | mid, extPid, pid, len, `M`, address, line, position | text |
//! | Format | mid, extPid, pid, 3, `F`, name, value | |
//! | Trigger | mid, extPid, pid, 1, `T` | |
//! | RequestParameter | pid, extPid, 128, 254, 189 | |
//!
//! Every packet ends with the [`checksum`](crate::checksum) of the preceding bytes.

use arrayvec::ArrayVec;
use log::trace;

use crate::checksum;
use crate::types::{invalid_length, ControllerIdentity, Error, FormatOption, Position, SignAddress};
use crate::{MAX_PKT_LEN, MAX_TEXT_SEG_LEN};

/// Request parameter PID 384, truncated to a byte.
const PID_REQUEST_PARAMETER: u8 = (384 % 256) as u8;
/// Data link escape PID 510, truncated to a byte.
pub(crate) const PID_DATA_LINK_ESCAPE: u8 = (510 % 256) as u8;
/// MID used by the sign when answering requests.
pub(crate) const SIGN_MID: u8 = 189;

/// The kind of a packet, determining its header layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// Text for one segment of a line.
    Message,
    /// A format directive.
    Format,
    /// Makes the sign display the message and format packets received so far.
    Trigger,
    /// Status poll, answered with a [`ResponseRecord`](crate::ResponseRecord).
    RequestParameter,
}

impl WireKind {
    /// The packet type byte following the length field, if the kind has one.
    pub const fn type_byte(self) -> Option<u8> {
        match self {
            WireKind::Message => Some(b'M'),
            WireKind::Format => Some(b'F'),
            WireKind::Trigger => Some(b'T'),
            WireKind::RequestParameter => None,
        }
    }

    /// Number of header bytes preceding the payload.
    pub const fn header_len(self) -> usize {
        match self {
            WireKind::Message => 8,
            WireKind::Format => 7,
            WireKind::Trigger | WireKind::RequestParameter => 5,
        }
    }
}

type PacketBytes = ArrayVec<u8, MAX_PKT_LEN>;

/// A complete packet, checksum included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    kind: WireKind,
    data: PacketBytes,
}

impl Packet {
    fn build(kind: WireKind, header: &[u8], payload: &[u8]) -> Result<Self, Error> {
        debug_assert_eq!(header.len(), kind.header_len());
        let len = header.len() + payload.len() + 1;
        if len > MAX_PKT_LEN {
            return Err(invalid_length(len));
        }

        let mut data = PacketBytes::new();
        data.try_extend_from_slice(header)
            .map_err(|_| invalid_length(len))?;
        data.try_extend_from_slice(payload)
            .map_err(|_| invalid_length(len))?;
        data.push(checksum(&data));

        trace!("Built {:?} packet {:02x?}", kind, data.as_slice());
        Ok(Self { kind, data })
    }

    fn build_fixed(kind: WireKind, header: &[u8]) -> Self {
        Self::build(kind, header, &[]).expect("BUG: Fixed size packet too long.")
    }

    /// Build a message packet carrying `text` at `position` on `line`.
    ///
    /// The text is sent as raw bytes, without a terminator.
    /// # Errors
    /// Returns [`Error::InvalidLength`] if `text` is longer than
    /// [`MAX_TEXT_SEG_LEN`](crate::MAX_TEXT_SEG_LEN) bytes.
    ///
    /// ```
    /// use nxtp_proto::{ControllerIdentity, Packet, Position, SignAddress};
    /// let ctlr = ControllerIdentity::new(195, 255, 245);
    /// let pkt = Packet::message(ctlr, SignAddress::new(1), 1, Position::from_raw(0x11), "0")?;
    /// assert_eq!(&pkt.as_bytes()[..8], &[195, 255, 245, 5, b'M', 1, 1, 0x11]);
    /// assert_eq!(pkt.len(), 10);
    /// # Ok::<(), nxtp_proto::Error>(())
    /// ```
    pub fn message(
        identity: ControllerIdentity,
        address: SignAddress,
        line: u8,
        position: Position,
        text: impl AsRef<[u8]>,
    ) -> Result<Self, Error> {
        let text = text.as_ref();
        if text.len() > MAX_TEXT_SEG_LEN {
            return Err(invalid_length(
                WireKind::Message.header_len() + text.len() + 1,
            ));
        }
        let [mid, ext_pid, pid] = identity.to_bytes();
        let header = [
            mid,
            ext_pid,
            pid,
            4 + text.len() as u8, // type, address, line and position precede the text
            b'M',
            *address,
            line,
            *position,
        ];
        Self::build(WireKind::Message, &header, text)
    }

    /// Build a format packet for `option`.
    pub fn format(identity: ControllerIdentity, option: FormatOption) -> Self {
        let [mid, ext_pid, pid] = identity.to_bytes();
        Self::build_fixed(
            WireKind::Format,
            &[mid, ext_pid, pid, 3, b'F', option.name(), option.value()],
        )
    }

    /// Build a trigger packet.
    pub fn trigger(identity: ControllerIdentity) -> Self {
        let [mid, ext_pid, pid] = identity.to_bytes();
        Self::build_fixed(WireKind::Trigger, &[mid, ext_pid, pid, 1, b'T'])
    }

    /// Build a request parameter packet, polling the sign status.
    ///
    /// Note that the controller PID takes the place of the MID here.
    pub fn request_parameter(identity: ControllerIdentity) -> Self {
        Self::build_fixed(
            WireKind::RequestParameter,
            &[
                identity.pid(),
                identity.ext_pid(),
                PID_REQUEST_PARAMETER,
                PID_DATA_LINK_ESCAPE,
                SIGN_MID,
            ],
        )
    }

    pub fn kind(&self) -> WireKind {
        self.kind
    }

    /// The on-wire bytes of the packet.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Total length of the packet, checksum included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false, a packet has at least a header and a checksum.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The bytes between the header and the checksum.
    pub fn payload(&self) -> &[u8] {
        &self.data[self.kind.header_len()..self.data.len() - 1]
    }

    /// The trailing checksum byte.
    pub fn checksum(&self) -> u8 {
        self.data[self.data.len() - 1]
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
