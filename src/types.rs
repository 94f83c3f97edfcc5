//! This module defines the addressing and option types that go into NXTP
//! packets, along with the crate error type.

use snafu::{ensure, OptionExt, Snafu};

use core::convert::TryFrom;
use core::ops::Deref;
use core::str::FromStr;

use crate::{MAX_PKT_LEN, RESPONSE_LEN};

/// Error type for this crate
#[derive(Debug, PartialEq, Eq, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The packet would be longer than the protocol allows.
    #[snafu(display("Packet length {} exceeds maximum of {} bytes", len, max))]
    InvalidLength {
        /// Length the packet would have had, checksum included.
        len: usize,
        /// Maximum packet length.
        max: usize,
    },
    /// The segment index would encode as 0 in the position byte, which is
    /// reserved for the reset position.
    #[snafu(display("Invalid segment index {}", index))]
    InvalidSegmentIndex { index: usize },
    /// The line number doesn't fit in the low nibble of the position byte.
    #[snafu(display("Invalid line number {}", line))]
    InvalidLineNumber { line: u8 },
    /// The hold time doesn't fit in a byte when expressed in deciseconds.
    #[snafu(display("Invalid hold time of {} seconds", seconds))]
    InvalidHoldTime { seconds: u8 },
    /// Expected `mid,extPid,pid`.
    #[snafu(display("Invalid controller configuration"))]
    InvalidControllerConfig,
    /// Expected `name,value`.
    #[snafu(display("Invalid format option"))]
    InvalidFormatOption,
    /// The value isn't a valid sign address.
    #[snafu(display("Invalid address"))]
    InvalidAddress,
    /// Not enough bytes for a complete response record.
    #[snafu(display("Response too short, got {} of {} bytes", len, needed))]
    ResponseTooShort { len: usize, needed: usize },
}

const fn invalid_controller_config() -> InvalidControllerConfigSnafu {
    InvalidControllerConfigSnafu
}

const fn invalid_format_option() -> InvalidFormatOptionSnafu {
    InvalidFormatOptionSnafu
}

pub(crate) fn invalid_length(len: usize) -> Error {
    InvalidLengthSnafu {
        len,
        max: MAX_PKT_LEN,
    }
    .build()
}

pub(crate) fn response_too_short(len: usize) -> Error {
    ResponseTooShortSnafu {
        len,
        needed: RESPONSE_LEN,
    }
    .build()
}

/// The J1587 addressing bytes of the sign controller, sent at the start of
/// every packet.
///
/// ## Example
/// ```
/// use nxtp_proto::ControllerIdentity;
/// let ctlr: ControllerIdentity = "195,255,245".parse().unwrap();
/// assert_eq!(ctlr, ControllerIdentity::default());
/// assert_eq!(ctlr.mid(), 195);
/// ```
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub struct ControllerIdentity {
    mid: u8,
    ext_pid: u8,
    pid: u8,
}

impl ControllerIdentity {
    pub const fn new(mid: u8, ext_pid: u8, pid: u8) -> Self {
        Self { mid, ext_pid, pid }
    }

    /// Message identifier of the controller.
    pub const fn mid(&self) -> u8 {
        self.mid
    }

    /// Extended parameter identifier.
    pub const fn ext_pid(&self) -> u8 {
        self.ext_pid
    }

    /// Parameter identifier.
    pub const fn pid(&self) -> u8 {
        self.pid
    }

    pub(crate) const fn to_bytes(self) -> [u8; 3] {
        [self.mid, self.ext_pid, self.pid]
    }
}

impl Default for ControllerIdentity {
    fn default() -> Self {
        Self::new(195, 255, 245)
    }
}

impl FromStr for ControllerIdentity {
    type Err = Error;

    /// Parses the `mid,extPid,pid` configuration form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(',').map(|f| f.trim().parse::<u8>().ok());
        let mut next = || -> Result<u8, Error> {
            fields.next().flatten().context(invalid_controller_config())
        };
        let ctlr = Self::new(next()?, next()?, next()?);
        ensure!(fields.next().is_none(), invalid_controller_config());
        Ok(ctlr)
    }
}

/// Address of a sign on the bus. Address 0 is received by all signs.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Hash, Default)]
#[repr(transparent)]
pub struct SignAddress(u8);

impl SignAddress {
    /// The broadcast address.
    pub const BROADCAST: Self = Self(0);

    pub const fn new(address: u8) -> Self {
        Self(address)
    }

    pub const fn is_broadcast(self) -> bool {
        self.0 == 0
    }
}

impl Deref for SignAddress {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u8> for SignAddress {
    fn from(address: u8) -> Self {
        Self(address)
    }
}

impl TryFrom<usize> for SignAddress {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u8::try_from(value).ok().map(Self).context(InvalidAddressSnafu)
    }
}

impl FromStr for SignAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u8>().ok().map(Self).context(InvalidAddressSnafu)
    }
}

/// Position byte of a message packet, `(segment << 4) | line`.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
#[repr(transparent)]
pub struct Position(u8);

impl Position {
    /// Segment index 0 tells the sign to clear its display, whatever the line.
    pub const RESET: Self = Self(0);

    /// Create the position of the 1-based segment `index` on `line`.
    /// The index wraps into four bits, so segment 17 encodes like segment 1.
    /// # Errors
    /// Returns [`Error::InvalidSegmentIndex`] if `index` encodes as 0
    /// (0, 16, 32, ...), and [`Error::InvalidLineNumber`] if `line` is larger
    /// than 15.
    pub fn new(index: usize, line: u8) -> Result<Self, Error> {
        ensure!(index & 0x0f != 0, InvalidSegmentIndexSnafu { index });
        ensure!(line <= 0x0f, InvalidLineNumberSnafu { line });
        Ok(Self((((index & 0x0f) as u8) << 4) | line))
    }

    /// Use a raw position byte as-is.
    pub const fn from_raw(position: u8) -> Self {
        Self(position)
    }

    /// The segment index nibble.
    pub const fn index(self) -> u8 {
        self.0 >> 4
    }

    /// The line nibble.
    pub const fn line(self) -> u8 {
        self.0 & 0x0f
    }

    pub const fn is_reset(self) -> bool {
        self.index() == 0
    }
}

impl Deref for Position {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod position_tests {
    use super::*;

    #[test]
    fn test_position() {
        let p = Position::new(1, 1).unwrap();
        assert_eq!(*p, 0x11);
        assert_eq!(p.index(), 1);
        assert_eq!(p.line(), 1);
        assert_eq!(*Position::new(3, 1).unwrap(), 0x31);
        assert_eq!(*Position::new(15, 2).unwrap(), 0xf2);
    }

    #[test]
    fn test_position_wraps() {
        assert_eq!(Position::new(17, 1).unwrap(), Position::new(1, 1).unwrap());
        assert_eq!(*Position::new(31, 2).unwrap(), 0xf2);
    }

    #[test]
    fn test_wrapped_index_never_resets() {
        for index in &[16, 32, 48] {
            assert_eq!(
                Position::new(*index, 1),
                Err(Error::InvalidSegmentIndex { index: *index })
            );
        }
    }

    #[test]
    fn test_reset_ignores_line() {
        assert!(Position::from_raw(0x01).is_reset());
        assert!(Position::from_raw(0x0f).is_reset());
        assert!(!Position::from_raw(0x10).is_reset());
    }

    #[test]
    fn test_invalid_position() {
        assert_eq!(
            Position::new(0, 1),
            Err(Error::InvalidSegmentIndex { index: 0 })
        );
        assert_eq!(
            Position::new(1, 16),
            Err(Error::InvalidLineNumber { line: 16 })
        );
        assert!(Position::RESET.is_reset());
        assert!(!Position::new(1, 0).unwrap().is_reset());
    }
}

/// Format code for the display hold time, in deciseconds.
pub const FMT_HOLD_TIME: u8 = b'R';
/// Format code for the scroll speed.
pub const FMT_SCROLL_SPEED: u8 = b'S';

/// A single format directive, sent in an `F` packet.
///
/// The meaning of the value depends on the name, and most names are sign
/// specific. Options are passed to the sign without interpretation.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub struct FormatOption {
    name: u8,
    value: u8,
}

impl FormatOption {
    pub const fn new(name: u8, value: u8) -> Self {
        Self { name, value }
    }

    /// Hold the text on the display for `seconds`.
    /// # Errors
    /// Returns [`Error::InvalidHoldTime`] if `seconds` is more than 25, since
    /// the value is sent in deciseconds.
    pub fn hold_time(seconds: u8) -> Result<Self, Error> {
        let value = seconds
            .checked_mul(10)
            .context(InvalidHoldTimeSnafu { seconds })?;
        Ok(Self::new(FMT_HOLD_TIME, value))
    }

    pub const fn scroll_speed(speed: u8) -> Self {
        Self::new(FMT_SCROLL_SPEED, speed)
    }

    pub const fn name(&self) -> u8 {
        self.name
    }

    pub const fn value(&self) -> u8 {
        self.value
    }
}

impl FromStr for FormatOption {
    type Err = Error;

    /// Parses `name,value`, where value is either a decimal byte (`R,30`)
    /// or a single raw character (`A,c`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s.split_once(',').context(invalid_format_option())?;
        let name = match name.as_bytes() {
            [c] => *c,
            _ => return invalid_format_option().fail(),
        };
        let value = match value.parse::<u8>() {
            Ok(v) => v,
            Err(_) => match value.as_bytes() {
                [c] => *c,
                _ => return invalid_format_option().fail(),
            },
        };
        Ok(Self::new(name, value))
    }
}
