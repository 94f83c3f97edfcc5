//! Composition of complete display updates.
//!
//! A sign keeps message and format packets in memory without showing them.
//! Only a trigger packet makes the pending state visible, so an atomic update
//! is: all message packets, any format packets, then exactly one trigger.
//! The [`Composer`] methods that produce a full update end with the trigger;
//! [`Composer::text`] and [`Composer::format`] don't, and it is up to the
//! caller to send one.

use log::warn;

use crate::packet::Packet;
use crate::segment::segments;
use crate::types::{ControllerIdentity, Error, FormatOption, Position, SignAddress};
use crate::MAX_TEXT_LEN;

/// Line used for text unless another one is given.
pub const DEFAULT_LINE: u8 = 1;

/// Payload of the reset message.
const RESET_TEXT: &[u8] = b"0";

/// A display request for one sign address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayIntent {
    /// Show `text`, holding it for `hold_seconds`. Texts too long for the
    /// display are scrolled by the sign.
    StaticText {
        address: SignAddress,
        text: String,
        hold_seconds: u8,
    },
    /// Scroll `text` at `speed`.
    ScrollingText {
        address: SignAddress,
        text: String,
        speed: u8,
    },
    /// Send format options without committing them.
    Format(Vec<FormatOption>),
    /// Clear the display immediately.
    Reset { address: SignAddress },
    /// Display whatever has been sent so far.
    Trigger,
}

/// Builds packet sequences for a single controller.
///
/// ```
/// use nxtp_proto::{Composer, ControllerIdentity, SignAddress, WireKind};
/// let composer = Composer::new(ControllerIdentity::default());
/// let kinds: Vec<_> = composer
///     .reset(SignAddress::BROADCAST)
///     .iter()
///     .map(|p| p.kind())
///     .collect();
/// assert_eq!(kinds, [WireKind::Message, WireKind::Trigger]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Composer {
    identity: ControllerIdentity,
}

impl Composer {
    pub const fn new(identity: ControllerIdentity) -> Self {
        Self { identity }
    }

    pub const fn identity(&self) -> ControllerIdentity {
        self.identity
    }

    /// Message packets for `text` on the default line. No trigger is included.
    pub fn text(&self, address: SignAddress, text: impl AsRef<[u8]>) -> Result<Vec<Packet>, Error> {
        self.text_on_line(address, text, DEFAULT_LINE)
    }

    /// One message packet per segment of `text`, in order. No trigger is included.
    ///
    /// Text beyond [`MAX_TEXT_LEN`](crate::MAX_TEXT_LEN) bytes is dropped.
    /// # Errors
    /// Returns [`Error::InvalidLineNumber`] if `line` is larger than 15.
    pub fn text_on_line(
        &self,
        address: SignAddress,
        text: impl AsRef<[u8]>,
        line: u8,
    ) -> Result<Vec<Packet>, Error> {
        let mut text = text.as_ref();
        if text.len() > MAX_TEXT_LEN {
            warn!(
                "Text is {} bytes, truncating to {}",
                text.len(),
                MAX_TEXT_LEN
            );
            text = &text[..MAX_TEXT_LEN];
        }

        segments(text)
            .map(|segment| {
                Packet::message(
                    self.identity,
                    address,
                    line,
                    segment.position(line)?,
                    segment.text(),
                )
            })
            .collect()
    }

    /// Clear the display of the sign at `address`, followed by a trigger.
    pub fn reset(&self, address: SignAddress) -> Vec<Packet> {
        let reset = Packet::message(
            self.identity,
            address,
            DEFAULT_LINE,
            Position::RESET,
            RESET_TEXT,
        )
        .expect("BUG: Reset message too long.");
        vec![reset, self.trigger()]
    }

    /// One format packet per option, in the given order.
    pub fn format(&self, options: &[FormatOption]) -> Vec<Packet> {
        options
            .iter()
            .map(|option| Packet::format(self.identity, *option))
            .collect()
    }

    pub fn trigger(&self) -> Packet {
        Packet::trigger(self.identity)
    }

    /// Poll the sign status.
    pub fn request_status(&self) -> Packet {
        Packet::request_parameter(self.identity)
    }

    /// Text held on the display for `hold_seconds`, with trigger.
    /// # Errors
    /// Returns [`Error::InvalidHoldTime`] if `hold_seconds` is larger than 25.
    pub fn static_text(
        &self,
        address: SignAddress,
        text: impl AsRef<[u8]>,
        hold_seconds: u8,
    ) -> Result<Vec<Packet>, Error> {
        let hold = FormatOption::hold_time(hold_seconds)?;
        self.update(address, text, &[hold])
    }

    /// Scrolling text, with trigger.
    pub fn scrolling_text(
        &self,
        address: SignAddress,
        text: impl AsRef<[u8]>,
        speed: u8,
    ) -> Result<Vec<Packet>, Error> {
        self.update(address, text, &[FormatOption::scroll_speed(speed)])
    }

    /// Text, format options and a trigger, in that order.
    pub fn update(
        &self,
        address: SignAddress,
        text: impl AsRef<[u8]>,
        options: &[FormatOption],
    ) -> Result<Vec<Packet>, Error> {
        let mut packets = self.text(address, text)?;
        packets.extend(self.format(options));
        packets.push(self.trigger());
        Ok(packets)
    }

    /// Packets for `intent`, in the order they are to be sent.
    pub fn compose(&self, intent: &DisplayIntent) -> Result<Vec<Packet>, Error> {
        match intent {
            DisplayIntent::StaticText {
                address,
                text,
                hold_seconds,
            } => self.static_text(*address, text, *hold_seconds),
            DisplayIntent::ScrollingText {
                address,
                text,
                speed,
            } => self.scrolling_text(*address, text, *speed),
            DisplayIntent::Format(options) => Ok(self.format(options)),
            DisplayIntent::Reset { address } => Ok(self.reset(*address)),
            DisplayIntent::Trigger => Ok(vec![self.trigger()]),
        }
    }
}
