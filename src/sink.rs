//! Sending composed packets to signs.
//!
//! [`SignController`] combines a [`Composer`] with a [`ByteSink`], usually a
//! serial port, and writes every display update in a single `send` call.
//!
//! # Example
//!
//! ```
//! use nxtp_proto::sink::SignController;
//! use nxtp_proto::{ControllerIdentity, SignAddress};
//!
//! # fn main() -> Result<(), nxtp_proto::sink::Error> {
//! let port: Vec<u8> = Vec::new(); // a serial port in real life
//! let mut sign = SignController::new(port, ControllerIdentity::default());
//! sign.reset(SignAddress::BROADCAST)?;
//! sign.show_scrolling_text(SignAddress::new(3), "NEXT STOP: 5TH AVE", 4)?;
//! let written = sign.into_inner();
//! assert_eq!(written.len(), 16 + 21 + 15 + 8 + 6);
//! # Ok(()) }
//! ```

use std::io;

use log::debug;
use snafu::{ResultExt, Snafu};

use crate::buffer::PacketBuffer;
use crate::compose::{Composer, DisplayIntent};
use crate::packet::Packet;
use crate::types::{ControllerIdentity, Error as ProtocolError, FormatOption, SignAddress};

/// Error type for the sign controller.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The byte sink failed to send or close.
    #[snafu(display("Transport failure"))]
    Transport { source: io::Error },
    /// The requested update couldn't be turned into packets.
    #[snafu(display("Invalid display update"))]
    Compose { source: ProtocolError },
}

/// Destination for packet bytes, typically a serial port.
pub trait ByteSink {
    /// Transmit all of `data`.
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Finish transmitting. The sink isn't used after this.
    fn close(&mut self) -> io::Result<()>;
}

impl<W: io::Write> ByteSink for W {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data)?;
        self.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// Sends display updates through a [`ByteSink`].
#[derive(Debug)]
pub struct SignController<S> {
    sink: S,
    composer: Composer,
    buffer: PacketBuffer,
}

impl<S: ByteSink> SignController<S> {
    pub fn new(sink: S, identity: ControllerIdentity) -> Self {
        Self {
            sink,
            composer: Composer::new(identity),
            buffer: PacketBuffer::new(),
        }
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Send `packets` in one write, returning the number of bytes sent.
    pub fn send_packets(&mut self, packets: &[Packet]) -> Result<usize, Error> {
        self.buffer.clear();
        let len = self.buffer.extend(packets);
        debug!(
            "Sending {} packets, {} bytes: {:02x?}",
            self.buffer.packet_count(),
            len,
            self.buffer.as_bytes()
        );
        self.sink.send(self.buffer.as_bytes()).context(TransportSnafu)?;
        Ok(len)
    }

    /// Compose and send `intent`.
    pub fn show(&mut self, intent: &DisplayIntent) -> Result<usize, Error> {
        let packets = self.composer.compose(intent).context(ComposeSnafu)?;
        self.send_packets(&packets)
    }

    /// Clear the display right away.
    pub fn reset(&mut self, address: SignAddress) -> Result<usize, Error> {
        let packets = self.composer.reset(address);
        self.send_packets(&packets)
    }

    pub fn show_static_text(
        &mut self,
        address: SignAddress,
        text: impl AsRef<[u8]>,
        hold_seconds: u8,
    ) -> Result<usize, Error> {
        let packets = self
            .composer
            .static_text(address, text, hold_seconds)
            .context(ComposeSnafu)?;
        self.send_packets(&packets)
    }

    pub fn show_scrolling_text(
        &mut self,
        address: SignAddress,
        text: impl AsRef<[u8]>,
        speed: u8,
    ) -> Result<usize, Error> {
        let packets = self
            .composer
            .scrolling_text(address, text, speed)
            .context(ComposeSnafu)?;
        self.send_packets(&packets)
    }

    /// Send format options. They take effect with the next trigger.
    pub fn apply_format(&mut self, options: &[FormatOption]) -> Result<usize, Error> {
        let packets = self.composer.format(options);
        self.send_packets(&packets)
    }

    /// Display everything sent since the last trigger.
    pub fn trigger(&mut self) -> Result<usize, Error> {
        let packet = self.composer.trigger();
        self.send_packets(&[packet])
    }

    /// Ask the sign for its status record, see [`parse_response`](crate::parse_response).
    pub fn request_status(&mut self) -> Result<usize, Error> {
        let packet = self.composer.request_status();
        self.send_packets(&[packet])
    }

    /// Show `text` with `options` on every sign in `addresses`.
    ///
    /// Each sign is reset first, then receives the text, the format options
    /// and a trigger in a single write.
    pub fn update(
        &mut self,
        addresses: &[SignAddress],
        text: impl AsRef<[u8]>,
        options: &[FormatOption],
    ) -> Result<usize, Error> {
        let text = text.as_ref();
        let mut sent = 0;
        for address in addresses {
            let packets = self
                .composer
                .update(*address, text, options)
                .context(ComposeSnafu)?;
            sent += self.reset(*address)?;
            sent += self.send_packets(&packets)?;
        }
        Ok(sent)
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Close the sink.
    pub fn close(mut self) -> Result<S, Error> {
        self.sink.close().context(TransportSnafu)?;
        Ok(self.sink)
    }

    /// Return the sink without closing it.
    pub fn into_inner(self) -> S {
        self.sink
    }
}
