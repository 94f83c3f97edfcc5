use crate::packet::Packet;

/// Output buffer collecting several packets into a single transport write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketBuffer {
    data: Vec<u8>,
    packets: usize,
}

impl PacketBuffer {
    pub fn new() -> PacketBuffer {
        PacketBuffer {
            data: Vec::with_capacity(512),
            packets: 0,
        }
    }

    /// Append one packet, returning the number of bytes written.
    pub fn append(&mut self, packet: &Packet) -> usize {
        self.data.extend_from_slice(packet.as_bytes());
        self.packets += 1;
        packet.len()
    }

    /// Append all `packets` in order, returning the number of bytes written.
    pub fn extend<'a>(&mut self, packets: impl IntoIterator<Item = &'a Packet>) -> usize {
        packets.into_iter().map(|p| self.append(p)).sum()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of packets appended since the buffer was created or cleared.
    pub fn packet_count(&self) -> usize {
        self.packets
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.packets = 0;
    }
}

impl AsRef<[u8]> for PacketBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControllerIdentity;

    fn get_buffer() -> PacketBuffer {
        let ctlr = ControllerIdentity::default();
        let mut buf = PacketBuffer::new();
        assert_eq!(buf.append(&Packet::trigger(ctlr)), 6);
        assert_eq!(buf.append(&Packet::request_parameter(ctlr)), 6);
        buf
    }

    #[test]
    fn test_append() {
        let buf = get_buffer();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.packet_count(), 2);
        assert_eq!(&buf.as_bytes()[..5], &[195, 255, 245, 1, b'T']);
        assert_eq!(buf.as_bytes()[6], 245);
    }

    #[test]
    fn test_extend_and_clear() {
        let ctlr = ControllerIdentity::default();
        let packets = [Packet::trigger(ctlr), Packet::trigger(ctlr)];
        let mut buf = get_buffer();
        assert_eq!(buf.extend(&packets), 12);
        assert_eq!(buf.len(), 24);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.packet_count(), 0);
    }
}
