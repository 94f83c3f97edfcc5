//! Splitting of display text into message-sized segments.

use crate::types::{Error, Position};
use crate::MAX_TEXT_SEG_LEN;

/// Number of message packets needed for a text of `len` bytes.
///
/// An empty text still needs one (empty) segment.
///
/// ```
/// use nxtp_proto::segment_count;
/// assert_eq!(segment_count(0), 1);
/// assert_eq!(segment_count(12), 1);
/// assert_eq!(segment_count(13), 2);
/// ```
pub fn segment_count(len: usize) -> usize {
    let mut segments = len / MAX_TEXT_SEG_LEN;
    if len % MAX_TEXT_SEG_LEN != 0 || segments == 0 {
        segments += 1;
    }
    segments
}

/// One chunk of text, sent in a single message packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    index: usize,
    text: &'a [u8],
}

impl<'a> Segment<'a> {
    /// 1-based index of the segment within the text.
    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn text(&self) -> &'a [u8] {
        self.text
    }

    /// The position byte of this segment on `line`.
    /// # Errors
    /// Returns [`Error::InvalidLineNumber`] if `line` is larger than 15, and
    /// [`Error::InvalidSegmentIndex`] for segments 16, 32, ... whose index
    /// would encode as the reset position.
    pub fn position(&self, line: u8) -> Result<Position, Error> {
        Position::new(self.index, line)
    }
}

/// Iterator over the segments of a text, see [`segments`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    remaining: &'a [u8],
    next_index: usize,
    done: bool,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let split = self.remaining.len().min(MAX_TEXT_SEG_LEN);
        let (text, rest) = self.remaining.split_at(split);
        let segment = Segment {
            index: self.next_index,
            text,
        };
        self.remaining = rest;
        self.next_index += 1;
        self.done = rest.is_empty();
        Some(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.done {
            0
        } else {
            segment_count(self.remaining.len())
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Segments<'_> {}

/// Split `text` into segments of at most
/// [`MAX_TEXT_SEG_LEN`](crate::MAX_TEXT_SEG_LEN) bytes, in order.
///
/// ```
/// use nxtp_proto::segments;
/// let parts: Vec<_> = segments("HELLO WORLD TRANSIT").map(|s| s.text()).collect();
/// assert_eq!(parts, [&b"HELLO WORLD "[..], &b"TRANSIT"[..]]);
/// ```
pub fn segments<T: AsRef<[u8]> + ?Sized>(text: &T) -> Segments<'_> {
    Segments {
        remaining: text.as_ref(),
        next_index: 1,
        done: false,
    }
}
