//! Little-endian 16-bit word extraction.

use core::{iter::FusedIterator, slice::ChunksExact};

/// An [`Iterator`] over the little-endian 16-bit words packed into a byte slice.
///
/// A trailing odd byte is never paired and is not yielded: a slice of `n` bytes produces
/// exactly `n / 2` words.
#[derive(Clone, Debug)]
pub struct Words<'slice> {
    /// The remaining byte pairs.
    chunks: ChunksExact<'slice, u8>,
}

impl<'slice> Words<'slice> {
    /// Creates a new [`Words`] over `bytes`.
    pub fn new(bytes: &'slice [u8]) -> Self {
        Self {
            chunks: bytes.chunks_exact(2),
        }
    }

    /// Pairs every word with its byte offset from the start of the slice.
    pub fn with_offsets(self) -> impl Iterator<Item = (usize, u16)> + Clone + 'slice {
        self.enumerate().map(|(index, word)| (index * 2, word))
    }

    /// Returns the odd byte left over at the end of the slice, if any.
    pub fn remainder(&self) -> Option<u8> {
        self.chunks.remainder().first().copied()
    }
}

impl Iterator for Words<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks
            .next()
            .and_then(|pair| pair.try_into().ok())
            .map(u16::from_le_bytes)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Words<'_> {}

impl FusedIterator for Words<'_> {}
