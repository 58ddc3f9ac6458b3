//! Bounds-checked access to an immutable, contiguous byte image.

use core::{error, fmt};

use crate::{u64_to_usize, usize_to_u64};

/// An immutable and contiguous source of bytes that ELF structures are decoded from.
///
/// The byte values and the value of [`Medium::size()`] must never change between reads.
///
/// # Implementors
///
/// Implementations must treat any overflow in `offset + length` as an [`OutOfBounds`] error
/// ([`check_bounds()`] centralizes this).
pub trait Medium {
    /// The number of bytes available to be retrieved.
    fn size(&self) -> u64;

    /// Reads a single byte at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if `offset` lies outside of the [`Medium`].
    fn read_byte(&self, offset: u64) -> Result<u8, OutOfBounds> {
        let mut val = 0;

        self.read_slice(offset, core::array::from_mut(&mut val))?;
        Ok(val)
    }

    /// Reads `slice.len()` bytes into `slice` from `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the requested region does not fit inside the [`Medium`].
    fn read_slice(&self, offset: u64, slice: &mut [u8]) -> Result<(), OutOfBounds>;

    /// Borrows `length` bytes at `offset` directly from the [`Medium`].
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the requested region does not fit inside the [`Medium`].
    fn access_slice(&self, offset: u64, length: u64) -> Result<&[u8], OutOfBounds>;
}

/// A requested region does not fit inside a [`Medium`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct OutOfBounds {
    /// The offset, in bytes, of the start of the requested region.
    pub offset: u64,
    /// The size, in bytes, of the requested region.
    pub length: u64,
    /// The actual size of the [`Medium`].
    pub size: u64,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested region at {} bytes with a length of {} \
            does not fit inside image of {} bytes",
            self.offset, self.length, self.size
        )
    }
}

impl error::Error for OutOfBounds {}

/// Checks that `length` bytes at `offset` fit inside `size` bytes.
///
/// # Errors
///
/// Returns [`OutOfBounds`] if `offset + length` overflows or exceeds `size`.
pub fn check_bounds(size: u64, offset: u64, length: u64) -> Result<(), OutOfBounds> {
    let error = OutOfBounds {
        offset,
        length,
        size,
    };

    let max_offset = offset.checked_add(length).ok_or(error)?;
    if max_offset > size {
        return Err(error);
    }

    Ok(())
}

impl Medium for [u8] {
    fn size(&self) -> u64 {
        usize_to_u64(self.len())
    }

    fn read_slice(&self, offset: u64, slice: &mut [u8]) -> Result<(), OutOfBounds> {
        slice.copy_from_slice(self.access_slice(offset, usize_to_u64(slice.len()))?);
        Ok(())
    }

    fn access_slice(&self, offset: u64, length: u64) -> Result<&[u8], OutOfBounds> {
        check_bounds(self.size(), offset, length)?;

        // The requested region fits within a `usize`, since the bounds check succeeded and the
        // upper bound is a `usize`.
        Ok(&self[u64_to_usize(offset)..][..u64_to_usize(length)])
    }
}

impl<M: Medium + ?Sized> Medium for &M {
    fn size(&self) -> u64 {
        M::size(*self)
    }

    fn read_byte(&self, offset: u64) -> Result<u8, OutOfBounds> {
        M::read_byte(*self, offset)
    }

    fn read_slice(&self, offset: u64, slice: &mut [u8]) -> Result<(), OutOfBounds> {
        M::read_slice(*self, offset, slice)
    }

    fn access_slice(&self, offset: u64, length: u64) -> Result<&[u8], OutOfBounds> {
        M::access_slice(*self, offset, length)
    }
}
