//! Lookup of NUL-terminated names in an ELF string table section.

use core::{error, ffi::CStr, fmt};

use crate::{u64_to_usize, usize_to_u64};

/// The contents of a string table section.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct StringTable<'slice> {
    /// The bytes of the string table section.
    bytes: &'slice [u8],
}

impl<'slice> StringTable<'slice> {
    /// Creates a new [`StringTable`] over `bytes`.
    pub fn new(bytes: &'slice [u8]) -> Self {
        Self { bytes }
    }

    /// Returns the string that starts `offset` bytes into the [`StringTable`].
    ///
    /// # Errors
    ///
    /// - [`StringTableError::OffsetOutOfRange`]: `offset` lies past the end of the table.
    /// - [`StringTableError::MissingTerminator`]: no NUL byte follows `offset`.
    pub fn get(&self, offset: u32) -> Result<&'slice CStr, StringTableError> {
        let size = usize_to_u64(self.bytes.len());
        if u64::from(offset) >= size {
            return Err(StringTableError::OffsetOutOfRange { offset, size });
        }

        // `offset` is smaller than the table length, which is a `usize`.
        CStr::from_bytes_until_nul(&self.bytes[u64_to_usize(u64::from(offset))..])
            .map_err(|_| StringTableError::MissingTerminator { offset })
    }

    /// Returns the size of the [`StringTable`] in bytes.
    pub fn size(&self) -> u64 {
        usize_to_u64(self.bytes.len())
    }
}

/// Various ways a section name string table can be malformed.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum StringTableError {
    /// The section header string table index does not name a section.
    MissingSection {
        /// The index taken from the ELF header.
        index: u64,
        /// The number of sections in the section header table.
        count: u64,
    },
    /// A name offset lies past the end of the string table.
    OffsetOutOfRange {
        /// The offset of the name.
        offset: u32,
        /// The size of the string table.
        size: u64,
    },
    /// The string table ends before the name's NUL terminator.
    MissingTerminator {
        /// The offset of the name.
        offset: u32,
    },
}

impl fmt::Display for StringTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSection { index, count } => write!(
                f,
                "section name string table index {index} is out of range for {count} sections"
            ),
            Self::OffsetOutOfRange { offset, size } => write!(
                f,
                "name offset {offset} is past the end of the {size} byte string table"
            ),
            Self::MissingTerminator { offset } => {
                write!(f, "name at offset {offset} is not NUL-terminated")
            }
        }
    }
}

impl error::Error for StringTableError {}
