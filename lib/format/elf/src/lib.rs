//! The `elf` crate provides an interface for reading 32-bit ELF files.
//!
//! # Capabilities
//!
//! ## Works in `no_std` environments
//!
//! Parsing does not allocate or use any `std` features.
//!
//! ## Bounds-checked parsing
//!
//! Every header and section header field is decoded through a [`Medium`] that checks the
//! requested region against the size of the image. Malformed offsets surface as
//! [`OutOfBounds`][medium::OutOfBounds] errors instead of out-of-range reads.
//!
//! ## Endian Awareness
//!
//! Fields are decoded according to the [`Encoding`] of the file, independent of the host.
//!
//! ## Lazy Parsing
//!
//! Structures are views over the borrowed image that only decode a field when it is requested.
//!
//! ## Uses no unsafe code
//!
//! This crate contains zero unsafe blocks of code.
#![no_std]

#[cfg(test)]
extern crate std;

use core::{ffi::CStr, fmt};

use crate::{
    encoding::Encoding,
    header::{ElfHeader, ElfHeaderError},
    medium::{Medium, OutOfBounds},
    section_header::{SectionHeader, SectionHeaderTable},
    sections::{Section, SectionError, Sections},
    string_table::{StringTable, StringTableError},
};

pub mod encoding;
pub mod header;
pub mod ident;
pub mod medium;
pub mod raw;
pub mod section_header;
pub mod sections;
pub mod string_table;
pub mod table;

#[cfg(test)]
mod test_util;

/// Section header table index meaning "no section".
pub const SHN_UNDEF: u16 = 0;
/// Section header string table index meaning the real index is stored in the `link` field of
/// the section header at index 0.
pub const SHN_XINDEX: u16 = 0xFFFF;

/// A 32-bit ELF file.
pub struct Elf<'slice, M: ?Sized, E> {
    /// The underlying [`Medium`] of this [`Elf`].
    medium: &'slice M,
    /// The [`Encoding`] used to decode this [`Elf`].
    encoding: E,
}

impl<'slice, M: Medium + ?Sized, E: Encoding> Elf<'slice, M, E> {
    /// Creates a new [`Elf`] from the given `medium`.
    ///
    /// # Errors
    ///
    /// Returns an [`ElfHeaderError`] if `medium` is not a 32-bit ELF file in an [`Encoding`]
    /// supported by `E`, or is too small to hold the header.
    pub fn new(medium: &'slice M) -> Result<Self, ElfHeaderError> {
        let header = ElfHeader::<M, E>::new(medium)?;

        Ok(Self {
            medium,
            encoding: header.encoding,
        })
    }

    /// Returns the [`ElfHeader`] of this [`Elf`].
    pub fn header(&self) -> ElfHeader<'slice, M, E> {
        ElfHeader {
            medium: self.medium,
            encoding: self.encoding,
        }
    }

    /// Returns the [`SectionHeaderTable`] of this [`Elf`].
    ///
    /// Returns [`None`] if the file has no section header table.
    ///
    /// # Errors
    ///
    /// - [`SectionError::InvalidEntrySize`]: the declared entry size is smaller than a
    ///   [`SectionHeader`].
    /// - [`SectionError::OutOfBounds`]: the table does not fit inside the [`Medium`].
    pub fn section_header_table(
        &self,
    ) -> Result<Option<SectionHeaderTable<'slice, M, E>>, SectionError> {
        let header = self.header();

        let offset = u64::from(header.section_header_offset()?);
        if offset == 0 {
            return Ok(None);
        }

        let entry_size = header.section_header_size()?;
        let stride = u64::from(entry_size);
        if stride < SectionHeader::<M, E>::SIZE {
            return Err(SectionError::InvalidEntrySize(entry_size));
        }

        let count = match header.section_header_count()? {
            // Files with too many sections to count in the ELF header store the count in the
            // size field of the section header at index 0.
            0 => SectionHeader::new(self.encoding, offset, self.medium)
                .ok_or(OutOfBounds {
                    offset,
                    length: stride,
                    size: self.medium.size(),
                })?
                .size()?
                .into(),
            count => u64::from(count),
        };

        SectionHeaderTable::new(self.encoding, self.medium, offset, count, stride)
            .map(Some)
            .ok_or(SectionError::OutOfBounds(OutOfBounds {
                offset,
                length: count.saturating_mul(stride),
                size: self.medium.size(),
            }))
    }

    /// Returns the section name [`StringTable`] of this [`Elf`].
    ///
    /// Returns [`None`] if the file has no section header table or declares no section name
    /// string table.
    ///
    /// # Errors
    ///
    /// - [`SectionError::MalformedStringTable`]: the string table index does not name a
    ///   section.
    /// - [`SectionError::OutOfBounds`]: the string table does not fit inside the [`Medium`].
    pub fn section_name_table(&self) -> Result<Option<StringTable<'slice>>, SectionError> {
        let Some(table) = self.section_header_table()? else {
            return Ok(None);
        };

        self.string_table_in(table)
    }

    /// Returns an [`Iterator`] over every [`Section`] of this [`Elf`], with names resolved.
    ///
    /// The section name string table is located before any name is resolved, so a missing or
    /// misplaced string table is reported here rather than partway through the walk.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError`] if the section header table or the section name string table
    /// cannot be located.
    pub fn sections(&self) -> Result<Sections<'slice, M, E>, SectionError> {
        let Some(table) = self.section_header_table()? else {
            return Ok(Sections {
                headers: None,
                names: None,
                next: 0,
            });
        };

        Ok(Sections {
            headers: Some(table.into_iter()),
            names: self.string_table_in(table)?,
            next: 0,
        })
    }

    /// Returns the first [`Section`] named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError`] if the walk fails before a matching section is found.
    pub fn find_section(&self, name: &CStr) -> Result<Option<Section<'slice, M, E>>, SectionError> {
        for section in self.sections()? {
            let section = section?;
            if section.name == name {
                return Ok(Some(section));
            }
        }

        Ok(None)
    }

    /// Returns the underlying [`Medium`].
    pub fn medium(&self) -> &'slice M {
        self.medium
    }

    /// Locates the section name string table described by `table`.
    fn string_table_in(
        &self,
        table: SectionHeaderTable<'slice, M, E>,
    ) -> Result<Option<StringTable<'slice>>, SectionError> {
        let index = match self.header().section_header_string_table_index()? {
            SHN_UNDEF => return Ok(None),
            SHN_XINDEX => match table.get(0) {
                Some(first) => u64::from(first.link()?),
                None => u64::from(SHN_XINDEX),
            },
            index => u64::from(index),
        };

        let header = table.get(index).ok_or(StringTableError::MissingSection {
            index,
            count: table.count(),
        })?;

        Ok(Some(StringTable::new(header.section()?)))
    }
}

impl<M: ?Sized, E: Copy> Clone for Elf<'_, M, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized, E: Copy> Copy for Elf<'_, M, E> {}

impl<M: Medium + ?Sized, E: Encoding> fmt::Debug for Elf<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let section_header_table = self.section_header_table();

        f.debug_struct("Elf")
            .field("header", &self.header())
            .field("section_header_table", extract_format(&section_header_table))
            .finish()
    }
}

/// Safely converts `value` to a `u64` relying on compile time code checking.
#[expect(clippy::as_conversions, reason = "implementation of type-safe as cast")]
fn usize_to_u64(value: usize) -> u64 {
    #[cfg(not(any(
        target_pointer_width = "16",
        target_pointer_width = "32",
        target_pointer_width = "64"
    )))]
    compile_error!("library supports only 16-bit, 32-bit, and 64-bit usize");
    value as u64
}

/// Converts `value` to a `usize`.
///
/// Callers only pass values already bounded by the length of a slice.
#[expect(clippy::as_conversions, reason = "implementation of bounded as cast")]
#[expect(clippy::cast_possible_truncation, reason = "value is bounded by a slice length")]
fn u64_to_usize(value: u64) -> usize {
    value as usize
}

/// Safely extracts the target type or its error type.
fn extract_format<T: fmt::Debug, E: fmt::Debug>(result: &Result<T, E>) -> &dyn fmt::Debug {
    match result {
        Ok(value) => value,
        Err(error) => error,
    }
}
