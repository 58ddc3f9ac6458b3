//! Walking the section header table with names resolved.

use core::{error, ffi::CStr, fmt};

use crate::{
    encoding::Encoding,
    medium::{Medium, OutOfBounds},
    section_header::SectionHeader,
    string_table::{StringTable, StringTableError},
    table,
};

/// A section header together with its position in the table and its resolved name.
pub struct Section<'slice, M: ?Sized, E> {
    /// The index of the section in the section header table.
    pub index: u64,
    /// The [`SectionHeader`] describing the section.
    pub header: SectionHeader<'slice, M, E>,
    /// The name of the section.
    pub name: &'slice CStr,
}

impl<M: ?Sized, E: Copy> Clone for Section<'_, M, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized, E: Copy> Copy for Section<'_, M, E> {}

impl<M: Medium + ?Sized, E: Encoding> fmt::Debug for Section<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("header", &self.header)
            .finish()
    }
}

/// An [`Iterator`] over every [`Section`] of an ELF file, in table order.
///
/// Cloning a [`Sections`] forks the walk at its current position;
/// [`Elf::sections()`][crate::Elf::sections] starts a new one.
pub struct Sections<'slice, M: ?Sized, E> {
    /// The remaining section headers.
    pub(crate) headers: Option<table::IntoIter<'slice, M, E, SectionHeader<'slice, M, E>>>,
    /// The section name string table, if the file has one.
    pub(crate) names: Option<StringTable<'slice>>,
    /// The index of the next section header.
    pub(crate) next: u64,
}

impl<M: ?Sized, E: Copy> Clone for Sections<'_, M, E> {
    fn clone(&self) -> Self {
        Self {
            headers: self.headers.clone(),
            names: self.names,
            next: self.next,
        }
    }
}

impl<'slice, M: Medium + ?Sized, E: Encoding> Iterator for Sections<'slice, M, E> {
    type Item = Result<Section<'slice, M, E>, SectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.headers.as_mut()?.next()?;
        let index = self.next;
        self.next += 1;

        Some(resolve(index, header, self.names))
    }
}

/// Resolves the name of `header` through `names`.
///
/// Without a section name string table every section is nameless.
fn resolve<'slice, M: Medium + ?Sized, E: Encoding>(
    index: u64,
    header: SectionHeader<'slice, M, E>,
    names: Option<StringTable<'slice>>,
) -> Result<Section<'slice, M, E>, SectionError> {
    let name = match names {
        Some(names) => names.get(header.name_offset()?)?,
        None => c"",
    };

    Ok(Section {
        index,
        header,
        name,
    })
}

/// Various errors that can occur while locating or walking the section header table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionError {
    /// The section header entry size declared by the ELF header is too small.
    InvalidEntrySize(u16),
    /// The section name string table could not be located or a name could not be read from it.
    MalformedStringTable(StringTableError),
    /// A structure lies outside of the image.
    OutOfBounds(OutOfBounds),
}

impl From<StringTableError> for SectionError {
    fn from(value: StringTableError) -> Self {
        Self::MalformedStringTable(value)
    }
}

impl From<OutOfBounds> for SectionError {
    fn from(value: OutOfBounds) -> Self {
        Self::OutOfBounds(value)
    }
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEntrySize(size) => {
                write!(f, "section header entry size {size} is too small")
            }
            Self::MalformedStringTable(error) => {
                write!(f, "malformed section name string table: {error}")
            }
            Self::OutOfBounds(error) => write!(f, "error accessing section headers: {error}"),
        }
    }
}

impl error::Error for SectionError {}
