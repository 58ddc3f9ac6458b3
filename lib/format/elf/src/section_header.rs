//! Ergonomic wrapper over 32-bit ELF section headers.

use core::{fmt, mem};

use crate::{
    encoding::Encoding,
    extract_format,
    medium::{Medium, OutOfBounds},
    raw::Elf32SectionHeader,
    table::{Table, TableItem},
    usize_to_u64,
};

/// A [`Table`] of [`SectionHeader`]s.
pub type SectionHeaderTable<'slice, M, E> = Table<'slice, M, E, SectionHeader<'slice, M, E>>;

/// Returns the offset of `field` within [`Elf32SectionHeader`].
macro_rules! field {
    ($field:ident) => {
        usize_to_u64(mem::offset_of!(Elf32SectionHeader, $field))
    };
}

/// Describes a single section of an ELF file.
pub struct SectionHeader<'slice, M: ?Sized, E> {
    /// The underlying [`Medium`] of the ELF file.
    medium: &'slice M,
    /// The offset of the [`SectionHeader`].
    offset: u64,
    /// The [`Encoding`] used to decode the ELF file.
    encoding: E,
}

#[expect(clippy::missing_errors_doc)]
impl<'slice, M: Medium + ?Sized, E: Encoding> SectionHeader<'slice, M, E> {
    /// The expected size of a 32-bit ELF section header.
    pub const SIZE: u64 = mem::size_of::<Elf32SectionHeader>() as u64;

    /// Creates a new [`SectionHeader`] at `offset` in the given [`Medium`].
    ///
    /// Returns [`None`] if the [`Medium`] is too small to contain a [`SectionHeader`] at
    /// `offset`.
    pub fn new(encoding: E, offset: u64, medium: &'slice M) -> Option<Self> {
        let max_offset = offset.checked_add(Self::SIZE)?;
        if max_offset > medium.size() {
            return None;
        }

        Some(Self {
            medium,
            offset,
            encoding,
        })
    }

    /// Returns the offset into the section name string table of this section's name.
    pub fn name_offset(&self) -> Result<u32, OutOfBounds> {
        self.read(field!(name))
    }

    /// Returns the [`SectionType`] of this section.
    pub fn section_type(&self) -> Result<SectionType, OutOfBounds> {
        self.read(field!(kind)).map(SectionType)
    }

    /// Returns the [`SectionFlags`] of this section.
    pub fn flags(&self) -> Result<SectionFlags, OutOfBounds> {
        self.read(field!(flags)).map(SectionFlags)
    }

    /// Returns the address at which the section's first byte should reside in memory.
    pub fn address(&self) -> Result<u32, OutOfBounds> {
        self.read(field!(addr))
    }

    /// Returns the offset of the section's first byte in the [`Medium`].
    pub fn offset(&self) -> Result<u32, OutOfBounds> {
        self.read(field!(offset))
    }

    /// Returns the size of the section in bytes.
    pub fn size(&self) -> Result<u32, OutOfBounds> {
        self.read(field!(size))
    }

    /// Returns the section header table index link (interpretation depends on the
    /// [`SectionType`]).
    pub fn link(&self) -> Result<u32, OutOfBounds> {
        self.read(field!(link))
    }

    /// Returns extra information (interpretation depends on the [`SectionType`]).
    pub fn info(&self) -> Result<u32, OutOfBounds> {
        self.read(field!(info))
    }

    /// Returns the required alignment of the section.
    pub fn address_alignment(&self) -> Result<u32, OutOfBounds> {
        self.read(field!(addralign))
    }

    /// Returns the size of fixed-size entries in the section.
    pub fn entry_size(&self) -> Result<u32, OutOfBounds> {
        self.read(field!(entsize))
    }

    /// Returns the bytes the section occupies in the [`Medium`].
    ///
    /// A [`SectionType::NOBITS`] section occupies no bytes and yields an empty slice.
    pub fn section(&self) -> Result<&'slice [u8], OutOfBounds> {
        if self.section_type()? == SectionType::NOBITS {
            return Ok(&[]);
        }

        let offset = u64::from(self.offset()?);
        let size = u64::from(self.size()?);
        self.medium.access_slice(offset, size)
    }

    /// Reads the `u32` field at `field_offset` bytes into this [`SectionHeader`].
    fn read(&self, field_offset: u64) -> Result<u32, OutOfBounds> {
        self.encoding
            .read_u32(self.offset + field_offset, self.medium)
    }
}

impl<M: ?Sized, E: Copy> Clone for SectionHeader<'_, M, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized, E: Copy> Copy for SectionHeader<'_, M, E> {}

impl<M: Medium + ?Sized, E: Encoding> fmt::Debug for SectionHeader<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_offset = self.name_offset();
        let section_type = self.section_type();
        let flags = self.flags();
        let address = self.address();
        let offset = self.offset();
        let size = self.size();
        let link = self.link();
        let info = self.info();
        let address_alignment = self.address_alignment();
        let entry_size = self.entry_size();

        f.debug_struct("SectionHeader")
            .field("name_offset", extract_format(&name_offset))
            .field("section_type", extract_format(&section_type))
            .field("flags", extract_format(&flags))
            .field("address", extract_format(&address))
            .field("offset", extract_format(&offset))
            .field("size", extract_format(&size))
            .field("link", extract_format(&link))
            .field("info", extract_format(&info))
            .field("address_alignment", extract_format(&address_alignment))
            .field("entry_size", extract_format(&entry_size))
            .finish()
    }
}

impl<'slice, M: Medium + ?Sized, E: Encoding> TableItem<'slice, M, E>
    for SectionHeader<'slice, M, E>
{
    fn new_panicking(encoding: E, offset: u64, medium: &'slice M) -> Self {
        let max_offset = offset
            .checked_add(Self::SIZE)
            .expect("overflow when calculating max offset");
        assert!(max_offset <= medium.size(), "out of bounds structure");

        Self {
            medium,
            offset,
            encoding,
        }
    }

    fn expected_size() -> u64 {
        Self::SIZE
    }
}

/// The type of a section.
#[repr(transparent)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SectionType(pub u32);

impl SectionType {
    /// The [`SectionHeader`] does not have an associated section.
    pub const NULL: Self = Self(0);
    /// The section holds information defined by the program.
    pub const PROGBITS: Self = Self(1);
    /// The section holds a symbol table.
    pub const SYMTAB: Self = Self(2);
    /// The section holds a string table.
    pub const STRTAB: Self = Self(3);
    /// The section holds relocation entries with explicit addends.
    pub const RELA: Self = Self(4);
    /// The section holds information used for marking the file in some way.
    pub const NOTE: Self = Self(7);
    /// The section occupies no space in the file, but otherwise resembles
    /// [`SectionType::PROGBITS`].
    pub const NOBITS: Self = Self(8);
    /// The section holds relocation entries without explicit addends.
    pub const REL: Self = Self(9);
}

impl fmt::Debug for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NULL => f.pad("NULL"),
            Self::PROGBITS => f.pad("PROGBITS"),
            Self::SYMTAB => f.pad("SYMTAB"),
            Self::STRTAB => f.pad("STRTAB"),
            Self::RELA => f.pad("RELA"),
            Self::NOTE => f.pad("NOTE"),
            Self::NOBITS => f.pad("NOBITS"),
            Self::REL => f.pad("REL"),
            section_type => write!(f, "{:#010x}", section_type.0),
        }
    }
}

/// Attribute flags of a section.
#[repr(transparent)]
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct SectionFlags(pub u32);

impl SectionFlags {
    /// The section contains data that should be writable during process execution.
    pub const WRITE: Self = Self(0x1);
    /// The section occupies memory during process execution.
    pub const ALLOC: Self = Self(0x2);
    /// The section contains executable machine instructions.
    pub const EXECINSTR: Self = Self(0x4);

    /// Returns `true` if every flag set in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Debug for SectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(SectionFlags, char); 3] = [
            (SectionFlags::WRITE, 'W'),
            (SectionFlags::ALLOC, 'A'),
            (SectionFlags::EXECINSTR, 'X'),
        ];

        for (flag, name) in NAMES {
            if self.contains(flag) {
                fmt::Write::write_char(f, name)?;
            }
        }

        let unknown = self.0 & !(Self::WRITE.0 | Self::ALLOC.0 | Self::EXECINSTR.0);
        if unknown != 0 {
            write!(f, "({unknown:#x})")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::format;

    use super::{SectionFlags, SectionHeader, SectionType};
    use crate::{
        encoding::LittleEndian,
        test_util::{ImageBuilder, section_header_offset},
    };

    #[test]
    fn reads_section_fields() {
        let image = ImageBuilder::new()
            .section(".text", 0, &[1, 2, 3, 4])
            .build();

        // Index 0 is the null section.
        let offset = section_header_offset(&image) + 40;
        let header = SectionHeader::new(LittleEndian, offset, &image[..]).unwrap();
        assert_eq!(header.section_type(), Ok(SectionType::PROGBITS));
        assert_eq!(header.address(), Ok(0));
        assert_eq!(header.size(), Ok(4));
        assert_eq!(header.section(), Ok(&[1, 2, 3, 4][..]));
    }

    #[test]
    fn header_past_end_of_image() {
        let image = [0u8; 64];

        assert!(SectionHeader::new(LittleEndian, 24, &image[..]).is_some());
        assert!(SectionHeader::new(LittleEndian, 25, &image[..]).is_none());
        assert!(SectionHeader::new(LittleEndian, u64::MAX, &image[..]).is_none());
    }

    #[test]
    fn nobits_section_is_empty() {
        let image = ImageBuilder::new()
            .section_with_type(".bss", SectionType::NOBITS, 0, &[0; 8])
            .build();
        let offset = section_header_offset(&image) + 40;
        let header = SectionHeader::new(LittleEndian, offset, &image[..]).unwrap();
        assert_eq!(header.section(), Ok(&[][..]));
    }

    #[test]
    fn flags_debug() {
        let flags = SectionFlags(SectionFlags::ALLOC.0 | SectionFlags::EXECINSTR.0 | 0x100);

        assert!(flags.contains(SectionFlags::EXECINSTR));
        assert!(!flags.contains(SectionFlags::WRITE));
        assert_eq!(format!("{flags:?}"), "AX(0x100)");
    }
}
