//! Ergonomic wrapper over 32-bit ELF file headers.

use core::{error, fmt, mem};

use crate::{
    encoding::{Encoding, UnsupportedEncodingError},
    extract_format,
    ident::{self, ElfIdent, ElfIdentValidationError},
    medium::{Medium, OutOfBounds},
    raw::Elf32Header,
    usize_to_u64,
};

/// Returns the offset of `field` within [`Elf32Header`].
macro_rules! field {
    ($field:ident) => {
        usize_to_u64(mem::offset_of!(Elf32Header, $field))
    };
}

/// Contains basic information about how a 32-bit ELF file is arranged.
pub struct ElfHeader<'slice, M: ?Sized, E> {
    /// The underlying [`Medium`] of the ELF file.
    pub(crate) medium: &'slice M,
    /// The [`Encoding`] used to decode the ELF file.
    pub(crate) encoding: E,
}

impl<'slice, M: Medium + ?Sized, E: Encoding> ElfHeader<'slice, M, E> {
    /// The expected size of a 32-bit ELF file header.
    pub const SIZE: u64 = mem::size_of::<Elf32Header>() as u64;

    /// Creates a new [`ElfHeader`] from the given [`Medium`].
    ///
    /// The identification bytes are checked first, then the class, then the encoding. No other
    /// field is read until all three pass.
    ///
    /// # Errors
    ///
    /// - [`ElfHeaderError::NotRecognizedFormat`]: the magic bytes are not those of an ELF file.
    /// - [`ElfHeaderError::UnsupportedWordSize`]: the file is not a 32-bit ELF file.
    /// - [`ElfHeaderError::UnsupportedEncoding`]: the data encoding is not supported by `E`.
    /// - [`ElfHeaderError::OutOfBounds`]: the [`Medium`] is too small to contain the header.
    pub fn new(medium: &'slice M) -> Result<Self, ElfHeaderError> {
        let ident = ElfIdent::new(medium)?;
        ident.validate()?;

        let class = ident.class()?;
        if class != ident::Class::CLASS32 {
            return Err(ElfHeaderError::UnsupportedWordSize(class));
        }

        let encoding = E::from_elf_encoding(ident.encoding()?)?;

        if medium.size() < Self::SIZE {
            return Err(ElfHeaderError::OutOfBounds(OutOfBounds {
                offset: 0,
                length: Self::SIZE,
                size: medium.size(),
            }));
        }

        Ok(Self { medium, encoding })
    }

    /// Returns the [`ElfIdent`] associated with this [`ElfHeader`].
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the [`Medium`] cannot contain an [`ElfIdent`].
    pub fn ident(&self) -> Result<ElfIdent<'slice, M>, OutOfBounds> {
        ElfIdent::new(self.medium)
    }

    /// Returns the [`ElfType`] associated with this [`ElfHeader`].
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn elf_type(&self) -> Result<ElfType, OutOfBounds> {
        self.encoding
            .read_u16(field!(kind), self.medium)
            .map(ElfType)
    }

    /// Returns the architecture for which this ELF file is targeted.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn machine(&self) -> Result<u16, OutOfBounds> {
        self.encoding.read_u16(field!(machine), self.medium)
    }

    /// Returns the version of this ELF file.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn version(&self) -> Result<u32, OutOfBounds> {
        self.encoding.read_u32(field!(version), self.medium)
    }

    /// Returns the virtual address of the entry point of this ELF file.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn entry(&self) -> Result<u32, OutOfBounds> {
        self.encoding.read_u32(field!(entry), self.medium)
    }

    /// Returns the program header table's file offset in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn program_header_offset(&self) -> Result<u32, OutOfBounds> {
        self.encoding.read_u32(field!(phoff), self.medium)
    }

    /// Returns the processor specific flags associated with the ELF file.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn flags(&self) -> Result<u32, OutOfBounds> {
        self.encoding.read_u32(field!(flags), self.medium)
    }

    /// Returns the size of the ELF file header in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn header_size(&self) -> Result<u16, OutOfBounds> {
        self.encoding.read_u16(field!(ehsize), self.medium)
    }

    /// Returns the size of each program header in the program header table.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn program_header_size(&self) -> Result<u16, OutOfBounds> {
        self.encoding.read_u16(field!(phentsize), self.medium)
    }

    /// Returns the number of program headers in the program header table.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn program_header_count(&self) -> Result<u16, OutOfBounds> {
        self.encoding.read_u16(field!(phnum), self.medium)
    }

    /// Returns the section header table's file offset in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn section_header_offset(&self) -> Result<u32, OutOfBounds> {
        self.encoding.read_u32(field!(shoff), self.medium)
    }

    /// Returns the number of section headers in the section header table.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn section_header_count(&self) -> Result<u16, OutOfBounds> {
        self.encoding.read_u16(field!(shnum), self.medium)
    }

    /// Returns the size of each section header in the section header table.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn section_header_size(&self) -> Result<u16, OutOfBounds> {
        self.encoding.read_u16(field!(shentsize), self.medium)
    }

    /// Returns the index into the section header table of the section name string table.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the field cannot be read.
    pub fn section_header_string_table_index(&self) -> Result<u16, OutOfBounds> {
        self.encoding.read_u16(field!(shstrndx), self.medium)
    }

    /// Returns the underlying [`Medium`].
    pub fn medium(&self) -> &'slice M {
        self.medium
    }

    /// Returns the [`Encoding`] implementation of this [`ElfHeader`].
    pub fn encoding(&self) -> E {
        self.encoding
    }
}

impl<M: ?Sized, E: Copy> Clone for ElfHeader<'_, M, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized, E: Copy> Copy for ElfHeader<'_, M, E> {}

impl<M: Medium + ?Sized, E: Encoding> fmt::Debug for ElfHeader<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ident = self.ident();
        let elf_type = self.elf_type();
        let machine = self.machine();
        let version = self.version();
        let entry = self.entry();
        let flags = self.flags();
        let header_size = self.header_size();

        let program_header_offset = self.program_header_offset();
        let program_header_count = self.program_header_count();
        let program_header_size = self.program_header_size();

        let section_header_offset = self.section_header_offset();
        let section_header_count = self.section_header_count();
        let section_header_size = self.section_header_size();
        let section_header_string_table_index = self.section_header_string_table_index();

        f.debug_struct("ElfHeader")
            .field("ident", extract_format(&ident))
            .field("type", extract_format(&elf_type))
            .field("machine", extract_format(&machine))
            .field("version", extract_format(&version))
            .field("entry", extract_format(&entry))
            .field("flags", extract_format(&flags))
            .field("header_size", extract_format(&header_size))
            .field(
                "program_header_offset",
                extract_format(&program_header_offset),
            )
            .field(
                "program_header_count",
                extract_format(&program_header_count),
            )
            .field(
                "program_header_size",
                extract_format(&program_header_size),
            )
            .field(
                "section_header_offset",
                extract_format(&section_header_offset),
            )
            .field(
                "section_header_count",
                extract_format(&section_header_count),
            )
            .field("section_header_size", extract_format(&section_header_size))
            .field(
                "section_header_string_table_index",
                extract_format(&section_header_string_table_index),
            )
            .finish()
    }
}

/// Various errors that can occur when creating a new [`ElfHeader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElfHeaderError {
    /// The file does not begin with the ELF identification bytes.
    NotRecognizedFormat([u8; 4]),
    /// The file is an ELF file of a class other than [`ident::Class::CLASS32`].
    UnsupportedWordSize(ident::Class),
    /// The data encoding of the ELF file is not supported.
    UnsupportedEncoding(UnsupportedEncodingError),
    /// The file is too small to contain the header.
    OutOfBounds(OutOfBounds),
}

impl From<ElfIdentValidationError> for ElfHeaderError {
    fn from(value: ElfIdentValidationError) -> Self {
        match value {
            ElfIdentValidationError::InvalidMagicBytes(magic) => Self::NotRecognizedFormat(magic),
            ElfIdentValidationError::OutOfBounds(error) => Self::OutOfBounds(error),
        }
    }
}

impl From<UnsupportedEncodingError> for ElfHeaderError {
    fn from(value: UnsupportedEncodingError) -> Self {
        Self::UnsupportedEncoding(value)
    }
}

impl From<OutOfBounds> for ElfHeaderError {
    fn from(value: OutOfBounds) -> Self {
        Self::OutOfBounds(value)
    }
}

impl fmt::Display for ElfHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRecognizedFormat(magic) => {
                write!(f, "unknown file format (magic bytes {magic:02x?})")
            }
            Self::UnsupportedWordSize(ident::Class::CLASS64) => {
                write!(f, "not an ELF32 file: 64-bit ELF files are not supported")
            }
            Self::UnsupportedWordSize(class) => {
                write!(f, "not an ELF32 file: unsupported class {}", class.0)
            }
            Self::UnsupportedEncoding(error) => fmt::Display::fmt(error, f),
            Self::OutOfBounds(error) => write!(f, "error accessing ELF header bytes: {error}"),
        }
    }
}

impl error::Error for ElfHeaderError {}

/// The type of the ELF file.
#[repr(transparent)]
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct ElfType(pub u16);

impl ElfType {
    /// No kind.
    pub const NONE: Self = Self(0);
    /// Relocatable ELF file.
    pub const RELOCATABLE: Self = Self(1);
    /// Executable ELF file.
    pub const EXECUTABLE: Self = Self(2);
    /// Shared object ELF file.
    pub const SHARED: Self = Self(3);
    /// Core ELF file.
    pub const CORE: Self = Self(4);
}

impl fmt::Debug for ElfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.pad("None"),
            Self::RELOCATABLE => f.pad("Relocatable"),
            Self::EXECUTABLE => f.pad("Executable"),
            Self::SHARED => f.pad("SharedObject"),
            Self::CORE => f.pad("Core"),
            elf_type => f.debug_tuple("ElfType").field(&elf_type.0).finish(),
        }
    }
}
