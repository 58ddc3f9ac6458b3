//! Selection and validation of the executable code section.

use core::{error, ffi::CStr, fmt};

use elf::{
    Elf,
    encoding::{AnyEndian, UnsupportedEncodingError},
    header::ElfHeaderError,
    ident,
    medium::OutOfBounds,
    sections::SectionError,
    string_table::StringTableError,
};
use log::{debug, info, trace};

use crate::words::Words;

/// The name of the section holding executable code.
pub const CODE_SECTION_NAME: &CStr = c".text";

/// The executable code section of an image.
///
/// Its load address has been checked to be zero, so byte offsets into [`CodeSection::bytes()`]
/// are also the addresses of the code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeSection<'slice> {
    /// The index of the section in the section header table.
    index: u64,
    /// The offset of the section's contents in the image.
    file_offset: u32,
    /// The contents of the section.
    bytes: &'slice [u8],
}

impl<'slice> CodeSection<'slice> {
    /// Returns the index of the section in the section header table.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the offset of the section's contents in the image.
    pub fn file_offset(&self) -> u32 {
        self.file_offset
    }

    /// Returns the contents of the section.
    pub fn bytes(&self) -> &'slice [u8] {
        self.bytes
    }

    /// Returns the contents of the section as little-endian 16-bit words.
    pub fn words(&self) -> Words<'slice> {
        Words::new(self.bytes)
    }
}

/// Locates the [`CodeSection`] of `image`.
///
/// Returns [`None`] if `image` is a valid ELF32 file without a section named
/// [`CODE_SECTION_NAME`].
///
/// # Errors
///
/// - [`DecodeError::NotRecognizedFormat`]: `image` is not an ELF file.
/// - [`DecodeError::UnsupportedWordSize`]: `image` is not a 32-bit ELF file.
/// - [`DecodeError::UnsupportedEncoding`]: the data encoding of `image` is unknown.
/// - [`DecodeError::InvalidSectionHeaderTable`]: the section header entry size is too small.
/// - [`DecodeError::MalformedStringTable`]: a section name cannot be resolved.
/// - [`DecodeError::UnsupportedLoadAddress`]: the code section is not loaded at address zero.
/// - [`DecodeError::OutOfBounds`]: a structure or the code section lies outside of `image`.
pub fn find_code_section(image: &[u8]) -> Result<Option<CodeSection<'_>>, DecodeError> {
    let elf = Elf::<[u8], AnyEndian>::new(image)?;

    let header = elf.header();
    info!("type: ELF32 ({:?})", header.encoding());
    info!("entry point: {:#x}", header.entry()?);
    trace!("{header:?}");

    for section in elf.sections()? {
        let section = section?;
        let section_header = section.header;

        debug!(
            "section {}: name {:?}, type {:?}, flags {:?}, address {:#06x}, offset {:#06x}, \
            size {:#06x}",
            section.index,
            section.name,
            section_header.section_type()?,
            section_header.flags()?,
            section_header.address()?,
            section_header.offset()?,
            section_header.size()?,
        );

        if section.name != CODE_SECTION_NAME {
            continue;
        }

        let address = section_header.address()?;
        if address != 0 {
            return Err(DecodeError::UnsupportedLoadAddress { address });
        }

        let bytes = section_header.section()?;
        if bytes.len() % 2 != 0 {
            debug!("dropping trailing byte of odd-sized code section");
        }

        return Ok(Some(CodeSection {
            index: section.index,
            file_offset: section_header.offset()?,
            bytes,
        }));
    }

    Ok(None)
}

/// Various errors that can occur while decoding an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The image does not begin with the ELF identification bytes.
    NotRecognizedFormat([u8; 4]),
    /// The image is not a 32-bit ELF file.
    UnsupportedWordSize(ident::Class),
    /// The data encoding of the image is unknown.
    UnsupportedEncoding(UnsupportedEncodingError),
    /// The section header entry size declared by the image is too small.
    InvalidSectionHeaderTable(u16),
    /// The section name string table is missing or a name cannot be read from it.
    MalformedStringTable(StringTableError),
    /// A structure lies outside of the image.
    OutOfBounds(OutOfBounds),
    /// The code section is not loaded at address zero.
    ///
    /// Every consumer of the output treats word offsets as code addresses, so this is never
    /// recoverable.
    UnsupportedLoadAddress {
        /// The load address of the code section.
        address: u32,
    },
    /// The image has no code section.
    SectionNotFound,
}

impl From<ElfHeaderError> for DecodeError {
    fn from(value: ElfHeaderError) -> Self {
        match value {
            ElfHeaderError::NotRecognizedFormat(magic) => Self::NotRecognizedFormat(magic),
            ElfHeaderError::UnsupportedWordSize(class) => Self::UnsupportedWordSize(class),
            ElfHeaderError::UnsupportedEncoding(error) => Self::UnsupportedEncoding(error),
            ElfHeaderError::OutOfBounds(error) => Self::OutOfBounds(error),
        }
    }
}

impl From<SectionError> for DecodeError {
    fn from(value: SectionError) -> Self {
        match value {
            SectionError::InvalidEntrySize(size) => Self::InvalidSectionHeaderTable(size),
            SectionError::MalformedStringTable(error) => Self::MalformedStringTable(error),
            SectionError::OutOfBounds(error) => Self::OutOfBounds(error),
        }
    }
}

impl From<OutOfBounds> for DecodeError {
    fn from(value: OutOfBounds) -> Self {
        Self::OutOfBounds(value)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRecognizedFormat(magic) => {
                write!(f, "unknown file format (magic bytes {magic:02x?})")
            }
            Self::UnsupportedWordSize(ident::Class::CLASS64) => {
                write!(f, "not ELF32 format: 64-bit ELF files are not supported")
            }
            Self::UnsupportedWordSize(class) => {
                write!(f, "not ELF32 format: unknown class {}", class.0)
            }
            Self::UnsupportedEncoding(error) => fmt::Display::fmt(error, f),
            Self::InvalidSectionHeaderTable(size) => {
                write!(f, "section header entry size {size} is too small")
            }
            Self::MalformedStringTable(error) => {
                write!(f, "malformed section name string table: {error}")
            }
            Self::OutOfBounds(error) => write!(f, "truncated or malformed file: {error}"),
            Self::UnsupportedLoadAddress { address } => write!(
                f,
                "the beginning address of the {} section should be 0, found {address:#x}",
                CODE_SECTION_NAME.to_string_lossy()
            ),
            Self::SectionNotFound => {
                write!(f, "no {} section found", CODE_SECTION_NAME.to_string_lossy())
            }
        }
    }
}

impl error::Error for DecodeError {}

#[cfg(test)]
mod test {
    use super::{CODE_SECTION_NAME, DecodeError, find_code_section};

    #[test]
    fn not_an_elf_file() {
        let error = find_code_section(b"#!/bin/sh\necho not an object file\n").unwrap_err();

        assert_eq!(
            error,
            DecodeError::NotRecognizedFormat([b'#', b'!', b'/', b'b'])
        );
    }

    #[test]
    fn empty_image_is_out_of_bounds() {
        assert!(matches!(
            find_code_section(&[]),
            Err(DecodeError::OutOfBounds(_))
        ));
    }

    #[test]
    fn code_section_name() {
        assert_eq!(CODE_SECTION_NAME.to_bytes(), b".text");
    }

    #[test]
    fn load_address_message_names_section() {
        let message = DecodeError::UnsupportedLoadAddress { address: 0x8000 }.to_string();

        assert!(message.contains(".text"));
        assert!(message.contains("0x8000"));
    }
}
