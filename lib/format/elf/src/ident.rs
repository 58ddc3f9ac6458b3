//! Ergonomic wrapper over [`ElfIdent`][raw::ElfIdent].

use core::{error, fmt, mem};

use crate::{
    extract_format,
    medium::{Medium, OutOfBounds},
    raw, usize_to_u64,
};

/// The identification bytes at the start of every ELF file, readable independent of class and
/// encoding.
pub struct ElfIdent<'slice, M: ?Sized>(&'slice M);

impl<'slice, M: Medium + ?Sized> ElfIdent<'slice, M> {
    /// The magic bytes that identify the start of an ELF file.
    pub const MAGIC_BYTES: [u8; 4] = [0x7F, b'E', b'L', b'F'];

    /// Creates a new [`ElfIdent`] from the given [`Medium`].
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the [`Medium`] is not large enough to contain the [`ElfIdent`].
    pub fn new(medium: &'slice M) -> Result<Self, OutOfBounds> {
        let length = usize_to_u64(mem::size_of::<raw::ElfIdent>());
        if medium.size() < length {
            return Err(OutOfBounds {
                offset: 0,
                length,
                size: medium.size(),
            });
        }

        Ok(Self(medium))
    }

    /// Validates that the magic bytes identify an ELF file.
    ///
    /// No other field of the file should be trusted before this succeeds.
    ///
    /// # Errors
    ///
    /// - [`ElfIdentValidationError::InvalidMagicBytes`]: the magic bytes are not correct.
    /// - [`ElfIdentValidationError::OutOfBounds`]: the magic bytes could not be read.
    pub fn validate(&self) -> Result<(), ElfIdentValidationError> {
        let magic = self.magic()?;
        if magic != Self::MAGIC_BYTES {
            return Err(ElfIdentValidationError::InvalidMagicBytes(magic));
        }

        Ok(())
    }

    /// Returns the magic bytes that identify this file as an ELF file.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the bytes cannot be read.
    pub fn magic(&self) -> Result<[u8; 4], OutOfBounds> {
        let mut arr = [0; 4];
        self.0
            .read_slice(
                usize_to_u64(mem::offset_of!(raw::ElfIdent, magic)),
                &mut arr,
            )
            .map(|()| arr)
    }

    /// Returns the [`Class`] of this ELF file.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the byte cannot be read.
    pub fn class(&self) -> Result<Class, OutOfBounds> {
        self.0
            .read_byte(usize_to_u64(mem::offset_of!(raw::ElfIdent, class)))
            .map(Class)
    }

    /// Returns the [`Encoding`] of this ELF file.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the byte cannot be read.
    pub fn encoding(&self) -> Result<Encoding, OutOfBounds> {
        self.0
            .read_byte(usize_to_u64(mem::offset_of!(raw::ElfIdent, encoding)))
            .map(Encoding)
    }

    /// Returns the version of the ELF file identifier.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the byte cannot be read.
    pub fn version(&self) -> Result<u8, OutOfBounds> {
        self.0
            .read_byte(usize_to_u64(mem::offset_of!(raw::ElfIdent, version)))
    }

    /// Returns the OS or ABI specific extensions identifier of the ELF file.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBounds`] if the byte cannot be read.
    pub fn os_abi(&self) -> Result<u8, OutOfBounds> {
        self.0
            .read_byte(usize_to_u64(mem::offset_of!(raw::ElfIdent, os_abi)))
    }
}

impl<M: Medium + ?Sized> fmt::Debug for ElfIdent<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magic = self.magic();
        let class = self.class();
        let encoding = self.encoding();
        let version = self.version();
        let os_abi = self.os_abi();

        f.debug_struct("ElfIdent")
            .field("magic", extract_format(&magic))
            .field("class", extract_format(&class))
            .field("encoding", extract_format(&encoding))
            .field("version", extract_format(&version))
            .field("os_abi", extract_format(&os_abi))
            .finish()
    }
}

/// Various errors that can occur when validating an [`ElfIdent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElfIdentValidationError {
    /// The file does not start with [`ElfIdent::MAGIC_BYTES`].
    InvalidMagicBytes([u8; 4]),
    /// The identification bytes could not be read.
    OutOfBounds(OutOfBounds),
}

impl From<OutOfBounds> for ElfIdentValidationError {
    fn from(value: OutOfBounds) -> Self {
        Self::OutOfBounds(value)
    }
}

impl fmt::Display for ElfIdentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMagicBytes(bytes) => write!(f, "invalid magic bytes: {bytes:02x?}"),
            Self::OutOfBounds(error) => write!(f, "error accessing ELF ident bytes: {error}"),
        }
    }
}

impl error::Error for ElfIdentValidationError {}

/// Specifier of the ELF file class, which determines the sizing of various items in the ELF
/// file format.
#[repr(transparent)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Class(pub u8);

impl Class {
    /// Invalid [`Class`] specifier.
    pub const NONE: Self = Self(0);
    /// ELF file is formatted in its 32-bit format.
    pub const CLASS32: Self = Self(1);
    /// ELF file is formatted in its 64-bit format.
    pub const CLASS64: Self = Self(2);
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.pad("Invalid"),
            Self::CLASS32 => f.pad("Class32"),
            Self::CLASS64 => f.pad("Class64"),
            class => f.debug_tuple("Class").field(&class.0).finish(),
        }
    }
}

/// Specifier of the byte order used by the ELF file's own structures.
#[repr(transparent)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Encoding(pub u8);

impl Encoding {
    /// Invalid [`Encoding`] specifier.
    pub const NONE: Self = Self(0);
    /// Two's complement, little-endian.
    pub const LSB2: Self = Self(1);
    /// Two's complement, big-endian.
    pub const MSB2: Self = Self(2);
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.pad("NoEncoding"),
            Self::LSB2 => f.pad("LittleEndian"),
            Self::MSB2 => f.pad("BigEndian"),
            encoding => f.debug_tuple("Encoding").field(&encoding.0).finish(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Class, ElfIdent, ElfIdentValidationError, Encoding};

    const IDENT: [u8; 16] = [0x7F, b'E', b'L', b'F', 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0];

    #[test]
    fn reads_ident_fields() {
        let ident = ElfIdent::new(&IDENT[..]).unwrap();

        ident.validate().unwrap();
        assert_eq!(ident.class(), Ok(Class::CLASS32));
        assert_eq!(ident.encoding(), Ok(Encoding::LSB2));
        assert_eq!(ident.version(), Ok(1));
    }

    #[test]
    fn corrupted_magic() {
        let mut bytes = IDENT;
        bytes[1] = b'Z';

        let ident = ElfIdent::new(&bytes[..]).unwrap();
        assert_eq!(
            ident.validate(),
            Err(ElfIdentValidationError::InvalidMagicBytes([
                0x7F, b'Z', b'L', b'F'
            ]))
        );
    }

    #[test]
    fn too_small_for_ident() {
        assert!(ElfIdent::new(&IDENT[..15]).is_err());
    }
}
