//! Encoding aware reading.

use core::{error, fmt};

use crate::{
    ident,
    medium::{Medium, OutOfBounds},
};

/// An [`Encoding`] decodes fixed-width integers out of a [`Medium`].
///
/// # Errors
///
/// All read methods return [`OutOfBounds`] when the [`Medium`] cannot provide the requested
/// bytes.
///
/// # Implementors
///
/// - [`Encoding`] must be stateless.
/// - Unaligned reads must be allowed.
#[expect(
    clippy::missing_errors_doc,
    reason = "errors are documented at the trait level"
)]
pub trait Encoding: Copy {
    /// Returns the [`Encoding`] instance that corresponds with the given [`ident::Encoding`].
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedEncodingError`] if the [`ident::Encoding`] is not supported by this
    /// [`Encoding`] type.
    fn from_elf_encoding(encoding: ident::Encoding) -> Result<Self, UnsupportedEncodingError>;

    /// Reads the `u8` at `offset` bytes into the `medium`.
    fn read_u8<M: Medium + ?Sized>(self, offset: u64, medium: &M) -> Result<u8, OutOfBounds>;
    /// Reads the `u16` at `offset` bytes into the `medium`.
    fn read_u16<M: Medium + ?Sized>(self, offset: u64, medium: &M) -> Result<u16, OutOfBounds>;
    /// Reads the `u32` at `offset` bytes into the `medium`.
    fn read_u32<M: Medium + ?Sized>(self, offset: u64, medium: &M) -> Result<u32, OutOfBounds>;
}

/// The data encoding of an ELF file is not supported by an [`Encoding`] implementation.
#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnsupportedEncodingError(pub ident::Encoding);

impl fmt::Display for UnsupportedEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ident::Encoding::NONE => write!(f, "ELF file declares no data encoding"),
            ident::Encoding::LSB2 => write!(f, "little-endian ELF files are not supported"),
            ident::Encoding::MSB2 => write!(f, "big-endian ELF files are not supported"),
            ident::Encoding(encoding) => write!(f, "unknown data encoding ({encoding})"),
        }
    }
}

impl error::Error for UnsupportedEncodingError {}

/// Generates reading functions for a fixed byte order.
macro_rules! setup_func {
    ($func:ident, $kind:ident, $convert:ident) => {
        fn $func<M: Medium + ?Sized>(self, offset: u64, medium: &M) -> Result<$kind, OutOfBounds> {
            // Size of the array is inferred from the `convert` function.
            read_array(medium, offset).map($kind::$convert)
        }
    };
}

/// Reads unaligned little-endian integers.
#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LittleEndian;

impl Encoding for LittleEndian {
    fn from_elf_encoding(encoding: ident::Encoding) -> Result<Self, UnsupportedEncodingError> {
        if encoding != ident::Encoding::LSB2 {
            return Err(UnsupportedEncodingError(encoding));
        }

        Ok(Self)
    }

    setup_func!(read_u8, u8, from_le_bytes);
    setup_func!(read_u16, u16, from_le_bytes);
    setup_func!(read_u32, u32, from_le_bytes);
}

/// Reads unaligned big-endian integers.
#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BigEndian;

impl Encoding for BigEndian {
    fn from_elf_encoding(encoding: ident::Encoding) -> Result<Self, UnsupportedEncodingError> {
        if encoding != ident::Encoding::MSB2 {
            return Err(UnsupportedEncodingError(encoding));
        }

        Ok(Self)
    }

    setup_func!(read_u8, u8, from_be_bytes);
    setup_func!(read_u16, u16, from_be_bytes);
    setup_func!(read_u32, u32, from_be_bytes);
}

/// Reads unaligned integers in whichever byte order the ELF file declares.
#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnyEndian {
    /// Integers are in little-endian.
    LittleEndian,
    /// Integers are in big-endian.
    BigEndian,
}

impl Encoding for AnyEndian {
    fn from_elf_encoding(encoding: ident::Encoding) -> Result<Self, UnsupportedEncodingError> {
        match encoding {
            ident::Encoding::LSB2 => Ok(AnyEndian::LittleEndian),
            ident::Encoding::MSB2 => Ok(AnyEndian::BigEndian),
            encoding => Err(UnsupportedEncodingError(encoding)),
        }
    }

    fn read_u8<M: Medium + ?Sized>(self, offset: u64, medium: &M) -> Result<u8, OutOfBounds> {
        medium.read_byte(offset)
    }

    fn read_u16<M: Medium + ?Sized>(self, offset: u64, medium: &M) -> Result<u16, OutOfBounds> {
        match self {
            Self::LittleEndian => LittleEndian.read_u16(offset, medium),
            Self::BigEndian => BigEndian.read_u16(offset, medium),
        }
    }

    fn read_u32<M: Medium + ?Sized>(self, offset: u64, medium: &M) -> Result<u32, OutOfBounds> {
        match self {
            Self::LittleEndian => LittleEndian.read_u32(offset, medium),
            Self::BigEndian => BigEndian.read_u32(offset, medium),
        }
    }
}

/// Performs an exact-length read.
fn read_array<M: Medium + ?Sized, const N: usize>(
    medium: &M,
    offset: u64,
) -> Result<[u8; N], OutOfBounds> {
    let mut arr = [0; N];
    medium.read_slice(offset, &mut arr)?;
    Ok(arr)
}
