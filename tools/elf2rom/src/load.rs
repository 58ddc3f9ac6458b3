//! Reading an input file fully into memory.

use core::{error, fmt};
use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};

/// Reads the whole file at `path` into memory.
///
/// The size of the file is queried first and the read must produce exactly that many bytes.
///
/// # Errors
///
/// - [`LoadError::FileStatFailure`]: the size of the file could not be queried.
/// - [`LoadError::FileOpenFailure`]: the file could not be opened.
/// - [`LoadError::ShortRead`]: the number of bytes read differs from the queried size.
pub fn load_image(path: &Path) -> Result<Vec<u8>, LoadError> {
    let metadata = fs::metadata(path).map_err(|source| LoadError::FileStatFailure {
        path: path.to_path_buf(),
        source,
    })?;
    let expected = metadata.len();

    let file = File::open(path).map_err(|source| LoadError::FileOpenFailure {
        path: path.to_path_buf(),
        source,
    })?;

    let mut image = Vec::with_capacity(usize::try_from(expected).unwrap_or(0));
    // Reading one byte past the expected size detects files that grew after being queried.
    let result = file
        .take(expected.saturating_add(1))
        .read_to_end(&mut image);

    // A read error leaves the bytes read so far in `image`, which are reported as a short read.
    let actual = u64::try_from(image.len()).unwrap_or(u64::MAX);
    if result.is_err() || actual != expected {
        return Err(LoadError::ShortRead {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }

    Ok(image)
}

/// Various errors that can occur while loading an input file.
#[derive(Debug)]
pub enum LoadError {
    /// The size of the file could not be queried.
    FileStatFailure {
        /// The path of the file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The file could not be opened.
    FileOpenFailure {
        /// The path of the file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The number of bytes read does not match the size of the file.
    ShortRead {
        /// The path of the file.
        path: PathBuf,
        /// The size reported for the file.
        expected: u64,
        /// The number of bytes actually read.
        actual: u64,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileStatFailure { path, .. } => {
                write!(f, "failed to get file size: {}", path.display())
            }
            Self::FileOpenFailure { path, .. } => {
                write!(f, "failed to open file: {}", path.display())
            }
            Self::ShortRead {
                path,
                expected,
                actual,
            } => write!(
                f,
                "file size is not matched: {}: expected {expected} bytes, read {actual}",
                path.display()
            ),
        }
    }
}

impl error::Error for LoadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::FileStatFailure { source, .. } | Self::FileOpenFailure { source, .. } => {
                Some(source)
            }
            Self::ShortRead { .. } => None,
        }
    }
}

#[cfg(test)]
mod test {
    use std::{fs, path::PathBuf};

    use super::{LoadError, load_image};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("elf2rom-load-{}-{name}", std::process::id()))
    }

    #[test]
    fn loads_entire_file() {
        let path = scratch_path("whole");
        fs::write(&path, [1u8, 2, 3, 4, 5]).unwrap();

        let image = load_image(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(image, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn missing_file_fails_stat() {
        let path = scratch_path("missing");

        let error = load_image(&path).unwrap_err();
        assert!(matches!(error, LoadError::FileStatFailure { .. }));
        assert!(error.to_string().contains(&*path.to_string_lossy()));
    }

    #[test]
    fn directory_is_not_a_file() {
        let path = scratch_path("directory");
        fs::create_dir_all(&path).unwrap();

        let error = load_image(&path).unwrap_err();
        fs::remove_dir(&path).unwrap();

        // Depending on the platform a directory either fails to open or fails to read.
        assert!(matches!(
            error,
            LoadError::FileOpenFailure { .. } | LoadError::ShortRead { .. }
        ));
    }
}
