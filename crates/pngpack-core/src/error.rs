//! Error types for the pngpack-core library.
//!
//! Every variant is terminal for a single run of the tool: callers propagate
//! it up to the entry point instead of skipping the offending entry.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pngpack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all pngpack operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input path does not exist
    #[error("'{path}' not found")]
    PathNotFound {
        /// The missing path
        path: PathBuf,
    },

    /// Expected a directory, got something else
    #[error("'{path}' is not a directory")]
    NotADirectory {
        /// The offending path
        path: PathBuf,
    },

    /// Expected a regular file, got something else
    #[error("'{path}' is not a file")]
    NotAFile {
        /// The offending path
        path: PathBuf,
    },

    /// Directory mode found no `.png` files
    #[error("no png files found in directory '{path}'")]
    NoPngFilesInDirectory {
        /// The scanned directory
        path: PathBuf,
    },

    /// Every candidate entry was zero-length
    #[error("nothing to pack: all input files are empty")]
    EmptyInput,

    /// No PNG signature occurs in the input
    #[error("input does not contain any png data")]
    NoImagesFound,

    /// Pack signature present but the name layout is broken
    #[error(
        "corrupt pack file at offset {offset:#X}: expected name delimiter {expected:#04X}, got {found}"
    )]
    CorruptPackFormat {
        /// Offset of the image signature whose name could not be read
        offset: usize,
        /// The delimiter byte that was expected
        expected: u8,
        /// What was found instead
        found: String,
    },

    /// Filename cannot be stored because it contains the name delimiter
    #[error("file name '{name}' contains the pack name delimiter {delimiter:#04X}")]
    DelimiterInName {
        /// The rejected filename
        name: String,
        /// The delimiter byte
        delimiter: u8,
    },

    /// Filename is not valid UTF-8 and cannot be stored or restored unchanged
    #[error("file name '{name}' is not valid UTF-8")]
    NonUtf8Name {
        /// Lossy rendering of the name
        name: String,
    },

    /// Offset lies outside the buffer it refers to
    #[error("offset {offset} is outside the {len} byte input")]
    OffsetOutOfRange {
        /// The offending offset
        offset: usize,
        /// Length of the buffer
        len: usize,
    },

    /// Named encoding requested for an entry without a filename
    #[error("entry {index} has no file name but names are being written")]
    MissingEntryName {
        /// Position of the entry in the input
        index: usize,
    },

    /// Path traversal attempt detected (security error)
    #[error("path traversal detected: '{path}' would escape output directory")]
    PathTraversal {
        /// The suspicious path
        path: PathBuf,
    },

    /// Stored filename is unusable as an output file name
    #[error("entry {index} has an invalid file name '{name}'")]
    InvalidEntryName {
        /// Position of the entry in the pack
        index: usize,
        /// The stored name
        name: String,
    },

    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to list or resolve a directory
    #[error("failed to read directory '{path}': {source}")]
    DirectoryRead {
        /// Path to the directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new path-not-found error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Creates a new not-a-directory error
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    /// Creates a new not-a-file error
    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    /// Creates a new error for a directory without png files
    pub fn no_png_files(path: impl Into<PathBuf>) -> Self {
        Self::NoPngFilesInDirectory { path: path.into() }
    }

    /// Creates a new corrupt pack error; `found` is `None` when the buffer ended early
    pub fn corrupt_pack(offset: usize, expected: u8, found: Option<u8>) -> Self {
        let found = match found {
            Some(byte) => format!("{byte:#04X}"),
            None => "start of file".to_string(),
        };
        Self::CorruptPackFormat {
            offset,
            expected,
            found,
        }
    }

    /// Creates a new error for a name that is not valid UTF-8
    pub fn non_utf8_name(name: impl Into<String>) -> Self {
        Self::NonUtf8Name { name: name.into() }
    }

    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory read error
    pub fn directory_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Returns true if this error comes from the filesystem rather than the data
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. }
                | Self::FileWrite { .. }
                | Self::DirectoryCreate { .. }
                | Self::DirectoryRead { .. }
        )
    }
}
