//! Pack file encoding and decoding.
//!
//! A pack file bundles several PNG images into one buffer and optionally keeps
//! their original file names:
//!
//! ```text
//! +-------------------+
//! | 23 2F 23 2F 23    |  pack signature (named packs only)
//! | #first.png#       |  name of the first image, wrapped in 0x23
//! | 89 50 4E 47 ...   |  first image, starting with the PNG signature
//! | #second.png#      |
//! | 89 50 4E 47 ...   |
//! | ...               |
//! +-------------------+
//! ```
//!
//! Without names the pack is just the images concatenated, which is also what
//! any other file with embedded PNG data looks like to the decoder.
//! [`decode`] tells the two apart by the leading pack signature alone.

mod decode;
mod encode;

use bytes::Bytes;
use std::fmt;

pub use decode::{decode, extract_filenames, DecodedPack};
pub use encode::{encode, EncodedPack};

/// Marker at offset 0 of every pack written with file names
pub const PACK_SIGNATURE: [u8; 5] = [0x23, 0x2F, 0x23, 0x2F, 0x23];

/// Byte wrapped around each stored file name (`#`)
pub const NAME_DELIMITER: u8 = 0x23;

/// How the images in a buffer are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackFormat {
    /// Pack signature followed by `#name#` + image records
    Named,
    /// Images without names: a headerless pack, or any file with embedded PNGs
    Plain,
}

impl PackFormat {
    /// Detects the format from the leading bytes of `data`
    pub fn detect(data: &[u8]) -> Self {
        if detect_format(data) {
            Self::Named
        } else {
            Self::Plain
        }
    }

    /// Returns true if entries of this format carry file names
    pub fn has_names(self) -> bool {
        self == Self::Named
    }
}

impl fmt::Display for PackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named => f.write_str("named pack"),
            Self::Plain => f.write_str("plain"),
        }
    }
}

/// Returns true iff `data` starts with [`PACK_SIGNATURE`].
///
/// This is a prefix check only; any file that happens to begin with these
/// five bytes is treated as a pack.
pub fn detect_format(data: &[u8]) -> bool {
    data.starts_with(&PACK_SIGNATURE)
}

/// A single image in a pack, with its file name when one is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    /// Original file name
    pub name: Option<String>,
    /// Image bytes, starting with the PNG signature
    pub data: Bytes,
}

impl PackEntry {
    /// Creates a named entry
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: Some(name.into()),
            data: data.into(),
        }
    }

    /// Creates an entry without a file name
    pub fn unnamed(data: impl Into<Bytes>) -> Self {
        Self {
            name: None,
            data: data.into(),
        }
    }

    /// Returns the file name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the image data as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size of the image in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the image has no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
