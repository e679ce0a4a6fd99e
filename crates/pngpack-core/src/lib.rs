//! # pngpack-core
//!
//! A library for finding PNG images embedded in arbitrary files and for
//! bundling PNG files into a single pack file that keeps their names.
//!
//! This crate provides the core functionality for:
//! - Scanning byte buffers for PNG signatures
//! - Slicing a buffer into one image per signature
//! - Encoding and decoding the pack format
//! - Writing pack files and extracted images to disk
//!
//! ## Architecture
//!
//! - [`scanner`]: Signature search and image slicing
//! - [`pack`]: Pack format encoding and decoding
//! - [`output`]: Output paths and file writing
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use pngpack_core::{decode, output};
//! use std::fs;
//! use std::path::Path;
//!
//! let input = Path::new("./game.dat");
//! let data = fs::read(input)?;
//!
//! let decoded = decode(data.into())?;
//! for entry in &decoded.entries {
//!     println!("{:?}: {} bytes", entry.name(), entry.len());
//! }
//!
//! output::write_images(&output::unpack_output_dir(input), &decoded)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod output;
pub mod pack;
pub mod scanner;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use pack::{
    decode, detect_format, encode, extract_filenames, DecodedPack, EncodedPack, PackEntry,
    PackFormat, NAME_DELIMITER, PACK_SIGNATURE,
};
pub use scanner::{find_signature_offsets, slice_images, PNG_SIGNATURE};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
