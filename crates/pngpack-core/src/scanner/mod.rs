//! Binary scanning module for finding embedded PNG images.
//!
//! ## Algorithm Overview
//!
//! 1. Search for the 8-byte PNG signature in the input
//! 2. Resume the search right after each match, so matches never overlap
//! 3. Partition the input into one slice per signature
//!
//! No chunk or CRC validation is done: a signature occurrence is all it takes
//! to start a new image.
//!
//! ## Slice boundaries
//!
//! An image runs from its signature up to, but excluding, the byte right
//! before the next boundary. In a pack file that byte is the closing name
//! delimiter of the next entry; in a plain concatenation of PNG files it is
//! the last byte of the current image, which is therefore dropped. The
//! truncation keeps output identical to existing unpackers and is covered by
//! tests.

use crate::error::{Error, Result};
use bytes::Bytes;
use memchr::memmem;
use std::ops::Range;
use tracing::{debug, info, trace};

/// The PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Returns the offset of every PNG signature in `data`, in ascending order.
///
/// Matches are non-overlapping: after a hit the search continues after the
/// end of the matched signature.
pub fn find_signature_offsets(data: &[u8]) -> Vec<usize> {
    debug!("Starting scan of {} bytes", data.len());

    let finder = memmem::Finder::new(&PNG_SIGNATURE);
    let offsets: Vec<usize> = finder
        .find_iter(data)
        .inspect(|pos| trace!("Found PNG signature at position {}", pos))
        .collect();

    info!("{} PNG images found", offsets.len());
    offsets
}

/// Partitions `data` into one image per signature offset.
///
/// Every image but the last stops one byte short of the next offset; the last
/// image runs to the end of `data`.
///
/// # Errors
///
/// - [`Error::NoImagesFound`] if `offsets` is empty
/// - [`Error::OffsetOutOfRange`] if an offset lies past the end of `data`
pub fn slice_images(data: &Bytes, offsets: &[usize]) -> Result<Vec<Bytes>> {
    slice_between(data, offsets, offsets)
}

/// Partitions `data` into images starting at `starts`, each ending one byte
/// before the following entry's boundary.
///
/// `boundaries[i]` is where entry `i` begins in the container (for a plain
/// file this is the signature offset itself, for a pack file it is the
/// entry's opening name delimiter). `boundaries[0]` is never used.
///
/// # Errors
///
/// - [`Error::NoImagesFound`] if `starts` is empty
/// - [`Error::OffsetOutOfRange`] if a start or boundary lies past the end of `data`
pub fn slice_between(
    data: &Bytes,
    starts: &[usize],
    boundaries: &[usize],
) -> Result<Vec<Bytes>> {
    let ranges = image_ranges(data.len(), starts, boundaries)?;
    Ok(ranges.into_iter().map(|range| data.slice(range)).collect())
}

/// Computes the byte range of every image; see [`slice_between`].
pub fn image_ranges(
    len: usize,
    starts: &[usize],
    boundaries: &[usize],
) -> Result<Vec<Range<usize>>> {
    if starts.is_empty() {
        return Err(Error::NoImagesFound);
    }
    debug_assert_eq!(starts.len(), boundaries.len());

    if let Some(&offset) = starts.iter().chain(boundaries).find(|&&offset| offset > len) {
        return Err(Error::OffsetOutOfRange { offset, len });
    }

    let mut ranges = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = match boundaries.get(i + 1) {
            // A boundary behind the start yields an empty image
            Some(&next) => next.saturating_sub(1).max(start),
            None => len,
        };
        trace!("Image {} spans {}..{}", i, start, end);
        ranges.push(start..end);
    }

    Ok(ranges)
}
