//! Pack decoding.
//!
//! Decoding works on any buffer: PNG signatures are located first, then the
//! pack signature decides whether a `#name#` record is expected in front of
//! every image.

use super::{PackEntry, PackFormat, NAME_DELIMITER};
use crate::error::{Error, Result};
use crate::scanner::{find_signature_offsets, slice_between, slice_images};
use bytes::Bytes;
use tracing::{debug, trace};

/// The images found in a buffer
#[derive(Debug, Clone)]
pub struct DecodedPack {
    /// Whether the buffer carried file names
    pub format: PackFormat,
    /// Offset of each image's PNG signature in the source buffer
    pub offsets: Vec<usize>,
    /// Decoded images, in buffer order
    pub entries: Vec<PackEntry>,
}

impl DecodedPack {
    /// Number of images
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no image was decoded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the entries carry their original file names
    pub fn has_names(&self) -> bool {
        self.format.has_names()
    }
}

/// A `#name#` record in front of an image
#[derive(Debug)]
struct NameRecord {
    /// Position of the opening delimiter
    start: usize,
    name: String,
}

/// Decodes every image in `data`.
///
/// For a named pack each image is paired with the file name stored before it
/// and ends one byte before the next entry's name record. For anything else
/// the images are cut at the signature offsets as described in
/// [`crate::scanner`].
///
/// # Errors
///
/// - [`Error::NoImagesFound`] if `data` holds no PNG signature
/// - [`Error::CorruptPackFormat`] if the pack signature is present but an
///   image is not preceded by a `#name#` record
/// - [`Error::NonUtf8Name`] if a stored name is not valid UTF-8
pub fn decode(data: Bytes) -> Result<DecodedPack> {
    let offsets = find_signature_offsets(&data);
    if offsets.is_empty() {
        return Err(Error::NoImagesFound);
    }

    let format = PackFormat::detect(&data);
    debug!("Detected {} format with {} images", format, offsets.len());

    let entries = match format {
        PackFormat::Named => {
            let records = read_name_records(&data, &offsets)?;
            let boundaries: Vec<usize> = records.iter().map(|record| record.start).collect();
            let images = slice_between(&data, &offsets, &boundaries)?;

            records
                .into_iter()
                .zip(images)
                .map(|(record, image)| PackEntry {
                    name: Some(record.name),
                    data: image,
                })
                .collect()
        }
        PackFormat::Plain => slice_images(&data, &offsets)?
            .into_iter()
            .map(PackEntry::unnamed)
            .collect(),
    };

    Ok(DecodedPack {
        format,
        offsets,
        entries,
    })
}

/// Reads the file name stored in front of each image offset.
///
/// The byte right before every offset must be [`NAME_DELIMITER`]; the name is
/// everything between it and the previous delimiter.
///
/// # Errors
///
/// - [`Error::CorruptPackFormat`] if the closing delimiter is missing or no
///   opening delimiter precedes the name
/// - [`Error::NonUtf8Name`] if a stored name is not valid UTF-8
/// - [`Error::OffsetOutOfRange`] if an offset lies past the end of `data`
pub fn extract_filenames(data: &[u8], offsets: &[usize]) -> Result<Vec<String>> {
    Ok(read_name_records(data, offsets)?
        .into_iter()
        .map(|record| record.name)
        .collect())
}

fn read_name_records(data: &[u8], offsets: &[usize]) -> Result<Vec<NameRecord>> {
    offsets
        .iter()
        .map(|&offset| read_name_record(data, offset))
        .collect()
}

fn read_name_record(data: &[u8], offset: usize) -> Result<NameRecord> {
    if offset > data.len() {
        return Err(Error::OffsetOutOfRange {
            offset,
            len: data.len(),
        });
    }

    let Some(closing) = offset.checked_sub(1) else {
        return Err(Error::corrupt_pack(offset, NAME_DELIMITER, None));
    };

    let found = data[closing];
    if found != NAME_DELIMITER {
        return Err(Error::corrupt_pack(offset, NAME_DELIMITER, Some(found)));
    }

    // Walk backwards from the closing delimiter to the opening one
    let Some(start) = data[..closing].iter().rposition(|&b| b == NAME_DELIMITER) else {
        return Err(Error::corrupt_pack(offset, NAME_DELIMITER, None));
    };

    let raw = &data[start + 1..closing];
    let name = std::str::from_utf8(raw)
        .map_err(|_| Error::non_utf8_name(String::from_utf8_lossy(raw)))?
        .to_string();
    trace!("Image at {} is named '{}'", offset, name);

    Ok(NameRecord { start, name })
}
