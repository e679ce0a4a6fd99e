//! Pack encoding.

use super::{PackEntry, NAME_DELIMITER, PACK_SIGNATURE};
use crate::error::{Error, Result};
use tracing::{debug, trace};

/// An encoded pack buffer
#[derive(Debug, Clone)]
pub struct EncodedPack {
    /// The merged pack bytes
    pub data: Vec<u8>,
    /// Number of entries written (empty entries are not counted)
    pub count: usize,
}

impl EncodedPack {
    /// Returns the pack as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Merges `entries` into a single pack buffer.
///
/// Zero-length entries are skipped. With `include_header` the buffer starts
/// with [`PACK_SIGNATURE`] and every image is preceded by `#name#`; without
/// it the images are simply concatenated and names are ignored.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if no non-empty entry remains
/// - [`Error::MissingEntryName`] if a header is requested and an entry has no name
/// - [`Error::DelimiterInName`] if a name contains [`NAME_DELIMITER`], which
///   would make the pack unreadable
pub fn encode(entries: &[PackEntry], include_header: bool) -> Result<EncodedPack> {
    let kept: Vec<(usize, &PackEntry)> = entries
        .iter()
        .enumerate()
        .filter(|(index, entry)| {
            if entry.is_empty() {
                debug!(
                    "Skipping empty entry {} ({})",
                    index,
                    entry.name().unwrap_or("unnamed")
                );
            }
            !entry.is_empty()
        })
        .collect();

    if kept.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut capacity: usize = kept.iter().map(|(_, entry)| entry.len()).sum();

    if include_header {
        for &(index, entry) in &kept {
            let name = entry.name().ok_or(Error::MissingEntryName { index })?;
            if name.as_bytes().contains(&NAME_DELIMITER) {
                return Err(Error::DelimiterInName {
                    name: name.to_string(),
                    delimiter: NAME_DELIMITER,
                });
            }
            capacity += name.len() + 2;
        }
        capacity += PACK_SIGNATURE.len();
    }

    let mut data = Vec::with_capacity(capacity);

    if include_header {
        data.extend_from_slice(&PACK_SIGNATURE);
    }

    for &(_, entry) in &kept {
        if include_header {
            // Checked above
            let name = entry.name().unwrap_or_default();
            data.push(NAME_DELIMITER);
            data.extend_from_slice(name.as_bytes());
            data.push(NAME_DELIMITER);
        }
        trace!("Packing {} bytes at offset {}", entry.len(), data.len());
        data.extend_from_slice(entry.as_bytes());
    }

    debug!(
        "Encoded {} entries into {} bytes (names: {})",
        kept.len(),
        data.len(),
        include_header
    );

    Ok(EncodedPack {
        data,
        count: kept.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::PNG_SIGNATURE;
    use pretty_assertions::assert_eq;

    fn png(payload: &[u8]) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn test_encode_with_names() {
        let entries = vec![
            PackEntry::new("A.png", png(&[0x01, 0x02])),
            PackEntry::new("B.png", png(&[0x03, 0x04])),
        ];
        let encoded = encode(&entries, true).unwrap();

        let mut expected = PACK_SIGNATURE.to_vec();
        expected.extend_from_slice(b"#A.png#");
        expected.extend(png(&[0x01, 0x02]));
        expected.extend_from_slice(b"#B.png#");
        expected.extend(png(&[0x03, 0x04]));

        assert_eq!(encoded.count, 2);
        assert_eq!(encoded.data, expected);
    }

    #[test]
    fn test_encode_without_names() {
        let entries = vec![
            PackEntry::new("A.png", png(&[0x01])),
            PackEntry::unnamed(png(&[0x02])),
        ];
        let encoded = encode(&entries, false).unwrap();

        assert_eq!(encoded.count, 2);
        assert_eq!(encoded.data, [png(&[0x01]), png(&[0x02])].concat());
    }

    #[test]
    fn test_encode_skips_empty_entries() {
        let entries = vec![
            PackEntry::new("empty.png", Vec::<u8>::new()),
            PackEntry::new("B.png", png(&[0x03])),
        ];
        let encoded = encode(&entries, true).unwrap();

        let mut expected = PACK_SIGNATURE.to_vec();
        expected.extend_from_slice(b"#B.png#");
        expected.extend(png(&[0x03]));

        assert_eq!(encoded.count, 1);
        assert_eq!(encoded.data, expected);
    }

    #[test]
    fn test_encode_empty_input() {
        assert!(matches!(encode(&[], true), Err(Error::EmptyInput)));

        let entries = vec![PackEntry::new("a.png", Vec::<u8>::new())];
        assert!(matches!(encode(&entries, false), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_encode_rejects_delimiter_in_name() {
        let entries = vec![PackEntry::new("a#b.png", png(&[]))];
        let err = encode(&entries, true).unwrap_err();
        assert!(matches!(err, Error::DelimiterInName { ref name, .. } if name == "a#b.png"));

        // Names are not stored without a header
        assert!(encode(&entries, false).is_ok());
    }

    #[test]
    fn test_encode_requires_names_with_header() {
        let entries = vec![
            PackEntry::new("a.png", png(&[])),
            PackEntry::unnamed(png(&[])),
        ];
        assert!(matches!(
            encode(&entries, true),
            Err(Error::MissingEntryName { index: 1 })
        ));
    }
}
