//! Output locations and file writing.
//!
//! Packing a directory `images/` produces `images_packed` next to it;
//! unpacking a file `data.bin` writes into `data.bin_output/`. Writing stops
//! at the first failure and files that were already written are left in place.

use crate::error::{Error, Result};
use crate::pack::DecodedPack;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Suffix appended to a directory name to form its pack file name
pub const PACKED_SUFFIX: &str = "_packed";

/// Suffix appended to an input file name to form its output directory
pub const OUTPUT_DIR_SUFFIX: &str = "_output";

/// Returns `<parent>/<dir-name>_packed` for the directory `dir`.
///
/// Paths without a final component (such as `.`) are resolved first.
pub fn pack_output_path(dir: &Path) -> Result<PathBuf> {
    let resolved;
    let dir = if dir.file_name().is_some() {
        dir
    } else {
        resolved = fs::canonicalize(dir).map_err(|e| Error::directory_read(dir, e))?;
        resolved.as_path()
    };

    let name = dir.file_name().ok_or_else(|| Error::not_a_directory(dir))?;
    let mut packed = name.to_os_string();
    packed.push(PACKED_SUFFIX);

    Ok(dir.with_file_name(packed))
}

/// Returns the directory images extracted from `file` are written to
pub fn unpack_output_dir(file: &Path) -> PathBuf {
    let mut dir = file.as_os_str().to_os_string();
    dir.push(OUTPUT_DIR_SUFFIX);
    PathBuf::from(dir)
}

/// File name for image `index` of `total` when no name was stored.
///
/// The index is zero-padded to the number of digits in `total`.
pub fn numbered_name(index: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("image_{index:0width$}.png")
}

/// Output file names for every entry of `decoded`, in order.
///
/// # Errors
///
/// Stored names that are empty, `.`/`..` or contain a path separator are
/// rejected so a pack cannot write outside the output directory.
pub fn output_file_names(decoded: &DecodedPack) -> Result<Vec<String>> {
    let total = decoded.len();
    decoded
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry.name() {
            Some(name) if decoded.has_names() => {
                validate_entry_name(index, name)?;
                Ok(name.to_string())
            }
            _ => Ok(numbered_name(index, total)),
        })
        .collect()
}

fn validate_entry_name(index: usize, name: &str) -> Result<()> {
    if name.is_empty() || name == "." {
        return Err(Error::InvalidEntryName {
            index,
            name: name.to_string(),
        });
    }
    if name == ".." || name.contains(['/', '\\']) {
        return Err(Error::path_traversal(name));
    }
    Ok(())
}

/// Writes a pack buffer to `path`
pub fn write_pack(path: &Path, data: &[u8]) -> Result<()> {
    debug!("Writing {} bytes to {}", data.len(), path.display());
    fs::write(path, data).map_err(|e| Error::file_write(path, e))
}

/// Writes every image of `decoded` into `dir`, creating it if needed.
///
/// Returns the paths written, in pack order.
pub fn write_images(dir: &Path, decoded: &DecodedPack) -> Result<Vec<PathBuf>> {
    let names = output_file_names(decoded)?;

    fs::create_dir_all(dir).map_err(|e| Error::directory_create(dir, e))?;

    let mut written = Vec::with_capacity(names.len());
    for (name, entry) in names.iter().zip(&decoded.entries) {
        let path = dir.join(name);
        trace!("Writing {} bytes to {}", entry.len(), path.display());
        fs::write(&path, entry.as_bytes()).map_err(|e| Error::file_write(&path, e))?;
        written.push(path);
    }

    debug!("Wrote {} images to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{decode, encode, PackEntry};
    use crate::scanner::PNG_SIGNATURE;
    use bytes::Bytes;
    use tempfile::TempDir;

    fn png(payload: &[u8]) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn test_numbered_name_padding() {
        assert_eq!(numbered_name(0, 1), "image_0.png");
        assert_eq!(numbered_name(3, 9), "image_3.png");
        assert_eq!(numbered_name(0, 12), "image_00.png");
        assert_eq!(numbered_name(11, 12), "image_11.png");
        assert_eq!(numbered_name(7, 100), "image_007.png");
    }

    #[test]
    fn test_pack_output_path() {
        assert_eq!(
            pack_output_path(Path::new("assets/icons")).unwrap(),
            PathBuf::from("assets/icons_packed")
        );
        assert_eq!(
            pack_output_path(Path::new("assets/icons/")).unwrap(),
            PathBuf::from("assets/icons_packed")
        );
    }

    #[test]
    fn test_pack_output_path_resolves_dot() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("sprites");
        fs::create_dir(&nested).unwrap();

        let path = pack_output_path(&nested.join(".")).unwrap();
        assert_eq!(path.file_name().unwrap(), "sprites_packed");
    }

    #[test]
    fn test_unpack_output_dir() {
        assert_eq!(
            unpack_output_dir(Path::new("dumps/game.dat")),
            PathBuf::from("dumps/game.dat_output")
        );
    }

    #[test]
    fn test_write_images_plain_twelve() {
        let temp_dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..12u8).flat_map(|i| png(&[i, i])).collect();
        let decoded = decode(Bytes::from(data)).unwrap();

        let out = temp_dir.path().join("plain_output");
        let written = write_images(&out, &decoded).unwrap();

        assert_eq!(written.len(), 12);
        assert_eq!(written[0], out.join("image_00.png"));
        assert_eq!(written[11], out.join("image_11.png"));
        assert_eq!(fs::read(&written[11]).unwrap(), png(&[11, 11]));
        assert_eq!(fs::read(&written[0]).unwrap(), png(&[0]));
    }

    #[test]
    fn test_write_images_named() {
        let temp_dir = TempDir::new().unwrap();
        let entries = vec![
            PackEntry::new("cat.png", png(&[1, 2])),
            PackEntry::new("dog.png", png(&[3, 4])),
        ];
        let pack = encode(&entries, true).unwrap();
        let decoded = decode(Bytes::from(pack.data)).unwrap();

        let out = temp_dir.path().join("animals");
        write_images(&out, &decoded).unwrap();

        assert_eq!(fs::read(out.join("cat.png")).unwrap(), png(&[1]));
        assert_eq!(fs::read(out.join("dog.png")).unwrap(), png(&[3, 4]));
    }

    #[test]
    fn test_write_images_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let mut data = crate::pack::PACK_SIGNATURE.to_vec();
        data.extend_from_slice(b"#../evil.png#");
        data.extend(png(&[1]));
        let decoded = decode(Bytes::from(data)).unwrap();

        let out = temp_dir.path().join("out");
        let err = write_images(&out, &decoded).unwrap_err();

        assert!(matches!(err, Error::PathTraversal { .. }));
        assert!(!out.exists());
        assert!(!temp_dir.path().join("evil.png").exists());
    }

    #[test]
    fn test_write_images_stops_at_first_failure() {
        let temp_dir = TempDir::new().unwrap();
        let entries = vec![
            PackEntry::new("a.png", png(&[1])),
            PackEntry::new("sub", png(&[2])),
            PackEntry::new("c.png", png(&[3])),
        ];
        let pack = encode(&entries, true).unwrap();
        let decoded = decode(Bytes::from(pack.data)).unwrap();

        // A directory in the way of the second entry
        let out = temp_dir.path().join("out");
        fs::create_dir_all(out.join("sub")).unwrap();

        let err = write_images(&out, &decoded).unwrap_err();

        assert!(matches!(err, Error::FileWrite { ref path, .. } if path.ends_with("sub")));
        assert_eq!(fs::read(out.join("a.png")).unwrap(), png(&[]));
        assert!(!out.join("c.png").exists());
    }

    #[test]
    fn test_validate_entry_name() {
        assert!(validate_entry_name(0, "ok.png").is_ok());
        assert!(validate_entry_name(0, "..").is_err());
        assert!(validate_entry_name(0, "a\\b.png").is_err());
        assert!(matches!(
            validate_entry_name(2, ""),
            Err(Error::InvalidEntryName { index: 2, .. })
        ));
    }

    #[test]
    fn test_write_pack_into_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("x_packed");
        let err = write_pack(&path, b"data").unwrap_err();
        assert!(err.is_io());
    }
}
