//! pngpack - Extract embedded PNG images and pack PNG directories
//!
//! Given a directory, all `.png` files in it are packed into a single file
//! that keeps their names. Given a file, every embedded PNG image is written
//! out; pack files produced by this tool get their original names back.

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Parser;
use pngpack_core::{decode, encode, output, DecodedPack, Error, PackEntry};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Extract embedded PNG images from a file, or pack a directory of PNG files
#[derive(Parser, Debug)]
#[command(name = "pngpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory of .png files to pack, or file to extract PNG images from
    path: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Pack without the pack signature and file names (plain concatenation)
    #[arg(long)]
    no_names: bool,

    /// Only list the images found in a file without extracting them
    #[arg(long)]
    list_only: bool,

    /// Dry run - don't write files, just show what would be written
    #[arg(long)]
    dry_run: bool,
}

/// What a run produced
#[derive(Debug)]
struct Outcome {
    /// Number of images packed or extracted
    count: usize,
    /// Pack file or output directory
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    info!("Processing: {}", cli.path.display());

    if is_directory(&cli.path)? {
        let outcome = process_directory(&cli, &cli.path)?;
        if !cli.dry_run {
            println!(
                "{} png files packed into {}",
                outcome.count,
                outcome.output.display()
            );
        }
    } else {
        let outcome = process_single_file(&cli, &cli.path)?;
        if !cli.dry_run && !cli.list_only {
            println!(
                "{} png files written to: {}",
                outcome.count,
                outcome.output.display()
            );
        }
    }

    Ok(())
}

/// Returns whether `path` is a directory, failing if it does not exist
fn is_directory(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::path_not_found(path).into()),
        Err(e) => Err(Error::file_read(path, e).into()),
    }
}

/// Pack every `.png` file of a directory into `<dir>_packed`
fn process_directory(cli: &Cli, directory: &Path) -> Result<Outcome> {
    if !directory.exists() {
        return Err(Error::path_not_found(directory).into());
    }
    if !directory.is_dir() {
        return Err(Error::not_a_directory(directory).into());
    }

    info!("Scanning directory: {}", directory.display());

    let png_files = collect_png_files(directory)?;
    if png_files.is_empty() {
        return Err(Error::no_png_files(directory).into());
    }

    let mut entries = Vec::with_capacity(png_files.len());
    for path in &png_files {
        let data = fs::read(path).map_err(|e| Error::file_read(path, e))?;
        trace!("Read {} bytes from {}", data.len(), path.display());

        if cli.no_names {
            entries.push(PackEntry::unnamed(data));
            continue;
        }

        // Stored names must come back byte for byte, so no lossy conversion
        let file_name = path.file_name().unwrap_or_default();
        let name = file_name
            .to_str()
            .ok_or_else(|| Error::non_utf8_name(file_name.to_string_lossy()))?;
        entries.push(PackEntry::new(name, data));
    }

    let packed = encode(&entries, !cli.no_names)
        .with_context(|| format!("Failed to pack directory: {}", directory.display()))?;
    let output_path = output::pack_output_path(directory)?;

    if cli.dry_run {
        println!(
            "Would write: {} ({} png files, {} bytes)",
            output_path.display(),
            packed.count,
            packed.data.len()
        );
    } else {
        output::write_pack(&output_path, packed.as_bytes())?;
    }

    Ok(Outcome {
        count: packed.count,
        output: output_path,
    })
}

/// Collect the `.png` files directly inside `directory`, sorted by name
fn collect_png_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::directory_read(directory, e.into()))?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            trace!("Skipping non-png: {}", path.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    debug!("Found {} png files in {}", files.len(), directory.display());
    Ok(files)
}

/// Extract the PNG images of a single file into `<file>_output`
fn process_single_file(cli: &Cli, file: &Path) -> Result<Outcome> {
    if !file.exists() {
        return Err(Error::path_not_found(file).into());
    }
    if !file.is_file() {
        return Err(Error::not_a_file(file).into());
    }

    let data = fs::read(file).map_err(|e| Error::file_read(file, e))?;
    trace!("Read {} bytes from {}", data.len(), file.display());

    let decoded = decode(Bytes::from(data))
        .with_context(|| format!("Failed to unpack file: {}", file.display()))?;

    let output_dir = output::unpack_output_dir(file);

    if cli.list_only {
        print_listing(&decoded)?;
    } else if cli.dry_run {
        for name in output::output_file_names(&decoded)? {
            println!("Would write: {}", output_dir.join(name).display());
        }
    } else {
        output::write_images(&output_dir, &decoded)?;
    }

    Ok(Outcome {
        count: decoded.len(),
        output: output_dir,
    })
}

/// Print one line per decoded image: index, offset, size, hash and name
fn print_listing(decoded: &DecodedPack) -> Result<()> {
    let names = output::output_file_names(decoded)?;

    for (i, ((entry, offset), name)) in decoded
        .entries
        .iter()
        .zip(&decoded.offsets)
        .zip(&names)
        .enumerate()
    {
        println!(
            "{:>4}  {:#010x}  {:>10}  {}  {}",
            i,
            offset,
            entry.len(),
            content_hash(entry.as_bytes()),
            name
        );
    }

    Ok(())
}

/// Compute a short hash of the content (first 8 chars of blake3)
fn content_hash(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    hash.to_hex()[..8].to_string()
}
