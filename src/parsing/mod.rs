//! Parsers for overlap and sequence inputs.
//!
//! - **MHAP**: numeric ids, whitespace separated ([`mhap`])
//! - **PAF**: sequence names resolved against the loaded sets ([`paf`])
//! - **FASTA/FASTQ**: reads and references via noodles ([`sequences`])
//!
//! Any input may be gzip/bgzip compressed (`.gz`, `.bgz`), and `-` reads
//! from stdin. Overlap lines that cannot be parsed or fail validation are
//! skipped rather than aborting the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::overlap::{Overlap, OverlapError};
use crate::core::sequence::SequenceSet;

pub mod mhap;
pub mod paf;
pub mod sequences;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid overlap: {0}")]
    Overlap(#[from] OverlapError),

    #[error("noodles error: {0}")]
    Noodles(String),
}

/// Overlap file formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OverlapFormat {
    Mhap,
    Paf,
}

impl OverlapFormat {
    /// Guess the format from the file name: `.paf` (optionally compressed) is
    /// PAF, anything else MHAP.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy().to_lowercase();
        let stem = name
            .strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bgz"))
            .unwrap_or(&name);
        if stem.ends_with(".paf") {
            Self::Paf
        } else {
            Self::Mhap
        }
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a path for buffered reading; `-` is stdin, `.gz`/`.bgz` are decompressed
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(std::io::stdin().lock()));
    }

    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read overlaps line by line, skipping lines `parse` rejects
fn collect_overlaps<R, F>(reader: R, format: &str, parse: F) -> Result<Vec<Overlap>, ParseError>
where
    R: BufRead,
    F: Fn(&str) -> Result<Overlap, ParseError>,
{
    let mut overlaps = Vec::new();
    let mut skipped = 0usize;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse(line) {
            Ok(overlap) => overlaps.push(overlap),
            Err(e) => {
                // Line numbers are 1-based for user friendliness
                debug!(line = i + 1, error = %e, "Skipping {format} line");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(
            skipped,
            kept = overlaps.len(),
            "Skipped unparseable {format} lines"
        );
    }

    Ok(overlaps)
}

/// Parse a whitespace-separated numeric column
fn parse_field<T: std::str::FromStr>(
    fields: &[&str],
    idx: usize,
    name: &str,
) -> Result<T, ParseError> {
    let raw = fields
        .get(idx)
        .ok_or_else(|| ParseError::InvalidFormat(format!("missing column '{name}'")))?;
    raw.parse()
        .map_err(|_| ParseError::InvalidFormat(format!("invalid {name}: '{raw}'")))
}

/// Load overlaps from `path` in the given format
///
/// # Errors
///
/// Returns `ParseError::Io` if the input cannot be read. Malformed lines are
/// skipped, not reported as errors.
pub fn parse_overlaps(
    path: &Path,
    format: OverlapFormat,
    reads: &SequenceSet,
    references: &SequenceSet,
) -> Result<Vec<Overlap>, ParseError> {
    let reader = open_input(path)?;
    match format {
        OverlapFormat::Mhap => mhap::parse_mhap_reader(reader),
        OverlapFormat::Paf => paf::parse_paf_reader(reader, reads, references),
    }
}
