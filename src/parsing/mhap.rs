//! Parser for MHAP overlap files.
//!
//! Each line has 12 whitespace-separated columns:
//!
//! `A-id B-id error shared-minmers A-rev A-start A-end A-len B-rev B-start B-end B-len`
//!
//! Ids are 1-based. The overlap is on the reverse strand when exactly one of
//! the two strand columns is set.

use std::io::BufRead;
use std::path::Path;

use crate::core::overlap::Overlap;
use crate::parsing::{collect_overlaps, open_input, parse_field, ParseError};

const MHAP_COLUMNS: usize = 12;

/// Parse an MHAP file, skipping malformed lines
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read.
pub fn parse_mhap_file(path: &Path) -> Result<Vec<Overlap>, ParseError> {
    parse_mhap_reader(open_input(path)?)
}

/// Parse MHAP records from a reader, skipping malformed lines
///
/// # Errors
///
/// Returns `ParseError::Io` if reading fails.
pub fn parse_mhap_reader<R: BufRead>(reader: R) -> Result<Vec<Overlap>, ParseError> {
    collect_overlaps(reader, "MHAP", parse_mhap_line)
}

/// Parse a single MHAP line
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a column is missing or not numeric,
/// or `ParseError::Overlap` if the coordinates are inconsistent.
pub fn parse_mhap_line(line: &str) -> Result<Overlap, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MHAP_COLUMNS {
        return Err(ParseError::InvalidFormat(format!(
            "expected {MHAP_COLUMNS} columns, found {}",
            fields.len()
        )));
    }

    let a_id: usize = parse_field(&fields, 0, "A-id")?;
    let b_id: usize = parse_field(&fields, 1, "B-id")?;
    let _error: f64 = parse_field(&fields, 2, "error")?;
    let _shared: u64 = parse_field(&fields, 3, "shared-minmers")?;
    let a_rev: u8 = parse_field(&fields, 4, "A-rev")?;
    let a_start = parse_field(&fields, 5, "A-start")?;
    let a_end = parse_field(&fields, 6, "A-end")?;
    let a_len = parse_field(&fields, 7, "A-len")?;
    let b_rev: u8 = parse_field(&fields, 8, "B-rev")?;
    let b_start = parse_field(&fields, 9, "B-start")?;
    let b_end = parse_field(&fields, 10, "B-end")?;
    let b_len = parse_field(&fields, 11, "B-len")?;

    Ok(Overlap::new(
        a_id,
        b_id,
        a_start,
        a_end,
        a_len,
        b_start,
        b_end,
        b_len,
        (a_rev != 0) != (b_rev != 0),
    )?)
}
