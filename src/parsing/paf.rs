//! Parser for PAF overlap files.
//!
//! The first 12 tab-separated columns are used:
//! `qname qlen qstart qend strand tname tlen tstart tend matches block-len mapq`.
//! Query names resolve against the reads and target names against the
//! references; a record naming an unknown sequence is skipped.

use std::io::BufRead;
use std::path::Path;

use crate::core::overlap::Overlap;
use crate::core::sequence::SequenceSet;
use crate::parsing::{collect_overlaps, open_input, parse_field, ParseError};

const PAF_COLUMNS: usize = 12;

/// Parse a PAF file, skipping malformed lines
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read.
pub fn parse_paf_file(
    path: &Path,
    reads: &SequenceSet,
    references: &SequenceSet,
) -> Result<Vec<Overlap>, ParseError> {
    parse_paf_reader(open_input(path)?, reads, references)
}

/// Parse PAF records from a reader, skipping malformed lines
///
/// # Errors
///
/// Returns `ParseError::Io` if reading fails.
pub fn parse_paf_reader<R: BufRead>(
    reader: R,
    reads: &SequenceSet,
    references: &SequenceSet,
) -> Result<Vec<Overlap>, ParseError> {
    collect_overlaps(reader, "PAF", |line| {
        parse_paf_line(line, reads, references)
    })
}

/// Parse a single PAF line
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for missing or malformed columns and
/// unknown sequence names, or `ParseError::Overlap` for inconsistent
/// coordinates.
pub fn parse_paf_line(
    line: &str,
    reads: &SequenceSet,
    references: &SequenceSet,
) -> Result<Overlap, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < PAF_COLUMNS {
        return Err(ParseError::InvalidFormat(format!(
            "expected at least {PAF_COLUMNS} columns, found {}",
            fields.len()
        )));
    }

    let query_name = fields[0];
    let a_id = reads
        .id_of(query_name)
        .ok_or_else(|| ParseError::InvalidFormat(format!("unknown read '{query_name}'")))?;
    let target_name = fields[5];
    let b_id = references.id_of(target_name).ok_or_else(|| {
        ParseError::InvalidFormat(format!("unknown reference '{target_name}'"))
    })?;

    let b_rev = match fields[4] {
        "+" => false,
        "-" => true,
        other => {
            return Err(ParseError::InvalidFormat(format!(
                "invalid strand '{other}'"
            )))
        }
    };

    Ok(Overlap::new(
        a_id,
        b_id,
        parse_field(&fields, 2, "qstart")?,
        parse_field(&fields, 3, "qend")?,
        parse_field(&fields, 1, "qlen")?,
        parse_field(&fields, 7, "tstart")?,
        parse_field(&fields, 8, "tend")?,
        parse_field(&fields, 6, "tlen")?,
        b_rev,
    )?)
}
