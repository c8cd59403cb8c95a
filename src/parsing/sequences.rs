//! Loader for read and reference sequences using noodles.
//!
//! FASTA and FASTQ are told apart by the first non-whitespace byte (`>` or
//! `@`), so compressed input and stdin work without relying on extensions.

use std::io::BufRead;
use std::path::Path;

use noodles::{fasta, fastq};
use tracing::info;

use crate::core::sequence::{Sequence, SequenceSet};
use crate::parsing::{open_input, ParseError};

/// Load every record of a FASTA or FASTQ file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles`
/// if a record is malformed, or `ParseError::InvalidFormat` if the input is
/// empty or neither FASTA nor FASTQ.
pub fn read_sequences(path: &Path) -> Result<SequenceSet, ParseError> {
    let sequences = read_sequences_from(open_input(path)?)?;
    info!(
        path = %path.display(),
        sequences = sequences.len(),
        "Loaded sequences"
    );
    Ok(sequences)
}

/// Load every record from a FASTA or FASTQ reader
///
/// # Errors
///
/// See [`read_sequences`].
pub fn read_sequences_from<R: BufRead>(mut reader: R) -> Result<SequenceSet, ParseError> {
    let sequences = match skip_leading_whitespace(&mut reader)? {
        Some(b'>') => read_fasta(reader)?,
        Some(b'@') => read_fastq(reader)?,
        Some(other) => {
            return Err(ParseError::InvalidFormat(format!(
                "expected FASTA ('>') or FASTQ ('@') input, found '{}'",
                char::from(other)
            )))
        }
        None => Vec::new(),
    };

    if sequences.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in input".to_string(),
        ));
    }

    Ok(SequenceSet::new(sequences))
}

/// Consume leading whitespace and return the next byte without consuming it
fn skip_leading_whitespace<R: BufRead>(reader: &mut R) -> Result<Option<u8>, ParseError> {
    loop {
        let (consumed, found) = {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            match buf.iter().position(|b| !b.is_ascii_whitespace()) {
                Some(pos) => (pos, Some(buf[pos])),
                None => (buf.len(), None),
            }
        };
        reader.consume(consumed);
        if found.is_some() {
            return Ok(found);
        }
    }
}

fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<Sequence>, ParseError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let mut sequences = Vec::new();

    for result in fasta_reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let name = String::from_utf8_lossy(record.name()).to_string();
        sequences.push(Sequence::new(name, record.sequence().as_ref().to_vec()));
    }

    Ok(sequences)
}

fn read_fastq<R: BufRead>(reader: R) -> Result<Vec<Sequence>, ParseError> {
    let mut fastq_reader = fastq::io::Reader::new(reader);
    let mut sequences = Vec::new();

    for result in fastq_reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))?;

        let name = String::from_utf8_lossy(record.name()).to_string();
        let sequence = Sequence::new(name, record.sequence().to_vec())
            .with_quality(record.quality_scores().to_vec());
        sequences.push(sequence);
    }

    Ok(sequences)
}
