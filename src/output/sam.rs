//! SAM output of aligned overlaps, written with noodles.
//!
//! The header carries `@HD` and one `@SQ` line per reference. Each record
//! carries `NM:i` (edit distance) and `X1:Z` (per-operation tally) data fields.

use std::borrow::Cow;
use std::io::{self, Write};
use std::num::NonZeroUsize;

use noodles::sam;
use noodles::sam::alignment::io::Write as _;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::{QualityScores, RecordBuf, Sequence};
use noodles::sam::header::record::value::{map::ReferenceSequence, Map};

use crate::core::alignment::AlignedRecord;
use crate::core::cigar::{Cigar, CigarFormat, CigarOpKind};
use crate::core::sequence::SequenceSet;

/// Per-operation tally, `equal=<E>_x=<X>_ins=<I>_del=<D>`
const TALLY_TAG: Tag = Tag::new(b'X', b'1');

/// FASTQ qualities are stored as Phred+33 text
const PHRED_OFFSET: u8 = 33;

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

/// Build the SAM header for `references`
///
/// # Errors
///
/// Returns an `InvalidInput` error if a reference is empty, since `@SQ`
/// lengths must be at least 1.
pub fn build_header(references: &SequenceSet) -> io::Result<sam::Header> {
    let mut builder = sam::Header::builder().set_header(Map::default());

    for reference in references.iter() {
        let length = NonZeroUsize::new(reference.len()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("reference '{}' has zero length", reference.name),
            )
        })?;
        builder = builder.add_reference_sequence(
            reference.name.as_str(),
            Map::<ReferenceSequence>::new(length),
        );
    }

    Ok(builder.build())
}

/// Convert a CIGAR to noodles, collapsing `=`/`X` into `M` for the standard format
fn convert_cigar(cigar: &Cigar, format: CigarFormat) -> sam::alignment::record_buf::Cigar {
    let cigar = match format {
        CigarFormat::Extended => Cow::Borrowed(cigar),
        CigarFormat::Standard => Cow::Owned(cigar.to_standard()),
    };

    let mut converted = sam::alignment::record_buf::Cigar::default();
    for op in cigar.ops() {
        let kind = match op.kind {
            CigarOpKind::Match => Kind::Match,
            CigarOpKind::Equal => Kind::SequenceMatch,
            CigarOpKind::Mismatch => Kind::SequenceMismatch,
            CigarOpKind::Insertion => Kind::Insertion,
            CigarOpKind::Deletion => Kind::Deletion,
            CigarOpKind::SoftClip => Kind::SoftClip,
        };
        converted
            .as_mut()
            .push(sam::alignment::record::cigar::Op::new(kind, op.len));
    }
    converted
}

/// Convert an aligned overlap to a SAM record against `header`
///
/// # Errors
///
/// Returns an `InvalidData` error if the reference is not in `header` or the
/// position is not a valid 1-based coordinate.
pub fn to_record_buf(
    header: &sam::Header,
    record: &AlignedRecord,
    format: CigarFormat,
) -> io::Result<RecordBuf> {
    let reference_id = header
        .reference_sequences()
        .get_index_of(record.reference_name.as_bytes())
        .ok_or_else(|| {
            invalid_data(format!(
                "reference '{}' is not in the SAM header",
                record.reference_name
            ))
        })?;

    let mut buf = RecordBuf::default();
    buf.name_mut().replace(record.read_name.as_str().into());
    *buf.flags_mut() = if record.is_reverse() {
        Flags::REVERSE_COMPLEMENTED
    } else {
        Flags::empty()
    };
    *buf.reference_sequence_id_mut() = Some(reference_id);
    *buf.alignment_start_mut() = Some(
        record
            .position
            .try_into()
            .map_err(|_| invalid_data(format!("invalid position {}", record.position)))?,
    );
    *buf.mapping_quality_mut() = MappingQuality::new(record.mapping_quality);
    *buf.cigar_mut() = convert_cigar(&record.cigar, format);
    *buf.sequence_mut() = Sequence::from(record.sequence.clone());
    if let Some(quality) = &record.quality {
        let scores: Vec<u8> = quality
            .iter()
            .map(|q| q.saturating_sub(PHRED_OFFSET))
            .collect();
        *buf.quality_scores_mut() = QualityScores::from(scores);
    }

    let data = buf.data_mut();
    data.insert(
        Tag::EDIT_DISTANCE,
        Value::from(i32::try_from(record.edit_distance).unwrap_or(i32::MAX)),
    );
    data.insert(TALLY_TAG, Value::String(record.tally.to_string().into()));

    Ok(buf)
}

/// SAM writer bound to one header and CIGAR format
pub struct SamWriter<W: Write> {
    inner: sam::io::Writer<W>,
    header: sam::Header,
    format: CigarFormat,
}

impl<W: Write> SamWriter<W> {
    pub fn new(inner: W, header: sam::Header, format: CigarFormat) -> Self {
        Self {
            inner: sam::io::Writer::new(inner),
            header,
            format,
        }
    }

    #[must_use]
    pub fn header(&self) -> &sam::Header {
        &self.header
    }

    #[must_use]
    pub fn format(&self) -> CigarFormat {
        self.format
    }

    /// Write the `@HD`/`@SQ` header
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.inner.write_header(&self.header)
    }

    /// Write an already converted record
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid for the header or writing fails.
    pub fn write_record_buf(&mut self, record: &RecordBuf) -> io::Result<()> {
        self.inner.write_alignment_record(&self.header, record)
    }

    /// Convert and write one aligned overlap
    ///
    /// # Errors
    ///
    /// See [`to_record_buf`] and [`SamWriter::write_record_buf`].
    pub fn write_record(&mut self, record: &AlignedRecord) -> io::Result<()> {
        let buf = to_record_buf(&self.header, record, self.format)?;
        self.write_record_buf(&buf)
    }

    /// Write records in iteration order
    ///
    /// # Errors
    ///
    /// Stops at the first record that fails to write.
    pub fn write_records<'a, I>(&mut self, records: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a AlignedRecord>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.get_mut().flush()?;
        Ok(self.inner.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::{EditTally, FLAG_REVERSE, MAPPING_QUALITY};
    use crate::core::sequence::Sequence as Seq;

    fn references() -> SequenceSet {
        SequenceSet::new(vec![
            Seq::new("ctg1", "ACGTACGTACGTACGTACGT"),
            Seq::new("ctg2", "ACG"),
        ])
    }

    fn record() -> AlignedRecord {
        let cigar: Cigar = "2S3=1X2S".parse().unwrap();
        AlignedRecord {
            overlap_index: 0,
            read_name: "read1".to_string(),
            sequence: b"AACCGGTT".to_vec(),
            quality: Some(b"IIIIHHHH".to_vec()),
            reference_name: "ctg1".to_string(),
            position: 11,
            flag: FLAG_REVERSE,
            mapping_quality: MAPPING_QUALITY,
            reference_span: cigar.reference_len(),
            tally: EditTally::from_cigar(&cigar),
            cigar,
            edit_distance: 1,
        }
    }

    fn write_all(records: &[AlignedRecord], format: CigarFormat) -> String {
        let header = build_header(&references()).unwrap();
        let mut writer = SamWriter::new(Vec::new(), header, format);
        writer.write_header().unwrap();
        writer.write_records(records).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_build_header() {
        let header = build_header(&references()).unwrap();
        assert!(header.header().is_some());
        let names: Vec<String> = header
            .reference_sequences()
            .keys()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["ctg1", "ctg2"]);
    }

    #[test]
    fn test_empty_reference_rejected() {
        let refs = SequenceSet::new(vec![Seq::new("ctg1", "")]);
        let err = build_header(&refs).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_header_lines() {
        let text = write_all(&[], CigarFormat::Extended);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("@HD\tVN:"));
        assert_eq!(lines[1], "@SQ\tSN:ctg1\tLN:20");
        assert_eq!(lines[2], "@SQ\tSN:ctg2\tLN:3");
    }

    #[test]
    fn test_record_extended() {
        let text = write_all(&[record()], CigarFormat::Extended);
        assert_eq!(
            text.lines().last().unwrap(),
            "read1\t16\tctg1\t11\t40\t2S3=1X2S\t*\t0\t0\tAACCGGTT\tIIIIHHHH\tNM:i:1\tX1:Z:equal=3_x=1_ins=0_del=0"
        );
    }

    #[test]
    fn test_record_standard_without_quality() {
        let mut rec = record();
        rec.quality = None;
        let text = write_all(&[rec], CigarFormat::Standard);
        let fields: Vec<&str> = text.lines().last().unwrap().split('\t').collect();
        assert_eq!(fields[5], "2S4M2S");
        assert_eq!(fields[10], "*");
        // Tally still reflects the extended operations
        assert_eq!(fields[12], "X1:Z:equal=3_x=1_ins=0_del=0");
    }

    #[test]
    fn test_record_buf_fields() {
        let header = build_header(&references()).unwrap();
        let buf = to_record_buf(&header, &record(), CigarFormat::Extended).unwrap();
        assert_eq!(buf.reference_sequence_id(), Some(0));
        assert!(buf.flags().is_reverse_complemented());
        assert_eq!(buf.cigar().as_ref().len(), 4);
        assert_eq!(buf.quality_scores().as_ref()[0], b'I' - PHRED_OFFSET);
        assert_eq!(buf.data().get(&Tag::EDIT_DISTANCE), Some(&Value::from(1_i32)));
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let header = build_header(&references()).unwrap();
        let mut rec = record();
        rec.reference_name = "ctgX".to_string();
        let err = to_record_buf(&header, &rec, CigarFormat::Extended).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_write_records_in_order() {
        let mut second = record();
        second.read_name = "read2".to_string();
        let text = write_all(&[record(), second], CigarFormat::Extended);
        let names: Vec<&str> = text
            .lines()
            .filter(|l| !l.starts_with('@'))
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(names, vec!["read1", "read2"]);
    }
}
