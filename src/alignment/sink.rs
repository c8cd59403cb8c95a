//! Destinations for finalized alignments.
//!
//! Workers call [`AlignmentSink::commit`] concurrently. Implementations hold
//! their lock only around the append or write itself, never while aligning.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use noodles::sam;

use crate::core::alignment::AlignedRecord;
use crate::core::cigar::CigarFormat;
use crate::output::sam::{to_record_buf, SamWriter};

/// Receives finalized alignments from concurrent workers
pub trait AlignmentSink: Sync {
    /// Accept one record.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the record cannot be delivered. The engine
    /// treats this as fatal for the run.
    fn commit(&self, record: AlignedRecord) -> io::Result<()>;
}

fn poisoned() -> io::Error {
    io::Error::other("alignment sink lock poisoned")
}

/// Collects every record in memory, in completion order
#[derive(Debug, Default)]
pub struct BufferedSink {
    records: Mutex<Vec<AlignedRecord>>,
}

impl BufferedSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of the collected records
    ///
    /// # Errors
    ///
    /// Returns an error if a worker panicked while holding the lock.
    pub fn into_records(self) -> io::Result<Vec<AlignedRecord>> {
        self.records.into_inner().map_err(|_| poisoned())
    }
}

impl AlignmentSink for BufferedSink {
    fn commit(&self, record: AlignedRecord) -> io::Result<()> {
        self.records.lock().map_err(|_| poisoned())?.push(record);
        Ok(())
    }
}

/// Writes each record as a SAM line as soon as it is committed
pub struct StreamingSink<W: Write + Send> {
    writer: Mutex<SamWriter<W>>,
    header: sam::Header,
    format: CigarFormat,
    written: AtomicUsize,
}

impl<W: Write + Send> StreamingSink<W> {
    pub fn new(writer: SamWriter<W>) -> Self {
        Self {
            header: writer.header().clone(),
            format: writer.format(),
            writer: Mutex::new(writer),
            written: AtomicUsize::new(0),
        }
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    /// Flush and hand back the underlying writer
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails or the lock was poisoned.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|_| poisoned())?.finish()
    }
}

impl<W: Write + Send> AlignmentSink for StreamingSink<W> {
    fn commit(&self, record: AlignedRecord) -> io::Result<()> {
        let buf = to_record_buf(&self.header, &record, self.format)?;
        self.writer
            .lock()
            .map_err(|_| poisoned())?
            .write_record_buf(&buf)?;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::{EditTally, MAPPING_QUALITY};
    use crate::core::cigar::Cigar;
    use crate::core::sequence::{Sequence, SequenceSet};
    use crate::output::sam::build_header;

    fn record(index: usize) -> AlignedRecord {
        let cigar: Cigar = "4=".parse().unwrap();
        AlignedRecord {
            overlap_index: index,
            read_name: format!("read{index}"),
            sequence: b"ACGT".to_vec(),
            quality: None,
            reference_name: "chr1".to_string(),
            position: 1,
            flag: 0,
            mapping_quality: MAPPING_QUALITY,
            reference_span: cigar.reference_len(),
            tally: EditTally::from_cigar(&cigar),
            cigar,
            edit_distance: 0,
        }
    }

    #[test]
    fn test_buffered_sink_collects() {
        let sink = BufferedSink::new();
        sink.commit(record(0)).unwrap();
        sink.commit(record(1)).unwrap();
        let records = sink.into_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].read_name, "read1");
    }

    #[test]
    fn test_streaming_sink_writes_lines() {
        let refs = SequenceSet::new(vec![Sequence::new("chr1", "ACGTACGT")]);
        let header = build_header(&refs).unwrap();
        let sink = StreamingSink::new(SamWriter::new(Vec::new(), header, CigarFormat::Extended));
        sink.commit(record(0)).unwrap();
        sink.commit(record(1)).unwrap();
        assert_eq!(sink.written(), 2);

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("read0\t0\tchr1\t1\t40\t4=\t"));
    }

    #[test]
    fn test_streaming_sink_rejects_unknown_reference() {
        let refs = SequenceSet::new(vec![Sequence::new("chr2", "ACGT")]);
        let header = build_header(&refs).unwrap();
        let sink = StreamingSink::new(SamWriter::new(Vec::new(), header, CigarFormat::Extended));
        assert!(sink.commit(record(0)).is_err());
        assert_eq!(sink.written(), 0);
    }
}
