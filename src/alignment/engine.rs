use std::borrow::Cow;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::alignment::edit_distance::{align_global, AlignError};
use crate::alignment::normalize::normalize;
use crate::alignment::sink::{AlignmentSink, BufferedSink, StreamingSink};
use crate::core::alignment::{AlignedRecord, EditTally, FLAG_REVERSE, MAPPING_QUALITY};
use crate::core::overlap::Overlap;
use crate::core::sequence::SequenceSet;
use crate::output::sam::SamWriter;

/// Failures that abort a whole run
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to deliver alignment: {0}")]
    Sink(#[from] std::io::Error),
}

/// Configuration for the alignment engine
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Worker threads; 0 lets rayon pick one per core
    pub threads: usize,
    /// Show a progress line while aligning
    pub verbose: bool,
}

/// Counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub aligned: usize,
    pub skipped: usize,
}

/// Helper function to express a count as a percentage of a total
#[inline]
fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        100.0 * count as f64 / total as f64
    }
}

impl RunSummary {
    #[must_use]
    pub fn skipped_percent(&self) -> f64 {
        percent(self.skipped, self.total)
    }
}

/// Buffered results of a run
#[derive(Debug, Clone)]
pub struct AlignmentOutcome {
    /// Records in completion order
    pub records: Vec<AlignedRecord>,
    pub summary: RunSummary,
}

impl AlignmentOutcome {
    /// Restore the order of the input overlaps
    pub fn sort_by_input_order(&mut self) {
        self.records.sort_by_key(|r| r.overlap_index);
    }
}

/// Aligns overlaps between reads and references in parallel
pub struct AlignmentEngine<'a> {
    reads: &'a SequenceSet,
    references: &'a SequenceSet,
    config: EngineConfig,
}

impl<'a> AlignmentEngine<'a> {
    /// Create an engine with the default configuration
    pub fn new(reads: &'a SequenceSet, references: &'a SequenceSet) -> Self {
        Self::with_config(reads, references, EngineConfig::default())
    }

    pub fn with_config(
        reads: &'a SequenceSet,
        references: &'a SequenceSet,
        config: EngineConfig,
    ) -> Self {
        Self {
            reads,
            references,
            config,
        }
    }

    /// Align a single overlap.
    ///
    /// On the reverse strand the read is reverse-complemented and the read
    /// window remapped (see [`Overlap::query_window`]) before alignment.
    ///
    /// # Errors
    ///
    /// Returns `AlignError::InvalidRecord` if an id is out of range or the
    /// overlap does not fit the loaded sequences, and the aligner's error if
    /// the window cannot be aligned.
    pub fn align_overlap(
        &self,
        index: usize,
        overlap: &Overlap,
    ) -> Result<AlignedRecord, AlignError> {
        let read = self.reads.get(overlap.a_id()).ok_or_else(|| {
            AlignError::InvalidRecord(format!(
                "read id {} not in 1..={}",
                overlap.a_id(),
                self.reads.len()
            ))
        })?;
        let reference = self.references.get(overlap.b_id()).ok_or_else(|| {
            AlignError::InvalidRecord(format!(
                "reference id {} not in 1..={}",
                overlap.b_id(),
                self.references.len()
            ))
        })?;

        if read.len() != overlap.a_len() {
            return Err(AlignError::InvalidRecord(format!(
                "read '{}' has length {} but the overlap declares {}",
                read.name,
                read.len(),
                overlap.a_len()
            )));
        }
        let reference_bases = reference
            .bases
            .get(overlap.b_start()..overlap.b_end())
            .ok_or_else(|| {
                AlignError::InvalidRecord(format!(
                    "reference window {}..{} exceeds '{}' ({} bp)",
                    overlap.b_start(),
                    overlap.b_end(),
                    reference.name,
                    reference.len()
                ))
            })?;

        let query = if overlap.is_reverse() {
            Cow::Owned(read.reverse_complement())
        } else {
            Cow::Borrowed(read)
        };
        let window = overlap.query_window();
        // A remapped reverse window may be empty; the aligner rejects it
        let query_bases = query
            .bases
            .get(window.start..window.end)
            .unwrap_or_default();

        let raw = align_global(query_bases, reference_bases)?;
        let cigar = normalize(&raw.ops, &window);
        let reference_span = cigar.reference_len();
        let tally = EditTally::from_cigar(&cigar);

        let query = query.into_owned();
        Ok(AlignedRecord {
            overlap_index: index,
            read_name: query.name,
            sequence: query.bases,
            quality: query.quality,
            reference_name: reference.name.clone(),
            position: overlap.b_start() + raw.start + 1,
            flag: if overlap.is_reverse() { FLAG_REVERSE } else { 0 },
            mapping_quality: MAPPING_QUALITY,
            cigar,
            reference_span,
            edit_distance: raw.edit_distance,
            tally,
        })
    }

    /// Align every overlap and commit the successes to `sink`.
    ///
    /// Overlaps are scheduled one at a time across the worker pool, since
    /// alignment cost varies with window length. Failed overlaps are counted
    /// and skipped.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ThreadPool` if the pool cannot be built and
    /// `EngineError::Sink` if the sink rejects a record.
    pub fn run<S: AlignmentSink>(
        &self,
        overlaps: &[Overlap],
        sink: &S,
    ) -> Result<RunSummary, EngineError> {
        let total = overlaps.len();
        let skipped = AtomicUsize::new(0);
        let progress = self.progress_bar(total);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()?;

        info!(
            overlaps = total,
            threads = pool.current_num_threads(),
            "Aligning overlaps"
        );

        pool.install(|| {
            overlaps
                .par_iter()
                .enumerate()
                .with_max_len(1)
                .try_for_each(|(index, overlap)| {
                    if self.config.verbose && rayon::current_thread_index() == Some(0) {
                        // Relaxed snapshot, may lag behind other workers
                        report_progress(&progress, index, total, skipped.load(Ordering::Relaxed));
                    }

                    match self.align_overlap(index, overlap) {
                        Ok(record) => sink.commit(record),
                        Err(e) => {
                            debug!(overlap = index, reason = %e, "Skipping overlap");
                            skipped.fetch_add(1, Ordering::Relaxed);
                            Ok(())
                        }
                    }
                })
        })?;

        progress.finish();

        let skipped = skipped.into_inner();
        let summary = RunSummary {
            total,
            aligned: total - skipped,
            skipped,
        };
        info!(
            aligned = summary.aligned,
            skipped = summary.skipped,
            "Finished aligning overlaps"
        );
        Ok(summary)
    }

    /// Align every overlap, keeping the results in memory.
    ///
    /// # Errors
    ///
    /// See [`AlignmentEngine::run`].
    pub fn align_all(&self, overlaps: &[Overlap]) -> Result<AlignmentOutcome, EngineError> {
        let sink = BufferedSink::new();
        let summary = self.run(overlaps, &sink)?;
        Ok(AlignmentOutcome {
            records: sink.into_records()?,
            summary,
        })
    }

    /// Align every overlap, writing each SAM record to `writer` as soon as it
    /// is ready. The header is not written. Returns the summary and the
    /// flushed inner writer.
    ///
    /// # Errors
    ///
    /// See [`AlignmentEngine::run`]; write failures abort the run.
    pub fn stream_all<W: Write + Send>(
        &self,
        overlaps: &[Overlap],
        writer: SamWriter<W>,
    ) -> Result<(RunSummary, W), EngineError> {
        let sink = StreamingSink::new(writer);
        let summary = self.run(overlaps, &sink)?;
        let writer = sink.into_inner()?;
        Ok((summary, writer))
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.config.verbose {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar
    }
}

fn report_progress(bar: &ProgressBar, index: usize, total: usize, skipped: usize) {
    let processed = index + 1;
    bar.set_position(processed as u64);
    bar.set_message(format!(
        "Aligning overlap: {processed} / {total} ({:.2}%), skipped {skipped} / {total} ({:.2}%)",
        percent(processed, total),
        percent(skipped, total),
    ));
}
