//! # overlap-aligner
//!
//! A library for turning approximate read-to-reference overlaps into
//! base-level alignments.
//!
//! Overlappers such as minimap2 or MHAP report which window of a read lines up
//! with which window of a reference, but not how the bases line up. This crate
//! aligns each overlapping window end to end with a unit-cost edit-distance
//! aligner, soft clips the unaligned read ends, and emits one SAM record per
//! overlap.
//!
//! ## Features
//!
//! - **MHAP and PAF input**: numeric ids or sequence names
//! - **FASTA/FASTQ input**: plain or gzip compressed, qualities carried to SAM
//! - **Strand aware**: reverse-strand overlaps align the reverse complement
//! - **Parallel**: overlaps are aligned across a rayon worker pool
//! - **Buffered or streamed output**: input order or completion order
//!
//! ## Example
//!
//! ```rust,no_run
//! use overlap_aligner::parsing::{parse_overlaps, sequences::read_sequences, OverlapFormat};
//! use overlap_aligner::{AlignmentEngine, CigarFormat};
//! use std::path::Path;
//!
//! let reads = read_sequences(Path::new("reads.fq")).unwrap();
//! let refs = read_sequences(Path::new("contigs.fa")).unwrap();
//! let overlaps =
//!     parse_overlaps(Path::new("ovl.paf"), OverlapFormat::Paf, &reads, &refs).unwrap();
//!
//! let engine = AlignmentEngine::new(&reads, &refs);
//! let mut outcome = engine.align_all(&overlaps).unwrap();
//! outcome.sort_by_input_order();
//!
//! for record in &outcome.records {
//!     println!("{} {}", record.read_name, record.cigar.render(CigarFormat::Standard));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Overlaps, sequences, CIGARs, and aligned records
//! - [`alignment`]: Edit-distance aligner, CIGAR normalization, parallel engine
//! - [`parsing`]: MHAP, PAF, FASTA, and FASTQ readers
//! - [`output`]: SAM writer
//! - [`cli`]: Command-line interface implementation

pub mod alignment;
pub mod cli;
pub mod core;
pub mod output;
pub mod parsing;

// Re-export commonly used types for convenience
pub use alignment::engine::{AlignmentEngine, AlignmentOutcome, EngineConfig, RunSummary};
pub use core::alignment::AlignedRecord;
pub use core::cigar::{Cigar, CigarFormat};
pub use core::overlap::Overlap;
pub use core::sequence::{Sequence, SequenceSet};
