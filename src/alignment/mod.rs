//! Overlap alignment: edit-distance aligner, CIGAR normalization, and the
//! parallel engine that ties them together.
//!
//! - [`AlignmentEngine`]: aligns a batch of overlaps across a worker pool
//! - [`align_global`]: end-to-end unit-cost alignment of two windows
//! - [`normalize`]: raw trace to finalized, soft-clipped CIGAR
//! - [`AlignmentSink`]: where finished records go (buffered or streamed)
//!
//! ## Failure handling
//!
//! A single overlap that cannot be aligned (bad id, coordinates that do not
//! fit the loaded sequences, empty window) is skipped and counted. Only a
//! failure to build the worker pool or to deliver a record stops a run.
//!
//! ## Example
//!
//! ```rust
//! use overlap_aligner::alignment::AlignmentEngine;
//! use overlap_aligner::core::{Overlap, Sequence, SequenceSet};
//!
//! let reads = SequenceSet::new(vec![Sequence::new("read1", "AAGGCTTACG")]);
//! let refs = SequenceSet::new(vec![Sequence::new("ctg1", "TTGGCTTATT")]);
//! let overlap = Overlap::new(1, 1, 2, 8, 10, 2, 8, 10, false).unwrap();
//!
//! let engine = AlignmentEngine::new(&reads, &refs);
//! let outcome = engine.align_all(&[overlap]).unwrap();
//! assert_eq!(outcome.records[0].cigar.to_string(), "2S6=2S");
//! ```

pub mod edit_distance;
pub mod engine;
pub mod normalize;
pub mod sink;

pub use edit_distance::{align_global, AlignError, EditOp, RawAlignment};
pub use engine::{AlignmentEngine, AlignmentOutcome, EngineConfig, EngineError, RunSummary};
pub use normalize::normalize;
pub use sink::{AlignmentSink, BufferedSink, StreamingSink};
