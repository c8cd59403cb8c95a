//! Core data types for overlap alignment.
//!
//! - [`Overlap`]: a validated read/reference overlap window
//! - [`Sequence`], [`SequenceSet`]: named sequences addressed by 1-based id
//! - [`Cigar`]: run-length CIGAR with a closed set of operation kinds
//! - [`AlignedRecord`], [`EditTally`]: the finalized alignment of one overlap
//!
//! ## Coordinates
//!
//! Overlap windows are 0-based and half-open, always expressed on the forward
//! strand of each sequence. Output positions are 1-based, following SAM.

pub mod alignment;
pub mod cigar;
pub mod overlap;
pub mod sequence;

pub use alignment::{AlignedRecord, EditTally, FLAG_REVERSE, MAPPING_QUALITY};
pub use cigar::{Cigar, CigarFormat, CigarOp, CigarOpKind};
pub use overlap::{Overlap, OverlapError, QueryWindow};
pub use sequence::{Sequence, SequenceSet};
