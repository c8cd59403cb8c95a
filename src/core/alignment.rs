use std::fmt;

use serde::Serialize;

use crate::core::cigar::{Cigar, CigarOpKind};

/// Mapping quality assigned to every alignment
pub const MAPPING_QUALITY: u8 = 40;

/// SAM flag bit for a reverse-complemented query
pub const FLAG_REVERSE: u16 = 16;

/// Per-operation base counts of a finalized CIGAR
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EditTally {
    pub matches: usize,
    pub equal: usize,
    pub mismatches: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl EditTally {
    #[must_use]
    pub fn from_cigar(cigar: &Cigar) -> Self {
        let mut tally = Self::default();
        for op in cigar.ops() {
            match op.kind {
                CigarOpKind::Match => tally.matches += op.len,
                CigarOpKind::Equal => tally.equal += op.len,
                CigarOpKind::Mismatch => tally.mismatches += op.len,
                CigarOpKind::Insertion => tally.insertions += op.len,
                CigarOpKind::Deletion => tally.deletions += op.len,
                CigarOpKind::SoftClip => {}
            }
        }
        tally
    }
}

/// Formats as the `X1` tag payload: `equal=<E>_x=<X>_ins=<I>_del=<D>`
impl fmt::Display for EditTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "equal={}_x={}_ins={}_del={}",
            self.equal, self.mismatches, self.insertions, self.deletions
        )
    }
}

/// A finalized base-level alignment of one overlap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRecord {
    /// Position of the source overlap in the input list
    pub overlap_index: usize,

    pub read_name: String,

    /// Read bases in alignment orientation (reverse-complemented on the reverse strand)
    pub sequence: Vec<u8>,

    /// Read qualities in alignment orientation
    pub quality: Option<Vec<u8>>,

    pub reference_name: String,

    /// 1-based leftmost mapped position
    pub position: usize,

    /// 0 on the forward strand, [`FLAG_REVERSE`] on the reverse strand
    pub flag: u16,

    pub mapping_quality: u8,

    pub cigar: Cigar,

    /// Reference bases spanned by `cigar`
    pub reference_span: usize,

    pub edit_distance: usize,

    pub tally: EditTally,
}

impl AlignedRecord {
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.flag & FLAG_REVERSE != 0
    }
}
