//! Conversion of a raw alignment trace into a finalized CIGAR.
//!
//! The order of the steps matters:
//!
//! 1. Run-length encode the trace (`=`, `X`, `I`, `D`).
//! 2. Drop a leading deletion run; it consumes no query base.
//! 3. Turn a now-leading insertion run into a soft clip.
//! 4. Repeat 2 and 3 at the trailing end.
//! 5. Soft clip the read bases before the aligned window.
//! 6. Soft clip the read bases after the aligned window.
//!
//! Padding merges into an existing soft clip at the same end, so the final
//! CIGAR consumes exactly the full read length.

use crate::alignment::edit_distance::EditOp;
use crate::core::cigar::{Cigar, CigarOp, CigarOpKind};
use crate::core::overlap::QueryWindow;

/// Run-length encode a trace into an extended CIGAR
#[must_use]
pub fn encode_trace(ops: &[EditOp]) -> Cigar {
    let mut cigar = Cigar::new();
    for op in ops {
        let kind = match op {
            EditOp::Match => CigarOpKind::Equal,
            EditOp::Mismatch => CigarOpKind::Mismatch,
            EditOp::Insertion => CigarOpKind::Insertion,
            EditOp::Deletion => CigarOpKind::Deletion,
        };
        cigar.push(kind, 1);
    }
    cigar
}

/// Which end of the CIGAR an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Front,
    Back,
}

fn end_index(ops: &[CigarOp], end: End) -> Option<usize> {
    match end {
        End::Front if !ops.is_empty() => Some(0),
        End::Back if !ops.is_empty() => Some(ops.len() - 1),
        _ => None,
    }
}

/// Remove deletion runs at one end, then soft clip an insertion run there
fn trim_end(cigar: &mut Cigar, end: End) {
    let ops = cigar.ops_mut();

    while let Some(idx) = end_index(ops, end) {
        if ops[idx].kind != CigarOpKind::Deletion {
            break;
        }
        ops.remove(idx);
    }

    if let Some(idx) = end_index(ops, end) {
        if ops[idx].kind == CigarOpKind::Insertion {
            ops[idx].kind = CigarOpKind::SoftClip;
        }
    }
}

/// Add `len` soft-clipped bases at one end, merging into an existing clip
fn pad_end(cigar: &mut Cigar, end: End, len: usize) {
    if len == 0 {
        return;
    }
    let ops = cigar.ops_mut();
    match end_index(ops, end) {
        Some(idx) if ops[idx].kind == CigarOpKind::SoftClip => ops[idx].len += len,
        _ => {
            let clip = CigarOp::new(CigarOpKind::SoftClip, len);
            match end {
                End::Front => ops.insert(0, clip),
                End::Back => ops.push(clip),
            }
        }
    }
}

/// Steps 2-4: strip edge deletions and clip edge insertions at both ends.
///
/// Idempotent: a CIGAR that already went through this is returned unchanged.
pub fn trim_edges(cigar: &mut Cigar) {
    trim_end(cigar, End::Front);
    trim_end(cigar, End::Back);
}

/// Steps 5-6: soft clip `front` bases before and `back` bases after the alignment
pub fn pad_soft_clips(cigar: &mut Cigar, front: usize, back: usize) {
    pad_end(cigar, End::Front, front);
    pad_end(cigar, End::Back, back);
}

/// Turn a raw trace over `window` into the finalized CIGAR for the whole read.
#[must_use]
pub fn normalize(ops: &[EditOp], window: &QueryWindow) -> Cigar {
    let mut cigar = encode_trace(ops);
    trim_edges(&mut cigar);
    pad_soft_clips(&mut cigar, window.leading_clip(), window.trailing_clip());
    cigar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::EditTally;
    use crate::alignment::edit_distance::EditOp::{
        Deletion as D, Insertion as I, Match as M, Mismatch as X,
    };

    fn window(start: usize, end: usize, read_len: usize) -> QueryWindow {
        QueryWindow {
            start,
            end,
            read_len,
        }
    }

    #[test]
    fn test_encode_trace() {
        let cigar = encode_trace(&[M, M, X, I, I, M, D, M]);
        assert_eq!(cigar.to_string(), "2=1X2I1=1D1=");
    }

    #[test]
    fn test_padding_on_perfect_match() {
        let cigar = normalize(&[M; 6], &window(2, 8, 10));
        assert_eq!(cigar.to_string(), "2S6=2S");
        assert_eq!(cigar.query_len(), 10);
        assert_eq!(EditTally::from_cigar(&cigar).to_string(), "equal=6_x=0_ins=0_del=0");
    }

    #[test]
    fn test_full_read_window_has_no_clips() {
        let cigar = normalize(&[M, M, X, M], &window(0, 4, 4));
        assert_eq!(cigar.to_string(), "2=1X1=");
    }

    #[test]
    fn test_leading_and_trailing_deletions_removed() {
        let cigar = normalize(&[D, D, M, M, M, D], &window(0, 3, 3));
        assert_eq!(cigar.to_string(), "3=");
        assert_eq!(cigar.reference_len(), 3);
    }

    #[test]
    fn test_edge_insertions_become_soft_clips() {
        let cigar = normalize(&[I, I, M, M, I], &window(0, 5, 5));
        assert_eq!(cigar.to_string(), "2S2=1S");
    }

    #[test]
    fn test_deletion_then_insertion_at_edge() {
        let cigar = normalize(&[D, I, I, M, M, I, D], &window(0, 5, 5));
        assert_eq!(cigar.to_string(), "2S2=1S");
    }

    #[test]
    fn test_insertion_then_deletion_at_edge() {
        // The deletion is not at the edge when the insertion precedes it
        let cigar = normalize(&[I, D, M, M], &window(0, 3, 3));
        assert_eq!(cigar.to_string(), "1S1D2=");
    }

    #[test]
    fn test_clip_padding_merges() {
        let cigar = normalize(&[I, M, M, M, I, I], &window(3, 9, 12));
        assert_eq!(cigar.to_string(), "4S3=5S");
        assert_eq!(cigar.query_len(), 12);
    }

    #[test]
    fn test_query_length_invariant_with_indels() {
        let ops = [D, M, I, X, M, M, D, D, M, I, M, D];
        let query_bases = ops.iter().filter(|op| op.consumes_query()).count();
        let w = window(7, 7 + query_bases, 30);
        let cigar = normalize(&ops, &w);
        assert_eq!(cigar.query_len(), 30);
        assert_ne!(cigar.first().unwrap().kind, CigarOpKind::Deletion);
        assert_ne!(cigar.last().unwrap().kind, CigarOpKind::Deletion);
    }

    #[test]
    fn test_trim_is_idempotent() {
        let ops = [D, I, M, X, I, M, M, D, I, D];
        let cigar = normalize(&ops, &window(4, 11, 15));
        let mut again = cigar.clone();
        trim_edges(&mut again);
        pad_soft_clips(&mut again, 0, 0);
        assert_eq!(again, cigar);
    }

    #[test]
    fn test_tally_matches_rendered_cigar() {
        let cigar = normalize(&[M, X, X, I, M, D, M, M], &window(1, 8, 9));
        let tally = EditTally::from_cigar(&cigar);
        assert_eq!(cigar.to_string(), "1S1=2X1I1=1D2=1S");
        assert_eq!(tally.equal, 4);
        assert_eq!(tally.mismatches, 2);
        assert_eq!(tally.insertions, 1);
        assert_eq!(tally.deletions, 1);
    }
}
