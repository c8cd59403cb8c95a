//! Global unit-cost edit-distance alignment via edlib.
//!
//! Both windows are aligned end to end (edlib NW mode) and the full path is
//! requested, so the trace always consumes the whole query and the whole
//! reference window. edlib works in linear memory on long windows.

use edlib_rs::edlibrs::{
    edlibAlignRs, EdlibAlignConfigRs, EdlibAlignModeRs, EdlibAlignTaskRs,
};
use thiserror::Error;

// edlib alignment path bytes
const EDOP_MATCH: u8 = 0;
const EDOP_INSERT: u8 = 1;
const EDOP_DELETE: u8 = 2;
const EDOP_MISMATCH: u8 = 3;

/// Why a single overlap produced no alignment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("empty alignment window (query {query_len} bp, reference {reference_len} bp)")]
    EmptyWindow {
        query_len: usize,
        reference_len: usize,
    },

    #[error("no alignment path found")]
    NoPath,

    #[error("invalid overlap record: {0}")]
    InvalidRecord(String),
}

/// One column of a pairwise alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Match,
    Mismatch,
    /// Query base absent from the reference
    Insertion,
    /// Reference base absent from the query
    Deletion,
}

impl EditOp {
    #[must_use]
    pub fn consumes_query(self) -> bool {
        !matches!(self, Self::Deletion)
    }

    #[must_use]
    pub fn consumes_reference(self) -> bool {
        !matches!(self, Self::Insertion)
    }

    fn from_edlib(op: u8) -> Option<Self> {
        match op {
            EDOP_MATCH => Some(Self::Match),
            EDOP_INSERT => Some(Self::Insertion),
            EDOP_DELETE => Some(Self::Deletion),
            EDOP_MISMATCH => Some(Self::Mismatch),
            _ => None,
        }
    }
}

/// Result of aligning a query window against a reference window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAlignment {
    pub edit_distance: usize,
    /// First aligned position in reference-window coordinates
    pub start: usize,
    /// Last aligned position in reference-window coordinates (inclusive)
    pub end: usize,
    pub ops: Vec<EditOp>,
}

/// Number of trace operations that consume a reference base
#[must_use]
pub fn reconstructed_length(ops: &[EditOp]) -> usize {
    ops.iter().filter(|op| op.consumes_reference()).count()
}

/// Align `query` end to end against `reference` under unit edit costs.
///
/// `start` is derived from edlib's end location and the number of reference
/// bases the path consumes: `start = end + 1 - reconstructed_length`.
///
/// # Errors
///
/// Returns `AlignError::EmptyWindow` if either window is empty, or
/// `AlignError::NoPath` if edlib reports a failure or returns no usable path.
pub fn align_global(query: &[u8], reference: &[u8]) -> Result<RawAlignment, AlignError> {
    if query.is_empty() || reference.is_empty() {
        return Err(AlignError::EmptyWindow {
            query_len: query.len(),
            reference_len: reference.len(),
        });
    }

    let config = EdlibAlignConfigRs::new(
        -1,
        EdlibAlignModeRs::EDLIB_MODE_NW,
        EdlibAlignTaskRs::EDLIB_TASK_PATH,
        &[],
    );
    let result = edlibAlignRs(query, reference, &config);
    if result.status != 0 {
        return Err(AlignError::NoPath);
    }

    let edit_distance = usize::try_from(result.editDistance).map_err(|_| AlignError::NoPath)?;
    let end = result
        .endLocations
        .as_ref()
        .and_then(|locations| locations.first().copied())
        .and_then(|location| usize::try_from(location).ok())
        .ok_or(AlignError::NoPath)?;
    let ops = result
        .alignment
        .as_ref()
        .ok_or(AlignError::NoPath)?
        .iter()
        .map(|&op| EditOp::from_edlib(op).ok_or(AlignError::NoPath))
        .collect::<Result<Vec<_>, _>>()?;
    if ops.is_empty() {
        return Err(AlignError::NoPath);
    }

    let start = (end + 1)
        .checked_sub(reconstructed_length(&ops))
        .ok_or(AlignError::NoPath)?;

    Ok(RawAlignment {
        edit_distance,
        start,
        end,
        ops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain O(nm) dynamic programming
    fn naive_distance(a: &[u8], b: &[u8]) -> usize {
        let mut prev: Vec<usize> = (0..=b.len()).collect();
        for i in 1..=a.len() {
            let mut row = vec![i; b.len() + 1];
            for j in 1..=b.len() {
                let cost = usize::from(a[i - 1] != b[j - 1]);
                row[j] = (prev[j - 1] + cost).min(prev[j] + 1).min(row[j - 1] + 1);
            }
            prev = row;
        }
        prev[b.len()]
    }

    fn pseudo_random_seq(seed: &mut u64, len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| {
                *seed = seed
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                b"ACGT"[(*seed >> 33) as usize % 4]
            })
            .collect()
    }

    /// Check the trace consumes both windows and its cost equals the distance
    fn assert_consistent(query: &[u8], reference: &[u8], aln: &RawAlignment) {
        let (mut i, mut j, mut cost) = (0, 0, 0);
        for op in &aln.ops {
            match op {
                EditOp::Match => {
                    assert_eq!(query[i], reference[j]);
                    i += 1;
                    j += 1;
                }
                EditOp::Mismatch => {
                    assert_ne!(query[i], reference[j]);
                    i += 1;
                    j += 1;
                    cost += 1;
                }
                EditOp::Insertion => {
                    i += 1;
                    cost += 1;
                }
                EditOp::Deletion => {
                    j += 1;
                    cost += 1;
                }
            }
        }
        assert_eq!(i, query.len());
        assert_eq!(j, reference.len());
        assert_eq!(cost, aln.edit_distance);
    }

    #[test]
    fn test_identical_windows() {
        let aln = align_global(b"ACGTAC", b"ACGTAC").unwrap();
        assert_eq!(aln.edit_distance, 0);
        assert_eq!(aln.ops, vec![EditOp::Match; 6]);
        assert_eq!(aln.start, 0);
        assert_eq!(aln.end, 5);
    }

    #[test]
    fn test_classic_distance() {
        let aln = align_global(b"kitten", b"sitting").unwrap();
        assert_eq!(aln.edit_distance, 3);
        assert_consistent(b"kitten", b"sitting", &aln);
    }

    #[test]
    fn test_single_insertion() {
        let aln = align_global(b"ACGTTACGT", b"ACGTACGT").unwrap();
        assert_eq!(aln.edit_distance, 1);
        assert_eq!(
            aln.ops.iter().filter(|op| **op == EditOp::Insertion).count(),
            1
        );
        assert_eq!(aln.start, 0);
        assert_eq!(aln.end, 7);
        assert_consistent(b"ACGTTACGT", b"ACGTACGT", &aln);
    }

    #[test]
    fn test_single_deletion() {
        let aln = align_global(b"ACGACGT", b"ACGTACGT").unwrap();
        assert_eq!(aln.edit_distance, 1);
        assert_eq!(
            aln.ops.iter().filter(|op| **op == EditOp::Deletion).count(),
            1
        );
        assert_consistent(b"ACGACGT", b"ACGTACGT", &aln);
    }

    #[test]
    fn test_empty_window_fails() {
        assert!(matches!(
            align_global(b"", b"ACGT"),
            Err(AlignError::EmptyWindow { .. })
        ));
        assert!(matches!(
            align_global(b"ACGT", b""),
            Err(AlignError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_disjoint_alphabets() {
        let query = vec![b'A'; 300];
        let reference = vec![b'C'; 250];
        let aln = align_global(&query, &reference).unwrap();
        assert_eq!(aln.edit_distance, 300);
        assert_consistent(&query, &reference, &aln);
    }

    #[test]
    fn test_long_unrelated_windows() {
        // Tens of kb with an edit distance near half the length
        let mut seed = 7;
        let a = pseudo_random_seq(&mut seed, 20_000);
        let b = pseudo_random_seq(&mut seed, 20_000);
        let aln = align_global(&a, &b).unwrap();
        assert!(aln.edit_distance > 5_000);
        assert!(aln.edit_distance <= 20_000);
        assert_eq!(aln.start, 0);
        assert_eq!(aln.end, 19_999);
        assert_consistent(&a, &b, &aln);
    }

    #[test]
    fn test_matches_reference_distance() {
        let mut seed = 42;
        for len in [1, 5, 17, 80, 150] {
            let a = pseudo_random_seq(&mut seed, len);
            let b = pseudo_random_seq(&mut seed, len + len / 3);
            let aln = align_global(&a, &b).unwrap();
            assert_eq!(aln.edit_distance, naive_distance(&a, &b));
            assert_consistent(&a, &b, &aln);
        }
    }

    #[test]
    fn test_start_from_reconstructed_length() {
        let aln = align_global(b"AACCGGTT", b"ACCGGT").unwrap();
        assert_eq!(reconstructed_length(&aln.ops), 6);
        assert_eq!(aln.start, aln.end + 1 - reconstructed_length(&aln.ops));
    }
}
