use thiserror::Error;

/// Reasons an overlap description cannot be turned into an [`Overlap`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlapError {
    #[error("sequence ids are 1-based, got read id {read_id} and reference id {reference_id}")]
    ZeroId { read_id: usize, reference_id: usize },

    #[error("invalid read window: start {start}, end {end}, length {length}")]
    ReadWindow {
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("invalid reference window: start {start}, end {end}, length {length}")]
    ReferenceWindow {
        start: usize,
        end: usize,
        length: usize,
    },
}

/// A validated overlap between a read ("A") and a reference ("B").
///
/// Both windows are half-open and non-empty: `a_start < a_end <= a_len` and
/// `b_start < b_end <= b_len`. Ids are 1-based indices into the read and
/// reference collections. Coordinates of the read window are always on the
/// read's forward strand; `b_rev` says the read aligns to the reference in
/// reverse-complement orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    a_id: usize,
    b_id: usize,
    a_start: usize,
    a_end: usize,
    a_len: usize,
    b_start: usize,
    b_end: usize,
    b_len: usize,
    b_rev: bool,
}

impl Overlap {
    /// Build an overlap, checking the id and window invariants.
    ///
    /// # Errors
    ///
    /// Returns `OverlapError::ZeroId` if either id is 0, or
    /// `OverlapError::ReadWindow` / `OverlapError::ReferenceWindow` if a window
    /// is empty or extends past its declared sequence length.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        a_id: usize,
        b_id: usize,
        a_start: usize,
        a_end: usize,
        a_len: usize,
        b_start: usize,
        b_end: usize,
        b_len: usize,
        b_rev: bool,
    ) -> Result<Self, OverlapError> {
        if a_id == 0 || b_id == 0 {
            return Err(OverlapError::ZeroId {
                read_id: a_id,
                reference_id: b_id,
            });
        }
        if a_start >= a_end || a_end > a_len {
            return Err(OverlapError::ReadWindow {
                start: a_start,
                end: a_end,
                length: a_len,
            });
        }
        if b_start >= b_end || b_end > b_len {
            return Err(OverlapError::ReferenceWindow {
                start: b_start,
                end: b_end,
                length: b_len,
            });
        }

        Ok(Self {
            a_id,
            b_id,
            a_start,
            a_end,
            a_len,
            b_start,
            b_end,
            b_len,
            b_rev,
        })
    }

    /// 1-based read id
    #[must_use]
    pub fn a_id(&self) -> usize {
        self.a_id
    }

    /// 1-based reference id
    #[must_use]
    pub fn b_id(&self) -> usize {
        self.b_id
    }

    #[must_use]
    pub fn a_start(&self) -> usize {
        self.a_start
    }

    #[must_use]
    pub fn a_end(&self) -> usize {
        self.a_end
    }

    /// Declared read length
    #[must_use]
    pub fn a_len(&self) -> usize {
        self.a_len
    }

    #[must_use]
    pub fn b_start(&self) -> usize {
        self.b_start
    }

    #[must_use]
    pub fn b_end(&self) -> usize {
        self.b_end
    }

    /// Declared reference length
    #[must_use]
    pub fn b_len(&self) -> usize {
        self.b_len
    }

    /// True when the read aligns to the reference reverse-complemented
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.b_rev
    }

    /// The read window actually aligned, in the orientation used for alignment.
    ///
    /// On the forward strand this is `[a_start, a_end)`. On the reverse strand
    /// the window is remapped onto the reverse-complemented read as
    /// `start = a_len - a_end` followed by `end = a_len - start - 1`.
    ///
    /// NOTE: `end` is derived from the remapped `start`, which yields
    /// `a_end - 1` rather than `a_len - a_start`. This looks like an off-by-one
    /// but existing downstream output depends on it, so it must not change
    /// without validating against known-good alignments. The result may be
    /// empty (`end <= start`); such windows fail in the aligner.
    #[must_use]
    pub fn query_window(&self) -> QueryWindow {
        if self.b_rev {
            let start = self.a_len - self.a_end;
            let end = self.a_len - start - 1;
            QueryWindow {
                start,
                end,
                read_len: self.a_len,
            }
        } else {
            QueryWindow {
                start: self.a_start,
                end: self.a_end,
                read_len: self.a_len,
            }
        }
    }
}

/// A half-open window over a read in alignment orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: usize,
    pub end: usize,
    /// Full length of the read the window belongs to
    pub read_len: usize,
}

impl QueryWindow {
    /// Number of read bases before the window
    #[must_use]
    pub fn leading_clip(&self) -> usize {
        self.start
    }

    /// Number of read bases after the window
    #[must_use]
    pub fn trailing_clip(&self) -> usize {
        self.read_len.saturating_sub(self.end)
    }
}
