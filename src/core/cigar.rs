use std::fmt;
#[cfg(test)]
use std::str::FromStr;

#[cfg(test)]
use thiserror::Error;

/// CIGAR operation kinds produced by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarOpKind {
    /// M: alignment match (sequence match or mismatch)
    Match,
    /// X: sequence mismatch
    Mismatch,
    /// =: sequence match
    Equal,
    /// I: insertion to the reference
    Insertion,
    /// D: deletion from the reference
    Deletion,
    /// S: soft clip
    SoftClip,
}

impl CigarOpKind {
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Match => 'M',
            Self::Mismatch => 'X',
            Self::Equal => '=',
            Self::Insertion => 'I',
            Self::Deletion => 'D',
            Self::SoftClip => 'S',
        }
    }

    #[must_use]
    pub fn consumes_query(self) -> bool {
        match self {
            Self::Match | Self::Mismatch | Self::Equal | Self::Insertion | Self::SoftClip => true,
            Self::Deletion => false,
        }
    }

    #[must_use]
    pub fn consumes_reference(self) -> bool {
        match self {
            Self::Match | Self::Mismatch | Self::Equal | Self::Deletion => true,
            Self::Insertion | Self::SoftClip => false,
        }
    }
}

#[cfg(test)]
impl CigarOpKind {
    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'M' => Some(Self::Match),
            'X' => Some(Self::Mismatch),
            '=' => Some(Self::Equal),
            'I' => Some(Self::Insertion),
            'D' => Some(Self::Deletion),
            'S' => Some(Self::SoftClip),
            _ => None,
        }
    }
}

/// A single run-length encoded CIGAR element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub kind: CigarOpKind,
    pub len: usize,
}

impl CigarOp {
    #[must_use]
    pub fn new(kind: CigarOpKind, len: usize) -> Self {
        Self { kind, len }
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len, self.kind.symbol())
    }
}

/// How `=`/`X` runs are rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CigarFormat {
    /// Keep `=` and `X` (what the aligner reports)
    #[default]
    Extended,
    /// Collapse `=` and `X` into `M`
    Standard,
}

/// Errors from parsing CIGAR text
#[cfg(test)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarParseError {
    #[error("CIGAR operation '{0}' is not supported")]
    UnknownOp(char),

    #[error("CIGAR operation '{0}' has no length")]
    MissingLength(char),

    #[error("CIGAR ends with a dangling length")]
    TrailingLength,

    #[error("CIGAR length is out of range")]
    Overflow,
}

/// An ordered list of CIGAR operations.
///
/// `push` merges a new operation into the last one when the kinds match and
/// ignores zero-length operations, so a `Cigar` built through `push` never
/// holds two adjacent runs of the same kind or an empty run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cigar {
    ops: Vec<CigarOp>,
}

impl Cigar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: CigarOpKind, len: usize) {
        if len == 0 {
            return;
        }
        match self.ops.last_mut() {
            Some(last) if last.kind == kind => last.len += len,
            _ => self.ops.push(CigarOp::new(kind, len)),
        }
    }

    #[must_use]
    pub fn ops(&self) -> &[CigarOp] {
        &self.ops
    }

    pub(crate) fn ops_mut(&mut self) -> &mut Vec<CigarOp> {
        &mut self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&CigarOp> {
        self.ops.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&CigarOp> {
        self.ops.last()
    }

    /// Number of query bases consumed (M, =, X, I, S)
    #[must_use]
    pub fn query_len(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.kind.consumes_query())
            .map(|op| op.len)
            .sum()
    }

    /// Number of reference bases spanned (M, =, X, D)
    #[must_use]
    pub fn reference_len(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.kind.consumes_reference())
            .map(|op| op.len)
            .sum()
    }

    /// Copy with `=` and `X` collapsed into `M`, merging the resulting runs
    #[must_use]
    pub fn to_standard(&self) -> Self {
        let mut standard = Self::new();
        for op in &self.ops {
            let kind = match op.kind {
                CigarOpKind::Equal | CigarOpKind::Mismatch => CigarOpKind::Match,
                other => other,
            };
            standard.push(kind, op.len);
        }
        standard
    }

    /// Render in the requested format
    #[must_use]
    pub fn render(&self, format: CigarFormat) -> String {
        match format {
            CigarFormat::Extended => self.to_string(),
            CigarFormat::Standard => self.to_standard().to_string(),
        }
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "*");
        }
        for op in &self.ops {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl FromStr for Cigar {
    type Err = CigarParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cigar = Self::new();
        if s == "*" {
            return Ok(cigar);
        }

        let mut len: Option<usize> = None;
        for c in s.chars() {
            if let Some(digit) = c.to_digit(10) {
                let current = len.unwrap_or(0);
                len = Some(
                    current
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(digit as usize))
                        .ok_or(CigarParseError::Overflow)?,
                );
            } else {
                let kind = CigarOpKind::from_symbol(c).ok_or(CigarParseError::UnknownOp(c))?;
                let n = len.take().ok_or(CigarParseError::MissingLength(c))?;
                cigar.push(kind, n);
            }
        }

        if len.is_some() {
            return Err(CigarParseError::TrailingLength);
        }
        Ok(cigar)
    }
}
