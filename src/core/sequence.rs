use std::collections::HashMap;

/// Complement of a single nucleotide, IUPAC-aware and case-preserving.
/// Bytes outside the nucleotide alphabet are returned unchanged.
#[must_use]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' | b'u' => b'a',
        b'R' => b'Y',
        b'Y' => b'R',
        b'r' => b'y',
        b'y' => b'r',
        b'K' => b'M',
        b'M' => b'K',
        b'k' => b'm',
        b'm' => b'k',
        b'B' => b'V',
        b'V' => b'B',
        b'b' => b'v',
        b'v' => b'b',
        b'D' => b'H',
        b'H' => b'D',
        b'd' => b'h',
        b'h' => b'd',
        other => other,
    }
}

/// A named read or reference sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// First whitespace-delimited token of the record header
    pub name: String,

    /// Raw residues, exactly as read from the input
    pub bases: Vec<u8>,

    /// Phred+33 quality string (FASTQ input only)
    pub quality: Option<Vec<u8>>,
}

impl Sequence {
    pub fn new(name: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bases: bases.into(),
            quality: None,
        }
    }

    #[must_use]
    pub fn with_quality(mut self, quality: impl Into<Vec<u8>>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Reverse complement: bases complemented and reversed, qualities reversed.
    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        Self {
            name: self.name.clone(),
            bases: self.bases.iter().rev().map(|&b| complement(b)).collect(),
            quality: self
                .quality
                .as_ref()
                .map(|q| q.iter().rev().copied().collect()),
        }
    }
}

/// An ordered collection of sequences addressed by 1-based id
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    sequences: Vec<Sequence>,
    by_name: HashMap<String, usize>,
}

impl SequenceSet {
    #[must_use]
    pub fn new(sequences: Vec<Sequence>) -> Self {
        let mut by_name = HashMap::with_capacity(sequences.len());
        for (i, seq) in sequences.iter().enumerate() {
            // First occurrence wins for duplicate names
            by_name.entry(seq.name.clone()).or_insert(i + 1);
        }
        Self { sequences, by_name }
    }

    /// Look up a sequence by its 1-based id
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&Sequence> {
        id.checked_sub(1).and_then(|idx| self.sequences.get(idx))
    }

    /// 1-based id of the first sequence with this name
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.iter()
    }
}

impl FromIterator<Sequence> for SequenceSet {
    fn from_iter<I: IntoIterator<Item = Sequence>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
