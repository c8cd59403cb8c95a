//! Command-line interface for overlap-aligner.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **align**: align MHAP/PAF overlaps and write SAM
//!
//! ## Usage
//!
//! ```text
//! # Align PAF overlaps from minimap2, SAM to stdout
//! overlap-aligner align --reads reads.fq --references contigs.fa --overlaps ovl.paf
//!
//! # Stream records as they finish, using 8 threads
//! overlap-aligner align -r reads.fq -R contigs.fa -O ovl.mhap -t 8 --stream -o out.sam
//!
//! # JSON run summary on stderr
//! overlap-aligner --format json align -r reads.fq -R contigs.fa -O ovl.paf -o out.sam
//! ```

use clap::{Parser, Subcommand};

pub mod align;

#[derive(Parser)]
#[command(name = "overlap-aligner")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Turn read-to-reference overlaps into base-level SAM alignments")]
#[command(
    long_about = "overlap-aligner takes overlaps between reads and references (MHAP or PAF), aligns each overlapping window end to end, and writes one SAM record per overlap.\n\nReverse-strand overlaps are aligned against the reverse complement of the read. Unaligned read ends are soft clipped so every CIGAR covers the whole read."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging and a progress line)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Format of the run summary written to stderr
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align overlaps and write SAM
    Align(align::AlignArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
