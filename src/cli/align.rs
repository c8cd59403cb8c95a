//! Align command - align overlaps between reads and references and write SAM.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::alignment::engine::{AlignmentEngine, EngineConfig, RunSummary};
use crate::cli::OutputFormat;
use crate::core::cigar::CigarFormat;
use crate::output::sam::{self, SamWriter};
use crate::parsing::{self, sequences::read_sequences, OverlapFormat};

/// Arguments for the align command
#[derive(Args)]
pub struct AlignArgs {
    /// Reads (FASTA or FASTQ, optionally gzipped)
    #[arg(short = 'r', long, required = true)]
    pub reads: PathBuf,

    /// References (FASTA or FASTQ, optionally gzipped)
    #[arg(short = 'R', long, required = true)]
    pub references: PathBuf,

    /// Overlaps between reads and references; use '-' for stdin
    #[arg(short = 'O', long, required = true)]
    pub overlaps: PathBuf,

    /// Overlap format (inferred from the file extension by default)
    #[arg(long, value_enum)]
    pub overlap_format: Option<OverlapFormat>,

    /// Worker threads (0 = one per core)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// Output SAM path (stdout by default)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write each record as soon as it is aligned instead of in input order
    #[arg(long)]
    pub stream: bool,

    /// CIGAR style: extended uses =/X, standard uses M
    #[arg(long, value_enum, default_value = "extended")]
    pub cigar_format: CigarFormat,
}

/// Execute the align command
///
/// # Errors
///
/// Returns an error if an input cannot be read, the output cannot be written,
/// or the worker pool cannot be started. Individual overlaps that fail to
/// align are skipped and reported in the summary.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AlignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let reads = read_sequences(&args.reads)
        .with_context(|| format!("Failed to load reads from {}", args.reads.display()))?;
    let references = read_sequences(&args.references).with_context(|| {
        format!(
            "Failed to load references from {}",
            args.references.display()
        )
    })?;

    let overlap_format = args
        .overlap_format
        .unwrap_or_else(|| OverlapFormat::from_path(&args.overlaps));
    let overlaps = parsing::parse_overlaps(&args.overlaps, overlap_format, &reads, &references)
        .with_context(|| format!("Failed to load overlaps from {}", args.overlaps.display()))?;
    info!(
        overlaps = overlaps.len(),
        format = ?overlap_format,
        "Loaded overlaps"
    );

    let engine = AlignmentEngine::with_config(
        &reads,
        &references,
        EngineConfig {
            threads: args.threads,
            verbose,
        },
    );

    let out: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    let header = sam::build_header(&references).context("Failed to build SAM header")?;
    let mut writer = SamWriter::new(out, header, args.cigar_format);
    writer.write_header()?;

    let summary = if args.stream {
        let (summary, _) = engine.stream_all(&overlaps, writer)?;
        summary
    } else {
        let mut outcome = engine.align_all(&overlaps)?;
        outcome.sort_by_input_order();
        writer.write_records(&outcome.records)?;
        writer.finish()?;
        outcome.summary
    };

    match format {
        OutputFormat::Text => print_text_summary(&summary),
        OutputFormat::Json => print_json_summary(&summary)?,
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

fn print_text_summary(summary: &RunSummary) {
    eprintln!("Alignment Summary");
    eprintln!("{}", "=".repeat(40));
    eprintln!("  Overlaps: {}", summary.total);
    eprintln!("  Aligned:  {}", summary.aligned);
    eprintln!(
        "  Skipped:  {} ({:.2}%)",
        summary.skipped,
        summary.skipped_percent()
    );
}

fn print_json_summary(summary: &RunSummary) -> anyhow::Result<()> {
    eprintln!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn print_tsv_summary(summary: &RunSummary) {
    eprintln!("total\taligned\tskipped");
    eprintln!("{}\t{}\t{}", summary.total, summary.aligned, summary.skipped);
}
