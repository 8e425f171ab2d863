//! Position and MAPQ concordance report between two aligners' SAM output.

use anyhow::Result;
use clap::Parser;
use itertools::Itertools;
use log::info;
use samconcord_lib::index::SourceIndex;
use samconcord_lib::logging::{OperationTimer, format_count};
use samconcord_lib::matcher::{MatchedPair, match_primaries};
use samconcord_lib::summary::{
    ComparisonSummary, ConcordanceThresholds, DEFAULT_HIGH_CONFIDENCE_MIN,
    DEFAULT_OVERCONFIDENT_BASELINE_MAX, DEFAULT_OVERCONFIDENT_SUBJECT_MIN,
};
use samconcord_lib::validation::validate_inputs_exist;
use std::path::PathBuf;

use crate::commands::command::Command;

/// Compare mapping position and MAPQ confidence between two SAM files.
///
/// Matches reads by query name (suffixed /1 or /2 for paired ends) and
/// reports mapping rates, exact-position concordance, MAPQ agreement, and
/// overconfidence statistics.
#[derive(Debug, Parser)]
#[command(
    name = "concordance",
    about = "Compare mapping positions and MAPQ between two SAM files",
    long_about = r#"
Compare the SAM output of two aligners run on the same read set.

Reads are matched on query name plus pair-end designation (/1, /2); a read
contributes a matched pair only when both files hold a mapped primary
alignment for it. Secondary alignments (flag 0x100) are ignored entirely.

Position comparison is exact: reference name and 1-based coordinate must be
identical. Alignments a few bases apart count as mismatches by design.

Among pairs placed differently, a pair is "overconfident" when the subject
MAPQ is at least --overconfident-subject-min while the baseline MAPQ is at
most --overconfident-baseline-max.

Example usage:
  samconcord concordance bwa.sam subject.sam
  samconcord concordance bwa.sam subject.sam --max-examples 50
"#
)]
pub struct Concordance {
    /// Baseline (reference aligner) SAM file
    #[arg(index = 1)]
    pub baseline: PathBuf,

    /// Subject (aligner under study) SAM file
    #[arg(index = 2)]
    pub subject: PathBuf,

    /// Subject MAPQ floor for the overconfidence classification
    #[arg(long = "overconfident-subject-min", default_value_t = DEFAULT_OVERCONFIDENT_SUBJECT_MIN)]
    pub overconfident_subject_min: u8,

    /// Baseline MAPQ ceiling for the overconfidence classification
    #[arg(long = "overconfident-baseline-max", default_value_t = DEFAULT_OVERCONFIDENT_BASELINE_MAX)]
    pub overconfident_baseline_max: u8,

    /// Per-side MAPQ floor for the "both high-confidence" classification
    #[arg(long = "high-confidence-min", default_value_t = DEFAULT_HIGH_CONFIDENCE_MIN)]
    pub high_confidence_min: u8,

    /// Maximum number of divergent reads to render side by side
    #[arg(short = 'm', long = "max-examples", default_value = "10")]
    pub max_examples: usize,
}

impl Command for Concordance {
    fn execute(&self) -> Result<()> {
        validate_inputs_exist(&[
            (&self.baseline, "Baseline SAM"),
            (&self.subject, "Subject SAM"),
        ])?;

        let timer = OperationTimer::new("Comparing alignments");

        let (baseline, subject) = SourceIndex::load_pair(&self.baseline, &self.subject)?;
        let pairs = match_primaries(&baseline, &subject);
        let thresholds = ConcordanceThresholds {
            overconfident_subject_min: self.overconfident_subject_min,
            overconfident_baseline_max: self.overconfident_baseline_max,
            high_confidence_min: self.high_confidence_min,
        };
        let summary = ComparisonSummary::from_pairs(
            &pairs,
            *baseline.counts(),
            *subject.counts(),
            thresholds,
        );

        self.print_summary(&summary);
        self.print_examples(&baseline, &subject, &pairs);

        info!("Matched {} read keys", format_count(summary.matched));
        let total = summary.baseline_counts.total_primaries
            + summary.baseline_counts.supplementary
            + summary.subject_counts.total_primaries
            + summary.subject_counts.supplementary;
        timer.log_completion(total);
        Ok(())
    }
}

impl Concordance {
    fn print_summary(&self, summary: &ComparisonSummary) {
        println!("=== Concordance Results ===");
        println!("Baseline: {}", self.baseline.display());
        println!("Subject:  {}", self.subject.display());
        println!();
        println!("-- Mapping Rate --");
        println!(
            "  baseline: {} / {} ({})",
            format_count(summary.baseline_counts.mapped_primaries),
            format_count(summary.baseline_counts.total_primaries),
            summary.baseline_mapping_rate().percent(1)
        );
        println!(
            "  subject:  {} / {} ({})",
            format_count(summary.subject_counts.mapped_primaries),
            format_count(summary.subject_counts.total_primaries),
            summary.subject_mapping_rate().percent(1)
        );
        println!();
        println!("-- Position Concordance --");
        println!("  Both mapped:     {}", format_count(summary.matched));
        println!(
            "  Exact match:     {} ({})",
            format_count(summary.pos_exact),
            summary.pos_exact_rate().percent(2)
        );
        println!(
            "  Mismatch:        {} ({})",
            format_count(summary.pos_mismatch),
            summary.pos_mismatch_rate().percent(2)
        );
        println!();
        println!("-- MAPQ Agreement (both mapped) --");
        println!(
            "  Exact match:     {} / {} ({})",
            format_count(summary.mapq_exact),
            format_count(summary.matched),
            summary.mapq_exact_rate().percent(1)
        );
        println!("  Mean abs diff:   {}", summary.mean_mapq_delta().fixed(2));
        println!();
        println!(
            "-- Overconfident MAPQ (subject>={}, baseline<={}, diff pos) --",
            self.overconfident_subject_min, self.overconfident_baseline_max
        );
        println!("  Count:            {}", format_count(summary.overconfident));
        println!(
            "  Mean subject MAPQ: {}",
            summary.mean_overconfident_subject_mapq().fixed(1)
        );
        println!();
        println!("-- Mismatched Position Reads --");
        println!("  Count:             {}", format_count(summary.pos_mismatch));
        println!(
            "  Mean subject MAPQ:  {}",
            summary.mean_mismatch_subject_mapq().fixed(1)
        );
        println!(
            "  Mean baseline MAPQ: {}",
            summary.mean_mismatch_baseline_mapq().fixed(1)
        );
        println!("  Both MAPQ=0:       {}", format_count(summary.both_zero_mapq));
        println!(
            "  Both MAPQ>={}:      {}",
            self.high_confidence_min,
            format_count(summary.both_high_mapq)
        );
        println!();
        println!("-- Proper Pair Rate --");
        println!("  baseline: {}", summary.baseline_proper_pair_rate().percent(1));
        println!("  subject:  {}", summary.subject_proper_pair_rate().percent(1));
        println!();
        println!("-- Supplementary Alignments --");
        println!("  baseline: {}", format_count(summary.baseline_counts.supplementary));
        println!("  subject:  {}", format_count(summary.subject_counts.supplementary));
        println!();
    }

    /// Renders up to `max_examples` position-mismatched reads with both
    /// sources' records side by side.
    fn print_examples(
        &self,
        baseline: &SourceIndex,
        subject: &SourceIndex,
        pairs: &[MatchedPair<'_>],
    ) {
        if self.max_examples == 0 {
            return;
        }
        let divergent: Vec<&MatchedPair<'_>> =
            pairs.iter().filter(|p| !p.same_position()).take(self.max_examples).collect();
        if divergent.is_empty() {
            return;
        }

        println!("=== Example Divergent Reads (first {}) ===", divergent.len());
        for pair in divergent {
            let mut what = Vec::new();
            if pair.baseline.reference_name != pair.subject.reference_name {
                what.push("reference");
            }
            if pair.baseline.position != pair.subject.position {
                what.push("position");
            }
            if !pair.mapq_equal() {
                what.push("MAPQ");
            }
            println!("\n  Read: {}  ({} differ)", pair.key, what.iter().join(", "));
            println!("    BASELINE:");
            for rec in baseline.records(pair.key) {
                println!("      {}", rec.render());
            }
            println!("    SUBJECT:");
            for rec in subject.records(pair.key) {
                println!("      {}", rec.render());
            }
        }
        println!();
    }
}
