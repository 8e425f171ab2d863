//! Supplementary-alignment topology and SA/XA cross-reference report.

use anyhow::Result;
use clap::Parser;
use log::info;
use samconcord_lib::crossref::{CrossrefReport, xa_entry_count};
use samconcord_lib::index::SourceIndex;
use samconcord_lib::logging::{OperationTimer, format_count};
use samconcord_lib::record::AlignmentRecord;
use samconcord_lib::topology::TopologyReport;
use samconcord_lib::validation::validate_inputs_exist;
use std::path::PathBuf;

use crate::commands::command::Command;

/// How many SA characters are shown in example output.
const SA_DISPLAY_LIMIT: usize = 80;

/// Compare supplementary-alignment topology between two SAM files.
///
/// Classifies every read by which source reports supplementary alignments,
/// then checks whether the subject's extra supplementaries correspond to
/// alternate hits the baseline listed in its XA tag.
#[derive(Debug, Parser)]
#[command(
    name = "supplementary",
    about = "Compare supplementary-alignment topology between two SAM files",
    long_about = r#"
Compare which reads carry supplementary (split/chimeric) alignments in each
of two SAM files produced from the same read set.

Each read falls in at most one bucket: supplementaries only in the subject,
only in the baseline, or in both (flagged when the subject has more). For
subject-only reads the report also checks primary-position agreement,
tabulates MAPQ distributions, and cross-references each extra supplementary
against the baseline primary's XA alternate-hit list: a supplementary whose
"rname,{+|-}pos," prefix appears in the XA value was already considered
(and suppressed) by the baseline aligner.

Example usage:
  samconcord supplementary bwa.sam subject.sam
  samconcord supplementary bwa.sam subject.sam --limit 50
"#
)]
pub struct Supplementary {
    /// Baseline (reference aligner) SAM file
    #[arg(index = 1)]
    pub baseline: PathBuf,

    /// Subject (aligner under study) SAM file
    #[arg(index = 2)]
    pub subject: PathBuf,

    /// Maximum number of subject-only reads to render side by side
    #[arg(short = 'n', long = "limit", default_value = "20")]
    pub limit: usize,
}

impl Command for Supplementary {
    fn execute(&self) -> Result<()> {
        validate_inputs_exist(&[
            (&self.baseline, "Baseline SAM"),
            (&self.subject, "Subject SAM"),
        ])?;

        let timer = OperationTimer::new("Analyzing supplementary topology");

        let (baseline, subject) = SourceIndex::load_pair(&self.baseline, &self.subject)?;
        let topology = TopologyReport::analyze(&baseline, &subject);
        let crossref = CrossrefReport::analyze(&baseline, &subject, &topology.only_in_subject);

        print_distribution(&topology);
        print_subject_only(&topology);
        print_crossref(&crossref);
        self.print_examples(&baseline, &subject, &topology);

        info!(
            "Classified {} reads with supplementaries",
            format_count(
                (topology.only_in_subject.len()
                    + topology.only_in_baseline.len()
                    + topology.both.len()) as u64
            )
        );
        let total = baseline.counts().total_primaries
            + baseline.counts().supplementary
            + subject.counts().total_primaries
            + subject.counts().supplementary;
        timer.log_completion(total);
        Ok(())
    }
}

fn print_distribution(topology: &TopologyReport) {
    println!("=== Supplementary Distribution ===");
    println!(
        "  Reads with supps in subject only:   {}",
        format_count(topology.only_in_subject.len() as u64)
    );
    println!(
        "  Reads with supps in baseline only:  {}",
        format_count(topology.only_in_baseline.len() as u64)
    );
    println!("  Reads with supps in both:           {}", format_count(topology.both.len() as u64));
    println!("  Reads with more supps in subject:   {}", format_count(topology.subject_has_more));
    println!();
}

fn print_subject_only(topology: &TopologyReport) {
    println!("=== Subject-Only Supplementary Reads ===");
    println!("  Primary position matches baseline:  {}", format_count(topology.primary_pos_match));
    println!("  Primary position differs:           {}", format_count(topology.primary_pos_differ));
    println!();
    println!("  Supplementary MAPQ distribution:");
    for (mapq, count) in &topology.supplementary_mapq_dist {
        println!("    MAPQ {mapq:3}: {}", format_count(*count));
    }
    println!();
    println!("  Primary MAPQ distribution (subject):");
    for (mapq, count) in &topology.primary_mapq_dist {
        println!("    MAPQ {mapq:3}: {}", format_count(*count));
    }
    println!();
}

fn print_crossref(crossref: &CrossrefReport) {
    println!("=== Baseline XA Cross-Reference (subject-only reads) ===");
    println!("  Baseline primary has XA:            {}", format_count(crossref.baseline_with_xa));
    println!("  Baseline primary no XA:             {}", format_count(crossref.baseline_without_xa));
    println!("  Subject supp pos in baseline XA:    {}", format_count(crossref.explained));
    println!("  Subject supp pos NOT in baseline XA: {}", format_count(crossref.novel));
    println!("  Subject primaries with SA tag:      {}", format_count(crossref.subject_primary_with_sa));
    println!();
    println!("  Baseline XA entry count distribution:");
    for (entries, count) in &crossref.baseline_xa_entry_dist {
        println!("    {entries} entries: {}", format_count(*count));
    }
    println!();
    println!("  Subject XA entry count distribution (primaries):");
    for (entries, count) in &crossref.subject_xa_entry_dist {
        println!("    {entries} entries: {}", format_count(*count));
    }
    println!();
}

/// One example line: the record plus SA/XA annotations when present.
fn render_with_tags(rec: &AlignmentRecord) -> String {
    let mut line = rec.render();
    if let Some(sa) = rec.tags.sa() {
        if !sa.is_empty() {
            let shown: String = sa.chars().take(SA_DISPLAY_LIMIT).collect();
            line.push_str(&format!(" SA={shown}"));
        }
    }
    if let Some(xa) = rec.tags.xa() {
        let entries = xa_entry_count(xa);
        if entries > 0 {
            line.push_str(&format!(" XA({entries})"));
        }
    }
    line
}

impl Supplementary {
    fn print_examples(
        &self,
        baseline: &SourceIndex,
        subject: &SourceIndex,
        topology: &TopologyReport,
    ) {
        if self.limit == 0 || topology.only_in_subject.is_empty() {
            return;
        }
        let shown = topology.only_in_subject.len().min(self.limit);
        println!(
            "=== Examples: subject has supps, baseline does not (first {shown}) ==="
        );
        for (key, sc) in topology.only_in_subject.iter().take(self.limit) {
            println!("\n  Read: {key}  (subject supps: {sc})");
            println!("    SUBJECT:");
            for rec in subject.records(key) {
                println!("      {}", render_with_tags(rec));
            }
            println!("    BASELINE:");
            for rec in baseline.records(key) {
                println!("      {}", render_with_tags(rec));
            }
        }
        println!();
    }
}
