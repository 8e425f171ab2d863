//! Integration tests for samconcord.
//!
//! Run with: `cargo test --test integration_tests`
//!
//! These tests validate end-to-end workflows spanning multiple modules:
//! SAM files on disk through indexing, matching, and the three reports.

use samconcord_lib::crossref::CrossrefReport;
use samconcord_lib::index::SourceIndex;
use samconcord_lib::matcher::match_primaries;
use samconcord_lib::summary::{ComparisonSummary, ConcordanceThresholds};
use samconcord_lib::topology::TopologyReport;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes a SAM file (header plus records) into `dir` and returns its path.
fn write_sam(dir: &TempDir, name: &str, records: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "@HD\tVN:1.6\tSO:unsorted").unwrap();
    writeln!(file, "@SQ\tSN:chr1\tLN:248956422").unwrap();
    writeln!(file, "@SQ\tSN:chr7\tLN:159345973").unwrap();
    writeln!(file, "@PG\tID:test\tPN:test").unwrap();
    for record in records {
        writeln!(file, "{record}").unwrap();
    }
    path
}

fn sam_line(name: &str, flag: u16, rname: &str, pos: u64, mapq: u8, tags: &str) -> String {
    let mut line =
        format!("{name}\t{flag}\t{rname}\t{pos}\t{mapq}\t100M\t*\t0\t0\tACGT\tFFFF");
    if !tags.is_empty() {
        line.push('\t');
        line.push_str(tags);
    }
    line
}

#[test]
fn test_end_to_end_concordance_workflow() {
    let dir = TempDir::new().unwrap();

    // Paired read "frag" agrees on /1 and diverges on /2; "solo" is
    // unpaired and exact; "lost" is unmapped in the subject only.
    let baseline_records = vec![
        sam_line("frag", 0x1 | 0x2 | 0x40, "chr1", 10_000, 60, ""),
        sam_line("frag", 0x1 | 0x2 | 0x80, "chr1", 10_250, 60, ""),
        sam_line("solo", 0, "chr7", 500, 37, ""),
        sam_line("lost", 0, "chr1", 999, 23, ""),
    ];
    let subject_records = vec![
        sam_line("frag", 0x1 | 0x2 | 0x40, "chr1", 10_000, 60, ""),
        sam_line("frag", 0x1 | 0x80, "chr7", 77_777, 55, ""),
        sam_line("solo", 0, "chr7", 500, 37, ""),
        sam_line("lost", 0x4, "*", 0, 0, ""),
    ];
    let baseline_path =
        write_sam(&dir, "baseline.sam", &baseline_records.iter().map(String::as_str).collect::<Vec<_>>());
    let subject_path =
        write_sam(&dir, "subject.sam", &subject_records.iter().map(String::as_str).collect::<Vec<_>>());

    let (baseline, subject) = SourceIndex::load_pair(&baseline_path, &subject_path).unwrap();

    assert_eq!(baseline.counts().total_primaries, 4);
    assert_eq!(baseline.counts().mapped_primaries, 4);
    assert_eq!(subject.counts().total_primaries, 4);
    assert_eq!(subject.counts().mapped_primaries, 3);
    assert_eq!(baseline.counts().proper_pair_primaries, 2);
    assert_eq!(subject.counts().proper_pair_primaries, 1);

    let pairs = match_primaries(&baseline, &subject);
    // "lost" is unmapped in the subject, so three keys match.
    assert_eq!(pairs.len(), 3);

    let summary = ComparisonSummary::from_pairs(
        &pairs,
        *baseline.counts(),
        *subject.counts(),
        ConcordanceThresholds::default(),
    );
    assert_eq!(summary.matched, 3);
    assert_eq!(summary.pos_exact, 2);
    assert_eq!(summary.pos_mismatch, 1);
    assert_eq!(summary.mapq_exact, 2);
    // Deltas: 0 (frag/1), 5 (frag/2), 0 (solo).
    let mean = summary.mean_mapq_delta().value().unwrap();
    assert!((mean - 5.0 / 3.0).abs() < 1e-9);
    assert_eq!(summary.subject_mapping_rate().value(), Some(0.75));
    assert_eq!(summary.subject_mapping_rate().percent(1), "75.0%");
}

#[test]
fn test_end_to_end_supplementary_workflow() {
    let dir = TempDir::new().unwrap();

    // "split" gains a supplementary only in the subject; its extra
    // alignment matches an XA entry on the baseline primary. "chim" has
    // supplementaries in both sources.
    let baseline_records = vec![
        sam_line("split", 0, "chr1", 100, 60, "XA:Z:chr7,+5000,100M,3;"),
        sam_line("chim", 0, "chr1", 200, 60, ""),
        sam_line("chim", 0x800, "chr7", 9_000, 41, ""),
    ];
    let subject_records = vec![
        sam_line("split", 0, "chr1", 100, 60, "SA:Z:chr7,5000,+,50M50S,60,0;"),
        sam_line("split", 0x800, "chr7", 5_000, 60, ""),
        sam_line("chim", 0, "chr1", 200, 60, ""),
        sam_line("chim", 0x800, "chr7", 9_000, 41, ""),
        sam_line("chim", 0x800, "chr7", 9_500, 12, ""),
    ];
    let baseline_path =
        write_sam(&dir, "baseline.sam", &baseline_records.iter().map(String::as_str).collect::<Vec<_>>());
    let subject_path =
        write_sam(&dir, "subject.sam", &subject_records.iter().map(String::as_str).collect::<Vec<_>>());

    let (baseline, subject) = SourceIndex::load_pair(&baseline_path, &subject_path).unwrap();
    let topology = TopologyReport::analyze(&baseline, &subject);

    assert_eq!(topology.only_in_subject, vec![("split".to_string(), 1)]);
    assert!(topology.only_in_baseline.is_empty());
    assert_eq!(topology.both, vec![("chim".to_string(), 2, 1)]);
    assert_eq!(topology.subject_has_more, 1);
    assert_eq!(topology.primary_pos_match, 1);
    assert_eq!(topology.primary_pos_differ, 0);
    assert_eq!(topology.supplementary_mapq_dist.get(&60), Some(&1));

    let crossref = CrossrefReport::analyze(&baseline, &subject, &topology.only_in_subject);
    assert_eq!(crossref.explained, 1);
    assert_eq!(crossref.novel, 0);
    assert_eq!(crossref.baseline_with_xa, 1);
    assert_eq!(crossref.subject_primary_with_sa, 1);
}

#[test]
fn test_no_common_reads_yields_empty_summary() {
    let dir = TempDir::new().unwrap();
    let baseline_path =
        write_sam(&dir, "baseline.sam", &[&sam_line("only_b", 0, "chr1", 1, 60, "")]);
    let subject_path =
        write_sam(&dir, "subject.sam", &[&sam_line("only_s", 0, "chr1", 1, 60, "")]);

    let (baseline, subject) = SourceIndex::load_pair(&baseline_path, &subject_path).unwrap();
    let pairs = match_primaries(&baseline, &subject);
    assert!(pairs.is_empty());

    let summary = ComparisonSummary::from_pairs(
        &pairs,
        *baseline.counts(),
        *subject.counts(),
        ConcordanceThresholds::default(),
    );
    assert_eq!(summary.matched, 0);
    // Every pair-derived ratio degrades to the n/a sentinel.
    assert!(summary.pos_exact_rate().value().is_none());
    assert!(summary.mean_mapq_delta().value().is_none());
    assert_eq!(summary.pos_exact_rate().percent(2), "n/a");
    // File-level rates are still defined.
    assert_eq!(summary.baseline_mapping_rate().value(), Some(1.0));
}

#[test]
fn test_malformed_record_reports_path_and_line() {
    let dir = TempDir::new().unwrap();
    let path = write_sam(&dir, "bad.sam", &["truncated\t0\tchr1"]);

    let err = SourceIndex::from_path(&path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("bad.sam"), "unexpected message: {message}");
    assert!(message.contains("line 5"), "unexpected message: {message}");
}
