//! SA/XA tag cross-referencing for subject-only supplementary reads.
//!
//! Answers whether the subject's extra supplementary calls correspond to
//! alternate hits the baseline aligner already considered and suppressed
//! into its `XA` tag.

use crate::index::SourceIndex;
use crate::record::AlignmentRecord;
use std::collections::BTreeMap;

/// Number of entries in an `XA`-style list tag. Entries have the grammar
/// `rname,{+|-}pos,cigar,editDistance;`, so counting terminators counts
/// entries.
#[must_use]
pub fn xa_entry_count(value: &str) -> usize {
    value.matches(';').count()
}

/// The exact-match prefix used to look a supplementary alignment up inside
/// the other source's `XA` list: `"{rname},{strand}{pos},"`.
///
/// Literal substring containment is knowingly approximate: a coincidental
/// substring would count as a hit. Cheap and good enough at benchmark
/// scale, where reference names and coordinates rarely collide.
#[must_use]
pub fn search_prefix(supplementary: &AlignmentRecord) -> String {
    format!(
        "{},{}{},",
        supplementary.reference_name,
        supplementary.strand(),
        supplementary.position
    )
}

/// Cross-reference tallies over all subject-only supplementary reads.
#[derive(Debug, Default)]
pub struct CrossrefReport {
    /// Subject supplementaries whose position appears in the baseline
    /// primary's `XA` list.
    pub explained: u64,
    /// Subject supplementaries absent from the baseline's `XA` list.
    pub novel: u64,
    /// Subject-only reads whose baseline primary carries at least one `XA`
    /// entry.
    pub baseline_with_xa: u64,
    /// Subject-only reads whose baseline primary has no `XA` entries.
    pub baseline_without_xa: u64,
    /// Subject-only reads whose subject primary carries a non-empty `SA`.
    pub subject_primary_with_sa: u64,
    /// Distribution of `XA` entry counts on the baseline primaries.
    pub baseline_xa_entry_dist: BTreeMap<usize, u64>,
    /// Distribution of `XA` entry counts on the subject primaries.
    pub subject_xa_entry_dist: BTreeMap<usize, u64>,
}

impl CrossrefReport {
    /// Inspects each subject-only read (keys from the topology analysis,
    /// already sorted) against both indexes.
    #[must_use]
    pub fn analyze(
        baseline: &SourceIndex,
        subject: &SourceIndex,
        only_in_subject: &[(String, usize)],
    ) -> Self {
        let mut report = Self::default();
        for (key, _) in only_in_subject {
            if let Some(subject_primary) = subject.primary(key) {
                if subject_primary.tags.sa().is_some_and(|sa| !sa.is_empty()) {
                    report.subject_primary_with_sa += 1;
                }
                let xa_entries = xa_entry_count(subject_primary.tags.xa().unwrap_or(""));
                *report.subject_xa_entry_dist.entry(xa_entries).or_insert(0) += 1;
            }

            // The containment check needs a baseline primary to look into.
            let Some(baseline_primary) = baseline.primary(key) else { continue };
            let xa = baseline_primary.tags.xa().unwrap_or("");
            let xa_entries = xa_entry_count(xa);
            *report.baseline_xa_entry_dist.entry(xa_entries).or_insert(0) += 1;
            if xa_entries > 0 {
                report.baseline_with_xa += 1;
            } else {
                report.baseline_without_xa += 1;
            }

            for supp in subject.supplementaries(key) {
                if xa.contains(&search_prefix(supp)) {
                    report.explained += 1;
                } else {
                    report.novel += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[rstest]
    #[case("", 0)]
    #[case("chr1,+100,50M,2;", 1)]
    #[case("chr1,+100,50M,2;chr2,-300,50M,0;", 2)]
    fn test_xa_entry_count(#[case] value: &str, #[case] expected: usize) {
        assert_eq!(xa_entry_count(value), expected);
    }

    fn index_from(lines: &[String]) -> SourceIndex {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        SourceIndex::from_path(file.path()).unwrap()
    }

    fn line(name: &str, flag: u16, rname: &str, pos: u64, tags: &str) -> String {
        let mut s = format!("{name}\t{flag}\t{rname}\t{pos}\t60\t50M50S\t*\t0\t0\tACGT\tFFFF");
        if !tags.is_empty() {
            s.push('\t');
            s.push_str(tags);
        }
        s
    }

    #[test]
    fn test_search_prefix_uses_strand() {
        let fwd =
            crate::record::AlignmentRecord::parse(&line("r", 0x800, "chr7", 5000, ""))
                .unwrap()
                .unwrap();
        assert_eq!(search_prefix(&fwd), "chr7,+5000,");
        let rev =
            crate::record::AlignmentRecord::parse(&line("r", 0x800 | 0x10, "chr7", 5000, ""))
                .unwrap()
                .unwrap();
        assert_eq!(search_prefix(&rev), "chr7,-5000,");
    }

    #[test]
    fn test_explained_supplementary() {
        // The subject's extra supplementary at chr7:5000(+) is listed in the
        // baseline primary's XA, so it was a known alternate hit.
        let baseline = index_from(&[line(
            "readE",
            0,
            "chr1",
            100,
            "XA:Z:chr7,+5000,100M,3;chr9,-20,100M,5;",
        )]);
        let subject = index_from(&[
            line("readE", 0, "chr1", 100, "SA:Z:chr7,5000,+,50M50S,60,0;"),
            line("readE", 0x800, "chr7", 5000, ""),
        ]);

        let report =
            CrossrefReport::analyze(&baseline, &subject, &[("readE".to_string(), 1)]);
        assert_eq!(report.explained, 1);
        assert_eq!(report.novel, 0);
        assert_eq!(report.baseline_with_xa, 1);
        assert_eq!(report.baseline_without_xa, 0);
        assert_eq!(report.subject_primary_with_sa, 1);
        assert_eq!(report.baseline_xa_entry_dist.get(&2), Some(&1));
    }

    #[test]
    fn test_novel_supplementary() {
        let baseline = index_from(&[line("readN", 0, "chr1", 100, "")]);
        let subject = index_from(&[
            line("readN", 0, "chr1", 100, ""),
            line("readN", 0x800, "chr7", 5000, ""),
        ]);

        let report =
            CrossrefReport::analyze(&baseline, &subject, &[("readN".to_string(), 1)]);
        assert_eq!(report.explained, 0);
        assert_eq!(report.novel, 1);
        assert_eq!(report.baseline_without_xa, 1);
        assert_eq!(report.subject_primary_with_sa, 0);
    }

    #[test]
    fn test_strand_mismatch_is_novel() {
        // Same coordinate but opposite strand in the XA list.
        let baseline =
            index_from(&[line("readS", 0, "chr1", 100, "XA:Z:chr7,-5000,100M,3;")]);
        let subject = index_from(&[
            line("readS", 0, "chr1", 100, ""),
            line("readS", 0x800, "chr7", 5000, ""),
        ]);
        let report =
            CrossrefReport::analyze(&baseline, &subject, &[("readS".to_string(), 1)]);
        assert_eq!(report.novel, 1);
    }

    #[test]
    fn test_no_baseline_primary_skips_containment() {
        let baseline = index_from(&[line("other", 0, "chr1", 1, "")]);
        let subject = index_from(&[
            line("readZ", 0, "chr1", 100, ""),
            line("readZ", 0x800, "chr7", 5000, ""),
        ]);
        let report =
            CrossrefReport::analyze(&baseline, &subject, &[("readZ".to_string(), 1)]);
        assert_eq!(report.explained + report.novel, 0);
        assert_eq!(report.subject_xa_entry_dist.get(&0), Some(&1));
    }
}
