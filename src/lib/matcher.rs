//! Cross-source matching: joins two read indexes on read key.
//!
//! A key yields a pair only when both sources hold a mapped primary for it.
//! Keys unmapped on either side are excluded here but remain in the
//! per-source mapping-rate counters.

use crate::index::SourceIndex;
use crate::record::AlignmentRecord;

/// The join of both sources' primary records for one read key.
///
/// Derived facts (position equality, MAPQ delta) are computed on demand
/// rather than stored, so they cannot diverge from the records.
#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    /// The shared read key.
    pub key: &'a str,
    /// Primary record from the baseline (reference) source.
    pub baseline: &'a AlignmentRecord,
    /// Primary record from the subject (studied) source.
    pub subject: &'a AlignmentRecord,
}

impl MatchedPair<'_> {
    /// Exact position equality: reference name AND 1-based coordinate equal.
    ///
    /// Deliberately exact. Near-miss alignments a few bases apart count as
    /// mismatches; there is no windowing and no CIGAR-based overlap
    /// reasoning.
    #[must_use]
    pub fn same_position(&self) -> bool {
        self.baseline.reference_name == self.subject.reference_name
            && self.baseline.position == self.subject.position
    }

    /// Absolute MAPQ difference between the two primaries.
    #[must_use]
    pub fn mapq_delta(&self) -> u8 {
        self.baseline.mapq.abs_diff(self.subject.mapq)
    }

    /// Whether both primaries report the same MAPQ.
    #[must_use]
    pub fn mapq_equal(&self) -> bool {
        self.baseline.mapq == self.subject.mapq
    }
}

/// Joins the two indexes on read key, keeping keys where both sides hold a
/// mapped primary. Pairs come out in the subject's key-encounter order, so
/// downstream example rendering is deterministic.
#[must_use]
pub fn match_primaries<'a>(
    baseline: &'a SourceIndex,
    subject: &'a SourceIndex,
) -> Vec<MatchedPair<'a>> {
    let mut pairs = Vec::new();
    for key in subject.keys() {
        let Some(subject_primary) = subject.primary(key) else { continue };
        let Some(baseline_primary) = baseline.primary(key) else { continue };
        if subject_primary.flags.is_unmapped() || baseline_primary.flags.is_unmapped() {
            continue;
        }
        pairs.push(MatchedPair { key, baseline: baseline_primary, subject: subject_primary });
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AlignmentRecord;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn index_from(lines: &[String]) -> SourceIndex {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        SourceIndex::from_path(file.path()).unwrap()
    }

    fn line(name: &str, flag: u16, rname: &str, pos: u64, mapq: u8) -> String {
        format!("{name}\t{flag}\t{rname}\t{pos}\t{mapq}\t100M\t*\t0\t0\tACGT\tFFFF")
    }

    #[test]
    fn test_matches_mapped_primaries_only() {
        let baseline = index_from(&[
            line("shared", 0, "chr1", 100, 60),
            line("unmapped_here", 0x4, "*", 0, 0),
            line("baseline_only", 0, "chr2", 50, 60),
        ]);
        let subject = index_from(&[
            line("shared", 0, "chr1", 100, 55),
            line("unmapped_here", 0, "chr3", 77, 60),
            line("subject_only", 0, "chr4", 5, 60),
        ]);

        let pairs = match_primaries(&baseline, &subject);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].key, "shared");
        assert!(pairs[0].same_position());
        assert_eq!(pairs[0].mapq_delta(), 5);
    }

    #[test]
    fn test_supplementary_alone_does_not_match() {
        // A key with only a supplementary on one side has no primary there.
        let baseline = index_from(&[line("readB", 0, "chr1", 100, 60)]);
        let subject = index_from(&[line("readB", 0x800, "chr1", 100, 60)]);
        assert!(match_primaries(&baseline, &subject).is_empty());
    }

    #[test]
    fn test_mapq_delta_is_symmetric() {
        let a = AlignmentRecord::parse(&line("r", 0, "chr1", 1, 60)).unwrap().unwrap();
        let b = AlignmentRecord::parse(&line("r", 0, "chr1", 1, 13)).unwrap().unwrap();
        let ab = MatchedPair { key: "r", baseline: &a, subject: &b };
        let ba = MatchedPair { key: "r", baseline: &b, subject: &a };
        assert_eq!(ab.mapq_delta(), ba.mapq_delta());
        assert_eq!(ab.mapq_delta(), 47);
    }

    #[test]
    fn test_position_equality_is_exact() {
        let a = AlignmentRecord::parse(&line("r", 0, "chr1", 1000, 60)).unwrap().unwrap();
        let off_by_one = AlignmentRecord::parse(&line("r", 0, "chr1", 1001, 60)).unwrap().unwrap();
        let other_chrom = AlignmentRecord::parse(&line("r", 0, "chr2", 1000, 60)).unwrap().unwrap();

        let near = MatchedPair { key: "r", baseline: &a, subject: &off_by_one };
        assert!(!near.same_position());
        let moved = MatchedPair { key: "r", baseline: &a, subject: &other_chrom };
        assert!(!moved.same_position());
    }

    #[test]
    fn test_pair_order_follows_subject_encounter_order() {
        let baseline = index_from(&[
            line("first", 0, "chr1", 1, 60),
            line("second", 0, "chr1", 2, 60),
        ]);
        let subject = index_from(&[
            line("second", 0, "chr1", 2, 60),
            line("first", 0, "chr1", 1, 60),
        ]);
        let keys: Vec<&str> = match_primaries(&baseline, &subject).iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["second", "first"]);
    }
}
