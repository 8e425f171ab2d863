//! Supplementary-alignment topology: which source reports extra
//! supplementary alignments for each read, and what those reads look like.

use crate::index::SourceIndex;
use std::collections::{BTreeMap, BTreeSet};

/// Which source carries supplementary alignments for a read.
///
/// Reads with no supplementaries on either side fall in no bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyClass {
    /// Supplementaries only in the subject source.
    OnlyInSubject,
    /// Supplementaries only in the baseline source.
    OnlyInBaseline,
    /// Supplementaries in both sources.
    Both {
        /// The subject reports strictly more supplementaries.
        subject_has_more: bool,
    },
}

/// Classifies one read by its per-source supplementary counts.
#[must_use]
pub fn classify(subject_count: usize, baseline_count: usize) -> Option<TopologyClass> {
    match (subject_count, baseline_count) {
        (0, 0) => None,
        (_, 0) => Some(TopologyClass::OnlyInSubject),
        (0, _) => Some(TopologyClass::OnlyInBaseline),
        (sc, bc) => Some(TopologyClass::Both { subject_has_more: sc > bc }),
    }
}

/// Topology buckets plus characteristics of the subject-only reads.
#[derive(Debug, Default)]
pub struct TopologyReport {
    /// Keys with subject-only supplementaries, with the subject count.
    pub only_in_subject: Vec<(String, usize)>,
    /// Keys with baseline-only supplementaries, with the baseline count.
    pub only_in_baseline: Vec<(String, usize)>,
    /// Keys with supplementaries in both sources: (key, subject, baseline).
    pub both: Vec<(String, usize, usize)>,
    /// Among `both`, keys where the subject reports strictly more.
    pub subject_has_more: u64,
    /// Subject-only reads whose two primaries agree on position exactly.
    pub primary_pos_match: u64,
    /// Subject-only reads whose primaries are placed differently.
    pub primary_pos_differ: u64,
    /// MAPQ distribution of the extra (subject-only) supplementary records.
    pub supplementary_mapq_dist: BTreeMap<u8, u64>,
    /// MAPQ distribution of the subject primaries carrying them, restricted
    /// to reads where both sources hold a primary.
    pub primary_mapq_dist: BTreeMap<u8, u64>,
}

impl TopologyReport {
    /// Classifies every read key present in either source.
    ///
    /// Keys are visited in sorted order so the report and its example lists
    /// are deterministic.
    #[must_use]
    pub fn analyze(baseline: &SourceIndex, subject: &SourceIndex) -> Self {
        let mut report = Self::default();

        let all_keys: BTreeSet<&str> = baseline.keys().chain(subject.keys()).collect();
        for key in all_keys {
            let sc = subject.supplementary_count(key);
            let bc = baseline.supplementary_count(key);
            match classify(sc, bc) {
                None => {}
                Some(TopologyClass::OnlyInSubject) => {
                    report.observe_subject_only(baseline, subject, key);
                    report.only_in_subject.push((key.to_string(), sc));
                }
                Some(TopologyClass::OnlyInBaseline) => {
                    report.only_in_baseline.push((key.to_string(), bc));
                }
                Some(TopologyClass::Both { subject_has_more }) => {
                    report.both.push((key.to_string(), sc, bc));
                    if subject_has_more {
                        report.subject_has_more += 1;
                    }
                }
            }
        }
        report
    }

    fn observe_subject_only(&mut self, baseline: &SourceIndex, subject: &SourceIndex, key: &str) {
        for supp in subject.supplementaries(key) {
            *self.supplementary_mapq_dist.entry(supp.mapq).or_insert(0) += 1;
        }
        // Primary characteristics only where both sources hold a primary.
        if let (Some(subject_primary), Some(baseline_primary)) =
            (subject.primary(key), baseline.primary(key))
        {
            *self.primary_mapq_dist.entry(subject_primary.mapq).or_insert(0) += 1;
            let same = subject_primary.reference_name == baseline_primary.reference_name
                && subject_primary.position == baseline_primary.position;
            if same {
                self.primary_pos_match += 1;
            } else {
                self.primary_pos_differ += 1;
            }
        }
    }
}
