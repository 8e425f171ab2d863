//! Metric aggregation: reduces matched pairs and per-source counters into
//! one summary record.
//!
//! Every ratio and mean in the summary goes through [`Ratio`], the single
//! safe-divide helper, so a zero denominator always yields the
//! not-applicable sentinel instead of a division error.

use crate::index::SourceCounts;
use crate::matcher::MatchedPair;
use std::fmt;

/// Default subject-MAPQ floor for the overconfidence classification.
pub const DEFAULT_OVERCONFIDENT_SUBJECT_MIN: u8 = 50;
/// Default baseline-MAPQ ceiling for the overconfidence classification.
pub const DEFAULT_OVERCONFIDENT_BASELINE_MAX: u8 = 5;
/// Default per-side MAPQ floor for the "both high-confidence despite
/// disagreement" classification.
pub const DEFAULT_HIGH_CONFIDENCE_MIN: u8 = 30;

/// MAPQ thresholds for the mismatched-position classifications.
///
/// Changing the values changes which pairs are flagged but not how the
/// flags are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcordanceThresholds {
    /// A mismatched pair is "overconfident" when the subject MAPQ is at
    /// least this...
    pub overconfident_subject_min: u8,
    /// ...and the baseline MAPQ is at most this.
    pub overconfident_baseline_max: u8,
    /// Both sides at or above this count as high-confidence disagreement.
    pub high_confidence_min: u8,
}

impl Default for ConcordanceThresholds {
    fn default() -> Self {
        Self {
            overconfident_subject_min: DEFAULT_OVERCONFIDENT_SUBJECT_MIN,
            overconfident_baseline_max: DEFAULT_OVERCONFIDENT_BASELINE_MAX,
            high_confidence_min: DEFAULT_HIGH_CONFIDENCE_MIN,
        }
    }
}

/// Result of a guarded division: a value, or "not applicable" when the
/// denominator was zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    /// numerator / denominator
    Value(f64),
    /// The denominator was zero; the statistic is undefined for this run.
    NotApplicable,
}

impl Ratio {
    /// The one place a ratio or mean is allowed to be computed.
    #[must_use]
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 { Self::NotApplicable } else { Self::Value(numerator / denominator) }
    }

    /// Guarded division of two counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(numerator: u64, denominator: u64) -> Self {
        Self::of(numerator as f64, denominator as f64)
    }

    /// The underlying value, if defined.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotApplicable => None,
        }
    }

    /// Renders as a percentage ("95.43%"), or "n/a".
    #[must_use]
    pub fn percent(self, decimals: usize) -> String {
        match self {
            Self::Value(v) => crate::logging::format_percent(v, decimals),
            Self::NotApplicable => "n/a".to_string(),
        }
    }

    /// Renders the plain value with fixed decimals, or "n/a".
    #[must_use]
    pub fn fixed(self, decimals: usize) -> String {
        match self {
            Self::Value(v) => format!("{v:.decimals$}", decimals = decimals),
            Self::NotApplicable => "n/a".to_string(),
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fixed(2))
    }
}

/// Summary statistics for one comparison run.
///
/// Built in a single reduction pass over the matched pairs; the named
/// counters replace scattered accumulator state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonSummary {
    /// Counters from the baseline source's parse pass.
    pub baseline_counts: SourceCounts,
    /// Counters from the subject source's parse pass.
    pub subject_counts: SourceCounts,
    /// Keys where both sources held a mapped primary.
    pub matched: u64,
    /// Matched pairs with identical reference name and position.
    pub pos_exact: u64,
    /// Matched pairs placed differently. Always `matched - pos_exact`.
    pub pos_mismatch: u64,
    /// Matched pairs with identical MAPQ.
    pub mapq_exact: u64,
    /// Sum of absolute MAPQ differences over all matched pairs.
    pub mapq_delta_sum: u64,
    /// Mismatched-position pairs meeting the overconfidence thresholds.
    pub overconfident: u64,
    /// Sum of subject MAPQs over overconfident pairs.
    pub overconfident_subject_mapq_sum: u64,
    /// Mismatched-position pairs where both sides report MAPQ 0.
    pub both_zero_mapq: u64,
    /// Mismatched-position pairs where both sides are high-confidence.
    pub both_high_mapq: u64,
    /// Sum of subject MAPQs over mismatched-position pairs.
    pub mismatch_subject_mapq_sum: u64,
    /// Sum of baseline MAPQs over mismatched-position pairs.
    pub mismatch_baseline_mapq_sum: u64,
}

impl ComparisonSummary {
    /// Reduces all matched pairs plus both sources' counters.
    #[must_use]
    pub fn from_pairs(
        pairs: &[MatchedPair<'_>],
        baseline_counts: SourceCounts,
        subject_counts: SourceCounts,
        thresholds: ConcordanceThresholds,
    ) -> Self {
        let mut summary =
            Self { baseline_counts, subject_counts, ..Self::default() };

        for pair in pairs {
            summary.matched += 1;
            summary.mapq_delta_sum += u64::from(pair.mapq_delta());
            if pair.mapq_equal() {
                summary.mapq_exact += 1;
            }

            if pair.same_position() {
                summary.pos_exact += 1;
                continue;
            }

            summary.pos_mismatch += 1;
            let subject_mapq = pair.subject.mapq;
            let baseline_mapq = pair.baseline.mapq;
            summary.mismatch_subject_mapq_sum += u64::from(subject_mapq);
            summary.mismatch_baseline_mapq_sum += u64::from(baseline_mapq);

            if subject_mapq >= thresholds.overconfident_subject_min
                && baseline_mapq <= thresholds.overconfident_baseline_max
            {
                summary.overconfident += 1;
                summary.overconfident_subject_mapq_sum += u64::from(subject_mapq);
            }
            if subject_mapq == 0 && baseline_mapq == 0 {
                summary.both_zero_mapq += 1;
            }
            if subject_mapq >= thresholds.high_confidence_min
                && baseline_mapq >= thresholds.high_confidence_min
            {
                summary.both_high_mapq += 1;
            }
        }
        summary
    }

    /// Mapped primaries / total primaries for the baseline source.
    #[must_use]
    pub fn baseline_mapping_rate(&self) -> Ratio {
        Self::mapping_rate(&self.baseline_counts)
    }

    /// Mapped primaries / total primaries for the subject source.
    #[must_use]
    pub fn subject_mapping_rate(&self) -> Ratio {
        Self::mapping_rate(&self.subject_counts)
    }

    /// Properly-paired primaries / total primaries for the baseline source.
    #[must_use]
    pub fn baseline_proper_pair_rate(&self) -> Ratio {
        Self::proper_pair_rate(&self.baseline_counts)
    }

    /// Properly-paired primaries / total primaries for the subject source.
    #[must_use]
    pub fn subject_proper_pair_rate(&self) -> Ratio {
        Self::proper_pair_rate(&self.subject_counts)
    }

    fn mapping_rate(counts: &SourceCounts) -> Ratio {
        Ratio::from_counts(counts.mapped_primaries, counts.total_primaries)
    }

    fn proper_pair_rate(counts: &SourceCounts) -> Ratio {
        Ratio::from_counts(counts.proper_pair_primaries, counts.total_primaries)
    }

    /// Fraction of matched pairs with exact position agreement.
    #[must_use]
    pub fn pos_exact_rate(&self) -> Ratio {
        Ratio::from_counts(self.pos_exact, self.matched)
    }

    /// Fraction of matched pairs placed differently.
    #[must_use]
    pub fn pos_mismatch_rate(&self) -> Ratio {
        Ratio::from_counts(self.pos_mismatch, self.matched)
    }

    /// Fraction of matched pairs with identical MAPQ.
    #[must_use]
    pub fn mapq_exact_rate(&self) -> Ratio {
        Ratio::from_counts(self.mapq_exact, self.matched)
    }

    /// Mean absolute MAPQ difference over all matched pairs.
    #[must_use]
    pub fn mean_mapq_delta(&self) -> Ratio {
        Ratio::from_counts(self.mapq_delta_sum, self.matched)
    }

    /// Mean subject MAPQ over overconfident pairs.
    #[must_use]
    pub fn mean_overconfident_subject_mapq(&self) -> Ratio {
        Ratio::from_counts(self.overconfident_subject_mapq_sum, self.overconfident)
    }

    /// Mean subject MAPQ over mismatched-position pairs.
    #[must_use]
    pub fn mean_mismatch_subject_mapq(&self) -> Ratio {
        Ratio::from_counts(self.mismatch_subject_mapq_sum, self.pos_mismatch)
    }

    /// Mean baseline MAPQ over mismatched-position pairs.
    #[must_use]
    pub fn mean_mismatch_baseline_mapq(&self) -> Ratio {
        Ratio::from_counts(self.mismatch_baseline_mapq_sum, self.pos_mismatch)
    }
}
