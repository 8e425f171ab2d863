//! Per-source read index: all alignments for one SAM file keyed by read key,
//! plus running counters accumulated during the single parse pass.

use crate::errors::{ConcordError, Result};
use crate::progress::ProgressLogger;
use crate::record::AlignmentRecord;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;

/// Log interval for parse progress.
const PARSE_PROGRESS_INTERVAL: u64 = 100_000;

/// Running per-source counters, incremented once per stored record.
///
/// The totals are order-independent: they are pure increments over the
/// record stream and do not depend on line order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCounts {
    /// Non-supplementary records seen (one per logical read).
    pub total_primaries: u64,
    /// Primaries without the unmapped flag.
    pub mapped_primaries: u64,
    /// Primaries with the proper-pair flag.
    pub proper_pair_primaries: u64,
    /// Supplementary records seen.
    pub supplementary: u64,
}

impl SourceCounts {
    fn record(&mut self, rec: &AlignmentRecord) {
        if rec.flags.is_supplementary() {
            self.supplementary += 1;
        } else {
            self.total_primaries += 1;
            if !rec.flags.is_unmapped() {
                self.mapped_primaries += 1;
            }
            if rec.flags.is_proper_pair() {
                self.proper_pair_primaries += 1;
            }
        }
    }

    /// Primaries carrying the unmapped flag.
    #[must_use]
    pub fn unmapped_primaries(&self) -> u64 {
        self.total_primaries - self.mapped_primaries
    }
}

/// All alignments for one source, keyed by read key in first-encounter
/// order. Each key's sequence holds the primary first (if present), then
/// supplementaries in file order. Immutable after construction.
#[derive(Debug, Default)]
pub struct SourceIndex {
    records: IndexMap<String, Vec<AlignmentRecord>, ahash::RandomState>,
    counts: SourceCounts,
}

impl SourceIndex {
    /// Parses one SAM file into an index.
    ///
    /// Header lines (`@` prefix) are skipped; secondary alignments are
    /// dropped by the parser and never stored or counted. A malformed
    /// mandatory column aborts the whole file with
    /// [`ConcordError::MalformedRecord`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let file = File::open(path)
            .map_err(|source| ConcordError::Io { path: path_str.clone(), source })?;
        let reader = BufReader::new(file);

        let mut index = Self::default();
        let mut progress =
            ProgressLogger::new(format!("Parsed {path_str}"), PARSE_PROGRESS_INTERVAL);

        for (line_idx, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|source| ConcordError::Io { path: path_str.clone(), source })?;
            if line.is_empty() || line.starts_with('@') {
                continue;
            }
            let parsed = AlignmentRecord::parse(&line).map_err(|reason| {
                ConcordError::MalformedRecord {
                    path: path_str.clone(),
                    line: line_idx as u64 + 1,
                    reason,
                }
            })?;
            if let Some(rec) = parsed {
                index.push(rec);
                progress.inc();
            }
        }
        progress.finish();
        Ok(index)
    }

    /// Parses two sources concurrently on independent threads and joins
    /// before returning. The two parses share no mutable state; the join is
    /// the synchronization barrier required before matching.
    pub fn load_pair<P: AsRef<Path> + Sync>(
        baseline_path: P,
        subject_path: P,
    ) -> Result<(Self, Self)> {
        thread::scope(|scope| {
            let baseline = scope.spawn(|| Self::from_path(baseline_path.as_ref()));
            let subject = scope.spawn(|| Self::from_path(subject_path.as_ref()));
            let baseline = baseline.join().expect("baseline parser thread panicked")?;
            let subject = subject.join().expect("subject parser thread panicked")?;
            Ok((baseline, subject))
        })
    }

    fn push(&mut self, rec: AlignmentRecord) {
        self.counts.record(&rec);
        let entry = self.records.entry(rec.read_key()).or_default();
        if rec.flags.is_supplementary() {
            entry.push(rec);
        } else {
            // Primary first; supplementaries may precede it in file order.
            entry.insert(0, rec);
        }
    }

    /// The running counters for this source.
    #[must_use]
    pub fn counts(&self) -> &SourceCounts {
        &self.counts
    }

    /// Read keys in first-encounter order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Whether this source saw the given read key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// All records for a key, primary first.
    #[must_use]
    pub fn records(&self, key: &str) -> &[AlignmentRecord] {
        self.records.get(key).map_or(&[], Vec::as_slice)
    }

    /// The primary (non-supplementary) record for a key, if any.
    #[must_use]
    pub fn primary(&self, key: &str) -> Option<&AlignmentRecord> {
        self.records(key).iter().find(|r| !r.flags.is_supplementary())
    }

    /// Supplementary records for a key, in file order.
    pub fn supplementaries(&self, key: &str) -> impl Iterator<Item = &AlignmentRecord> {
        self.records(key).iter().filter(|r| r.flags.is_supplementary())
    }

    /// Number of supplementary records stored for a key.
    #[must_use]
    pub fn supplementary_count(&self, key: &str) -> usize {
        self.supplementaries(key).count()
    }

    /// Number of distinct read keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no reads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
